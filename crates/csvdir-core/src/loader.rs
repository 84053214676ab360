//! Directory loader: one table per CSV file in a folder

use crate::error::{Error, ParseError, Result};
use crate::parser::parse_csv;
use crate::table::Table;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Suffix a directory entry must carry to be loaded (case-sensitive)
pub const CSV_SUFFIX: &str = ".csv";

/// Load every CSV file directly inside `folder_path`
///
/// Each file becomes one [`Table`], keyed by its file name with the extension
/// removed (`sales.csv` -> `sales`). Subdirectories are not visited.
///
/// If two files map to the same key, the one enumerated last wins. The
/// enumeration order is whatever the filesystem returns.
///
/// # Errors
///
/// - [`Error::NotFound`] if `folder_path` does not exist or is not a directory
/// - [`Error::InvalidInput`] if it holds no `.csv` entries
/// - [`Error::ParseFailure`] if any matched file cannot be parsed; nothing is
///   returned for the other files in that case
pub fn read_all_csvs<P: AsRef<Path>>(folder_path: P) -> Result<HashMap<String, Table>> {
    let folder = folder_path.as_ref();
    let csv_paths = find_csv_files(folder)?;

    if csv_paths.is_empty() {
        return Err(Error::InvalidInput {
            path: folder.to_path_buf(),
        });
    }

    let mut tables = HashMap::with_capacity(csv_paths.len());

    for path in csv_paths {
        let key = table_key(&path);
        let table = parse_csv(&path)?;

        tracing::debug!(
            table = %key,
            path = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            "loaded table"
        );

        if let Some(previous) = tables.insert(key, table) {
            tracing::warn!(
                replaced = %previous.source_path.display(),
                by = %path.display(),
                "table name collision, keeping the later file"
            );
        }
    }

    Ok(tables)
}

/// List the `.csv` entries directly inside `folder`, in enumeration order
///
/// Hidden entries (leading `.`) are not matched. Symlinks are listed as they
/// are and only resolved when the file is opened, so a dangling link still
/// counts as a match. An entry that matches but cannot be read while listing
/// is reported as [`Error::ParseFailure`]; other unreadable entries are
/// skipped.
pub fn find_csv_files<P: AsRef<Path>>(folder: P) -> Result<Vec<PathBuf>> {
    let folder = folder.as_ref();

    if !folder.is_dir() {
        return Err(Error::NotFound {
            path: folder.to_path_buf(),
        });
    }

    let mut paths = Vec::new();

    for result in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
    {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                let matched = err
                    .path()
                    .and_then(|p| p.file_name())
                    .is_some_and(is_csv_name);
                if !matched {
                    tracing::trace!(error = %err, "skipping unreadable entry");
                    continue;
                }
                let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                return Err(Error::ParseFailure {
                    path,
                    source: ParseError::Io(std::io::Error::from(err)),
                });
            }
        };

        if is_csv_name(entry.file_name()) {
            paths.push(entry.into_path());
        } else {
            tracing::trace!(path = %entry.path().display(), "skipping entry");
        }
    }

    Ok(paths)
}

/// File name without its final extension
///
/// Examples:
/// - "sales.csv" -> "sales"
/// - "report.2024.csv" -> "report.2024"
pub fn table_key(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn is_csv_name(name: &OsStr) -> bool {
    let name = name.to_string_lossy();
    name.ends_with(CSV_SUFFIX) && !name.starts_with('.')
}
