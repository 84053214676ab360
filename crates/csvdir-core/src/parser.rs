//! CSV parser producing typed tables

use crate::error::{Error, ParseError, Result};
use crate::table::{is_missing, parse_bool, CellValue, Column, ColumnType, Row, Table};
use csv::StringRecord;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Parse a CSV file into a Table
///
/// The file handle lives only for the duration of this call. Any failure,
/// including failing to open the file, is reported as [`Error::ParseFailure`]
/// for `path`.
pub fn parse_csv<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    read_table(path).map_err(|source| Error::ParseFailure {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse CSV from a string
pub fn parse_csv_str(content: &str, source_name: &str) -> Result<Table> {
    let path = PathBuf::from(source_name);
    parse_reader(content.as_bytes(), path.clone())
        .map_err(|source| Error::ParseFailure { path, source })
}

fn read_table(path: &Path) -> std::result::Result<Table, ParseError> {
    let file = File::open(path)?;
    parse_reader(BufReader::new(file), path.to_path_buf())
}

fn parse_reader<R: Read>(
    reader: R,
    source_path: PathBuf,
) -> std::result::Result<Table, ParseError> {
    // Flexible so that short rows reach us and can be padded; long rows are
    // rejected below with the line number.
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if headers.is_empty() {
        return Err(ParseError::NoColumns);
    }
    let names = normalize_headers(&headers);
    let width = names.len();

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        if record.len() > width {
            return Err(ParseError::FieldCount {
                line: record.position().map(|p| p.line()).unwrap_or_default(),
                expected: width,
                found: record.len(),
            });
        }
        records.push(record);
    }

    let dtypes: Vec<ColumnType> = (0..width)
        .map(|i| infer_column_type(records.iter().filter_map(|r| r.get(i))))
        .collect();

    let rows = records
        .iter()
        .map(|record| {
            let cells = dtypes
                .iter()
                .enumerate()
                .map(|(i, dtype)| match record.get(i) {
                    Some(raw) => convert_cell(raw, *dtype),
                    None => CellValue::Empty,
                })
                .collect();
            Row::new(cells)
        })
        .collect();

    let columns = names
        .into_iter()
        .zip(dtypes)
        .enumerate()
        .map(|(i, (name, dtype))| Column::new(name, i, dtype))
        .collect();

    tracing::trace!(
        path = %source_path.display(),
        columns = width,
        rows = records.len(),
        "parsed CSV"
    );

    Ok(Table {
        columns,
        rows,
        source_path,
    })
}

/// Name blank headers `Unnamed: <index>` and suffix repeats with `.1`, `.2`, ...
fn normalize_headers(headers: &StringRecord) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(headers.len());
    let mut names = Vec::with_capacity(headers.len());

    for (i, raw) in headers.iter().enumerate() {
        let base = if raw.trim().is_empty() {
            format!("Unnamed: {}", i)
        } else {
            raw.to_string()
        };

        let mut name = base.clone();
        let mut n = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", base, n);
            n += 1;
        }

        seen.insert(name.clone());
        names.push(name);
    }

    names
}

/// Infer a column's type from its raw cells, ignoring missing values
fn infer_column_type<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnType {
    let mut dtype = ColumnType::Empty;

    for raw in cells {
        let trimmed = raw.trim();
        if is_missing(trimmed) {
            continue;
        }

        let cell_type = if trimmed.parse::<i64>().is_ok() {
            ColumnType::Integer
        } else if trimmed.parse::<f64>().is_ok() {
            ColumnType::Float
        } else if parse_bool(trimmed).is_some() {
            ColumnType::Boolean
        } else {
            ColumnType::String
        };

        dtype = widen(dtype, cell_type);
        if dtype == ColumnType::String {
            break;
        }
    }

    dtype
}

fn widen(current: ColumnType, next: ColumnType) -> ColumnType {
    use ColumnType::{Empty, Float, Integer};

    match (current, next) {
        (Empty, other) | (other, Empty) => other,
        (a, b) if a == b => a,
        (Integer, Float) | (Float, Integer) => Float,
        _ => ColumnType::String,
    }
}

/// Convert one raw cell to a value of the column's type
fn convert_cell(raw: &str, dtype: ColumnType) -> CellValue {
    let trimmed = raw.trim();
    if is_missing(trimmed) {
        return CellValue::Empty;
    }

    match (dtype, CellValue::parse(trimmed)) {
        (ColumnType::Float, CellValue::Integer(i)) => CellValue::Float(i as f64),
        (ColumnType::String, _) => CellValue::String(raw.to_string()),
        (_, value) => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_csv() {
        let csv = "ID,Name,Value\n1,foo,100\n2,bar,200\n";
        let table = parse_csv_str(csv, "test.csv").unwrap();

        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.columns[0].name, "ID");
        assert_eq!(table.columns[1].name, "Name");
        assert_eq!(table.columns[2].name, "Value");
        assert_eq!(table.columns[0].dtype, ColumnType::Integer);
        assert_eq!(table.columns[1].dtype, ColumnType::String);

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].cells[0], CellValue::Integer(1));
        assert_eq!(table.rows[1].cells[2], CellValue::Integer(200));
        assert_eq!(table.source_path, PathBuf::from("test.csv"));
    }

    #[test]
    fn test_parse_with_empty_cells() {
        let csv = "ID,Name,Value\n1,,100\n2,bar,\n";
        let table = parse_csv_str(csv, "test.csv").unwrap();

        assert_eq!(table.rows[0].cells[1], CellValue::Empty);
        assert_eq!(table.rows[1].cells[2], CellValue::Empty);
        assert_eq!(table.columns[2].dtype, ColumnType::Integer);
    }

    #[test]
    fn test_mixed_int_and_float_widens_to_float() {
        let csv = "ID,Value\n1,3\n2,-2.5\n";
        let table = parse_csv_str(csv, "test.csv").unwrap();

        assert_eq!(table.columns[1].dtype, ColumnType::Float);
        assert_eq!(table.rows[0].cells[1], CellValue::Float(3.0));
        assert_eq!(table.rows[1].cells[1], CellValue::Float(-2.5));
    }

    #[test]
    fn test_mixed_numbers_and_text_become_strings() {
        let csv = "code\n10\nA7\n 3 \n";
        let table = parse_csv_str(csv, "test.csv").unwrap();

        assert_eq!(table.columns[0].dtype, ColumnType::String);
        assert_eq!(table.rows[0].cells[0], CellValue::String("10".into()));
        assert_eq!(table.rows[2].cells[0], CellValue::String(" 3 ".into()));
    }

    #[test]
    fn test_text_cells_keep_surrounding_whitespace() {
        let csv = r#"name,qty
"  padded  ", 4 
plain,5
"#;
        let table = parse_csv_str(csv, "test.csv").unwrap();

        assert_eq!(table.rows[0].cells[0], CellValue::String("  padded  ".into()));
        assert_eq!(table.rows[1].cells[0], CellValue::String("plain".into()));
        // numeric columns still parse through the padding
        assert_eq!(table.columns[1].dtype, ColumnType::Integer);
        assert_eq!(table.rows[0].cells[1], CellValue::Integer(4));
    }

    #[test]
    fn test_boolean_and_all_missing_columns() {
        let csv = "flag,note\nTrue,\nfalse,NA\n";
        let table = parse_csv_str(csv, "test.csv").unwrap();

        assert_eq!(table.columns[0].dtype, ColumnType::Boolean);
        assert_eq!(table.columns[1].dtype, ColumnType::Empty);
        assert_eq!(table.rows[1].cells[0], CellValue::Boolean(false));
        assert_eq!(table.rows[1].cells[1], CellValue::Empty);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let csv = "a,b,c\n1,2\n";
        let table = parse_csv_str(csv, "test.csv").unwrap();

        assert_eq!(table.rows[0].cells.len(), 3);
        assert_eq!(table.rows[0].cells[2], CellValue::Empty);
    }

    #[test]
    fn test_long_rows_are_rejected() {
        let csv = "a,b\n1,2\n3,4,5\n";
        let err = parse_csv_str(csv, "wide.csv").unwrap_err();

        match err {
            Error::ParseFailure { path, source } => {
                assert_eq!(path, PathBuf::from("wide.csv"));
                assert!(matches!(
                    source,
                    ParseError::FieldCount {
                        line: 3,
                        expected: 2,
                        found: 3
                    }
                ));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_input_has_no_columns() {
        let err = parse_csv_str("", "empty.csv").unwrap_err();
        assert!(matches!(
            err,
            Error::ParseFailure {
                source: ParseError::NoColumns,
                ..
            }
        ));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let csv = "a,b\n1,2\n\n3,4\n";
        let table = parse_csv_str(csv, "test.csv").unwrap();
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_header_only_gives_no_rows() {
        let table = parse_csv_str("a,b\n", "test.csv").unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.columns[0].dtype, ColumnType::Empty);
    }

    #[test]
    fn test_duplicate_and_blank_headers() {
        let csv = "x,,x,x\n1,2,3,4\n";
        let table = parse_csv_str(csv, "test.csv").unwrap();

        let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["x", "Unnamed: 1", "x.1", "x.2"]);
    }

    #[test]
    fn test_quoted_fields() {
        let csv = "name,desc\n\"Smith, J\",\"said \"\"hi\"\"\"\n";
        let table = parse_csv_str(csv, "test.csv").unwrap();

        assert_eq!(table.rows[0].cells[0], CellValue::String("Smith, J".into()));
        assert_eq!(table.rows[0].cells[1], CellValue::String("said \"hi\"".into()));
    }

    #[test]
    fn test_parse_missing_file_is_parse_failure() {
        let err = parse_csv("definitely/not/here.csv").unwrap_err();
        assert!(matches!(
            err,
            Error::ParseFailure {
                source: ParseError::Io(_),
                ..
            }
        ));
    }
}
