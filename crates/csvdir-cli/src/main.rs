//! csvdir CLI
//!
//! Command-line tool for loading a directory of CSV files and inspecting the
//! resulting tables.

mod logging;

use clap::{Parser, Subcommand, ValueEnum};
use csvdir_core::{parse_csv, read_all_csvs, Table};
use std::collections::{BTreeMap, HashMap};
use std::error::Error as _;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Parser)]
#[command(name = "csvdir")]
#[command(about = "Load every CSV file in a directory", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load all tables in a directory and print them
    Load {
        /// Directory holding the CSV files
        #[arg(short, long)]
        dir: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Maximum number of rows to print per table (text format only)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List the tables in a directory with their shapes and column types
    List {
        /// Directory holding the CSV files
        #[arg(short, long)]
        dir: PathBuf,
    },

    /// Parse and display a single CSV file
    Parse {
        /// Path to CSV file
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Core(#[from] csvdir_core::Error),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = cause.source();
        }
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Load { dir, format, limit } => cmd_load(&dir, format, limit),
        Commands::List { dir } => cmd_list(&dir),
        Commands::Parse { file } => cmd_parse(&file),
    }
}

fn cmd_load(dir: &Path, format: OutputFormat, limit: Option<usize>) -> Result<(), CliError> {
    let tables = read_all_csvs(dir)?;
    tracing::info!(dir = %dir.display(), tables = tables.len(), "loaded directory");

    let sorted = sorted_tables(&tables);

    match format {
        OutputFormat::Text => {
            for (name, table) in &sorted {
                println!("== {} ({} rows)", name, table.row_count());
                print_table(table, limit.unwrap_or(table.row_count()));
                println!();
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&sorted)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn cmd_list(dir: &Path) -> Result<(), CliError> {
    let tables = read_all_csvs(dir)?;

    println!("Tables ({}):", tables.len());
    println!();

    for (name, table) in sorted_tables(&tables) {
        println!(
            "{} ({} rows, {} columns)",
            name,
            table.row_count(),
            table.column_count()
        );
        for column in &table.columns {
            println!("  {}: {}", column.name, column.dtype);
        }
    }

    Ok(())
}

fn cmd_parse(file: &Path) -> Result<(), CliError> {
    let table = parse_csv(file)?;

    println!("File: {}", file.display());
    println!("Columns: {}", table.column_count());
    println!("Rows: {}", table.row_count());
    println!();

    print_table(&table, 10);

    Ok(())
}

/// Key order for display; the loader's map itself is unordered
fn sorted_tables(tables: &HashMap<String, Table>) -> BTreeMap<&str, &Table> {
    tables.iter().map(|(k, v)| (k.as_str(), v)).collect()
}

fn print_table(table: &Table, limit: usize) {
    print!("{}", render_table(table, limit));
}

/// Tab-separated header and rows, followed by a count of rows left out
fn render_table(table: &Table, limit: usize) -> String {
    let header: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
    let mut out = format!("{}\n", header.join("\t"));

    for row in table.rows.iter().take(limit) {
        let values: Vec<String> = row.cells.iter().map(|c| c.to_string_value()).collect();
        out.push_str(&values.join("\t"));
        out.push('\n');
    }

    if table.row_count() > limit {
        out.push_str(&format!("... ({} more rows)\n", table.row_count() - limit));
    }

    out
}
