//! csvdir-core: Load a directory of CSV files into in-memory tables
//!
//! This library provides functionality to:
//! - Find the `.csv` files directly inside a directory
//! - Parse each CSV file into a typed table, inferring column types per file
//! - Return all tables keyed by file name without extension

pub mod error;
pub mod loader;
pub mod parser;
pub mod table;

pub use error::{Error, ErrorKind, ParseError, Result};
pub use loader::{find_csv_files, read_all_csvs, table_key};
pub use parser::{parse_csv, parse_csv_str};
pub use table::{CellValue, Column, ColumnType, Row, Table};
