//! passbook-ingest: spreadsheet row-arrays, row heuristics and the IDFC statement parser.

pub mod error;
pub mod heuristics;
pub mod layout;
pub mod parsers;
pub mod types;
pub mod workbook;

pub use error::{IngestError, Result};
pub use layout::{ColumnMap, StatementLayout};
pub use types::{Cell, RecentWindow, StatementSummary, Transaction, Worksheet};
pub use workbook::load_worksheet;
