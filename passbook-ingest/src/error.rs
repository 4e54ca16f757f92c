use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("opening {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::XlsxError,
    },

    #[error("sheet '{name}' not found (available: {})", available.join(", "))]
    SheetNotFound { name: String, available: Vec<String> },

    #[error("workbook has no sheets")]
    EmptyWorkbook,

    #[error("no header row containing '{marker}'")]
    HeaderNotFound { marker: String },

    #[error("no transaction rows found")]
    NoTransactions,

    #[error("summary block not found (expected values at row {row})")]
    SummaryNotFound { row: usize },
}

pub type Result<T> = std::result::Result<T, IngestError>;
