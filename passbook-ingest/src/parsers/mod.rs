pub mod idfc;

pub use idfc::{extract_after_header, extract_recent, parse_transaction_row, read_summary};
