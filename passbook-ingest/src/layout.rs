//! Row and column offsets of a statement export.
//!
//! Defaults are the IDFC FIRST Bank XLSX layout:
//!   row 18      Opening Balance | Total Debit | Total Credit | Closing Balance
//!   row 19      values for the above
//!   header row  Transaction Date | Value Date | Particulars | Cheque No. | Debit | Credit
//!               | Balance

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementLayout {
    /// Lowercase text that identifies the transaction header row
    pub header_marker: String,
    /// Earliest row the recent window may start at
    pub block_start_floor: usize,
    /// How many rows before the detected end the recent window reaches
    pub block_lookback: usize,
    pub summary_label_row: usize,
    pub summary_value_row: usize,
    /// Rows shorter than this are never transactions
    pub min_row_len: usize,
    /// Opening, total debit, total credit, closing
    pub summary_columns: [usize; 4],
    pub columns: ColumnMap,
}

impl Default for StatementLayout {
    fn default() -> Self {
        Self {
            header_marker: "transaction date".to_string(),
            block_start_floor: 24,
            block_lookback: 9,
            summary_label_row: 18,
            summary_value_row: 19,
            min_row_len: 7,
            summary_columns: [0, 1, 2, 3],
            columns: ColumnMap::default(),
        }
    }
}

impl StatementLayout {
    /// Rows from the summary labels to their values; at least 1.
    pub fn summary_value_offset(&self) -> usize {
        self.summary_value_row
            .checked_sub(self.summary_label_row)
            .filter(|&d| d > 0)
            .unwrap_or(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub txn_date: usize,
    pub value_date: usize,
    pub particulars: usize,
    pub reference: usize,
    pub debit: usize,
    pub credit: usize,
    pub balance: usize,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            txn_date: 0,
            value_date: 1,
            particulars: 2,
            reference: 3,
            debit: 4,
            credit: 5,
            balance: 6,
        }
    }
}
