//! Row classification for statement sheets.
//!
//! None of these fail: malformed cells read as zero and unusable rows are skipped.

use crate::types::Cell;

/// First row where any text cell contains `marker` (case-insensitive).
pub fn find_header_row(rows: &[Vec<Cell>], marker: &str) -> Option<usize> {
    let marker = marker.trim().to_lowercase();
    rows.iter().position(|row| {
        row.iter()
            .filter_map(Cell::as_text)
            .any(|t| t.trim().to_lowercase().contains(&marker))
    })
}

/// First cell is text containing a dash, i.e. looks like "01-Apr-2024".
pub fn is_date_like(row: &[Cell]) -> bool {
    row.first()
        .and_then(Cell::as_text)
        .is_some_and(|t| t.contains('-'))
}

/// Index of the last transaction row, scanning backward from the end of the sheet.
pub fn find_last_transaction_row(rows: &[Vec<Cell>]) -> Option<usize> {
    rows.iter().rposition(|row| is_date_like(row))
}

/// Later of `floor` and `lookback` rows before `end`.
pub fn block_start(end: usize, floor: usize, lookback: usize) -> usize {
    floor.max(end.saturating_sub(lookback))
}

pub fn is_transaction_row(row: &[Cell], min_len: usize) -> bool {
    row.len() >= min_len && row.first().is_some_and(Cell::is_truthy)
}

/// Read an amount cell. Empty, unparseable or non-finite values are 0.
pub fn parse_amount(cell: Option<&Cell>) -> f64 {
    let v = match cell {
        None | Some(Cell::Empty) => return 0.0,
        Some(Cell::Number(n)) => *n,
        Some(Cell::Text(s)) => parse_amount_str(s),
    };
    if v.is_finite() { v } else { 0.0 }
}

pub fn parse_amount_str(s: &str) -> f64 {
    let cleaned = s.replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return 0.0;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0)
}
