//! IDFC FIRST Bank XLSX statement parser
//!
//! Expected sheet shape (0-based rows, see `StatementLayout` for the offsets):
//!   18  Opening Balance | Total Debit | Total Credit | Closing Balance
//!   19  1,00,000.00     | 2,500.00    | 10,000.00    | 1,07,500.00
//!   ..  Transaction Date | Value Date | Particulars | Cheque No. | Debit | Credit | Balance
//!   ..  01-Apr-2024      | 01-Apr-2024 | UPI/...    |            | 500.00 |       | 99,500.00

use tracing::{debug, warn};

use crate::error::{IngestError, Result};
use crate::heuristics::{
    block_start, find_header_row, find_last_transaction_row, is_date_like, is_transaction_row,
    parse_amount,
};
use crate::layout::StatementLayout;
use crate::types::{Cell, RecentWindow, StatementSummary, Transaction, Worksheet};

const SUMMARY_LABELS: [&str; 4] = [
    "opening balance",
    "total debit",
    "total credit",
    "closing balance",
];

fn cell_text(row: &[Cell], idx: usize) -> String {
    row.get(idx).map(Cell::display).unwrap_or_default().trim().to_string()
}

/// Build a transaction from a row, or None when the row fails the row predicate.
pub fn parse_transaction_row(
    idx: usize,
    row: &[Cell],
    layout: &StatementLayout,
) -> Option<Transaction> {
    if !is_transaction_row(row, layout.min_row_len) {
        return None;
    }
    let c = &layout.columns;
    Some(Transaction {
        row: idx,
        txn_date: cell_text(row, c.txn_date),
        value_date: cell_text(row, c.value_date),
        particulars: cell_text(row, c.particulars),
        reference: cell_text(row, c.reference),
        debit: parse_amount(row.get(c.debit)),
        credit: parse_amount(row.get(c.credit)),
        balance: parse_amount(row.get(c.balance)),
    })
}

/// Every date-like row after the header row.
pub fn extract_after_header(
    sheet: &Worksheet,
    layout: &StatementLayout,
) -> Result<Vec<Transaction>> {
    let header = find_header_row(&sheet.rows, &layout.header_marker).ok_or_else(|| {
        IngestError::HeaderNotFound {
            marker: layout.header_marker.clone(),
        }
    })?;
    debug!(header, "found header row");

    let txns: Vec<Transaction> = sheet
        .rows
        .iter()
        .enumerate()
        .skip(header + 1)
        .filter(|(_, row)| is_date_like(row))
        .filter_map(|(i, row)| parse_transaction_row(i, row, layout))
        .collect();

    debug!(count = txns.len(), "extracted transactions after header");
    Ok(txns)
}

/// The last few transaction rows, found by scanning backward for the block end.
pub fn extract_recent(sheet: &Worksheet, layout: &StatementLayout) -> Result<RecentWindow> {
    let end = find_last_transaction_row(&sheet.rows).ok_or(IngestError::NoTransactions)?;
    let start = block_start(end, layout.block_start_floor, layout.block_lookback);
    debug!(start, end, "transaction block");

    let transactions = sheet
        .rows
        .iter()
        .enumerate()
        .take(end + 1)
        .skip(start)
        .filter_map(|(i, row)| parse_transaction_row(i, row, layout))
        .collect();

    Ok(RecentWindow {
        start,
        end,
        transactions,
    })
}

/// Opening/closing balances and totals.
///
/// Looks for the "Opening Balance" label row first and reads values the configured
/// number of rows below it; falls back to the fixed rows in `layout`.
pub fn read_summary(sheet: &Worksheet, layout: &StatementLayout) -> Result<StatementSummary> {
    if let Some(summary) = summary_by_label(sheet, layout) {
        return Ok(summary);
    }

    warn!(
        row = layout.summary_value_row,
        "summary labels not found, using fixed position"
    );
    let values = sheet
        .row(layout.summary_value_row)
        .ok_or(IngestError::SummaryNotFound {
            row: layout.summary_value_row,
        })?;
    Ok(summary_from(values, layout.summary_columns))
}

fn label_columns(row: &[Cell]) -> Option<[usize; 4]> {
    let mut out = [0usize; 4];
    for (slot, label) in out.iter_mut().zip(SUMMARY_LABELS) {
        *slot = row.iter().position(|c| {
            c.as_text()
                .is_some_and(|t| t.trim().to_lowercase().contains(label))
        })?;
    }
    Some(out)
}

/// Label row at `summary_label_row` wins over one found elsewhere in the sheet.
fn summary_by_label(sheet: &Worksheet, layout: &StatementLayout) -> Option<StatementSummary> {
    let preferred = layout.summary_label_row;
    let (idx, columns) = sheet
        .row(preferred)
        .and_then(label_columns)
        .map(|cols| (preferred, cols))
        .or_else(|| {
            sheet
                .rows
                .iter()
                .enumerate()
                .find_map(|(i, row)| label_columns(row).map(|cols| (i, cols)))
        })?;
    let value_row = idx + layout.summary_value_offset();
    let values = sheet.row(value_row)?;
    debug!(label_row = idx, value_row, "summary labels found");
    Some(summary_from(values, columns))
}

fn summary_from(values: &[Cell], [open, debit, credit, close]: [usize; 4]) -> StatementSummary {
    StatementSummary {
        opening_balance: parse_amount(values.get(open)),
        total_debit: parse_amount(values.get(debit)),
        total_credit: parse_amount(values.get(credit)),
        closing_balance: parse_amount(values.get(close)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn t(s: &str) -> Cell {
        Cell::text(s)
    }

    fn txn_row(date: &str, desc: &str, debit: &str, credit: &str, bal: &str) -> Vec<Cell> {
        vec![t(date), t(date), t(desc), Cell::Empty, t(debit), t(credit), t(bal)]
    }

    /// 18 filler rows, summary at 18/19, header at 21, transactions from 22.
    fn sample_sheet(txn_count: usize) -> Worksheet {
        let mut rows: Vec<Vec<Cell>> = (0..18).map(|i| vec![t(&format!("line {i}"))]).collect();
        rows.push(vec![
            t("Opening Balance"),
            t("Total Debit"),
            t("Total Credit"),
            t("Closing Balance"),
        ]);
        rows.push(vec![t("1,000.00"), t("300.00"), t("500.00"), t("1,200.00")]);
        rows.push(vec![]);
        rows.push(vec![
            t("Transaction Date"),
            t("Value Date"),
            t("Particulars"),
            t("Cheque No."),
            t("Debit"),
            t("Credit"),
            t("Balance"),
        ]);
        for i in 0..txn_count {
            rows.push(txn_row(
                &format!("{:02}-Apr-2024", i + 1),
                &format!("UPI/{i}"),
                "10.00",
                "",
                "990.00",
            ));
        }
        rows.push(vec![t("** End of Statement **")]);
        Worksheet::from_rows("Account Statement", rows)
    }

    #[test]
    fn test_extract_after_header() {
        let sheet = sample_sheet(3);
        let txns = extract_after_header(&sheet, &StatementLayout::default()).unwrap();
        assert_eq!(txns.len(), 3);
        assert_eq!(txns[0].row, 22);
        assert_eq!(txns[0].txn_date, "01-Apr-2024");
        assert_eq!(txns[2].particulars, "UPI/2");
        assert_eq!(txns[0].debit, 10.0);
        assert_eq!(txns[0].credit, 0.0);
        assert_eq!(txns[0].balance, 990.0);
    }

    #[test]
    fn test_missing_header_is_error() {
        let sheet = Worksheet::from_rows("x", vec![vec![t("nothing here")]]);
        let err = extract_after_header(&sheet, &StatementLayout::default()).unwrap_err();
        assert!(matches!(err, IngestError::HeaderNotFound { .. }));
    }

    #[test]
    fn test_extract_recent_window() {
        // header at 21, rows 22..=41, end marker at 42
        let sheet = sample_sheet(20);
        let win = extract_recent(&sheet, &StatementLayout::default()).unwrap();
        assert_eq!(win.end, 41);
        assert_eq!(win.start, 32);
        assert_eq!(win.transactions.len(), 10);
        assert_eq!(win.transactions.last().unwrap().row, 41);
    }

    #[test]
    fn test_extract_recent_uses_floor() {
        let sheet = sample_sheet(4);
        let win = extract_recent(&sheet, &StatementLayout::default()).unwrap();
        assert_eq!(win.end, 25);
        assert_eq!(win.start, 24);
        assert_eq!(win.transactions.len(), 2);
    }

    #[test]
    fn test_extract_recent_end_before_floor_is_empty() {
        let mut rows: Vec<Vec<Cell>> = vec![vec![t("heading")]; 5];
        rows.push(txn_row("01-Apr-2024", "UPI/0", "10.00", "", "990.00"));
        rows.push(vec![t("** End of Statement **")]);
        let sheet = Worksheet::from_rows("x", rows);

        let win = extract_recent(&sheet, &StatementLayout::default()).unwrap();
        assert_eq!(win.end, 5);
        assert_eq!(win.start, 24);
        assert!(win.transactions.is_empty());
    }

    #[test]
    fn test_extract_recent_without_dates() {
        let sheet = Worksheet::from_rows("x", vec![vec![t("no dates")], vec![Cell::Number(1.0)]]);
        let err = extract_recent(&sheet, &StatementLayout::default()).unwrap_err();
        assert!(matches!(err, IngestError::NoTransactions));
    }

    #[test]
    fn test_read_summary_by_label() {
        let sheet = sample_sheet(1);
        let s = read_summary(&sheet, &StatementLayout::default()).unwrap();
        assert_eq!(
            s,
            StatementSummary {
                opening_balance: 1000.0,
                total_debit: 300.0,
                total_credit: 500.0,
                closing_balance: 1200.0,
            }
        );
    }

    #[test]
    fn test_read_summary_positional_fallback() {
        let mut rows: Vec<Vec<Cell>> = vec![vec![]; 19];
        rows.push(vec![Cell::Number(50.0), t("5"), t(""), Cell::Number(45.0)]);
        let sheet = Worksheet::from_rows("x", rows);
        let s = read_summary(&sheet, &StatementLayout::default()).unwrap();
        assert_eq!(s.opening_balance, 50.0);
        assert_eq!(s.total_debit, 5.0);
        assert_eq!(s.total_credit, 0.0);
        assert_eq!(s.closing_balance, 45.0);
    }

    #[test]
    fn test_read_summary_value_row_below_units_row() {
        let mut rows: Vec<Vec<Cell>> = vec![vec![]; 18];
        rows.push(vec![
            t("Opening Balance"),
            t("Total Debit"),
            t("Total Credit"),
            t("Closing Balance"),
        ]);
        rows.push(vec![t("(INR)"), t("(INR)"), t("(INR)"), t("(INR)")]);
        rows.push(vec![t("100.00"), t("40.00"), t("10.00"), t("70.00")]);
        let sheet = Worksheet::from_rows("x", rows);
        let layout = StatementLayout {
            summary_value_row: 20,
            ..StatementLayout::default()
        };

        let s = read_summary(&sheet, &layout).unwrap();
        assert_eq!(s.opening_balance, 100.0);
        assert_eq!(s.total_debit, 40.0);
        assert_eq!(s.total_credit, 10.0);
        assert_eq!(s.closing_balance, 70.0);
    }

    #[test]
    fn test_read_summary_scanned_labels_keep_offset() {
        // labels moved to row 5, values two rows below like the configured 18/20
        let mut rows: Vec<Vec<Cell>> = vec![vec![]; 5];
        rows.push(vec![
            t("Closing Balance"),
            t("Opening Balance"),
            t("Total Credit"),
            t("Total Debit"),
        ]);
        rows.push(vec![t("(INR)")]);
        rows.push(vec![t("70.00"), t("100.00"), t("10.00"), t("40.00")]);
        let sheet = Worksheet::from_rows("x", rows);
        let layout = StatementLayout {
            summary_value_row: 20,
            ..StatementLayout::default()
        };

        let s = read_summary(&sheet, &layout).unwrap();
        assert_eq!(s.opening_balance, 100.0);
        assert_eq!(s.total_debit, 40.0);
        assert_eq!(s.closing_balance, 70.0);
    }

    #[test]
    fn test_read_summary_short_sheet() {
        let sheet = Worksheet::from_rows("x", vec![vec![t("a")]]);
        let err = read_summary(&sheet, &StatementLayout::default()).unwrap_err();
        assert!(matches!(err, IngestError::SummaryNotFound { row: 19 }));
    }
}
