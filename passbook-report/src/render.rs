//! Console rendering.

use std::fmt::Write;

use anyhow::{Context, Result};
use passbook_ingest::{StatementSummary, Transaction, Worksheet};
use serde::Serialize;

use crate::totals::{Reconciliation, Totals};

/// Particulars column width used when none is given.
pub const DEFAULT_PARTICULARS_WIDTH: usize = 40;

/// Cut `s` to at most `width` chars, ending in "..." when cut.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    if width <= 3 {
        return s.chars().take(width).collect();
    }
    let mut out: String = s.chars().take(width - 3).collect();
    out.push_str("...");
    out
}

fn amount(v: f64) -> String {
    if v == 0.0 { String::new() } else { format!("{v:.2}") }
}

pub fn render_transactions(txns: &[Transaction], particulars_width: usize) -> String {
    let w = particulars_width.max(4);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5}  {:<12} {:<12} {:<w$} {:<14} {:>12} {:>12} {:>14}",
        "row", "txn date", "value date", "particulars", "ref", "debit", "credit", "balance"
    );
    for t in txns {
        let _ = writeln!(
            out,
            "{:>5}  {:<12} {:<12} {:<w$} {:<14} {:>12} {:>12} {:>14.2}",
            t.row,
            t.txn_date,
            t.value_date,
            truncate(&t.particulars, w),
            truncate(&t.reference, 14),
            amount(t.debit),
            amount(t.credit),
            t.balance
        );
    }
    out
}

pub fn render_summary(s: &StatementSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Opening balance: {:>14.2}", s.opening_balance);
    let _ = writeln!(out, "Total debit:     {:>14.2}", s.total_debit);
    let _ = writeln!(out, "Total credit:    {:>14.2}", s.total_credit);
    let _ = writeln!(out, "Closing balance: {:>14.2}", s.closing_balance);
    out
}

pub fn render_totals(t: &Totals) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Transactions:    {:>14}", t.count);
    if let Some((from, to)) = &t.period {
        let _ = writeln!(out, "Period:          {from} .. {to}");
    }
    let _ = writeln!(out, "Sum of debits:   {:>14.2}", t.total_debit);
    let _ = writeln!(out, "Sum of credits:  {:>14.2}", t.total_credit);
    let _ = writeln!(out, "Net:             {:>14.2}", t.net());
    if let Some(b) = t.last_balance {
        let _ = writeln!(out, "Last balance:    {b:>14.2}");
    }
    out
}

pub fn render_reconciliation(rec: &Reconciliation) -> String {
    let mut out = String::new();
    for c in &rec.checks {
        let mark = if c.passed() { "ok" } else { "MISMATCH" };
        let _ = writeln!(
            out,
            "{:<22} expected {:>14.2}  actual {:>14.2}  {mark}",
            c.name, c.expected, c.actual
        );
    }
    let verdict = if rec.is_balanced() { "balanced" } else { "NOT balanced" };
    let _ = writeln!(out, "Statement is {verdict}");
    out
}

/// Indexed dump of the first `limit` rows, for sheets the heuristics cannot read.
pub fn render_rows(sheet: &Worksheet, limit: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Sheet '{}' ({} rows)", sheet.name, sheet.len());
    for (i, row) in sheet.rows.iter().enumerate().take(limit) {
        let cells: Vec<String> = row.iter().map(|c| format!("{:?}", c.display())).collect();
        let _ = writeln!(out, "{i:>4}: [{}]", cells.join(", "));
    }
    out
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("serialize report")
}
