use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One spreadsheet cell, reduced to the three shapes the statement heuristics care about.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Non-empty text or a non-zero number.
    pub fn is_truthy(&self) -> bool {
        match self {
            Cell::Empty => false,
            Cell::Text(s) => !s.is_empty(),
            Cell::Number(n) => *n != 0.0 && !n.is_nan(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn display(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
        }
    }
}

/// A sheet as an ordered sequence of rows. Row 0 is spreadsheet row 1.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Worksheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl Worksheet {
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn row(&self, idx: usize) -> Option<&[Cell]> {
        self.rows.get(idx).map(|r| r.as_slice())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Date formats seen in IDFC exports ("01-Apr-24", "01-Apr-2024", "01-04-2024").
/// Two-digit years first: `%Y` also accepts "24".
const DATE_FORMATS: &[&str] = &["%d-%b-%y", "%d-%b-%Y", "%d-%m-%Y", "%Y-%m-%d"];

pub fn parse_statement_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// One extracted statement row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// 0-based row index in the source sheet
    pub row: usize,
    pub txn_date: String,
    pub value_date: String,
    pub particulars: String,
    pub reference: String,
    pub debit: f64,
    pub credit: f64,
    pub balance: f64,
}

impl Transaction {
    pub fn txn_date_parsed(&self) -> Option<NaiveDate> {
        parse_statement_date(&self.txn_date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatementSummary {
    pub opening_balance: f64,
    pub total_debit: f64,
    pub total_credit: f64,
    pub closing_balance: f64,
}

/// Rows between a fixed floor and the detected end of the transaction block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentWindow {
    pub start: usize,
    pub end: usize,
    pub transactions: Vec<Transaction>,
}
