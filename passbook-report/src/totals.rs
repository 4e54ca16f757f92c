//! Totals over extracted transactions and reconciliation against the statement summary.

use passbook_ingest::{StatementSummary, Transaction};
use serde::{Deserialize, Serialize};

/// Amounts within half a paisa are treated as equal.
pub const TOLERANCE: f64 = 0.005;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub count: usize,
    pub total_debit: f64,
    pub total_credit: f64,
    pub first_balance: Option<f64>,
    pub last_balance: Option<f64>,
    /// Earliest and latest transaction date that parses
    pub period: Option<(String, String)>,
}

impl Totals {
    pub fn from_transactions(txns: &[Transaction]) -> Self {
        let mut dated: Vec<_> = txns
            .iter()
            .filter_map(|t| t.txn_date_parsed().map(|d| (d, t.txn_date.as_str())))
            .collect();
        dated.sort_by_key(|(d, _)| *d);

        Self {
            count: txns.len(),
            total_debit: txns.iter().map(|t| t.debit).sum(),
            total_credit: txns.iter().map(|t| t.credit).sum(),
            first_balance: txns.first().map(|t| t.balance),
            last_balance: txns.last().map(|t| t.balance),
            period: match (dated.first(), dated.last()) {
                (Some((_, a)), Some((_, b))) => Some((a.to_string(), b.to_string())),
                _ => None,
            },
        }
    }

    /// Credit minus debit.
    pub fn net(&self) -> f64 {
        self.total_credit - self.total_debit
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    pub name: String,
    pub expected: f64,
    pub actual: f64,
}

impl Check {
    fn new(name: &str, expected: f64, actual: f64) -> Self {
        Self {
            name: name.to_string(),
            expected,
            actual,
        }
    }

    pub fn passed(&self) -> bool {
        (self.expected - self.actual).abs() <= TOLERANCE
    }

    pub fn difference(&self) -> f64 {
        self.actual - self.expected
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub checks: Vec<Check>,
}

impl Reconciliation {
    pub fn is_balanced(&self) -> bool {
        self.checks.iter().all(Check::passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &Check> {
        self.checks.iter().filter(|c| !c.passed())
    }
}

/// Compare the summary block with what the transactions add up to.
pub fn reconcile(summary: &StatementSummary, totals: &Totals) -> Reconciliation {
    let implied_closing = summary.opening_balance - summary.total_debit + summary.total_credit;
    let mut checks = vec![
        Check::new("total debit", summary.total_debit, totals.total_debit),
        Check::new("total credit", summary.total_credit, totals.total_credit),
        Check::new("closing balance", summary.closing_balance, implied_closing),
    ];
    if let Some(last) = totals.last_balance {
        checks.push(Check::new("last running balance", summary.closing_balance, last));
    }
    Reconciliation { checks }
}
