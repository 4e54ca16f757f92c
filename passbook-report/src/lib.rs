//! passbook-report: statement totals, reconciliation and console rendering

pub mod render;
pub mod totals;

pub use render::{
    render_reconciliation, render_rows, render_summary, render_totals, render_transactions,
    to_json,
};
pub use totals::{Reconciliation, Totals, reconcile};
