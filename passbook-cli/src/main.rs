use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use passbook_ingest::parsers::{extract_after_header, extract_recent, read_summary};
use passbook_ingest::{IngestError, StatementLayout, StatementSummary, Worksheet, load_worksheet};
use passbook_report::render::DEFAULT_PARTICULARS_WIDTH;
use passbook_report::{
    Reconciliation, Totals, reconcile, render_reconciliation, render_rows, render_summary,
    render_totals, render_transactions, to_json,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

mod config;

/// Rows dumped when a sheet does not look like a statement.
const DUMP_ROWS: usize = 30;

#[derive(Parser, Debug)]
#[command(
    name = "passbook",
    version,
    about = "Read IDFC FIRST Bank XLSX statements"
)]
struct Cli {
    /// Debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct Source {
    /// Statement XLSX (defaults to ./statement.xlsx if present)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Worksheet name (default: first sheet)
    #[arg(long)]
    sheet: Option<String>,

    /// Layout TOML (default: ~/.passbook/layout.toml, else built-in IDFC layout)
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every transaction row below the header row
    Transactions {
        #[command(flatten)]
        source: Source,

        /// Width of the particulars column
        #[arg(long, default_value_t = DEFAULT_PARTICULARS_WIDTH)]
        width: usize,
    },

    /// Print the last transactions, found by scanning backward from the end of the sheet
    Recent {
        #[command(flatten)]
        source: Source,

        #[arg(long, default_value_t = DEFAULT_PARTICULARS_WIDTH)]
        width: usize,
    },

    /// Print opening/closing balances and totals from the summary block
    Summary {
        #[command(flatten)]
        source: Source,

        /// Also add up the transactions and check them against the summary
        #[arg(long)]
        reconcile: bool,
    },

    /// Dump the first rows of a sheet with their indices
    Inspect {
        #[arg(short, long)]
        file: Option<PathBuf>,

        #[arg(long)]
        sheet: Option<String>,

        /// Number of rows to print
        #[arg(long, default_value_t = DUMP_ROWS)]
        rows: usize,
    },

    /// Statement layout (row/column offsets)
    Layout {
        #[command(subcommand)]
        command: LayoutCommand,
    },
}

#[derive(Subcommand, Debug)]
enum LayoutCommand {
    /// Write the default layout to ~/.passbook/layout.toml (or --path)
    Init {
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Print the layout in effect
    Show {
        #[arg(long)]
        layout: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct SummaryReport {
    summary: StatementSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    totals: Option<Totals>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reconciliation: Option<Reconciliation>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Transactions { source, width } => {
            let (sheet, layout) = open(&source)?;
            let txns = match extract_after_header(&sheet, &layout) {
                Ok(t) => t,
                Err(e @ IngestError::HeaderNotFound { .. }) => {
                    eprint!("{}", render_rows(&sheet, DUMP_ROWS));
                    return Err(e).with_context(|| format!("reading sheet '{}'", sheet.name));
                }
                Err(e) => return Err(e.into()),
            };
            info!(count = txns.len(), "transactions extracted");

            if source.json {
                println!("{}", to_json(&txns)?);
            } else {
                print!("{}", render_transactions(&txns, width));
                println!();
                print!("{}", render_totals(&Totals::from_transactions(&txns)));
            }
        }

        Command::Recent { source, width } => {
            let (sheet, layout) = open(&source)?;
            let window = extract_recent(&sheet, &layout)
                .with_context(|| format!("reading sheet '{}'", sheet.name))?;

            if source.json {
                println!("{}", to_json(&window)?);
            } else {
                println!(
                    "Rows {}..={} ({} transactions)\n",
                    window.start,
                    window.end,
                    window.transactions.len()
                );
                print!("{}", render_transactions(&window.transactions, width));
            }
        }

        Command::Summary { source, reconcile: check } => {
            let (sheet, layout) = open(&source)?;
            let summary = read_summary(&sheet, &layout)
                .with_context(|| format!("reading sheet '{}'", sheet.name))?;

            let (totals, reconciliation) = if check {
                let txns = extract_after_header(&sheet, &layout)
                    .with_context(|| format!("reading sheet '{}'", sheet.name))?;
                let totals = Totals::from_transactions(&txns);
                let rec = reconcile(&summary, &totals);
                (Some(totals), Some(rec))
            } else {
                (None, None)
            };

            if source.json {
                let report = SummaryReport {
                    summary,
                    totals: totals.clone(),
                    reconciliation: reconciliation.clone(),
                };
                println!("{}", to_json(&report)?);
            } else {
                print!("{}", render_summary(&summary));
                if let Some(t) = &totals {
                    println!();
                    print!("{}", render_totals(t));
                }
                if let Some(r) = &reconciliation {
                    println!();
                    print!("{}", render_reconciliation(r));
                }
            }

            if let Some(r) = reconciliation {
                if !r.is_balanced() {
                    for c in r.failures() {
                        warn!(
                            check = %c.name,
                            expected = c.expected,
                            actual = c.actual,
                            "mismatch"
                        );
                    }
                    bail!("statement does not reconcile");
                }
            }
        }

        Command::Inspect { file, sheet, rows } => {
            let path = resolve_statement(file)?;
            let sheet = load_sheet(&path, sheet.as_deref())?;
            print!("{}", render_rows(&sheet, rows));
        }

        Command::Layout { command } => match command {
            LayoutCommand::Init { path } => {
                config::init_layout(path.as_deref())?;
            }
            LayoutCommand::Show { layout } => {
                let layout = config::load_layout(layout.as_deref())?;
                print!("{}", toml::to_string_pretty(&layout).context("serialize layout")?);
            }
        },
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn default_statement() -> PathBuf {
    PathBuf::from("statement.xlsx")
}

fn resolve_statement(file: Option<PathBuf>) -> Result<PathBuf> {
    let path = file.unwrap_or_else(default_statement);
    if !path.exists() {
        bail!(
            "Statement not found: {} (pass --file <path>)",
            path.display()
        );
    }
    Ok(path)
}

fn open(source: &Source) -> Result<(Worksheet, StatementLayout)> {
    let path = resolve_statement(source.file.clone())?;
    let layout = config::load_layout(source.layout.as_deref())?;
    let sheet = load_sheet(&path, source.sheet.as_deref())?;
    Ok((sheet, layout))
}

fn load_sheet(path: &Path, sheet: Option<&str>) -> Result<Worksheet> {
    let ws = load_worksheet(path, sheet).with_context(|| format!("loading {}", path.display()))?;
    info!(path = %path.display(), sheet = %ws.name, rows = ws.len(), "statement loaded");
    Ok(ws)
}
