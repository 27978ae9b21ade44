//! Command-line parsing for the sales dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from loading and aggregation.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "dash", version, about = "Sales dashboard: totals, table and per-product chart")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard (default).
    Tui(TuiArgs),
    /// Load once and print totals, the sales table and a bar chart.
    Report(ReportArgs),
    /// Print the backend's own summary and per-product totals.
    Summary(SourceArgs),
    /// Write synthetic sales as an envelope JSON file (usable with `--input`).
    Generate(GenerateArgs),
}

/// Where records come from.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Backend base URL (overrides DASH_BACKEND_URL).
    #[arg(long, value_name = "URL")]
    pub backend: Option<String>,

    /// Per-request timeout in seconds (overrides DASH_TIMEOUT_SECS).
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Read an envelope JSON file instead of calling the backend.
    #[arg(long, value_name = "JSON", conflicts_with = "backend")]
    pub input: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Keep the date range when changing product (and vice versa).
    #[arg(long)]
    pub compose_filters: bool,

    /// Write logs to this file (the TUI never logs to the terminal).
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// First day of the period (YYYY-MM-DD). Requires --to.
    #[arg(long, value_name = "DATE")]
    pub from: Option<String>,

    /// Last day of the period, inclusive (YYYY-MM-DD). Requires --from.
    #[arg(long, value_name = "DATE")]
    pub to: Option<String>,

    /// Only this product (`all` for every product).
    #[arg(short, long, default_value = "all")]
    pub product: String,

    /// Chart width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Skip the bar chart.
    #[arg(long)]
    pub no_chart: bool,

    /// Export the table rows to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct GenerateArgs {
    /// Number of sales to generate.
    #[arg(short = 'n', long, default_value_t = 2500)]
    pub count: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// First possible sale date (YYYY-MM-DD).
    #[arg(long, default_value = "2015-01-01")]
    pub start: String,

    /// Last possible sale date (YYYY-MM-DD, default today).
    #[arg(long)]
    pub end: Option<String>,

    /// Output file.
    #[arg(short, long, value_name = "JSON")]
    pub out: PathBuf,
}
