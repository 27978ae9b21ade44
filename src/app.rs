//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and resolves settings
//! - builds the record source (backend or envelope file)
//! - runs the load pipeline and prints views, or hands over to the TUI
//! - writes optional exports

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use clap::Parser;

use crate::cli::{Command, GenerateArgs, ReportArgs, SourceArgs, TuiArgs};
use crate::config::Settings;
use crate::data::{BackendClient, EnvelopeFile, GenerateConfig, SalesSource};
use crate::domain::ProductFilter;
use crate::error::AppError;
use crate::filter::{FilterSelection, parse_date_input, parse_date_range};
use crate::telemetry::LogTarget;

pub mod pipeline;
pub mod session;

/// Entry point for the `dash` binary.
pub fn run() -> Result<(), AppError> {
    // `dash` and `dash --input x.json` should behave like `dash tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Report(args) => handle_report(args),
        Command::Summary(args) => handle_summary(args),
        Command::Generate(args) => handle_generate(args),
    }
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    let target = match &args.log_file {
        Some(path) => LogTarget::File(path),
        None => LogTarget::Off,
    };
    crate::telemetry::init(target)?;

    let settings = settings_from_args(&args.source)?;
    let source = build_source(&args.source, &settings)?;
    crate::tui::run(source, &settings, args.compose_filters)
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    crate::telemetry::init(LogTarget::Stderr)?;

    // Validate filters before touching the network.
    let range = parse_date_range(args.from.as_deref(), args.to.as_deref())?;
    let selection = FilterSelection::new(range, ProductFilter::parse(&args.product));

    let settings = settings_from_args(&args.source)?;
    let source = build_source(&args.source, &settings)?;
    let run = pipeline::load_and_render(source.as_ref(), &selection)?;

    println!("=== dash - sales report ===");
    println!("Source: {}", source.describe());
    println!(
        "{}",
        crate::report::describe_filter(selection.range.as_ref(), &selection.product)
    );
    print!("{}", crate::report::format_totals(&run.views.totals));
    println!();
    print!("{}", crate::report::format_table(&run.views.table));

    if !args.no_chart {
        println!();
        print!("{}", crate::plot::render_bar_chart(&run.views.chart, args.width));
    }

    let rejected = crate::report::format_row_errors(&run.row_errors);
    if !rejected.is_empty() {
        println!();
        print!("{rejected}");
    }

    if let Some(path) = &args.export {
        crate::io::write_table_csv(path, &run.views.table)?;
        eprintln!("Wrote {} rows to {}", run.views.table.len(), path.display());
    }

    Ok(())
}

fn handle_summary(args: SourceArgs) -> Result<(), AppError> {
    crate::telemetry::init(LogTarget::Stderr)?;

    if args.input.is_some() {
        return Err(AppError::new(
            2,
            "`dash summary` queries the backend; it cannot be used with --input.",
        ));
    }

    let settings = settings_from_args(&args)?;
    let client = BackendClient::from_settings(&settings)?;
    let summary = client.fetch_summary()?;
    let per_product = client.fetch_product_totals()?;

    print!("{}", crate::report::format_backend_summary(&summary, &per_product));
    Ok(())
}

fn handle_generate(args: GenerateArgs) -> Result<(), AppError> {
    crate::telemetry::init(LogTarget::Stderr)?;

    let start = parse_date_input(&args.start)?;
    let end = match &args.end {
        Some(raw) => parse_date_input(raw)?,
        None => Local::now().date_naive(),
    };

    let config = GenerateConfig {
        count: args.count,
        seed: args.seed,
        start,
        end,
    };
    let sales = crate::data::generate_sales(&config)?;
    crate::io::write_envelope_json(&args.out, &sales)?;

    println!(
        "Wrote {} sales ({start} .. {end}) to {}",
        sales.len(),
        args.out.display()
    );
    Ok(())
}

/// Environment settings with CLI overrides applied.
pub fn settings_from_args(args: &SourceArgs) -> Result<Settings, AppError> {
    let mut settings = Settings::from_env()?;
    if let Some(url) = &args.backend {
        settings.backend_url = url.clone();
    }
    if let Some(secs) = args.timeout {
        if secs == 0 {
            return Err(AppError::new(2, "--timeout must be > 0."));
        }
        settings.timeout = Duration::from_secs(secs);
    }
    Ok(settings)
}

fn build_source(args: &SourceArgs, settings: &Settings) -> Result<Arc<dyn SalesSource>, AppError> {
    match &args.input {
        Some(path) => Ok(Arc::new(EnvelopeFile::new(path))),
        None => Ok(Arc::new(BackendClient::from_settings(settings)?)),
    }
}

/// Rewrite argv so `dash` defaults to `dash tui`.
///
/// Rules:
/// - `dash`                       -> `dash tui`
/// - `dash --input x.json ...`    -> `dash tui --input x.json ...`
/// - `dash --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "report" | "summary" | "generate");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}
