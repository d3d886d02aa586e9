//! rekap CLI - School Attendance Reporting Engine
//!
//! Command-line interface for resolving school periods and producing
//! monthly and semester attendance workbooks.

mod config;
mod diagnostics;
mod input;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Args, Parser, Subcommand};
use rekap_aggregate::{DuplicatePolicy, RecapAggregator};
use rekap_core::{Aggregator, PeriodSelector, PeriodSpec, SchoolCalendar};
use rekap_render::{
    period_label, report_file_name, GridRenderer, Layout, ReportGridBuilder, TextRenderer,
    XlsxRenderer, MAX_RECAP_GROUP_WIDTH,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use diagnostics::{DiagnosticConfig, TerminalEmitter};

#[derive(Parser)]
#[command(name = "rekap")]
#[command(author, version, about = "School attendance reporting engine", long_about = None)]
struct Cli {
    /// Verbose output (-v shows info diagnostics, -vv debug logs)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a monthly report (Daily Matrix layout)
    Month {
        /// Calendar month, 1-12
        #[arg(long, value_parser = clap::value_parser!(i32).range(1..=12))]
        month: i32,

        #[arg(long)]
        year: i32,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Build a semester report (Monthly Summary layout)
    Semester {
        /// Semester of the academic year, 1 or 2
        #[arg(long)]
        semester: i32,

        /// Year the academic year starts in (2025 for 2025/2026)
        #[arg(long)]
        year: i32,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Show the resolved period and its instructional days
    Days {
        /// Calendar file (TOML, or JSON by extension)
        #[arg(long, value_name = "FILE")]
        calendar: PathBuf,

        /// Calendar month, 1-12
        #[arg(
            long,
            value_parser = clap::value_parser!(i32).range(1..=12),
            conflicts_with = "semester",
            required_unless_present = "semester"
        )]
        month: Option<i32>,

        /// Semester of the academic year, 1 or 2
        #[arg(long)]
        semester: Option<i32>,

        #[arg(long)]
        year: i32,

        /// List every instructional date
        #[arg(long)]
        list: bool,
    },
}

/// Inputs and presentation flags shared by the report commands
#[derive(Args)]
struct ReportArgs {
    /// Calendar file (TOML, or JSON by extension)
    #[arg(long, value_name = "FILE")]
    calendar: PathBuf,

    /// Roster JSON file
    #[arg(long, value_name = "FILE")]
    roster: PathBuf,

    /// Attendance records JSON file
    #[arg(long, value_name = "FILE")]
    records: PathBuf,

    /// Class or cohort name used in the output file name
    #[arg(long)]
    cohort: Option<String>,

    /// Output file path
    #[arg(short, long, conflicts_with = "out_dir")]
    output: Option<PathBuf>,

    /// Directory for the generated file name
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Columns per recap statistic in the Daily Matrix
    #[arg(
        long,
        default_value_t = 2,
        value_parser = clap::value_parser!(u16).range(1..=i64::from(MAX_RECAP_GROUP_WIDTH))
    )]
    group_width: u16,

    /// Blank rows between the table and the recap block
    #[arg(long, default_value_t = 1)]
    separator_rows: usize,

    /// Which of two same-day records to keep (first, last)
    #[arg(long, default_value = "first")]
    duplicates: DuplicatePolicy,

    /// Title row above the table
    #[arg(long)]
    title: Option<String>,

    /// Print a text preview of the grid to stdout
    #[arg(long)]
    preview: bool,

    /// Hide data diagnostics
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Month {
            month,
            year,
            report,
        } => run_report(PeriodSelector::month(month - 1, year), &report, cli.verbose),
        Commands::Semester {
            semester,
            year,
            report,
        } => run_report(PeriodSelector::semester(semester, year), &report, cli.verbose),
        Commands::Days {
            calendar,
            month,
            semester,
            year,
            list,
        } => {
            let selector = match (month, semester) {
                (Some(month), _) => PeriodSelector::month(month - 1, year),
                (None, Some(semester)) => PeriodSelector::semester(semester, year),
                (None, None) => anyhow::bail!("either --month or --semester is required"),
            };
            run_days(&calendar, selector, list)
        }
    }
}

fn init_tracing(verbose: u8) {
    // Diagnostics have their own output; library warnings are shown from -v
    let default_level = match verbose {
        0 => "error",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn resolve(calendar: &SchoolCalendar, selector: PeriodSelector) -> Result<PeriodSpec> {
    calendar
        .resolve(selector)
        .with_context(|| format!("Cannot resolve period {}", selector.slug()))
}

fn run_report(selector: PeriodSelector, args: &ReportArgs, verbose: u8) -> Result<()> {
    let calendar = config::load_calendar(&args.calendar)?;
    let roster = input::load_roster(&args.roster)?;
    let records = input::load_records(&args.records)?;
    let period = resolve(&calendar, selector)?;

    let mut emitter = TerminalEmitter::new(
        std::io::stderr(),
        DiagnosticConfig {
            quiet: args.quiet,
            show_info: verbose > 0,
        },
    );
    let report = RecapAggregator::new()
        .duplicate_policy(args.duplicates)
        .aggregate(&roster, &records, &period, &calendar, &mut emitter);
    if !args.quiet {
        if emitter.warning_count() > 0 {
            eprintln!("{} data warning(s)", emitter.warning_count());
        }
        if emitter.suppressed() > 0 {
            eprintln!(
                "{} info diagnostic(s) hidden, run with -v to show them",
                emitter.suppressed()
            );
        }
    }

    let layout = Layout::for_selector(&selector);
    let mut builder = ReportGridBuilder::new()
        .recap_group_width(args.group_width)
        .separator_rows(args.separator_rows);
    if let Some(title) = &args.title {
        builder = builder.title(title.as_str());
    }
    let grid = builder.build(&report, &calendar, layout)?;

    if args.preview {
        print!("{}", TextRenderer::new().show_marks().render(&grid)?);
    }

    let bytes = XlsxRenderer::new()
        .sheet_name(period_label(&period))
        .render(&grid)?;
    let path = output_path(args, layout, &selector);
    std::fs::write(&path, bytes)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        students = report.recaps.len(),
        instructional_days = report.instructional_day_count(),
        "wrote report"
    );
    println!(
        "Wrote {} ({} students, {} instructional days)",
        path.display(),
        report.recaps.len(),
        report.instructional_day_count()
    );
    Ok(())
}

fn output_path(args: &ReportArgs, layout: Layout, selector: &PeriodSelector) -> PathBuf {
    if let Some(output) = &args.output {
        return output.clone();
    }
    let name = report_file_name(
        layout.report_kind(),
        args.cohort.as_deref().unwrap_or_default(),
        &selector.slug(),
    );
    args.out_dir
        .as_deref()
        .unwrap_or_else(|| Path::new("."))
        .join(name)
}

fn run_days(calendar_path: &Path, selector: PeriodSelector, list: bool) -> Result<()> {
    let calendar = config::load_calendar(calendar_path)?;
    let period = resolve(&calendar, selector)?;
    let days = calendar.instructional_days_in_range(period.start(), period.end());

    println!("Period: {period}");
    println!("Calendar days: {}", period.len_days());
    println!("Instructional days: {}", days.len());
    if list {
        for day in &days {
            println!("  {day} {}", day.weekday());
        }
    }
    Ok(())
}
