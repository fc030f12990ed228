//! Command-line interface for the document quality tool.

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::batch::{BatchAssessor, BatchOutcome, BatchSummary, FileStatus};
use crate::config::AssessmentConfig;
use crate::document::mime_from_path;
use crate::error::{DocQualityError, Result};
use crate::pipeline::{AssessorBuilder, QualityReport};
use crate::progress::{ProgressEvent, ProgressHandler, ProgressPhase};
use crate::scoring::QualityLabel;

/// Exit code for `--strict` runs where a document failed.
pub const STRICT_FAILURE_CODE: u8 = 2;

/// Document quality checker
///
/// Scores uploaded document images for resolution, exposure, contrast and
/// focus before they are stored.
#[derive(Parser, Debug)]
#[command(name = "docq")]
#[command(version)]
#[command(about = "Quality assessment for uploaded document images")]
#[command(long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (TOML, or JSON by extension)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assess a single document
    Check {
        /// Document path
        file: PathBuf,

        /// MIME type to assess as (guessed from the extension otherwise)
        #[arg(long)]
        mime: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Exit with status 2 if the document fails
        #[arg(long)]
        strict: bool,
    },

    /// Assess every document in a directory
    Scan {
        /// Directory to scan
        dir: PathBuf,

        /// Scan subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Follow symbolic links while scanning
        #[arg(long)]
        follow_symlinks: bool,

        /// Worker threads (defaults to the number of CPUs)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// File name pattern, e.g. "*.png" (repeatable)
        #[arg(short, long = "pattern")]
        patterns: Vec<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Exit with status 2 if any document fails
        #[arg(long)]
        strict: bool,
    },

    /// Print the quality label for a score
    Label {
        /// Score between 0 and 100
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        score: u8,
    },

    /// Print the effective configuration (defaults plus --config) as TOML
    Config,
}

/// Run the CLI application.
pub fn run(cli: Cli) -> Result<ExitCode> {
    init_logging(cli.verbose, cli.quiet);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Check {
            file,
            mime,
            json,
            strict,
        } => run_check(&file, mime, json, strict, cli.quiet, config).map(ExitCode::from),
        Commands::Scan {
            dir,
            recursive,
            follow_symlinks,
            threads,
            patterns,
            json,
            strict,
        } => {
            let options = ScanOptions {
                recursive,
                follow_symlinks,
                threads,
                patterns,
                json,
                strict,
                quiet: cli.quiet,
            };
            run_scan(&dir, options, config).map(ExitCode::from)
        }
        Commands::Label { score } => {
            let label = QualityLabel::from_score(score);
            println!("{} ({:?})", label, label.tone());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if verbose {
        "debug"
    } else if quiet {
        "off"
    } else {
        "info"
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .try_init();
}

fn load_config(path: Option<&Path>) -> Result<AssessmentConfig> {
    match path {
        Some(path) => {
            log::debug!("Loading configuration from {}", path.display());
            AssessmentConfig::from_file(path)
        }
        None => Ok(AssessmentConfig::default()),
    }
}

fn strict_exit(strict: bool, all_passed: bool) -> u8 {
    if strict && !all_passed {
        STRICT_FAILURE_CODE
    } else {
        0
    }
}

/// Run check command.
fn run_check(
    file: &Path,
    mime: Option<String>,
    json: bool,
    strict: bool,
    quiet: bool,
    config: AssessmentConfig,
) -> Result<u8> {
    let assessor = AssessorBuilder::new().config(config).build()?;

    let bytes = std::fs::read(file).map_err(|e| {
        DocQualityError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read {}: {}", file.display(), e),
        ))
    })?;
    let mime = mime.unwrap_or_else(|| mime_from_path(file));
    log::debug!("Checking {} as {}", file.display(), mime);

    let report = assessor.assess_bytes(&bytes, &mime, bytes.len() as u64)?;

    if json {
        println!("{}", report.to_json()?);
    } else if !quiet {
        println!("File: {}", file.display());
        print!("{}", report);
    }

    Ok(strict_exit(strict, report.passed))
}

struct ScanOptions {
    recursive: bool,
    follow_symlinks: bool,
    threads: Option<usize>,
    patterns: Vec<String>,
    json: bool,
    strict: bool,
    quiet: bool,
}

/// Run scan command.
fn run_scan(dir: &Path, options: ScanOptions, config: AssessmentConfig) -> Result<u8> {
    let show_bar = !options.quiet && !options.json;
    let progress = BarProgress::new(show_bar);

    let mut batch = BatchAssessor::new(config, progress)
        .recursive(options.recursive)
        .follow_symlinks(options.follow_symlinks);
    if let Some(threads) = options.threads {
        batch = batch.max_parallel(threads);
    }
    for pattern in &options.patterns {
        batch = batch.pattern(pattern);
    }

    let outcome = batch.assess_directory(dir)?;
    let all_passed = outcome
        .results
        .iter()
        .all(|r| r.status() == FileStatus::Passed);

    if options.json {
        println!("{}", scan_json(&outcome)?);
    } else if !options.quiet {
        print_scan_outcome(&outcome);
    }

    Ok(strict_exit(options.strict, all_passed))
}

#[derive(Serialize)]
struct ScanJson<'a> {
    files: Vec<ScanEntry<'a>>,
    summary: &'a BatchSummary,
}

#[derive(Serialize)]
struct ScanEntry<'a> {
    path: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a QualityReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn scan_json(outcome: &BatchOutcome) -> Result<String> {
    let files: Vec<ScanEntry<'_>> = outcome
        .results
        .iter()
        .map(|r| ScanEntry {
            path: &r.path,
            report: r.report(),
            error: r.outcome.as_ref().err().map(|e| e.to_string()),
        })
        .collect();

    let scan = ScanJson {
        files,
        summary: &outcome.summary,
    };
    Ok(serde_json::to_string_pretty(&scan)?)
}

/// Print per-file lines and the batch summary.
fn print_scan_outcome(outcome: &BatchOutcome) {
    for result in &outcome.results {
        match &result.outcome {
            Ok(report) => println!(
                "[{:<5}] {:>3}/100 {:<10} {}",
                result.status(),
                report.score,
                report.label.as_str(),
                result.path.display()
            ),
            Err(e) => println!(
                "[{:<5}]         {} ({})",
                result.status(),
                result.path.display(),
                e
            ),
        }
    }

    let summary = &outcome.summary;
    println!();
    println!("Scan Summary:");
    println!("  Files: {}", summary.total_files);
    println!(
        "  Passed: {} ({:.1}%)",
        summary.passed,
        summary.pass_rate_percent()
    );
    println!("  Failed: {}", summary.failed);
    if summary.errors > 0 {
        println!("  Errors: {}", summary.errors);
    }
    if summary.cancelled > 0 {
        println!("  Cancelled: {}", summary.cancelled);
    }
    println!("  Average Score: {:.1}", summary.average_score);
    for (label, count) in summary.labels.iter().rev() {
        println!("    {:<10} {}", label.as_str(), count);
    }
    println!("  Time: {} ms", summary.total_time_ms);
}

/// Drives an `indicatif` bar from batch progress events.
struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    fn new(visible: bool) -> Self {
        let bar = if visible {
            ProgressBar::new(0)
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) =
            ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {wide_msg}")
        {
            bar.set_style(style.progress_chars("=> "));
        }
        Self { bar }
    }
}

impl ProgressHandler for BarProgress {
    fn on_progress(&self, event: &ProgressEvent) {
        if let Some(total) = event.total_files {
            self.bar.set_length(total as u64);
            self.bar.set_position(event.completed_files as u64);
        }
        match event.phase {
            ProgressPhase::Complete => self.bar.finish_and_clear(),
            _ => self.bar.set_message(event.message.clone()),
        }
    }

    fn on_error(&self, error: &DocQualityError, file: Option<&Path>) {
        let name = file.map(|f| f.display().to_string()).unwrap_or_default();
        self.bar.println(format!("error: {} {}", name, error));
    }
}
