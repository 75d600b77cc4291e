//! Application flow behind the `dupscan` binary.
//!
//! Collects folders and the report name (from the command line or by
//! prompting), runs the scan with progress bars and Ctrl+C handling, then
//! writes the report and prints a short summary.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use bytesize::ByteSize;
use chrono::Local;
use yansi::Paint;

use crate::cli::Cli;
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, FinderConfig, FinderError, ScanSummary};
use crate::error::ExitCode;
use crate::logging::init_logging;
use crate::output::{default_report_name, ensure_extension, DuplicateReport, ReportFormat};
use crate::progress::Progress;
use crate::prompt::{prompt_output_name, prompt_roots};
use crate::scanner::ScanRoot;
use crate::signal::install_handler;

/// Run the application and return the exit code for a completed scan.
///
/// # Errors
///
/// Returns an error if no valid folder was supplied, the scan was
/// interrupted, or the report could not be written. Use
/// [`ExitCode::for_error`] to map it to an exit code.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    if cli.no_color {
        yansi::disable();
    }
    init_logging(cli.verbose, cli.quiet);

    let config = Config::load(cli.config.as_deref())
        .context("Failed to load configuration")?
        .with_cli_overrides(&cli);
    log::debug!("Effective configuration: {:?}", config);

    let interactive = cli.needs_prompt();
    let roots = if interactive {
        prompt_roots().context("Failed to read folders")?
    } else {
        roots_from_args(&cli.paths)
    };
    if roots.is_empty() {
        return Err(FinderError::NoValidRoots.into());
    }

    let default_name = default_report_name(&Local::now(), config.format);
    let output = match cli.output {
        Some(ref path) => path.clone(),
        None if interactive => PathBuf::from(
            prompt_output_name(&default_name).context("Failed to read report name")?,
        ),
        None => PathBuf::from(default_name),
    };
    let output = ensure_extension(&output, config.format);

    // Installed after the prompts so Ctrl+C at a prompt still quits at once
    let handler = install_handler().context("Failed to set up Ctrl+C handling")?;

    let finder_config = FinderConfig::default()
        .with_walker_config(config.walker_config())
        .with_algorithm(config.algorithm)
        .with_block_size(config.block_size)
        .with_shutdown_flag(handler.get_flag())
        .with_progress_callback(Arc::new(Progress::new(!config.progress)));
    let finder = DuplicateFinder::new(finder_config);

    log::info!(
        "Scanning {} folder(s) with {}",
        roots.len(),
        config.algorithm
    );
    let (report, summary) = scan_to_report(&finder, &roots, &output, config.format)?;

    if !cli.quiet {
        print_summary(&output, &report, &summary);
    }

    Ok(ExitCode::for_summary(&summary))
}

/// Scan `roots` and write the report to `output`.
///
/// Nothing is written if the scan is interrupted, including an interrupt
/// that arrives after hashing but before the report is rendered.
///
/// # Errors
///
/// Returns an error wrapping [`FinderError::Interrupted`] on interrupt, or
/// a report error if the file cannot be written.
pub fn scan_to_report(
    finder: &DuplicateFinder,
    roots: &[ScanRoot],
    output: &Path,
    format: ReportFormat,
) -> Result<(DuplicateReport, ScanSummary)> {
    let (groups, summary) = finder.find_duplicates(roots).context("Scan failed")?;
    finder.check_shutdown()?;

    let report = DuplicateReport::new(roots, groups, &summary);
    report
        .write_to_file(output, format)
        .with_context(|| format!("Failed to write report to {}", output.display()))?;

    Ok((report, summary))
}

/// Validate folders given on the command line, skipping invalid ones.
fn roots_from_args(paths: &[PathBuf]) -> Vec<ScanRoot> {
    paths
        .iter()
        .filter_map(|path| match ScanRoot::new(path) {
            Ok(root) => Some(root),
            Err(e) => {
                log::warn!("Skipping folder: {}", e);
                None
            }
        })
        .collect()
}

fn print_summary(output: &Path, report: &DuplicateReport, summary: &ScanSummary) {
    let shown = std::path::absolute(output).unwrap_or_else(|_| output.to_path_buf());

    println!();
    println!(
        "{} Report saved to: {}",
        "Scan complete.".green().bold(),
        shown.display().bold()
    );

    if report.has_duplicates() {
        let counts = &report.summary;
        println!(
            "Found {} duplicate groups.",
            counts.group_count.yellow().bold()
        );
        println!("{} files have identical copies.", counts.duplicate_files);
        println!(
            "Deleting {} redundant copies would free {}.",
            counts.reclaimable_files.yellow().bold(),
            ByteSize::b(counts.reclaimable_bytes).to_string().bold()
        );
    } else {
        println!("{}", "No duplicate files found.".cyan());
    }

    if summary.warning_count() > 0 {
        println!(
            "{} {} files or folders could not be read and were skipped.",
            "Warning:".yellow().bold(),
            summary.warning_count()
        );
    }
}
