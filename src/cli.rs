//! Command-line interface definitions for dupscan.
//!
//! This module defines all CLI arguments and options using the clap derive API.
//! Every scan option is optional here: an option left out falls back to the
//! configuration file, then to the built-in default (see [`crate::config`]).
//!
//! # Example
//!
//! ```bash
//! # Scan two folders, write the default Markdown report
//! dupscan ~/Pictures /mnt/backup/Pictures
//!
//! # JSON report with SHA-256 digests
//! dupscan ~/Downloads -o dupes --format json --algorithm sha256
//!
//! # No arguments: prompt for folders and the report name
//! dupscan
//!
//! # Verbose mode for debugging
//! dupscan -v ~/Downloads
//! ```

use clap::Parser;
use std::path::PathBuf;

use crate::output::ReportFormat;
use crate::scanner::{HashAlgorithm, MAX_BLOCK_SIZE};

/// Find duplicate files by content and write a report.
///
/// dupscan groups files by size, confirms duplicates with a content
/// digest (BLAKE3 by default), and writes a Markdown or JSON report.
/// Run it without PATH to be prompted for folders.
#[derive(Debug, Parser)]
#[command(name = "dupscan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print fatal errors as a JSON object on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Folders to scan (prompted for when omitted)
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Report file (extension added if missing)
    ///
    /// Defaults to duplicates_report_YYYYMMDD_HHMMSS.md in the current folder.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Content digest algorithm
    #[arg(long, value_enum)]
    pub algorithm: Option<HashAlgorithm>,

    /// Read block size used while hashing (e.g., 8KiB, 1MiB)
    #[arg(long, value_name = "SIZE", value_parser = parse_block_size)]
    pub block_size: Option<u64>,

    /// Minimum file size to consider (e.g., 1KB, 1MB, 1GB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Skip zero-byte files
    #[arg(long)]
    pub skip_empty: bool,

    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,

    /// Follow symbolic links during scan
    ///
    /// Symlink loops are detected and skipped with a warning.
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Disable progress bars
    #[arg(long)]
    pub no_progress: bool,

    /// Configuration file to use instead of the default location
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Whether the folders have to be collected interactively.
    #[must_use]
    pub fn needs_prompt(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
/// Case-insensitive. Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use dupscan::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1KB").unwrap(), 1000);
/// assert_eq!(parse_size("1KiB").unwrap(), 1024);
/// assert_eq!(parse_size("1MB").unwrap(), 1_000_000);
/// assert_eq!(parse_size("1MiB").unwrap(), 1_048_576);
/// ```
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// a negative number, or an unknown size suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    // Find where the number ends and the suffix begins
    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    if num < 0.0 {
        return Err("Size cannot be negative".to_string());
    }

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}

/// Parse a hashing block size: a [`parse_size`] value from one byte up to
/// [`MAX_BLOCK_SIZE`].
///
/// # Errors
///
/// Returns an error for unparsable input, a size of zero, or a size above
/// the maximum.
pub fn parse_block_size(s: &str) -> Result<u64, String> {
    match parse_size(s)? {
        0 => Err("Block size must be at least 1 byte".to_string()),
        n if n > MAX_BLOCK_SIZE as u64 => Err(format!(
            "Block size must be at most {}",
            bytesize::ByteSize::b(MAX_BLOCK_SIZE as u64)
        )),
        n => Ok(n),
    }
}
