//! Report generation for duplicate scan results.
//!
//! This module turns a finished scan into a report file:
//! - Markdown for reading (default)
//! - JSON for automation and scripting
//!
//! Reports are rendered in memory and written with [`write_atomic`], so a
//! failed or interrupted run never leaves a half-written file behind.
//!
//! # Example
//!
//! ```no_run
//! use dupscan::duplicates::DuplicateFinder;
//! use dupscan::output::{DuplicateReport, ReportFormat};
//! use dupscan::scanner::ScanRoot;
//! use std::path::Path;
//!
//! let roots = vec![ScanRoot::new(".").unwrap()];
//! let (groups, summary) = DuplicateFinder::with_defaults().find_duplicates(&roots).unwrap();
//!
//! let report = DuplicateReport::new(&roots, groups, &summary);
//! report.write_to_file(Path::new("report.md"), ReportFormat::Markdown).unwrap();
//! ```

pub mod json;
pub mod markdown;

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::duplicates::{DuplicateGroup, ScanSummary};
use crate::scanner::ScanRoot;

pub use json::JsonOutput;
pub use markdown::MarkdownOutput;

/// Tool name shown in report footers.
pub const TOOL_NAME: &str = env!("CARGO_PKG_NAME");

/// Tool version shown in report footers.
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Report file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable Markdown document
    #[default]
    Markdown,
    /// Machine-readable JSON document
    Json,
}

impl ReportFormat {
    /// File extension (without the dot) for this format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markdown => write!(f, "markdown"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Counts shown in a report's summary section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// Number of confirmed duplicate groups
    pub group_count: usize,
    /// Files across all groups, first copies included
    pub duplicate_files: usize,
    /// Files beyond the first copy in each group
    pub reclaimable_files: usize,
    /// Bytes freed by deleting every redundant copy
    pub reclaimable_bytes: u64,
    /// Files examined by the scan
    pub files_scanned: usize,
    /// Files or directories skipped with a warning
    pub skipped: usize,
}

impl ReportSummary {
    /// Compute the summary counts from the confirmed groups.
    #[must_use]
    pub fn from_groups(groups: &[DuplicateGroup]) -> Self {
        let group_count = groups.len();
        let duplicate_files: usize = groups.iter().map(DuplicateGroup::len).sum();
        Self {
            group_count,
            duplicate_files,
            reclaimable_files: duplicate_files - group_count,
            reclaimable_bytes: groups.iter().map(DuplicateGroup::wasted_space).sum(),
            ..Default::default()
        }
    }
}

/// Everything a report file shows, built once the scan has finished.
#[derive(Debug, Clone)]
pub struct DuplicateReport {
    /// Folders that were scanned, in the order given
    pub roots: Vec<PathBuf>,
    /// Confirmed duplicate groups
    pub groups: Vec<DuplicateGroup>,
    /// Summary counts
    pub summary: ReportSummary,
    /// When the report was generated
    pub generated_at: DateTime<Local>,
}

impl DuplicateReport {
    /// Build a report for a finished scan.
    #[must_use]
    pub fn new(roots: &[ScanRoot], groups: Vec<DuplicateGroup>, scan: &ScanSummary) -> Self {
        let mut summary = ReportSummary::from_groups(&groups);
        summary.files_scanned = scan.total_files;
        summary.skipped = scan.warning_count();

        Self {
            roots: roots.iter().map(|r| r.path().to_path_buf()).collect(),
            groups,
            summary,
            generated_at: Local::now(),
        }
    }

    /// Override the generation timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, generated_at: DateTime<Local>) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// Whether any duplicates were found.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        !self.groups.is_empty()
    }

    /// Render the report in the given format.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Serialization`] if JSON encoding fails.
    pub fn render(&self, format: ReportFormat) -> Result<String, ReportError> {
        match format {
            ReportFormat::Markdown => Ok(MarkdownOutput::new(self).render()),
            ReportFormat::Json => Ok(JsonOutput::new(self).to_json_pretty()?),
        }
    }

    /// Render the report and write it atomically to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] if rendering or writing fails. On error the
    /// destination is left untouched.
    pub fn write_to_file(&self, path: &Path, format: ReportFormat) -> Result<(), ReportError> {
        let content = self.render(format)?;
        write_atomic(path, content.as_bytes())
    }
}

/// Errors that can occur while producing a report.
#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Could not create or write the temporary file
    #[error("Failed to write report {path}: {source}")]
    Io {
        /// Destination path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Could not move the finished file into place
    #[error("Failed to save report {path}: {source}")]
    Persist {
        /// Destination path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Write `content` to `path` through a temporary file in the same directory.
///
/// The destination only ever holds either its previous content or the
/// complete new content. On Unix the file gets the same mode as a plain
/// `File::create` (0666 minus the umask).
///
/// # Errors
///
/// Returns [`ReportError`] if the temporary file cannot be written or
/// renamed into place.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<(), ReportError> {
    let io_err = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(".dupscan");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }

    let mut tmp = builder.tempfile_in(dir).map_err(io_err)?;
    tmp.write_all(content).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;

    tmp.persist(path).map_err(|e| ReportError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    log::debug!("Report written to {}", path.display());
    Ok(())
}

/// Default report file name, e.g. `duplicates_report_20240131_142501.md`.
#[must_use]
pub fn default_report_name(now: &DateTime<Local>, format: ReportFormat) -> String {
    format!(
        "duplicates_report_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Append the format's extension unless the path already ends with it.
///
/// The comparison ignores ASCII case, so `REPORT.MD` is kept as is.
#[must_use]
pub fn ensure_extension(path: &Path, format: ReportFormat) -> PathBuf {
    let has_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(format.extension()));

    if has_ext {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(".");
        name.push(format.extension());
        PathBuf::from(name)
    }
}
