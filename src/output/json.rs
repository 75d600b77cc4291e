//! JSON report formatter.
//!
//! Provides machine-readable output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "roots": ["/home/user/photos"],
//!   "summary": {
//!     "group_count": 1,
//!     "duplicate_files": 2,
//!     "reclaimable_files": 1,
//!     "reclaimable_bytes": 1024,
//!     "files_scanned": 100,
//!     "skipped": 0
//!   },
//!   "duplicates": [
//!     {
//!       "hash": "abc123...",
//!       "size": 1024,
//!       "files": ["/home/user/photos/a.jpg", "/home/user/photos/b.jpg"]
//!     }
//!   ],
//!   "generated_at": "2024-01-31T14:25:01+01:00",
//!   "tool": "dupscan 0.1.0"
//! }
//! ```

use chrono::{DateTime, Local};
use serde::Serialize;

use super::{DuplicateReport, ReportSummary, TOOL_NAME, TOOL_VERSION};
use crate::duplicates::DuplicateGroup;

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// Content digest as hexadecimal string (64 characters)
    pub hash: String,
    /// File size in bytes
    pub size: u64,
    /// Absolute paths of the identical files
    pub files: Vec<String>,
}

impl JsonDuplicateGroup {
    /// Create a JSON duplicate group from a DuplicateGroup.
    #[must_use]
    pub fn from_duplicate_group(group: &DuplicateGroup) -> Self {
        Self {
            hash: group.hash_hex(),
            size: group.size,
            files: group
                .files
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Folders that were scanned
    pub roots: Vec<String>,
    /// Summary counts
    pub summary: ReportSummary,
    /// List of duplicate groups
    pub duplicates: Vec<JsonDuplicateGroup>,
    /// When the report was generated
    pub generated_at: DateTime<Local>,
    /// Tool name and version
    pub tool: String,
}

impl JsonOutput {
    /// Create the JSON view of a report.
    #[must_use]
    pub fn new(report: &DuplicateReport) -> Self {
        Self {
            roots: report
                .roots
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
            summary: report.summary.clone(),
            duplicates: report
                .groups
                .iter()
                .map(JsonDuplicateGroup::from_duplicate_group)
                .collect(),
            generated_at: report.generated_at,
            tool: format!("{} {}", TOOL_NAME, TOOL_VERSION),
        }
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
