//! Markdown report formatter.
//!
//! # Layout
//!
//! ```text
//! # Duplicate File Report
//!
//! ## Scanned Folders
//! 1. `/home/user/photos`
//!
//! ## Summary
//! - **Duplicate groups**: 1
//! - **Total duplicate files**: 2
//! - **Reclaimable**: 1 files (5 B)
//!
//! ## Details
//!
//! ### Group 1 (2 identical files)
//! - `/home/user/photos/a.jpg`
//! - `/home/user/photos/b.jpg`
//!
//! ---
//! > Report generated: 2024-01-31 14:25:01
//! > Tool: dupscan 0.1.0
//! ```
//!
//! When nothing was found the summary and details sections are replaced
//! by a single `## No duplicate files found.` heading.

use std::fmt::Write;

use bytesize::ByteSize;

use super::{DuplicateReport, TOOL_NAME, TOOL_VERSION};

/// Renders a [`DuplicateReport`] as Markdown.
#[derive(Debug)]
pub struct MarkdownOutput<'a> {
    report: &'a DuplicateReport,
}

impl<'a> MarkdownOutput<'a> {
    /// Create a Markdown formatter for a report.
    #[must_use]
    pub fn new(report: &'a DuplicateReport) -> Self {
        Self { report }
    }

    /// Render the full document.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.write_document(&mut out);
        out
    }

    fn write_document(&self, out: &mut String) -> std::fmt::Result {
        let report = self.report;

        writeln!(out, "# Duplicate File Report")?;
        writeln!(out)?;

        writeln!(out, "## Scanned Folders")?;
        for (i, root) in report.roots.iter().enumerate() {
            writeln!(out, "{}. `{}`", i + 1, root.display())?;
        }
        writeln!(out)?;

        if report.has_duplicates() {
            let summary = &report.summary;
            writeln!(out, "## Summary")?;
            writeln!(out, "- **Duplicate groups**: {}", summary.group_count)?;
            writeln!(
                out,
                "- **Total duplicate files**: {}",
                summary.duplicate_files
            )?;
            writeln!(
                out,
                "- **Reclaimable**: {} files ({})",
                summary.reclaimable_files,
                ByteSize::b(summary.reclaimable_bytes)
            )?;
            if summary.skipped > 0 {
                writeln!(
                    out,
                    "- **Skipped**: {} unreadable files or folders",
                    summary.skipped
                )?;
            }
            writeln!(out)?;

            writeln!(out, "## Details")?;
            writeln!(out)?;
            for (index, group) in report.groups.iter().enumerate() {
                writeln!(
                    out,
                    "### Group {} ({} identical files)",
                    index + 1,
                    group.len()
                )?;
                for path in &group.files {
                    writeln!(out, "- `{}`", path.display())?;
                }
                writeln!(out)?;
            }
        } else {
            writeln!(out, "## No duplicate files found.")?;
        }

        writeln!(out, "---")?;
        writeln!(
            out,
            "> Report generated: {}  ",
            report.generated_at.format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(out, "> Tool: {} {}", TOOL_NAME, TOOL_VERSION)?;

        Ok(())
    }
}
