//! dupscan - Duplicate File Finder
//!
//! Finds files with identical content under one or more folders. Files are
//! first grouped by size, then only sizes shared by several files are read
//! and compared by content digest (BLAKE3 or SHA-256). Results are written
//! as a Markdown or JSON report.
//!
//! # Example
//!
//! ```no_run
//! use dupscan::duplicates::DuplicateFinder;
//! use dupscan::scanner::ScanRoot;
//!
//! let roots = vec![ScanRoot::new("/data/photos").unwrap()];
//! let (groups, summary) = DuplicateFinder::with_defaults()
//!     .find_duplicates(&roots)
//!     .unwrap();
//!
//! for group in &groups {
//!     println!("{} identical files of {} bytes", group.len(), group.size);
//! }
//! println!("Reclaimable: {}", summary.reclaimable_display());
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod prompt;
pub mod scanner;
pub mod signal;

pub use app::run_app;
