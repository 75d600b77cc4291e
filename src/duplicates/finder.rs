//! Duplicate finder implementation.
//!
//! # Overview
//!
//! This module orchestrates the duplicate detection pipeline:
//! 1. **Walk**: list every regular file under the scan roots
//! 2. **Measure**: read each file's size
//! 3. **Size grouping**: keep sizes shared by 2+ files (see [`crate::duplicates::groups`])
//! 4. **Hashing**: digest each candidate and group by digest
//!
//! Each phase hands its output to the next by value; nothing is shared
//! between runs. Per-file failures in any phase are collected as warnings
//! and never stop the scan.
//!
//! # Example
//!
//! ```no_run
//! use dupscan::duplicates::{group_by_size, hash_size_groups};
//! use dupscan::scanner::{FileEntry, Hasher};
//! use std::path::PathBuf;
//!
//! let files = vec![
//!     FileEntry::new(PathBuf::from("/tmp/a.txt"), 5),
//!     FileEntry::new(PathBuf::from("/tmp/b.txt"), 5),
//! ];
//! let (size_groups, _) = group_by_size(files);
//!
//! let (groups, stats) = hash_size_groups(size_groups, &Hasher::new(), None);
//! println!("{} groups, {} files hashed", groups.len(), stats.hashed_files);
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;

use super::groups::{group_by_size, DuplicateGroup, SizeGroup};
use crate::progress::ProgressCallback;
use crate::scanner::{
    FileEntry, Hash, HashAlgorithm, HashError, Hasher, ScanError, ScanRoot, Walker, WalkerConfig,
    DEFAULT_BLOCK_SIZE,
};

/// Statistics from the hashing phase.
#[derive(Debug, Default)]
pub struct HashStats {
    /// Files that entered the phase (members of size groups with 2+ files)
    pub input_files: usize,
    /// Files successfully hashed
    pub hashed_files: usize,
    /// Files skipped because they could not be read
    pub failed_files: usize,
    /// Errors for the skipped files
    pub errors: Vec<HashError>,
    /// Confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Files in confirmed duplicate groups
    pub duplicate_files: usize,
    /// Whether the phase stopped early on shutdown
    pub interrupted: bool,
}

/// Group candidates by content digest.
///
/// Only size groups with two or more files are read; any singleton group
/// passed in is skipped without touching the file. Files that cannot be
/// opened or read are left out of their group and recorded in
/// [`HashStats::errors`]; the rest of the group is still processed.
///
/// The returned groups keep the order of the size groups, and within a
/// size group the order in which each digest was first seen.
#[must_use]
pub fn hash_size_groups(
    size_groups: Vec<SizeGroup>,
    hasher: &Hasher,
    progress: Option<&dyn ProgressCallback>,
) -> (Vec<DuplicateGroup>, HashStats) {
    let candidates: Vec<SizeGroup> = size_groups
        .into_iter()
        .filter(SizeGroup::has_candidates)
        .collect();

    let mut stats = HashStats {
        input_files: candidates.iter().map(SizeGroup::len).sum(),
        ..Default::default()
    };
    let mut duplicates = Vec::new();

    if stats.input_files == 0 {
        log::debug!("Hashing: no candidates to hash");
        return (duplicates, stats);
    }

    if let Some(callback) = progress {
        callback.on_phase_start("hashing", stats.input_files);
    }
    log::info!(
        "Hashing {} candidate files in {} size groups",
        stats.input_files,
        candidates.len()
    );

    let mut processed = 0usize;

    'groups: for group in candidates {
        let mut by_hash: Vec<(Hash, Vec<PathBuf>)> = Vec::new();
        let mut index: HashMap<Hash, usize> = HashMap::new();

        for path in group.files {
            processed += 1;
            if let Some(callback) = progress {
                callback.on_progress(processed, path.to_string_lossy().as_ref());
            }

            match hasher.full_hash(&path) {
                Ok(hash) => {
                    stats.hashed_files += 1;
                    match index.get(&hash) {
                        Some(&slot) => by_hash[slot].1.push(path),
                        None => {
                            index.insert(hash, by_hash.len());
                            by_hash.push((hash, vec![path]));
                        }
                    }
                }
                Err(HashError::Interrupted(_)) => {
                    log::debug!("Hashing: Shutdown requested, stopping");
                    stats.interrupted = true;
                    break 'groups;
                }
                Err(e) => {
                    log::warn!("Skipping unreadable file: {}", e);
                    stats.failed_files += 1;
                    stats.errors.push(e);
                }
            }
        }

        for (hash, files) in by_hash {
            if files.len() > 1 {
                stats.duplicate_groups += 1;
                stats.duplicate_files += files.len();
                duplicates.push(DuplicateGroup::new(hash, group.size, files));
            }
        }
    }

    if let Some(callback) = progress {
        callback.on_phase_end("hashing");
    }

    (duplicates, stats)
}

/// Configuration for the duplicate finder.
#[derive(Clone, Default)]
pub struct FinderConfig {
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Digest algorithm.
    pub algorithm: HashAlgorithm,
    /// Read block size for hashing; `None` uses [`DEFAULT_BLOCK_SIZE`].
    pub block_size: Option<usize>,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("walker_config", &self.walker_config)
            .field("algorithm", &self.algorithm)
            .field("block_size", &self.block_size)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl FinderConfig {
    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the digest algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the hashing block size.
    #[must_use]
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = Some(block_size.max(1));
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Number of roots actually walked (after removing nested roots)
    pub roots_scanned: usize,
    /// Number of regular files discovered by the walk
    pub total_files: usize,
    /// Number of files whose size was read and passed the filters
    pub measured_files: usize,
    /// Total size of all measured files in bytes
    pub total_size: u64,
    /// Files dropped because no other file has their size
    pub eliminated_by_size: usize,
    /// Size groups with 2+ files
    pub candidate_groups: usize,
    /// Files that went on to be hashed
    pub candidate_files: usize,
    /// Files successfully hashed
    pub hashed_files: usize,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Number of files in confirmed duplicate groups
    pub duplicate_files: usize,
    /// Files beyond the first copy in each group (duplicate_files - duplicate_groups)
    pub reclaimable_files: usize,
    /// Bytes freed by deleting every redundant copy
    pub reclaimable_space: u64,
    /// Duration of the entire scan
    pub scan_duration: Duration,
    /// Non-fatal errors for skipped files and directories
    pub warnings: Vec<ScanError>,
}

impl ScanSummary {
    /// Number of non-fatal warnings.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Fill the duplicate counts from the confirmed groups.
    pub fn record_groups(&mut self, groups: &[DuplicateGroup]) {
        self.duplicate_groups = groups.len();
        self.duplicate_files = groups.iter().map(DuplicateGroup::len).sum();
        self.reclaimable_files = self.duplicate_files - self.duplicate_groups;
        self.reclaimable_space = groups.iter().map(DuplicateGroup::wasted_space).sum();
    }

    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize::b(self.reclaimable_space).to_string()
    }
}

/// Errors that abort a duplicate scan.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// None of the supplied folders could be scanned.
    #[error("No valid folders to scan")]
    NoValidRoots,
}

/// Runs the walk → size → hash pipeline.
///
/// # Example
///
/// ```no_run
/// use dupscan::duplicates::{DuplicateFinder, FinderConfig};
/// use dupscan::scanner::ScanRoot;
///
/// let finder = DuplicateFinder::new(FinderConfig::default());
/// let roots = vec![ScanRoot::new("/some/path").unwrap()];
///
/// let (groups, summary) = finder.find_duplicates(&roots).unwrap();
/// println!("Found {} duplicate groups", groups.len());
/// println!("Reclaimable: {}", summary.reclaimable_display());
/// ```
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let mut hasher = Hasher::new()
            .with_algorithm(config.algorithm)
            .with_block_size(config.block_size.unwrap_or(DEFAULT_BLOCK_SIZE));
        if let Some(ref flag) = config.shutdown_flag {
            hasher = hasher.with_shutdown_flag(Arc::clone(flag));
        }
        Self { config, hasher }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Find all duplicate files under the given roots.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::NoValidRoots`] if `roots` is empty, and
    /// [`FinderError::Interrupted`] if shutdown is requested at any point.
    pub fn find_duplicates(
        &self,
        roots: &[ScanRoot],
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let start_time = Instant::now();

        if roots.is_empty() {
            return Err(FinderError::NoValidRoots);
        }
        self.check_shutdown()?;

        let mut walker = Walker::new(roots.to_vec(), self.config.walker_config.clone());
        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(Arc::clone(flag));
        }
        if let Some(ref callback) = self.config.progress_callback {
            walker = walker.with_progress_callback(Arc::clone(callback));
        }

        log::info!(
            "Scanning {} folder(s): {:?}",
            walker.roots().len(),
            walker.roots().iter().map(ScanRoot::path).collect::<Vec<_>>()
        );

        let (paths, walk_warnings) = walker.discover();
        self.check_shutdown()?;
        let total_files = paths.len();

        let (files, size_warnings) = walker.measure(paths);
        self.check_shutdown()?;

        let (groups, mut summary) = self.find_duplicates_from_files(files)?;
        summary.roots_scanned = walker.roots().len();
        summary.total_files = total_files;

        let mut warnings = walk_warnings;
        warnings.extend(size_warnings);
        warnings.append(&mut summary.warnings);
        summary.warnings = warnings;
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Scan complete: {} files, {} duplicate groups, {} reclaimable files ({}), {} warnings",
            summary.total_files,
            summary.duplicate_groups,
            summary.reclaimable_files,
            summary.reclaimable_display(),
            summary.warning_count()
        );

        Ok((groups, summary))
    }

    /// Validate raw paths as roots, then scan.
    ///
    /// Invalid paths are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::NoValidRoots`] if no path is a usable directory.
    pub fn find_duplicates_in_paths(
        &self,
        paths: &[PathBuf],
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let roots: Vec<ScanRoot> = paths
            .iter()
            .filter_map(|p| match ScanRoot::new(p) {
                Ok(root) => Some(root),
                Err(e) => {
                    log::warn!("Ignoring folder: {}", e);
                    None
                }
            })
            .collect();

        self.find_duplicates(&roots)
    }

    /// Find duplicates among already-measured files.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Interrupted`] if shutdown is requested.
    pub fn find_duplicates_from_files(
        &self,
        files: Vec<FileEntry>,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let start_time = Instant::now();
        let mut summary = ScanSummary {
            total_files: files.len(),
            measured_files: files.len(),
            ..Default::default()
        };

        let (size_groups, size_stats) = group_by_size(files);
        summary.total_size = size_stats.total_size;
        summary.eliminated_by_size = size_stats.eliminated_unique;
        summary.candidate_groups = size_stats.candidate_groups;
        summary.candidate_files = size_stats.potential_duplicates;
        self.check_shutdown()?;

        let (groups, hash_stats) = hash_size_groups(
            size_groups,
            &self.hasher,
            self.config.progress_callback.as_deref(),
        );
        if hash_stats.interrupted || self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        summary.hashed_files = hash_stats.hashed_files;
        summary
            .warnings
            .extend(hash_stats.errors.into_iter().map(ScanError::from));
        summary.record_groups(&groups);
        summary.scan_duration = start_time.elapsed();

        Ok((groups, summary))
    }

    /// Fail with [`FinderError::Interrupted`] once shutdown is requested.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Interrupted`] if the shutdown flag is set.
    pub fn check_shutdown(&self) -> Result<(), FinderError> {
        if self.config.is_shutdown_requested() {
            Err(FinderError::Interrupted)
        } else {
            Ok(())
        }
    }
}
