//! Size grouping and duplicate group types.
//!
//! # Overview
//!
//! Size grouping is the first phase of duplicate detection: files with
//! different sizes cannot have the same content, so only sizes shared by
//! two or more files go on to be hashed.
//!
//! Groups keep first-seen order, both between groups (order of the first
//! file with each size) and within a group (walk order). Combined with the
//! sorted walk, the same tree always produces the same groups in the same
//! order.
//!
//! # Example
//!
//! ```
//! use dupscan::scanner::FileEntry;
//! use dupscan::duplicates::group_by_size;
//! use std::path::PathBuf;
//!
//! let files = vec![
//!     FileEntry::new(PathBuf::from("/file1.txt"), 1024),
//!     FileEntry::new(PathBuf::from("/file2.txt"), 1024),
//!     FileEntry::new(PathBuf::from("/file3.txt"), 2048),
//! ];
//!
//! let (groups, stats) = group_by_size(files);
//!
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.potential_duplicates, 2);
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].size, 1024);
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use crate::scanner::{hash_to_hex, FileEntry, Hash};

/// Files sharing one exact byte size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeGroup {
    /// File size in bytes (shared by all files in this group)
    pub size: u64,
    /// Paths with this exact size, in walk order
    pub files: Vec<PathBuf>,
}

impl SizeGroup {
    /// Create an empty size group.
    #[must_use]
    pub fn new(size: u64) -> Self {
        Self {
            size,
            files: Vec::new(),
        }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Check if this group has potential duplicates (2+ files).
    #[must_use]
    pub fn has_candidates(&self) -> bool {
        self.files.len() > 1
    }
}

/// Statistics from the size grouping phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files grouped
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of distinct sizes seen
    pub unique_sizes: usize,
    /// Number of files in groups of 2+ (will be hashed)
    pub potential_duplicates: usize,
    /// Number of files dropped because their size is unique
    pub eliminated_unique: usize,
    /// Number of size groups with 2+ files
    pub candidate_groups: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Group files by size.
///
/// Returns only the groups with two or more files, in first-seen order.
/// No file I/O is performed.
#[must_use]
pub fn group_by_size(
    files: impl IntoIterator<Item = FileEntry>,
) -> (Vec<SizeGroup>, GroupingStats) {
    let mut groups: Vec<SizeGroup> = Vec::new();
    let mut index: HashMap<u64, usize> = HashMap::new();
    let mut stats = GroupingStats::default();

    for file in files {
        stats.total_files += 1;
        stats.total_size += file.size;

        let slot = *index.entry(file.size).or_insert_with(|| {
            groups.push(SizeGroup::new(file.size));
            groups.len() - 1
        });
        groups[slot].files.push(file.path);
    }

    stats.unique_sizes = groups.len();

    groups.retain(|group| {
        if group.has_candidates() {
            stats.potential_duplicates += group.len();
            stats.candidate_groups += 1;
            log::trace!(
                "Size group {} bytes: {} potential duplicates",
                group.size,
                group.len()
            );
            true
        } else {
            stats.eliminated_unique += group.len();
            false
        }
    });

    log::debug!(
        "Size grouping: {} files → {} candidates ({:.1}% eliminated)",
        stats.total_files,
        stats.potential_duplicates,
        stats.elimination_rate()
    );

    (groups, stats)
}

/// A confirmed set of files with identical content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Content digest shared by every file
    pub hash: Hash,
    /// File size in bytes
    pub size: u64,
    /// Paths of the identical files, in first-seen order
    pub files: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(hash: Hash, size: u64, files: Vec<PathBuf>) -> Self {
        Self { hash, size, files }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of redundant copies (all files but the first).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Bytes freed by deleting every redundant copy.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }

    /// Hash as hexadecimal string.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hash_to_hex(&self.hash)
    }
}
