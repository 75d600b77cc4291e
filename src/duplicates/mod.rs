//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based file grouping (Phase 1)
//! - Content hashing of size candidates (Phase 2)
//! - Duplicate group management

pub mod finder;
pub mod groups;

pub use finder::{
    hash_size_groups, DuplicateFinder, FinderConfig, FinderError, HashStats, ScanSummary,
};
pub use groups::{group_by_size, DuplicateGroup, GroupingStats, SizeGroup};
