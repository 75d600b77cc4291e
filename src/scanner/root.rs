//! Scan root validation.
//!
//! A [`ScanRoot`] is an absolute path to an existing directory. Relative
//! input is resolved against the current directory without following
//! symlinks, so the report shows the folders the way the user typed them.

use std::fmt;
use std::path::{Path, PathBuf};

/// Errors raised while validating a scan root.
#[derive(thiserror::Error, Debug)]
pub enum RootError {
    /// No path was given.
    #[error("Empty path")]
    Empty,

    /// The path does not exist.
    #[error("Path {0} does not exist")]
    NotFound(PathBuf),

    /// The path exists but is not a directory.
    #[error("Path {0} is not a directory")]
    NotADirectory(PathBuf),

    /// The path could not be made absolute.
    #[error("Cannot resolve {path}: {source}")]
    Io {
        /// Path as supplied
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// A validated, absolute directory to scan.
///
/// The path keeps the form the user typed. Overlap checks use the
/// canonical form, with `..` and symlinks resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScanRoot {
    path: PathBuf,
    canonical: PathBuf,
}

impl ScanRoot {
    /// Validate a user-supplied path.
    ///
    /// # Errors
    ///
    /// Returns [`RootError`] if the path is empty, missing, or not a directory.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dupscan::scanner::ScanRoot;
    ///
    /// let root = ScanRoot::new("./Downloads").unwrap();
    /// assert!(root.path().is_absolute());
    /// ```
    pub fn new(path: impl AsRef<Path>) -> Result<Self, RootError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(RootError::Empty);
        }

        let absolute = std::path::absolute(path).map_err(|source| RootError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if !absolute.exists() {
            return Err(RootError::NotFound(absolute));
        }
        if !absolute.is_dir() {
            return Err(RootError::NotADirectory(absolute));
        }

        let canonical = std::fs::canonicalize(&absolute).map_err(|source| RootError::Io {
            path: absolute.clone(),
            source,
        })?;

        Ok(Self {
            path: absolute,
            canonical,
        })
    }

    /// The absolute directory path, as supplied.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The directory with `..` components and symlinks resolved.
    #[must_use]
    pub fn canonical(&self) -> &Path {
        &self.canonical
    }

    /// Check whether this root names the same directory as `other`.
    #[must_use]
    pub fn same_dir(&self, other: &ScanRoot) -> bool {
        self.canonical == other.canonical
    }

    /// Check whether this root lies inside (or equals) `other`.
    #[must_use]
    pub fn is_within(&self, other: &ScanRoot) -> bool {
        self.canonical.starts_with(&other.canonical)
    }
}

impl AsRef<Path> for ScanRoot {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for ScanRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Remove repeated and nested roots, keeping first-seen order.
///
/// Roots are compared by canonical path, so `a/b/..` matches `a` and a
/// symlink matches its target. A root contained in another root would
/// otherwise be walked twice and every file under it would be reported
/// as a duplicate of itself.
#[must_use]
pub fn dedupe_roots(roots: &[ScanRoot]) -> Vec<ScanRoot> {
    let mut kept: Vec<ScanRoot> = Vec::with_capacity(roots.len());

    for root in roots {
        if kept.iter().any(|k| k.same_dir(root)) {
            log::debug!("Skipping repeated root: {}", root);
            continue;
        }

        let nested = roots
            .iter()
            .any(|other| !other.same_dir(root) && root.is_within(other));
        if nested {
            log::debug!("Skipping nested root: {}", root);
            continue;
        }

        kept.push(root.clone());
    }

    kept
}
