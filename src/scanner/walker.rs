//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing one or more
//! scan roots and measuring the files it finds. The walk is single-threaded
//! and entries are sorted by file name, so discovery order is stable
//! between runs over an unchanged tree.
//!
//! Walking happens in two steps, both reported through [`ProgressCallback`]:
//!
//! 1. [`Walker::discover`] lists every regular file (`"walking"` phase, a
//!    running count).
//! 2. [`Walker::measure`] reads each file's size (`"sizing"` phase, with the
//!    total known from step 1).
//!
//! Errors on individual entries never stop the walk. They are logged and
//! handed back to the caller as [`ScanError`] warnings.
//!
//! # Example
//!
//! ```no_run
//! use dupscan::scanner::{ScanRoot, Walker, WalkerConfig};
//!
//! let root = ScanRoot::new("/home/user/Downloads").unwrap();
//! let walker = Walker::new(vec![root], WalkerConfig::default());
//!
//! let (paths, warnings) = walker.discover();
//! let (files, more_warnings) = walker.measure(paths);
//! println!("{} files, {} warnings", files.len(), warnings.len() + more_warnings.len());
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::{DirEntry, WalkDir};

use super::root::dedupe_roots;
use super::{FileEntry, ScanError, ScanRoot, WalkerConfig};
use crate::progress::ProgressCallback;

/// Directory walker for file discovery across several roots.
pub struct Walker {
    /// Roots to walk, with repeated and nested roots removed
    roots: Vec<ScanRoot>,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for Walker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walker")
            .field("roots", &self.roots)
            .field("config", &self.config)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Walker {
    /// Create a new walker for the given roots.
    ///
    /// Repeated roots and roots nested inside another root are dropped.
    #[must_use]
    pub fn new(roots: Vec<ScanRoot>, config: WalkerConfig) -> Self {
        Self {
            roots: dedupe_roots(&roots),
            config,
            shutdown_flag: None,
            progress_callback: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set to `true`, the walker stops as soon as possible.
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

    /// The roots that will actually be walked.
    #[must_use]
    pub fn roots(&self) -> &[ScanRoot] {
        &self.roots
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Walk every root, yielding the paths of regular files.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration. Iteration ends early once shutdown is requested.
    pub fn walk(&self) -> impl Iterator<Item = Result<PathBuf, ScanError>> + '_ {
        self.roots
            .iter()
            .flat_map(move |root| self.walk_root(root.path()))
            .take_while(move |_| {
                if self.is_shutdown_requested() {
                    log::debug!("Walker: Shutdown requested, stopping iteration");
                    false
                } else {
                    true
                }
            })
    }

    fn walk_root<'a>(
        &'a self,
        root: &'a Path,
    ) -> impl Iterator<Item = Result<PathBuf, ScanError>> + 'a {
        let skip_hidden = self.config.skip_hidden;

        WalkDir::new(root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| !(skip_hidden && is_hidden(entry)))
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => self.accept_entry(entry).map(Ok),
                Err(e) => Some(Err(self.handle_walkdir_error(root, e))),
            })
    }

    /// Keep regular files, drop everything else.
    fn accept_entry(&self, entry: DirEntry) -> Option<PathBuf> {
        let file_type = entry.file_type();

        if file_type.is_dir() {
            return None;
        }

        // With follow_links enabled walkdir reports the target's type,
        // so a symlink here is one we are not following.
        if file_type.is_symlink() {
            log::trace!("Skipping symlink: {}", entry.path().display());
            return None;
        }

        if !file_type.is_file() {
            log::trace!("Skipping special file: {}", entry.path().display());
            return None;
        }

        Some(entry.into_path())
    }

    /// List every regular file under the roots.
    ///
    /// Reports the `"walking"` phase with a running count of files found.
    ///
    /// # Returns
    ///
    /// The discovered paths in walk order, plus the warnings collected.
    #[must_use]
    pub fn discover(&self) -> (Vec<PathBuf>, Vec<ScanError>) {
        let mut paths = Vec::new();
        let mut warnings = Vec::new();

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_start("walking", 0);
        }

        for result in self.walk() {
            match result {
                Ok(path) => {
                    if let Some(ref callback) = self.progress_callback {
                        callback.on_progress(paths.len() + 1, path.to_string_lossy().as_ref());
                    }
                    paths.push(path);
                }
                Err(e) => warnings.push(e),
            }
        }

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_end("walking");
        }

        log::debug!(
            "Discovered {} files under {} root(s), {} warnings",
            paths.len(),
            self.roots.len(),
            warnings.len()
        );

        (paths, warnings)
    }

    /// Read the size of each discovered file.
    ///
    /// Files whose metadata cannot be read are skipped with a warning.
    /// Files rejected by the size filters are dropped silently.
    /// Reports the `"sizing"` phase as files measured out of `paths.len()`.
    #[must_use]
    pub fn measure(&self, paths: Vec<PathBuf>) -> (Vec<FileEntry>, Vec<ScanError>) {
        let total = paths.len();
        let mut files = Vec::with_capacity(total);
        let mut warnings = Vec::new();

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_start("sizing", total);
        }

        for (idx, path) in paths.into_iter().enumerate() {
            if self.is_shutdown_requested() {
                log::debug!("Sizing: Shutdown requested, stopping");
                break;
            }

            if let Some(ref callback) = self.progress_callback {
                callback.on_progress(idx + 1, path.to_string_lossy().as_ref());
            }

            let metadata = if self.config.follow_symlinks {
                std::fs::metadata(&path)
            } else {
                std::fs::symlink_metadata(&path)
            };

            match metadata {
                Ok(m) => {
                    let size = m.len();
                    if self.config.accepts_size(size) {
                        files.push(FileEntry::new(path, size));
                    } else {
                        log::trace!(
                            "Skipping file due to size filter ({}): {}",
                            size,
                            path.display()
                        );
                    }
                }
                Err(e) => {
                    log::warn!("Skipping inaccessible file {}: {}", path.display(), e);
                    warnings.push(ScanError::from_io(path, e));
                }
            }
        }

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_end("sizing");
        }

        (files, warnings)
    }

    /// Convert a walkdir error into a warning.
    fn handle_walkdir_error(&self, root: &Path, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| root.to_path_buf(), Path::to_path_buf);

        if error.loop_ancestor().is_some() {
            log::warn!("Symlink loop detected at {}", path.display());
            return ScanError::SymlinkLoop(path);
        }

        let scan_error = match error.into_io_error() {
            Some(io) => ScanError::from_io(path, io),
            None => ScanError::Io {
                source: std::io::Error::other("directory walk failed"),
                path,
            },
        };
        log::warn!("Walker error: {}", scan_error);
        scan_error
    }
}

/// Dot-prefixed entries below the root are hidden. The root itself never is.
fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}
