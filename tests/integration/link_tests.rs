#![cfg(unix)]

use dupscan::duplicates::{DuplicateFinder, FinderConfig};
use dupscan::scanner::{ScanError, ScanRoot, WalkerConfig};
use std::fs;
use std::os::unix::fs::symlink;
use tempfile::tempdir;

fn following() -> DuplicateFinder {
    DuplicateFinder::new(FinderConfig::default().with_walker_config(WalkerConfig {
        follow_symlinks: true,
        ..Default::default()
    }))
}

#[test]
fn test_symlinks_not_followed_by_default() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("target.txt");
    fs::write(&target, b"linked content").unwrap();
    symlink(&target, dir.path().join("link.txt")).unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder
        .find_duplicates(&[ScanRoot::new(dir.path()).unwrap()])
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 1);
}

#[test]
fn test_symlinked_directory_followed_when_enabled() {
    let outside = tempdir().unwrap();
    fs::write(outside.path().join("file.txt"), b"outside").unwrap();

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("copy.txt"), b"outside").unwrap();
    symlink(outside.path(), dir.path().join("linked_dir")).unwrap();

    let root = [ScanRoot::new(dir.path()).unwrap()];

    let (groups, _) = DuplicateFinder::with_defaults().find_duplicates(&root).unwrap();
    assert!(groups.is_empty());

    let (groups, _) = following().find_duplicates(&root).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].files.len(), 2);
}

#[test]
fn test_symlink_loop_reported_as_warning() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("file.txt"), b"data").unwrap();
    symlink(dir.path(), sub.join("back_to_root")).unwrap();

    let (groups, summary) = following()
        .find_duplicates(&[ScanRoot::new(dir.path()).unwrap()])
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 1);
    assert!(summary
        .warnings
        .iter()
        .any(|w| matches!(w, ScanError::SymlinkLoop(_))));
}
