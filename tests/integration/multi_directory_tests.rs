use dupscan::duplicates::{DuplicateFinder, FinderError};
use dupscan::scanner::ScanRoot;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_scan_two_non_overlapping_directories() {
    let dir1 = tempdir().unwrap();
    let dir2 = tempdir().unwrap();
    fs::write(dir1.path().join("a.txt"), b"dup").unwrap();
    fs::write(dir2.path().join("b.txt"), b"dup").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder
        .find_duplicates_in_paths(&[dir1.path().to_path_buf(), dir2.path().to_path_buf()])
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].files,
        vec![dir1.path().join("a.txt"), dir2.path().join("b.txt")]
    );
    assert_eq!(summary.roots_scanned, 2);
    assert_eq!(summary.total_files, 2);
}

#[test]
fn test_scan_overlapping_directories_no_self_duplicates() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(dir.path().join("a.txt"), b"content").unwrap();
    fs::write(sub.join("b.txt"), b"other!!").unwrap();

    let roots = vec![
        ScanRoot::new(dir.path()).unwrap(),
        ScanRoot::new(&sub).unwrap(),
        ScanRoot::new(dir.path()).unwrap(),
    ];

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(&roots).unwrap();

    // Each file is seen once, so same-size files with different content never match
    assert!(groups.is_empty());
    assert_eq!(summary.roots_scanned, 1);
    assert_eq!(summary.total_files, 2);
}

#[test]
fn test_scan_same_root_twice() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("only.txt"), b"single file").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder
        .find_duplicates_in_paths(&[dir.path().to_path_buf(), dir.path().to_path_buf()])
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 1);
}

#[test]
fn test_invalid_paths_skipped() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"dup").unwrap();
    fs::write(dir.path().join("b.txt"), b"dup").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder
        .find_duplicates_in_paths(&[
            PathBuf::from("/nonexistent/dupscan/12345"),
            dir.path().join("a.txt"),
            dir.path().to_path_buf(),
        ])
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(summary.roots_scanned, 1);
}

#[test]
fn test_no_valid_roots_aborts() {
    let finder = DuplicateFinder::with_defaults();
    let result = finder.find_duplicates_in_paths(&[PathBuf::from("/nonexistent/dupscan/12345")]);

    assert!(matches!(result, Err(FinderError::NoValidRoots)));
}

#[test]
fn test_parent_given_through_dot_dot_is_not_dropped() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(dir.path().join("a.txt"), b"same bytes").unwrap();
    fs::write(dir.path().join("b.txt"), b"same bytes").unwrap();

    let roots = vec![
        ScanRoot::new(sub.join("..")).unwrap(),
        ScanRoot::new(&sub).unwrap(),
    ];

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(&roots).unwrap();

    assert_eq!(summary.roots_scanned, 1);
    assert_eq!(summary.total_files, 2);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].files.len(), 2);
}

#[cfg(unix)]
#[test]
fn test_symlink_to_root_no_self_duplicates() {
    let dir = tempdir().unwrap();
    let real = dir.path().join("real");
    fs::create_dir(&real).unwrap();
    fs::write(real.join("a.txt"), b"only copy").unwrap();
    let link = dir.path().join("link");
    std::os::unix::fs::symlink(&real, &link).unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder
        .find_duplicates_in_paths(&[real.clone(), link])
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.roots_scanned, 1);
    assert_eq!(summary.total_files, 1);
}
