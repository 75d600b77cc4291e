use dupscan::duplicates::DuplicateFinder;
use dupscan::error::ExitCode;
use dupscan::scanner::{FileEntry, HashError, ScanError, ScanRoot};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_find_duplicates_from_files_continues_on_error() {
    let finder = DuplicateFinder::with_defaults();
    // Files that don't exist trigger hashing errors
    let file1 = FileEntry::new(PathBuf::from("nonexistent_1.txt"), 100);
    let file2 = FileEntry::new(PathBuf::from("nonexistent_2.txt"), 100);

    let (groups, summary) = finder
        .find_duplicates_from_files(vec![file1, file2])
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.warnings.len(), 2);

    for err in &summary.warnings {
        match err {
            ScanError::HashError(HashError::NotFound(_)) => {}
            _ => panic!("Expected NotFound HashError, got: {:?}", err),
        }
    }
    assert_eq!(ExitCode::for_summary(&summary), ExitCode::PartialSuccess);
}

#[test]
fn test_vanished_file_excluded_siblings_grouped() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    let c = dir.path().join("c.txt");
    fs::write(&a, b"same").unwrap();
    fs::write(&b, b"same").unwrap();
    fs::write(&c, b"same").unwrap();

    let entries = vec![
        FileEntry::new(a.clone(), 4),
        FileEntry::new(b.clone(), 4),
        FileEntry::new(c.clone(), 4),
    ];
    fs::remove_file(&b).unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates_from_files(entries).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].files, vec![a, c]);
    assert_eq!(summary.hashed_files, 2);
    assert_eq!(summary.warning_count(), 1);
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_excluded_siblings_grouped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let locked = dir.path().join("b_locked.txt");
    fs::write(dir.path().join("a.txt"), b"identical").unwrap();
    fs::write(&locked, b"identical").unwrap();
    fs::write(dir.path().join("c.txt"), b"identical").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Running as root ignores file permissions
    if fs::File::open(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
        return;
    }

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder
        .find_duplicates(&[ScanRoot::new(dir.path()).unwrap()])
        .unwrap();

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].files,
        vec![dir.path().join("a.txt"), dir.path().join("c.txt")]
    );
    assert!(summary
        .warnings
        .iter()
        .any(|w| matches!(w, ScanError::HashError(HashError::PermissionDenied(_)))));
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("hidden_dup.txt"), b"dup content").unwrap();
    fs::write(dir.path().join("a.txt"), b"dup content").unwrap();
    fs::write(dir.path().join("b.txt"), b"dup content").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let finder = DuplicateFinder::with_defaults();
    let result = finder.find_duplicates(&[ScanRoot::new(dir.path()).unwrap()]);

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let (groups, summary) = result.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].files.len(), 2);
    assert!(summary
        .warnings
        .iter()
        .any(|w| matches!(w, ScanError::PermissionDenied(_))));
}
