use clap::Parser;
use dupscan::cli::Cli;
use dupscan::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use dupscan::error::ExitCode;
use dupscan::output::{DuplicateReport, ReportFormat};
use dupscan::app::scan_to_report;
use dupscan::progress::ProgressCallback;
use dupscan::run_app;
use dupscan::scanner::ScanRoot;
use std::ffi::OsString;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

fn scan_report(root: &Path) -> DuplicateReport {
    let roots = vec![ScanRoot::new(root).unwrap()];
    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(&roots)
        .unwrap();
    DuplicateReport::new(&roots, groups, &summary)
}

#[test]
fn test_markdown_report_hello_scenario() {
    let data = tempdir().unwrap();
    fs::write(data.path().join("a.txt"), b"hello").unwrap();
    fs::write(data.path().join("b.txt"), b"hello").unwrap();
    fs::write(data.path().join("c.txt"), b"goodbye").unwrap();

    let out = tempdir().unwrap();
    let path = out.path().join("report.md");
    scan_report(data.path())
        .write_to_file(&path, ReportFormat::Markdown)
        .unwrap();

    let md = fs::read_to_string(&path).unwrap();
    assert!(md.starts_with("# Duplicate File Report\n"));
    assert!(md.contains(&format!("1. `{}`", data.path().display())));
    assert!(md.contains("- **Duplicate groups**: 1\n"));
    assert!(md.contains("- **Total duplicate files**: 2\n"));
    assert!(md.contains("- **Reclaimable**: 1 files"));
    assert!(md.contains("### Group 1 (2 identical files)"));
    assert!(md.contains(&format!("- `{}`", data.path().join("a.txt").display())));
    assert!(md.contains(&format!("- `{}`", data.path().join("b.txt").display())));
    assert!(!md.contains("c.txt"));
}

#[test]
fn test_markdown_report_empty_tree() {
    let data = tempdir().unwrap();
    let report = scan_report(data.path());

    assert_eq!(report.summary.reclaimable_files, 0);
    let md = report.render(ReportFormat::Markdown).unwrap();
    assert!(md.contains("## No duplicate files found."));
    assert!(!md.contains("## Details"));
}

#[test]
fn test_json_report_contents() {
    let data = tempdir().unwrap();
    fs::write(data.path().join("x.bin"), b"payload").unwrap();
    fs::write(data.path().join("y.bin"), b"payload").unwrap();

    let json = scan_report(data.path())
        .render(ReportFormat::Json)
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["summary"]["group_count"], 1);
    assert_eq!(value["summary"]["reclaimable_files"], 1);
    assert_eq!(value["summary"]["reclaimable_bytes"], 7);
    assert_eq!(value["duplicates"][0]["files"].as_array().unwrap().len(), 2);
    assert_eq!(value["duplicates"][0]["hash"].as_str().unwrap().len(), 64);
    assert_eq!(
        value["roots"][0].as_str().unwrap(),
        data.path().to_string_lossy()
    );
}

#[test]
fn test_run_app_writes_report() {
    let data = tempdir().unwrap();
    fs::write(data.path().join("a.txt"), b"hello").unwrap();
    fs::write(data.path().join("b.txt"), b"hello").unwrap();
    let out = tempdir().unwrap();
    let output = out.path().join("result");

    let cli = Cli::try_parse_from(vec![
        OsString::from("dupscan"),
        data.path().into(),
        OsString::from("-q"),
        OsString::from("-o"),
        output.as_os_str().into(),
    ])
    .unwrap();

    let code = run_app(cli).unwrap();

    assert_eq!(code, ExitCode::Success);
    let md = fs::read_to_string(out.path().join("result.md")).unwrap();
    assert!(md.contains("### Group 1 (2 identical files)"));
}

#[test]
fn test_run_app_json_no_duplicates() {
    let data = tempdir().unwrap();
    fs::write(data.path().join("only.txt"), b"alone").unwrap();
    let out = tempdir().unwrap();
    let output = out.path().join("result.json");

    let cli = Cli::try_parse_from(vec![
        OsString::from("dupscan"),
        data.path().into(),
        OsString::from("-q"),
        OsString::from("--format"),
        OsString::from("json"),
        OsString::from("-o"),
        output.as_os_str().into(),
    ])
    .unwrap();

    let code = run_app(cli).unwrap();

    assert_eq!(code, ExitCode::NoDuplicates);
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(value["summary"]["group_count"], 0);
}

#[test]
fn test_run_app_no_valid_roots_writes_nothing() {
    let out = tempdir().unwrap();
    let output = out.path().join("report.md");

    let cli = Cli::try_parse_from(vec![
        OsString::from("dupscan"),
        OsString::from("/nonexistent/dupscan/12345"),
        OsString::from("-q"),
        OsString::from("-o"),
        output.as_os_str().into(),
    ])
    .unwrap();

    let err = run_app(cli).unwrap_err();

    assert_eq!(ExitCode::for_error(&err), ExitCode::GeneralError);
    assert!(err.downcast_ref::<FinderError>().is_some());
    assert!(!output.exists());
}

/// Requests shutdown as soon as the given phase starts.
struct InterruptAt {
    phase: &'static str,
    flag: Arc<AtomicBool>,
}

impl ProgressCallback for InterruptAt {
    fn on_phase_start(&self, phase: &str, _total: usize) {
        if phase == self.phase {
            self.flag.store(true, Ordering::SeqCst);
        }
    }

    fn on_progress(&self, _current: usize, _path: &str) {}

    fn on_phase_end(&self, _phase: &str) {}
}

fn interrupted_at(phase: &'static str) {
    let data = tempdir().unwrap();
    fs::write(data.path().join("a.txt"), b"hello").unwrap();
    fs::write(data.path().join("b.txt"), b"hello").unwrap();
    let out = tempdir().unwrap();
    let output = out.path().join("report.md");

    let flag = Arc::new(AtomicBool::new(false));
    let config = FinderConfig::default()
        .with_shutdown_flag(Arc::clone(&flag))
        .with_progress_callback(Arc::new(InterruptAt {
            phase,
            flag: Arc::clone(&flag),
        }));
    let finder = DuplicateFinder::new(config);
    let roots = vec![ScanRoot::new(data.path()).unwrap()];

    let err = scan_to_report(&finder, &roots, &output, ReportFormat::Markdown).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<FinderError>(),
        Some(FinderError::Interrupted)
    ));
    assert_eq!(ExitCode::for_error(&err).as_i32(), 130);
    assert!(!output.exists());
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn test_interrupt_during_hashing_writes_no_report() {
    interrupted_at("hashing");
}

#[test]
fn test_interrupt_during_walk_writes_no_report() {
    interrupted_at("walking");
}

#[test]
fn test_scan_to_report_writes_file() {
    let data = tempdir().unwrap();
    fs::write(data.path().join("a.txt"), b"hello").unwrap();
    fs::write(data.path().join("b.txt"), b"hello").unwrap();
    let out = tempdir().unwrap();
    let output = out.path().join("report.json");

    let roots = vec![ScanRoot::new(data.path()).unwrap()];
    let (report, summary) = scan_to_report(
        &DuplicateFinder::with_defaults(),
        &roots,
        &output,
        ReportFormat::Json,
    )
    .unwrap();

    assert!(report.has_duplicates());
    assert_eq!(summary.duplicate_groups, 1);
    assert!(output.exists());
}
