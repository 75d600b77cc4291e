use dupscan::prompt::{collect_roots, PromptError};
use std::fs;
use tempfile::tempdir;

fn lines(input: Vec<String>) -> impl FnMut(usize) -> Result<String, PromptError> {
    let mut iter = input.into_iter();
    move |_| Ok(iter.next().unwrap_or_default())
}

#[test]
fn test_prompt_collects_until_blank_line() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();

    let roots = collect_roots(
        lines(vec![
            a.path().display().to_string(),
            format!("  {}  ", b.path().display()),
            String::new(),
            a.path().display().to_string(),
        ]),
        |_, err| panic!("unexpected invalid folder: {err}"),
    )
    .unwrap();

    assert_eq!(roots.len(), 2);
    assert_eq!(roots[1].path(), b.path());
}

#[test]
fn test_prompt_reports_invalid_entries() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("not_a_dir.txt");
    fs::write(&file, b"x").unwrap();

    let mut rejected = Vec::new();
    let roots = collect_roots(
        lines(vec![
            file.display().to_string(),
            "/nonexistent/dupscan/12345".to_string(),
            dir.path().display().to_string(),
        ]),
        |input, _| rejected.push(input.to_string()),
    )
    .unwrap();

    assert_eq!(roots.len(), 1);
    assert_eq!(
        rejected,
        vec![
            file.display().to_string(),
            "/nonexistent/dupscan/12345".to_string()
        ]
    );
}
