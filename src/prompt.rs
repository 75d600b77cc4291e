//! Interactive prompts used when no folders are given on the command line.
//!
//! Folders are entered one per prompt and an empty line ends the list. An
//! entry that is not an existing directory is reported and asked for again
//! under the same number.

use dialoguer::Input;
use yansi::Paint;

use crate::scanner::{RootError, ScanRoot};

/// Errors that can occur while prompting.
#[derive(thiserror::Error, Debug)]
pub enum PromptError {
    /// Reading from the terminal failed.
    #[error("Failed to read input: {0}")]
    Input(#[from] dialoguer::Error),
}

/// Ask for folders until an empty line is entered.
///
/// # Errors
///
/// Returns [`PromptError`] if the terminal cannot be read.
pub fn prompt_roots() -> Result<Vec<ScanRoot>, PromptError> {
    println!("Add folders to scan (empty line to finish):");

    collect_roots(
        |n| {
            Input::<String>::new()
                .with_prompt(format!("Add folder #{n}"))
                .allow_empty(true)
                .interact_text()
                .map_err(PromptError::from)
        },
        |input, err| {
            eprintln!("{} {} ({})", "Error:".red().bold(), err, input);
            eprintln!("Please enter an existing folder.");
        },
    )
}

/// Read folder entries from `next_line` until it returns an empty line.
///
/// `next_line` receives the number of the folder being asked for, which
/// only advances once a valid folder has been accepted. Invalid entries
/// are passed to `on_invalid` and skipped.
///
/// # Errors
///
/// Propagates the first error returned by `next_line`.
pub fn collect_roots<F, E>(mut next_line: F, mut on_invalid: E) -> Result<Vec<ScanRoot>, PromptError>
where
    F: FnMut(usize) -> Result<String, PromptError>,
    E: FnMut(&str, &RootError),
{
    let mut roots: Vec<ScanRoot> = Vec::new();

    loop {
        let line = next_line(roots.len() + 1)?;
        let entry = unquote(line.trim());
        if entry.is_empty() {
            break;
        }

        match ScanRoot::new(entry) {
            Ok(root) => {
                log::debug!("Added folder {}", root);
                roots.push(root);
            }
            Err(e) => on_invalid(entry, &e),
        }
    }

    Ok(roots)
}

/// Ask for the report file name, offering `default` on an empty answer.
///
/// # Errors
///
/// Returns [`PromptError`] if the terminal cannot be read.
pub fn prompt_output_name(default: &str) -> Result<String, PromptError> {
    let name: String = Input::new()
        .with_prompt("Report file name")
        .default(default.to_string())
        .interact_text()?;

    let name = unquote(name.trim());
    Ok(if name.is_empty() {
        default.to_string()
    } else {
        name.to_string()
    })
}

/// Strip one pair of matching surrounding quotes, as left by drag-and-drop.
fn unquote(s: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = s
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    s
}
