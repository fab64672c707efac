// UI layer: the interactive prompt sequence (`-i`) built on `dialoguer`,
// and the spinner shown while the upload is in flight.

use crate::api::UploadMetadata;
use crate::cli::{InputSource, UploadRequest};
use crate::error::Result;
use dialoguer::{Completion, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Ask for the input source, a file name, a title and a description.
///
/// Select, Input and the rest are keyboard-driven; Tab completes paths in
/// the "Select file" prompt.
pub fn prompt_request() -> Result<UploadRequest> {
    let items = vec!["specify file", "clipboard"];
    let selection = Select::new()
        .with_prompt("Which upload")
        .items(&items)
        .default(0)
        .interact()?;

    let (source, filename) = if selection == 1 {
        let name: String = Input::new()
            .with_prompt("File name")
            .allow_empty(true)
            .interact_text()?;
        (InputSource::Clipboard, name)
    } else {
        let completion = PathCompletion;
        let path: String = Input::new()
            .with_prompt("Select file")
            .completion_with(&completion)
            .interact_text()?;
        let path = PathBuf::from(path);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        (InputSource::File(path), name)
    };

    let title: String = Input::new()
        .with_prompt("Title")
        .allow_empty(true)
        .interact_text()?;
    let description = prompt_multiline("Description (empty line to finish)")?;

    Ok(UploadRequest {
        source,
        meta: UploadMetadata {
            title: Some(title),
            description: Some(description),
            filename: Some(filename),
        },
    })
}

/// Read lines until an empty one and join them with newlines.
fn prompt_multiline(prompt: &str) -> Result<String> {
    let mut lines = Vec::new();
    loop {
        let line: String = Input::new()
            .with_prompt(if lines.is_empty() { prompt } else { ">" })
            .allow_empty(true)
            .interact_text()?;
        if line.is_empty() {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

/// Spinner on stderr; hidden when stderr is not a terminal.
pub fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

struct PathCompletion;

impl Completion for PathCompletion {
    fn get(&self, input: &str) -> Option<String> {
        complete_path(input)
    }
}

/// Extend `input` to the longest prefix shared by the filesystem entries it
/// matches. A unique directory match gets a trailing `/`.
pub fn complete_path(input: &str) -> Option<String> {
    let (dir_part, prefix) = match input.rfind('/') {
        Some(i) => input.split_at(i + 1),
        None => ("", input),
    };
    let dir = if dir_part.is_empty() {
        Path::new(".")
    } else {
        Path::new(dir_part)
    };

    let mut matches: Vec<(String, bool)> = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            Some((name, is_dir))
        })
        .filter(|(name, _)| name.starts_with(prefix))
        .filter(|(name, _)| prefix.starts_with('.') || !name.starts_with('.'))
        .collect();
    matches.sort();

    let (first, first_is_dir) = matches.first()?;
    let mut completed = if matches.len() == 1 {
        first.clone()
    } else {
        matches.iter().skip(1).fold(first.clone(), |acc, (name, _)| {
            common_prefix(&acc, name).to_string()
        })
    };
    if matches.len() == 1 && *first_is_dir {
        completed.push('/');
    }

    let result = format!("{}{}", dir_part, completed);
    (result.len() > input.len()).then_some(result)
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len = a
        .char_indices()
        .zip(b.chars())
        .take_while(|((_, x), y)| x == y)
        .last()
        .map(|((i, c), _)| i + c.len_utf8())
        .unwrap_or(0);
    &a[..len]
}
