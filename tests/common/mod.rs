use kinsoku_wrap::{LineWrapper, Ruleset, WrapOutput};
use std::path::{Path, PathBuf};

/// Helper function to get fixture path
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new("tests/fixtures").join(name)
}

/// Wrap with the reference tables and default options.
pub fn wrap_default(text: &str) -> WrapOutput {
    let rules = Ruleset::default();
    LineWrapper::new(&rules).wrap(Some(text))
}

/// Text with every newline removed.
pub fn without_newlines(text: &str) -> String {
    text.chars().filter(|&c| c != '\n').collect()
}

/// Byte ranges of every `<...>` tag in `text`.
pub fn tag_ranges(text: &str) -> Vec<std::ops::Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = None;
    for (i, c) in text.char_indices() {
        match c {
            '<' => start = Some(i),
            '>' => {
                if let Some(s) = start.take() {
                    ranges.push(s..i + 1);
                }
            }
            _ => {}
        }
    }
    ranges
}

/// Byte ranges from each opening `<name...>` to its matching `</name>`,
/// for markup without nesting of the same name.
#[allow(dead_code)]
pub fn span_ranges(text: &str, name: &str) -> Vec<std::ops::Range<usize>> {
    let open = format!("<{name}");
    let close = format!("</{name}>");
    let mut ranges = Vec::new();
    let mut from = 0;
    while let Some(rel) = text[from..].find(&open) {
        let start = from + rel;
        match text[start..].find(&close) {
            Some(end_rel) => {
                let end = start + end_rel + close.len();
                ranges.push(start..end);
                from = end;
            }
            None => break,
        }
    }
    ranges
}

/// Longest line of wrapped text, in characters.
#[allow(dead_code)]
pub fn longest_line(output: &WrapOutput) -> usize {
    output
        .lines()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0)
}
