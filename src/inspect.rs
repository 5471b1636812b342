use crate::script::ScriptReport;
use serde::Serialize;
use std::fmt;
use unicode_width::UnicodeWidthStr;

/// Measurements of one wrapped line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineStat {
    pub number: usize,
    /// Characters as the wrapper counts them.
    pub chars: usize,
    /// Terminal columns, with wide CJK characters taking two.
    pub display_width: usize,
    pub text: String,
}

impl fmt::Display for LineStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>4} | {:>3} ch | {:>3} col | {}",
            self.number, self.chars, self.display_width, self.text
        )
    }
}

/// Measures every line of wrapped text.
pub fn line_stats(text: &str) -> Vec<LineStat> {
    text.split('\n')
        .enumerate()
        .map(|(i, line)| LineStat {
            number: i + 1,
            chars: line.chars().count(),
            display_width: line.width(),
            text: line.to_string(),
        })
        .collect()
}

/// Per-line report for every wrapped block, each under a header line.
///
/// Script exports are measured block by block on the wrapped dialogue, not
/// on the serialized JSON.
pub fn report_lines(report: &ScriptReport) -> Vec<String> {
    let mut lines = Vec::new();
    for block in &report.blocks {
        lines.push(format!(
            "-- block {} | {} lines | {} visible",
            block.index, block.line_count, block.visible_count
        ));
        lines.extend(line_stats(&block.text).iter().map(ToString::to_string));
    }
    lines
}
