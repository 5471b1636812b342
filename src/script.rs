//! Wrapping for whole files: plain text or scenario script exports.
//!
//! A script export is a JSON object whose `"Text"` field holds script
//! source. Dialogue lives in `MSG([[ ... ]])` blocks; each block body is
//! wrapped on its own and everything around it is left untouched.

use crate::errors::{AppError, AppResult};
use crate::wrap::{LineWrapper, WrapOutput};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};

const TEXT_FIELD: &str = "Text";

static MSG_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)MSG\(\[\[(.*?)\]\]\)").expect("MSG block pattern is valid")
});

/// One `MSG([[...]])` body inside script source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBlock<'a> {
    pub body: &'a str,
    /// Byte range of `body` within the source.
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockReport {
    pub index: usize,
    pub line_count: usize,
    pub visible_count: usize,
    /// The wrapped block body.
    pub text: String,
}

impl BlockReport {
    fn new(index: usize, wrapped: WrapOutput) -> Self {
        Self {
            index,
            line_count: wrapped.line_count(),
            visible_count: wrapped.visible_count,
            text: wrapped.text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptReport {
    pub blocks: Vec<BlockReport>,
}

impl ScriptReport {
    pub fn visible_count(&self) -> usize {
        self.blocks.iter().map(|block| block.visible_count).sum()
    }

    pub fn max_line_count(&self) -> usize {
        self.blocks
            .iter()
            .map(|block| block.line_count)
            .max()
            .unwrap_or(0)
    }
}

/// Input read from disk.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Plain(String),
    /// The parsed export; its `"Text"` field is a string.
    Script(Value),
}

/// Finds every message block in script source, in order.
pub fn extract_blocks(source: &str) -> Vec<MessageBlock<'_>> {
    MSG_BLOCK
        .captures_iter(source)
        .filter_map(|caps| caps.get(1))
        .map(|body| MessageBlock {
            body: body.as_str(),
            span: body.range(),
        })
        .collect()
}

/// Wraps every message block body and returns the rewritten source.
pub fn wrap_script_text(source: &str, wrapper: &LineWrapper<'_>) -> (String, ScriptReport) {
    let mut rewritten = String::with_capacity(source.len());
    let mut blocks = Vec::new();
    let mut last = 0;

    for (index, block) in extract_blocks(source).into_iter().enumerate() {
        let wrapped = wrapper.wrap(Some(block.body));
        rewritten.push_str(&source[last..block.span.start]);
        rewritten.push_str(&wrapped.text);
        last = block.span.end;

        blocks.push(BlockReport::new(index, wrapped));
    }
    rewritten.push_str(&source[last..]);

    debug!(blocks = blocks.len(), "wrapped script text");
    (rewritten, ScriptReport { blocks })
}

/// Reads `path`, detecting script exports by their JSON shape.
pub fn load_input(path: &Path) -> AppResult<Input> {
    let content = fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
    Ok(classify_input(content))
}

/// Reads `path` as a script export, failing when it is not one.
pub fn load_script(path: &Path) -> AppResult<Value> {
    let content = fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
    parse_script(&content, path)
}

/// Parses `content` as a script export. `origin` names the source in errors.
pub fn parse_script(content: &str, origin: &Path) -> AppResult<Value> {
    let value: Value = serde_json::from_str(content)?;
    if value.get(TEXT_FIELD).and_then(Value::as_str).is_none() {
        return Err(AppError::MissingScriptText(origin.to_path_buf()));
    }
    Ok(value)
}

fn classify_input(content: String) -> Input {
    match serde_json::from_str::<Value>(&content) {
        Ok(value) if value.get(TEXT_FIELD).is_some_and(Value::is_string) => Input::Script(value),
        _ => Input::Plain(content),
    }
}

/// Wraps an export's `"Text"` field in place.
pub fn wrap_export(export: &mut Value, wrapper: &LineWrapper<'_>) -> ScriptReport {
    let Some(Value::String(source)) = export.get_mut(TEXT_FIELD) else {
        warn!("script export has no Text field, nothing wrapped");
        return ScriptReport { blocks: Vec::new() };
    };

    let (rewritten, report) = wrap_script_text(source, wrapper);
    if report.blocks.is_empty() {
        warn!("script export contains no MSG blocks");
    }
    *source = rewritten;
    report
}

/// Wraps an input and renders it for output. Plain text is wrapped as a
/// single message; exports are re-serialized as pretty JSON.
pub fn render_input(input: Input, wrapper: &LineWrapper<'_>) -> AppResult<(String, ScriptReport)> {
    match input {
        Input::Plain(text) => {
            let wrapped = wrapper.wrap(Some(&text));
            let rendered = wrapped.text.clone();
            let report = ScriptReport {
                blocks: vec![BlockReport::new(0, wrapped)],
            };
            Ok((rendered, report))
        }
        Input::Script(mut export) => {
            let report = wrap_export(&mut export, wrapper);
            let mut rendered = serde_json::to_string_pretty(&export)?;
            rendered.push('\n');
            Ok((rendered, report))
        }
    }
}

/// Wraps the file at `input` and writes the result to `output`.
pub fn process_file(
    input: &Path,
    output: &Path,
    wrapper: &LineWrapper<'_>,
    force_script: bool,
) -> AppResult<ScriptReport> {
    let loaded = if force_script {
        Input::Script(load_script(input)?)
    } else {
        load_input(input)?
    };

    let (rendered, report) = render_input(loaded, wrapper)?;
    write_output(output, &rendered)?;

    debug!(
        input = %input.display(),
        output = %output.display(),
        blocks = report.blocks.len(),
        "processed file"
    );
    Ok(report)
}

/// Writes `rendered` to `path`, creating missing parent directories.
pub fn write_output(path: &Path, rendered: &str) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| AppError::io(parent, e))?;
    }
    fs::write(path, rendered).map_err(|e| AppError::io(path, e))
}
