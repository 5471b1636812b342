//! Kinsoku-aware line wrapping for dialogue text.
//!
//! The wrapper walks the text once, copying characters into an output
//! buffer and inserting `\n` once a line grows past [`FIXED_LINE_WIDTH`]
//! units. Every character is one unit wide. Inline markup (`<b>...</b>`,
//! `<sprite=1>`) and `__` emphasis delimiters are copied as atomic units and
//! never split; ASCII words are not broken when an earlier space exists on
//! the line; kinsoku punctuation is kept on the line it belongs to.
//!
//! # Example
//! ```
//! use kinsoku_wrap::{wrap, Ruleset};
//!
//! let rules = Ruleset::default();
//! let out = wrap(Some("こんにちは。"), 70, 6, true, &rules);
//! assert_eq!(out.text, "こんにちは。");
//! assert_eq!(out.visible_count, 6);
//! ```

mod breaker;
mod emphasis;
mod markup;

use crate::normalize::normalize;
use crate::ruleset::Ruleset;
use serde::Serialize;
use tracing::debug;

/// Width threshold actually used for every line.
///
/// Callers pass a nominal width, but the presentation layer always wrapped
/// at 70 units whatever it was given. The override is kept on purpose so
/// output matches the shipped scripts; see DESIGN.md.
pub const FIXED_LINE_WIDTH: usize = 70;

/// Lookahead window used when none is configured.
pub const DEFAULT_LOOKAHEAD: usize = 6;

/// Result of a wrap call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WrapOutput {
    /// Wrapped text with inserted `\n` breaks.
    pub text: String,
    /// Characters that will be revealed on screen: markup, emphasis
    /// delimiters and inserted breaks are excluded.
    pub visible_count: usize,
}

impl WrapOutput {
    /// Visual lines of the wrapped text.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }

    pub fn line_count(&self) -> usize {
        if self.text.is_empty() {
            0
        } else {
            self.lines().count()
        }
    }
}

/// Wrap options bound to a ruleset.
#[derive(Debug, Clone)]
pub struct LineWrapper<'a> {
    rules: &'a Ruleset,
    nominal_width: usize,
    lookahead: usize,
    strip_commands: bool,
}

impl<'a> LineWrapper<'a> {
    pub fn new(rules: &'a Ruleset) -> Self {
        Self {
            rules,
            nominal_width: FIXED_LINE_WIDTH,
            lookahead: DEFAULT_LOOKAHEAD,
            strip_commands: true,
        }
    }

    /// Set the nominal line width. Accepted for interface compatibility
    /// only; wrapping always uses [`FIXED_LINE_WIDTH`].
    #[must_use]
    pub fn nominal_width(mut self, width: usize) -> Self {
        self.nominal_width = width;
        self
    }

    /// Set how many characters ahead of an overflow are searched for a
    /// kinsoku break point.
    #[must_use]
    pub fn lookahead(mut self, window: usize) -> Self {
        self.lookahead = window;
        self
    }

    /// Set whether command patterns are stripped before wrapping.
    #[must_use]
    pub fn strip_commands(mut self, strip: bool) -> Self {
        self.strip_commands = strip;
        self
    }

    pub fn rules(&self) -> &'a Ruleset {
        self.rules
    }

    /// Wrap `text`. Absent text yields an empty output.
    pub fn wrap(&self, text: Option<&str>) -> WrapOutput {
        let Some(text) = text else {
            return WrapOutput::default();
        };

        if self.nominal_width != FIXED_LINE_WIDTH {
            debug!(
                nominal = self.nominal_width,
                used = FIXED_LINE_WIDTH,
                "nominal line width overridden"
            );
        }

        let normalized = normalize(text, self.rules, self.strip_commands);
        let scanner = Scanner::new(&normalized, self.rules, self.lookahead);
        let (output, breaks) = scanner.run();

        debug!(
            input_chars = normalized.chars().count(),
            breaks,
            visible = output.visible_count,
            "wrapped text"
        );
        output
    }
}

/// Wrap `text` with the given parameters.
///
/// `nominal_width` is accepted but ignored in favour of
/// [`FIXED_LINE_WIDTH`].
pub fn wrap(
    text: Option<&str>,
    nominal_width: usize,
    lookahead: usize,
    strip_commands: bool,
    rules: &Ruleset,
) -> WrapOutput {
    LineWrapper::new(rules)
        .nominal_width(nominal_width)
        .lookahead(lookahead)
        .strip_commands(strip_commands)
        .wrap(text)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Scanning,
    EmittingEmphasis,
    EmittingTag,
    Finished,
}

/// Single-use scan over one normalized string.
struct Scanner<'a> {
    chars: Vec<char>,
    rules: &'a Ruleset,
    lookahead: usize,
    out: String,
    pos: usize,
    width: usize,
    threshold: usize,
    visible: usize,
    // Backtracking never retreats past either of these.
    line_start: usize,
    atomic_end: usize,
    /// Start index of every emphasis pair emitted outside a tag group.
    emphasis_marks: Vec<usize>,
    breaks: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &str, rules: &'a Ruleset, lookahead: usize) -> Self {
        Self {
            chars: text.chars().collect(),
            rules,
            lookahead,
            out: String::with_capacity(text.len() + text.len() / FIXED_LINE_WIDTH + 1),
            pos: 0,
            width: 0,
            threshold: FIXED_LINE_WIDTH,
            visible: 0,
            line_start: 0,
            atomic_end: 0,
            emphasis_marks: Vec::new(),
            breaks: 0,
        }
    }

    fn run(mut self) -> (WrapOutput, usize) {
        let mut state = State::Scanning;
        while state != State::Finished {
            state = match state {
                State::Scanning => self.scan(),
                State::EmittingEmphasis => self.emit_emphasis(),
                State::EmittingTag => self.emit_tag_group(),
                State::Finished => State::Finished,
            };
        }

        let output = WrapOutput {
            text: self.out,
            visible_count: self.visible,
        };
        (output, self.breaks)
    }

    fn scan(&mut self) -> State {
        let Some(c) = self.current() else {
            return State::Finished;
        };

        if self.at_emphasis_pair(self.pos) {
            return State::EmittingEmphasis;
        }
        if self.width > self.threshold && c != '\n' {
            return self.place_break();
        }
        if c == '<' {
            return State::EmittingTag;
        }

        if c == '\n' {
            self.reset_line();
        }
        self.push_visible(c);
        if c == '\n' {
            self.line_start = self.pos;
        }
        State::Scanning
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Copy the cursor character as rendered text.
    fn push_visible(&mut self, c: char) {
        self.out.push(c);
        self.pos += 1;
        self.width += 1;
        self.visible += 1;
    }

    /// Copy the cursor character as markup. Width and threshold move
    /// together so markup takes no room on the line.
    fn push_markup(&mut self, c: char) {
        self.out.push(c);
        self.pos += 1;
        self.width += 1;
        self.threshold += 1;
    }

    fn reset_line(&mut self) {
        self.width = 0;
        self.threshold = FIXED_LINE_WIDTH;
    }
}
