use regex::Regex;
use std::collections::HashSet;

/// Version tag of the reference kinsoku tables below. Bump whenever the
/// character sets change so wrapped output can be traced back to a table.
pub const REFERENCE_TABLES_VERSION: &str = "ja-2024.1";

/// Characters that must not start a line: closing brackets, sentence and
/// clause punctuation, iteration marks, small kana and the prolonged sound
/// mark. The wrapper copies through them before breaking.
pub const DEFAULT_KINSOKU_HEAD: &str = concat!(
    "、。，．・：；？！゛゜ヽヾゝゞ々〆〻ー…‥",
    "）］｝」』】〉》〕〗〙〟’”",
    "ぁぃぅぇぉっゃゅょゎゕゖ",
    "ァィゥェォッャュョヮヵヶ",
    "｡｣､･ｰﾞﾟ",
);

/// Characters that must not end a line: opening brackets and quotes.
pub const DEFAULT_KINSOKU_END: &str = "（［｛「『【〈《〔〖〘〝‘“｢";

/// Tags that never open a nesting level.
pub const DEFAULT_SELF_CLOSING_TAGS: [&str; 3] = ["sprite", "space", "line-height"];

/// Character classes and stripping rules the wrapper consults.
///
/// A ruleset is an immutable value: build it once (from defaults or from
/// configuration) and share it by reference between wrap calls.
#[derive(Debug, Clone)]
pub struct Ruleset {
    kinsoku_head: HashSet<char>,
    kinsoku_end: HashSet<char>,
    self_closing_tags: Vec<String>,
    command_patterns: Vec<Regex>,
}

impl Default for Ruleset {
    fn default() -> Self {
        Ruleset {
            kinsoku_head: DEFAULT_KINSOKU_HEAD.chars().collect(),
            kinsoku_end: DEFAULT_KINSOKU_END.chars().collect(),
            self_closing_tags: DEFAULT_SELF_CLOSING_TAGS
                .iter()
                .map(|tag| tag.to_string())
                .collect(),
            command_patterns: Vec::new(),
        }
    }
}

impl Ruleset {
    /// A ruleset with empty kinsoku tables and no command patterns.
    pub fn empty() -> Self {
        Ruleset {
            kinsoku_head: HashSet::new(),
            kinsoku_end: HashSet::new(),
            self_closing_tags: Vec::new(),
            command_patterns: Vec::new(),
        }
    }

    pub fn with_kinsoku_head(mut self, chars: &str) -> Self {
        self.kinsoku_head = chars.chars().collect();
        self
    }

    pub fn with_kinsoku_end(mut self, chars: &str) -> Self {
        self.kinsoku_end = chars.chars().collect();
        self
    }

    pub fn with_self_closing_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.self_closing_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the command patterns. Patterns are applied in order.
    pub fn with_command_patterns(mut self, patterns: Vec<Regex>) -> Self {
        self.command_patterns = patterns;
        self
    }

    /// Compiles and replaces the command patterns.
    pub fn with_command_pattern_sources<I, S>(self, sources: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = sources
            .into_iter()
            .map(|source| Regex::new(source.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.with_command_patterns(patterns))
    }

    pub fn is_kinsoku_head(&self, c: char) -> bool {
        self.kinsoku_head.contains(&c)
    }

    pub fn is_kinsoku_end(&self, c: char) -> bool {
        self.kinsoku_end.contains(&c)
    }

    /// True when `tag` (the full `<...>` text) opens no nesting level.
    pub fn is_self_closing(&self, tag: &str) -> bool {
        let name = tag.trim_start_matches('<');
        self.self_closing_tags
            .iter()
            .any(|known| name.starts_with(known.as_str()))
    }

    pub fn command_patterns(&self) -> &[Regex] {
        &self.command_patterns
    }
}
