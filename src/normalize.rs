use crate::ruleset::Ruleset;

/// Newline followed by an ideographic space; scenario text indents
/// continuation lines this way and the wrapper collapses it.
const INDENTED_NEWLINE: &str = "\n\u{3000}";

/// Prepares raw text for wrapping.
///
/// Collapses every indented newline into a plain `\n`, then, when
/// `strip_commands` is set, removes every match of each command pattern in
/// ruleset order.
pub fn normalize(text: &str, rules: &Ruleset, strip_commands: bool) -> String {
    let mut normalized = text.replace(INDENTED_NEWLINE, "\n");

    if strip_commands {
        for pattern in rules.command_patterns() {
            if let std::borrow::Cow::Owned(stripped) = pattern.replace_all(&normalized, "") {
                normalized = stripped;
            }
        }
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules_with(patterns: &[&str]) -> Ruleset {
        Ruleset::default()
            .with_command_pattern_sources(patterns.iter().copied())
            .unwrap()
    }

    #[test]
    fn test_collapses_indented_newline() {
        let rules = Ruleset::default();
        assert_eq!(normalize("一行目\n\u{3000}二行目", &rules, true), "一行目\n二行目");
    }

    #[test]
    fn test_only_first_ideographic_space_is_collapsed() {
        let rules = Ruleset::default();
        assert_eq!(
            normalize("a\n\u{3000}\u{3000}b", &rules, false),
            "a\n\u{3000}b"
        );
    }

    #[test]
    fn test_ideographic_space_without_newline_is_kept() {
        let rules = Ruleset::default();
        assert_eq!(normalize("\u{3000}a", &rules, true), "\u{3000}a");
    }

    #[test]
    fn test_strips_commands_in_order() {
        // The second pattern only matches once the first has run.
        let rules = rules_with(&[r"\[wait=\d+\]", r"\{\}"]);
        assert_eq!(
            normalize("はい{[wait=30]}。", &rules, true),
            "はい。"
        );
    }

    #[test]
    fn test_strip_disabled_keeps_commands() {
        let rules = rules_with(&[r"\[wait=\d+\]"]);
        assert_eq!(normalize("a[wait=5]b", &rules, false), "a[wait=5]b");
    }

    #[test]
    fn test_unmatched_patterns_are_noops() {
        let rules = rules_with(&[r"\[shake\]"]);
        assert_eq!(normalize("plain text", &rules, true), "plain text");
    }
}
