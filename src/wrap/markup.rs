use super::{Scanner, State};
use crate::ruleset::Ruleset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    SelfClosing,
    Closing,
    Opening,
}

fn classify(tag: &str, rules: &Ruleset) -> TagKind {
    if rules.is_self_closing(tag) {
        TagKind::SelfClosing
    } else if tag.starts_with("</") {
        TagKind::Closing
    } else {
        TagKind::Opening
    }
}

impl Scanner<'_> {
    /// Copy one tag group starting at `<`: a self-closing tag, a stray
    /// closing tag, or an opening tag through its matching close including
    /// everything nested in between.
    ///
    /// Text between tags is content: it takes room on the line and is
    /// visible, but no break is ever inserted inside the group. Emphasis
    /// pairs inside the group stay markup. Unterminated groups run to the
    /// end of input.
    pub(super) fn emit_tag_group(&mut self) -> State {
        let mut open: Vec<String> = Vec::new();
        let mut tag = String::new();
        let mut in_tag = false;

        while let Some(c) = self.current() {
            if c == '<' {
                in_tag = true;
                tag.clear();
            }

            if in_tag {
                tag.push(c);
                self.push_markup(c);
            } else if self.at_emphasis_pair(self.pos) {
                self.push_emphasis_pair();
                continue;
            } else {
                if c == '\n' {
                    self.reset_line();
                }
                self.push_visible(c);
                if c == '\n' {
                    self.line_start = self.pos;
                }
            }

            if in_tag && c == '>' {
                in_tag = false;
                match classify(&tag, self.rules) {
                    TagKind::SelfClosing => {}
                    TagKind::Closing => {
                        // Unbalanced closers are ignored.
                        open.pop();
                    }
                    TagKind::Opening => open.push(std::mem::take(&mut tag)),
                }
                if open.is_empty() {
                    break;
                }
            }
        }

        self.atomic_end = self.pos;
        State::Scanning
    }
}
