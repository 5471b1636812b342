use super::{Scanner, State};

const EMPHASIS_MARK: char = '_';

impl Scanner<'_> {
    /// True when a `__` delimiter pair starts at `index`.
    pub(super) fn at_emphasis_pair(&self, index: usize) -> bool {
        self.chars.get(index) == Some(&EMPHASIS_MARK)
            && self.chars.get(index + 1) == Some(&EMPHASIS_MARK)
    }

    /// Copy the `__` pair under the cursor as markup: it takes no room on
    /// the line and is not visible.
    pub(super) fn push_emphasis_pair(&mut self) {
        self.push_markup(EMPHASIS_MARK);
        self.push_markup(EMPHASIS_MARK);
    }

    /// Copy consecutive `__` pairs, remembering where each one starts so a
    /// word backtrack can step over it whole.
    pub(super) fn emit_emphasis(&mut self) -> State {
        while self.at_emphasis_pair(self.pos) {
            self.emphasis_marks.push(self.pos);
            self.push_emphasis_pair();
        }
        State::Scanning
    }
}
