use super::{Scanner, State};
use tracing::trace;

const IDEOGRAPHIC_SPACE: char = '\u{3000}';

/// True when a break between `prev` and `cur` would split an ASCII word.
fn joins_ascii_word(prev: char, cur: char) -> bool {
    prev.is_ascii() && cur.is_ascii() && prev != ' ' && prev != IDEOGRAPHIC_SPACE
}

impl Scanner<'_> {
    /// Decide where the overflowing line ends and insert the break.
    ///
    /// Called with the cursor on the first character past the threshold.
    pub(super) fn place_break(&mut self) -> State {
        self.backtrack_word();

        match self.find_break_head() {
            Some(head)
                if head + 1 < self.chars.len() && !self.rules.is_kinsoku_head(self.chars[head + 1]) =>
            {
                self.copy_through(head);
            }
            Some(head) if head + 1 == self.chars.len() => {
                // The rest of the text fits in the window: no trailing break.
                self.copy_through(head);
                return State::Finished;
            }
            _ => {}
        }

        if self.current() != Some('\n') {
            self.insert_break();
        }
        State::Scanning
    }

    /// Retreat to the start of the ASCII word under the cursor, dropping the
    /// characters already emitted for it.
    ///
    /// Emphasis pairs are part of the word and are stepped over whole. Stops
    /// at the line start and at the end of the last tag group. A word
    /// reaching back to the line start has no better break point and is
    /// split where it overflowed.
    fn backtrack_word(&mut self) {
        let floor = self.line_start.max(self.atomic_end);
        let mut marks = self.emphasis_marks.len();
        let mut pairs = 0;
        let mut target = self.pos;
        while target > floor && joins_ascii_word(self.chars[target - 1], self.chars[target]) {
            let pair_start = marks
                .checked_sub(1)
                .map(|last| self.emphasis_marks[last])
                .filter(|&start| start + 2 == target && start >= floor);
            match pair_start {
                Some(start) => {
                    marks -= 1;
                    pairs += 1;
                    target = start;
                }
                None => target -= 1,
            }
        }
        if target == self.line_start || target == self.pos {
            return;
        }

        let retreat = self.pos - target;
        for _ in 0..retreat {
            self.out.pop();
        }
        self.emphasis_marks.truncate(marks);
        self.pos = target;
        self.width = self.width.saturating_sub(retreat);
        self.threshold -= 2 * pairs;
        self.visible = self.visible.saturating_sub(retreat - 2 * pairs);
        trace!(to = target, retreat, pairs, "backtracked over ascii word");
    }

    /// Index of the kinsoku head character the current line should end on.
    ///
    /// The furthest head character in the window wins, unless the cursor
    /// sits on an end-class character, in which case the first one does.
    fn find_break_head(&self) -> Option<usize> {
        let end = self.window_end();
        let is_head = |i: &usize| self.rules.is_kinsoku_head(self.chars[*i]);

        let on_end_class = self
            .current()
            .is_some_and(|c| self.rules.is_kinsoku_end(c));
        if on_end_class {
            if let Some(first) = (self.pos..end).find(is_head) {
                return Some(first);
            }
        }
        (self.pos..end).rev().find(is_head)
    }

    /// Exclusive end of the lookahead window. The window never reaches into
    /// markup, an emphasis pair or the next explicit line.
    fn window_end(&self) -> usize {
        let limit = self
            .pos
            .saturating_add(self.lookahead)
            .min(self.chars.len());
        (self.pos..limit)
            .find(|&i| matches!(self.chars[i], '<' | '\n') || self.at_emphasis_pair(i))
            .unwrap_or(limit)
    }

    fn copy_through(&mut self, last: usize) {
        while self.pos <= last {
            let c = self.chars[self.pos];
            self.push_visible(c);
        }
    }

    fn insert_break(&mut self) {
        self.out.push('\n');
        self.reset_line();
        self.line_start = self.pos;
        self.breaks += 1;
        trace!(at = self.pos, "inserted line break");
    }
}
