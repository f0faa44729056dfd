use unicode_segmentation::UnicodeSegmentation;

use crate::util::unicode::display_width;

/// Single-line editable text with a grapheme-aware cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    /// Byte offset into `value`, always on a grapheme boundary
    cursor: usize,
}

impl TextInput {
    pub fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.len();
        TextInput { value, cursor }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Cursor position in display cells from the start of the text
    pub fn cursor_col(&self) -> usize {
        display_width(&self.value[..self.cursor])
    }

    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete the grapheme before the cursor
    pub fn backspace(&mut self) {
        if let Some(start) = self.prev_boundary() {
            self.value.replace_range(start..self.cursor, "");
            self.cursor = start;
        }
    }

    /// Delete the grapheme under the cursor
    pub fn delete(&mut self) {
        if let Some(end) = self.next_boundary() {
            self.value.replace_range(self.cursor..end, "");
        }
    }

    pub fn move_left(&mut self) {
        if let Some(start) = self.prev_boundary() {
            self.cursor = start;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(end) = self.next_boundary() {
            self.cursor = end;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.value[..self.cursor]
            .grapheme_indices(true)
            .next_back()
            .map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.value[self.cursor..]
            .graphemes(true)
            .next()
            .map(|g| self.cursor + g.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(s: &str) -> TextInput {
        let mut input = TextInput::default();
        for c in s.chars() {
            input.insert(c);
        }
        input
    }

    #[test]
    fn typing_and_backspace() {
        let mut input = typed("milk");
        assert_eq!(input.value(), "milk");
        input.backspace();
        assert_eq!(input.value(), "mil");
        assert_eq!(input.cursor_col(), 3);
    }

    #[test]
    fn backspace_removes_whole_grapheme() {
        // e + combining acute accent is one grapheme
        let mut input = typed("cafe\u{0301}");
        input.backspace();
        assert_eq!(input.value(), "caf");
    }

    #[test]
    fn insert_in_middle() {
        let mut input = typed("Buy mlk");
        input.move_left();
        input.move_left();
        input.insert('i');
        assert_eq!(input.value(), "Buy milk");
    }

    #[test]
    fn delete_and_home_end() {
        let mut input = typed("xmilk");
        input.home();
        input.delete();
        assert_eq!(input.value(), "milk");
        input.end();
        input.delete();
        assert_eq!(input.value(), "milk");
        assert_eq!(input.cursor_col(), 4);
    }

    #[test]
    fn wide_chars_count_two_cells() {
        let input = TextInput::with_value("우유");
        assert_eq!(input.cursor_col(), 4);
    }

    #[test]
    fn edges_are_noops() {
        let mut input = TextInput::default();
        input.backspace();
        input.delete();
        input.move_left();
        input.move_right();
        assert!(input.is_empty());
    }
}
