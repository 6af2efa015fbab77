use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a keystroke did to the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    Continue,
    Submit,
    Cancel,
}

/// Minimal text entry for replacing the reference text.
///
/// While this editor is on screen it holds input focus; the typing core is
/// told so and drops its own events. Enter submits, Esc cancels, Alt+Enter
/// inserts a literal newline into the new text.
#[derive(Clone, Debug, Default)]
pub struct TextEditor {
    text: String,
    /// Cursor position as a char index (0 = before first char).
    cursor: usize,
}

impl TextEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Editor prefilled with `text`, cursor at the end.
    pub fn with_text(text: &str) -> Self {
        Self {
            cursor: text.chars().count(),
            text: text.to_string(),
        }
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    /// Returns (before_cursor, cursor_char, after_cursor) for styled
    /// rendering. When the cursor is at the end of the text, cursor_char is
    /// None.
    pub fn render_parts(&self) -> (&str, Option<char>, &str) {
        let byte_offset = self.char_to_byte(self.cursor);
        if self.cursor >= self.text.chars().count() {
            (&self.text, None, "")
        } else {
            let ch = self.text[byte_offset..].chars().next().unwrap_or(' ');
            let next_byte = byte_offset + ch.len_utf8();
            (&self.text[..byte_offset], Some(ch), &self.text[next_byte..])
        }
    }

    pub fn handle(&mut self, key: KeyEvent) -> EditOutcome {
        match key.code {
            KeyCode::Esc => return EditOutcome::Cancel,
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
                self.insert('\n');
            }
            KeyCode::Enter => return EditOutcome::Submit,
            KeyCode::Left => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                }
            }
            KeyCode::Right => {
                let len = self.text.chars().count();
                if self.cursor < len {
                    self.cursor += 1;
                }
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.text.chars().count(),
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    let byte_offset = self.char_to_byte(self.cursor - 1);
                    if let Some(ch) = self.text[byte_offset..].chars().next() {
                        self.text
                            .replace_range(byte_offset..byte_offset + ch.len_utf8(), "");
                        self.cursor -= 1;
                    }
                }
            }
            KeyCode::Delete => {
                let len = self.text.chars().count();
                if self.cursor < len {
                    let byte_offset = self.char_to_byte(self.cursor);
                    if let Some(ch) = self.text[byte_offset..].chars().next() {
                        self.text
                            .replace_range(byte_offset..byte_offset + ch.len_utf8(), "");
                    }
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.insert(c);
            }
            _ => {}
        }
        EditOutcome::Continue
    }

    fn insert(&mut self, c: char) {
        let byte_offset = self.char_to_byte(self.cursor);
        self.text.insert(byte_offset, c);
        self.cursor += 1;
    }

    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }
}
