use std::time::SystemTime;

use crate::navigate::{self, LayoutOracle};
use crate::text_model::TextModel;

/// Keys the engine understands; everything else is dropped before it gets
/// here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Backspace,
    Enter,
    Char(char),
}

/// Domain events consumed by the typing core.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Key { key: Key, word_modifier: bool },
    Click { position: usize },
    SetText { text: String },
    Focus { editor_focused: bool },
}

/// The typing state machine for one reference text.
///
/// Owns the text model, the cursor, and the timing anchor. Every transition
/// runs to completion on the caller's thread; invalid input is absorbed as a
/// no-op. The cursor always stays in `[0, len]`.
#[derive(Clone, Debug)]
pub struct Drill {
    text: TextModel,
    cursor: usize,
    started_at: Option<SystemTime>,
    editor_focused: bool,
    row_tolerance: i32,
}

impl Drill {
    pub fn new(text: &str, row_tolerance: i32) -> Self {
        Self {
            text: TextModel::new(text),
            cursor: 0,
            started_at: None,
            editor_focused: false,
            row_tolerance,
        }
    }

    pub fn text(&self) -> &TextModel {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Start of the currently active typing attempt. Re-armed on destructive
    /// edits so elapsed-time metrics measure "since last resumed", cleared
    /// only by text replacement.
    pub fn started_at(&self) -> Option<SystemTime> {
        self.started_at
    }

    pub fn is_editor_focused(&self) -> bool {
        self.editor_focused
    }

    pub fn set_focus(&mut self, editor_focused: bool) {
        self.editor_focused = editor_focused;
    }

    /// Swaps in a new reference text and resets cursor and timing anchor.
    pub fn replace_text(&mut self, text: &str) {
        self.text.replace_text(text);
        self.cursor = 0;
        self.started_at = None;
    }

    pub fn handle_key<O: LayoutOracle>(&mut self, key: Key, word_modifier: bool, oracle: &O) {
        if self.editor_focused {
            return;
        }
        let len = self.text.len();
        match key {
            Key::Left if word_modifier => {
                self.cursor = navigate::prev_word_start(self.text.chars(), self.cursor);
            }
            Key::Right if word_modifier => {
                self.cursor = navigate::next_word_end(self.text.chars(), self.cursor);
            }
            Key::Left => self.cursor = self.cursor.saturating_sub(1),
            Key::Right => self.cursor = (self.cursor + 1).min(len),
            Key::Up => self.cursor = navigate::up_target(oracle, len, self.cursor),
            Key::Down => {
                self.cursor = navigate::down_target(oracle, len, self.cursor, self.row_tolerance);
            }
            Key::Backspace if word_modifier => self.delete_word(),
            Key::Backspace => self.backspace(),
            Key::Enter => self.write('\n'),
            Key::Char(c) => self.write(c),
        }
    }

    /// Repositions the cursor to a clicked position and drops all pending
    /// (non-locked) input at and after it. Locked work is preserved.
    pub fn handle_click(&mut self, position: usize) {
        if self.editor_focused || position > self.text.len() {
            return;
        }
        self.text.clear_range(position, self.text.len());
        self.cursor = position;
        self.started_at = Some(SystemTime::now());
    }

    fn write(&mut self, c: char) {
        if self.started_at.is_none() {
            self.started_at = Some(SystemTime::now());
        }
        if self.cursor < self.text.len() {
            self.text.set_char(self.cursor, c);
            self.cursor += 1;
        }
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        if self.text.is_locked(self.cursor - 1) {
            // Locked work is never destroyed; just step over it
            self.cursor -= 1;
        } else {
            self.text.clear_range(self.cursor - 1, self.cursor);
            self.cursor -= 1;
            self.started_at = Some(SystemTime::now());
        }
    }

    fn delete_word(&mut self) {
        let start = navigate::prev_word_start(self.text.chars(), self.cursor);
        self.text.clear_range(start, self.cursor);
        self.cursor = start;
        self.started_at = Some(SystemTime::now());
    }
}
