/// Rendering status of a single reference-text position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharState {
    Untyped,
    Correct,
    Incorrect,
}

/// Reference text plus per-position typed/locked state.
///
/// The reference text is immutable for the lifetime of a session; `replace_text`
/// swaps it wholesale and resets everything else. A position becomes locked the
/// moment the correct character is typed there, and locked positions are never
/// cleared or overwritten again until the text is replaced.
#[derive(Clone, Debug)]
pub struct TextModel {
    chars: Vec<char>,
    typed: Vec<Option<char>>,
    locked: Vec<bool>,
}

impl TextModel {
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();
        Self {
            chars,
            typed: vec![None; len],
            locked: vec![false; len],
        }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn char_at(&self, i: usize) -> Option<char> {
        self.chars.get(i).copied()
    }

    pub fn typed_at(&self, i: usize) -> Option<char> {
        self.typed.get(i).copied().flatten()
    }

    pub fn is_locked(&self, i: usize) -> bool {
        self.locked.get(i).copied().unwrap_or(false)
    }

    /// Records the character the user typed at position `i`.
    ///
    /// Silent no-op when `i` is out of range or the position is locked. When
    /// the typed character matches the reference, the position locks.
    pub fn set_char(&mut self, i: usize, ch: char) {
        if i >= self.chars.len() || self.locked[i] {
            return;
        }
        self.typed[i] = Some(ch);
        if ch == self.chars[i] {
            self.locked[i] = true;
        }
    }

    /// Clears typed entries in `[lo, hi)`, skipping locked positions.
    pub fn clear_range(&mut self, lo: usize, hi: usize) {
        let hi = hi.min(self.chars.len());
        for i in lo..hi {
            if !self.locked[i] {
                self.typed[i] = None;
            }
        }
    }

    /// Atomically swaps in a new reference text and resets all typed/locked
    /// state.
    pub fn replace_text(&mut self, text: &str) {
        *self = Self::new(text);
    }

    pub fn state_at(&self, i: usize) -> CharState {
        if self.is_locked(i) {
            return CharState::Correct;
        }
        match (self.typed_at(i), self.char_at(i)) {
            (Some(t), Some(c)) if t == c => CharState::Correct,
            (Some(_), _) => CharState::Incorrect,
            (None, _) => CharState::Untyped,
        }
    }

    pub fn typed_count(&self) -> usize {
        self.typed.iter().filter(|t| t.is_some()).count()
    }

    /// Positions counted as correct: locked, or typed and matching the
    /// reference (a match the engine has not committed to a lock yet still
    /// reads as correct).
    pub fn correct_count(&self) -> usize {
        (0..self.chars.len())
            .filter(|&i| {
                self.typed[i].is_some() && (self.locked[i] || self.typed[i] == Some(self.chars[i]))
            })
            .count()
    }
}
