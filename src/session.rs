use std::time::SystemTime;

use crate::drill::{Drill, Event};
use crate::metrics::{self, Metrics};
use crate::navigate::LayoutOracle;
use crate::text_model::CharState;

/// One rendered position: its reference character, typed status, and whether
/// the cursor sits on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnapshotCell {
    pub ch: char,
    pub state: CharState,
    pub at_cursor: bool,
}

/// Read-only view handed to the render boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderSnapshot {
    pub cells: Vec<SnapshotCell>,
    /// True when the cursor is past the last character; rendered as an extra
    /// caret cell.
    pub trailing_caret: bool,
}

/// Orchestrates the typing core: dispatches events to the drill, handles text
/// replacement, and produces the snapshots the renderer consumes.
#[derive(Clone, Debug)]
pub struct Session {
    drill: Drill,
}

impl Session {
    pub fn new(text: &str, row_tolerance: i32) -> Self {
        Self {
            drill: Drill::new(text, row_tolerance),
        }
    }

    pub fn drill(&self) -> &Drill {
        &self.drill
    }

    pub fn reference_text(&self) -> String {
        self.drill.text().chars().iter().collect()
    }

    pub fn apply<O: LayoutOracle>(&mut self, event: Event, oracle: &O) {
        match event {
            Event::Key { key, word_modifier } => self.drill.handle_key(key, word_modifier, oracle),
            Event::Click { position } => self.drill.handle_click(position),
            Event::SetText { text } => self.drill.replace_text(&text),
            Event::Focus { editor_focused } => self.drill.set_focus(editor_focused),
        }
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        let model = self.drill.text();
        let cursor = self.drill.cursor();
        let cells = (0..model.len())
            .map(|i| SnapshotCell {
                ch: model.char_at(i).unwrap_or(' '),
                state: model.state_at(i),
                at_cursor: i == cursor,
            })
            .collect();
        RenderSnapshot {
            cells,
            trailing_caret: cursor == model.len(),
        }
    }

    pub fn metrics_at(&self, now: SystemTime) -> Metrics {
        metrics::compute(self.drill.text(), self.drill.started_at(), now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drill::Key;
    use crate::navigate::Geometry;

    struct NoLayout;

    impl LayoutOracle for NoLayout {
        fn geometry(&self, _position: usize) -> Option<Geometry> {
            None
        }
    }

    fn key(key: Key) -> Event {
        Event::Key {
            key,
            word_modifier: false,
        }
    }

    #[test]
    fn test_snapshot_states_and_trailing_caret() {
        let mut session = Session::new("ab", 0);
        session.apply(key(Key::Char('a')), &NoLayout);
        session.apply(key(Key::Char('x')), &NoLayout);

        let snap = session.snapshot();

        assert_eq!(snap.cells.len(), 2);
        assert_eq!(snap.cells[0].state, CharState::Correct);
        assert_eq!(snap.cells[1].state, CharState::Incorrect);
        assert!(!snap.cells[0].at_cursor);
        assert!(snap.trailing_caret);
    }

    #[test]
    fn test_snapshot_marks_cursor_cell() {
        let mut session = Session::new("abc", 0);
        session.apply(key(Key::Char('a')), &NoLayout);

        let snap = session.snapshot();

        assert!(snap.cells[1].at_cursor);
        assert!(!snap.trailing_caret);
    }

    #[test]
    fn test_set_text_resets_state() {
        let mut session = Session::new("ab", 0);
        session.apply(key(Key::Char('a')), &NoLayout);

        session.apply(Event::SetText { text: "xyz".into() }, &NoLayout);

        assert_eq!(session.reference_text(), "xyz");
        assert_eq!(session.drill().cursor(), 0);
        assert!(session.drill().started_at().is_none());
    }

    #[test]
    fn test_set_text_is_idempotent() {
        let mut session = Session::new("ab", 0);
        session.apply(key(Key::Char('a')), &NoLayout);

        session.apply(Event::SetText { text: "cd".into() }, &NoLayout);
        let first = session.snapshot();
        session.apply(Event::SetText { text: "cd".into() }, &NoLayout);
        let second = session.snapshot();

        assert_eq!(first, second);
        assert_eq!(session.drill().cursor(), 0);
        assert_eq!(session.drill().text().typed_count(), 0);
    }

    #[test]
    fn test_focus_guard_drops_typing_and_clicks() {
        let mut session = Session::new("ab", 0);

        session.apply(
            Event::Focus {
                editor_focused: true,
            },
            &NoLayout,
        );
        session.apply(key(Key::Char('a')), &NoLayout);
        session.apply(Event::Click { position: 1 }, &NoLayout);
        assert_eq!(session.drill().text().typed_count(), 0);
        assert_eq!(session.drill().cursor(), 0);

        session.apply(
            Event::Focus {
                editor_focused: false,
            },
            &NoLayout,
        );
        session.apply(key(Key::Char('a')), &NoLayout);
        assert_eq!(session.drill().text().typed_count(), 1);
    }

    #[test]
    fn test_metrics_follow_typing() {
        let mut session = Session::new("hi", 0);
        session.apply(key(Key::Char('h')), &NoLayout);
        session.apply(key(Key::Char('i')), &NoLayout);

        let m = session.metrics_at(SystemTime::now());

        assert_eq!(m.accuracy, 100.0);
        assert_eq!(m.percent_finished, 100.0);
    }
}
