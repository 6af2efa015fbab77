use itertools::Itertools;
use unicode_width::UnicodeWidthChar;

/// On-screen geometry of a single text position, in layout units (terminal
/// rows/columns for `GridLayout`, anything consistent for synthetic oracles).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    pub top: i32,
    pub left: i32,
}

/// Per-position geometry lookup supplied by the rendering side.
///
/// `None` means the position is not currently laid out; vertical navigation
/// treats it as "no candidate" and degrades to no movement.
pub trait LayoutOracle {
    fn geometry(&self, position: usize) -> Option<Geometry>;
}

/// Start of the current/previous word: scan back over whitespace, then back
/// over the word itself.
pub fn prev_word_start(chars: &[char], cursor: usize) -> usize {
    let mut i = cursor.min(chars.len());
    while i > 0 && chars[i - 1].is_whitespace() {
        i -= 1;
    }
    while i > 0 && !chars[i - 1].is_whitespace() {
        i -= 1;
    }
    i
}

/// End of the next word: scan forward over whitespace, then forward over the
/// word itself. Capped at the text length.
pub fn next_word_end(chars: &[char], cursor: usize) -> usize {
    let mut i = cursor.min(chars.len());
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    while i < chars.len() && !chars[i].is_whitespace() {
        i += 1;
    }
    i
}

/// Up-arrow target: among positions on rows above the cursor, the one whose
/// horizontal offset is nearest the cursor's. No candidate leaves the cursor
/// unchanged.
pub fn up_target<O: LayoutOracle>(oracle: &O, len: usize, cursor: usize) -> usize {
    let cur = match oracle.geometry(cursor) {
        Some(g) => g,
        None => return cursor,
    };
    let mut best: Option<(i32, usize)> = None;
    for i in 0..=len {
        if let Some(g) = oracle.geometry(i) {
            if g.top < cur.top {
                let diff = (g.left - cur.left).abs();
                if best.map_or(true, |(b, _)| diff < b) {
                    best = Some((diff, i));
                }
            }
        }
    }
    best.map_or(cursor, |(_, i)| i)
}

/// Down-arrow target: nearest column on a row below, falling back to the end
/// of the text when the cursor already sits on the last row.
pub fn down_target<O: LayoutOracle>(
    oracle: &O,
    len: usize,
    cursor: usize,
    tolerance: i32,
) -> usize {
    let cur = match oracle.geometry(cursor) {
        Some(g) => g,
        None => return cursor,
    };

    let mut best: Option<(i32, usize)> = None;
    for i in 0..=len {
        if let Some(g) = oracle.geometry(i) {
            if g.top > cur.top {
                let diff = (g.left - cur.left).abs();
                if best.map_or(true, |(b, _)| diff < b) {
                    best = Some((diff, i));
                }
            }
        }
    }
    if let Some((_, i)) = best {
        return i;
    }

    // No row below: on the last row (within tolerance of the final rendered
    // position) the target is the end of the text, otherwise the first
    // position of the row beyond the tolerance, if the oracle shows one.
    let last = (0..=len).rev().find_map(|i| oracle.geometry(i));
    match last {
        Some(last) if (cur.top - last.top).abs() <= tolerance => len,
        Some(_) => (0..=len)
            .filter_map(|i| oracle.geometry(i).map(|g| (i, g)))
            .filter(|(_, g)| g.top > cur.top + tolerance)
            .sorted_by(|a, b| (a.1.top, a.0).cmp(&(b.1.top, b.0)))
            .map(|(i, _)| i)
            .next()
            .unwrap_or(cursor),
        None => cursor,
    }
}

fn cell_width(c: char) -> i32 {
    UnicodeWidthChar::width(c).unwrap_or(0) as i32
}

/// Concrete layout oracle for the terminal: a greedy word wrap of the
/// reference text at a fixed column width.
///
/// Newlines occupy a cell and force a new row; words wider than the wrap
/// width split hard; position `len` (the trailing caret) gets the cell one
/// past the last character.
#[derive(Clone, Debug)]
pub struct GridLayout {
    cells: Vec<Geometry>,
    caret: Geometry,
}

impl GridLayout {
    pub fn new(chars: &[char], width: u16) -> Self {
        let width = i32::from(width.max(1));
        let mut cells = Vec::with_capacity(chars.len());
        let mut top = 0;
        let mut left = 0;

        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c == '\n' {
                cells.push(Geometry { top, left });
                top += 1;
                left = 0;
                i += 1;
            } else if !c.is_whitespace() {
                let mut end = i;
                let mut word_width = 0;
                while end < chars.len() && !chars[end].is_whitespace() {
                    word_width += cell_width(chars[end]);
                    end += 1;
                }
                // Wrap before the word when it fits on a fresh row
                if left > 0 && left + word_width > width && word_width <= width {
                    top += 1;
                    left = 0;
                }
                for &wc in &chars[i..end] {
                    let cw = cell_width(wc);
                    if left > 0 && left + cw > width {
                        top += 1;
                        left = 0;
                    }
                    cells.push(Geometry { top, left });
                    left += cw;
                }
                i = end;
            } else {
                // Whitespace may hang past the row edge, as browsers wrap it
                cells.push(Geometry { top, left });
                left += cell_width(c).max(1);
                i += 1;
            }
        }

        let caret = if left >= width {
            Geometry { top: top + 1, left: 0 }
        } else {
            Geometry { top, left }
        };

        Self { cells, caret }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Total number of laid-out rows, caret row included.
    pub fn row_count(&self) -> usize {
        self.caret.top as usize + 1
    }

    pub fn row_of(&self, position: usize) -> usize {
        self.geometry(position).map_or(0, |g| g.top as usize)
    }

    /// Maps pointer geometry back to a text position, snapping to the nearest
    /// cell within the targeted row. Rows with no cells yield `None`.
    pub fn position_at(&self, top: i32, left: i32) -> Option<usize> {
        (0..=self.cells.len())
            .filter_map(|i| self.geometry(i).map(|g| (i, g)))
            .filter(|(_, g)| g.top == top)
            .min_by_key(|(i, g)| ((g.left - left).abs(), *i))
            .map(|(i, _)| i)
    }
}

impl LayoutOracle for GridLayout {
    fn geometry(&self, position: usize) -> Option<Geometry> {
        if position == self.cells.len() {
            Some(self.caret)
        } else {
            self.cells.get(position).copied()
        }
    }
}
