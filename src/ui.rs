use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
    Frame,
};
use std::rc::Rc;

use crate::navigate::GridLayout;
use crate::session::SnapshotCell;
use crate::text_model::CharState;
use crate::{App, AppState};

pub const HORIZONTAL_MARGIN: u16 = 5;
pub const VERTICAL_MARGIN: u16 = 2;

fn chunks(area: Rect) -> Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(4), // header + spacing
            Constraint::Min(1),    // reference text
            Constraint::Length(2), // metrics
        ])
        .split(area)
}

/// The screen rectangle the reference text occupies; the mouse path maps
/// pointer coordinates back through this same rect.
pub fn text_area(area: Rect) -> Rect {
    chunks(area)[1]
}

/// First visible layout row, chosen so the cursor row stays in view.
pub fn scroll_offset(layout: &GridLayout, cursor: usize, height: u16) -> usize {
    let rows = layout.row_count();
    let h = height.max(1) as usize;
    if rows <= h {
        return 0;
    }
    layout.row_of(cursor).saturating_sub(h / 2).min(rows - h)
}

pub fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Typing => render_typing(self, area, buf),
            AppState::EditingText => render_editor(self, area, buf),
        }
    }
}

fn glyph(ch: char) -> String {
    match ch {
        '\n' => "⏎".to_string(),
        c => c.to_string(),
    }
}

fn cell_span(cell: &SnapshotCell) -> Span<'static> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let (text, base) = match cell.state {
        CharState::Correct => (glyph(cell.ch), bold.fg(Color::Green)),
        CharState::Incorrect => (
            // A missed space needs a visible mark
            match cell.ch {
                ' ' => "·".to_string(),
                c => glyph(c),
            },
            bold.fg(Color::Red),
        ),
        CharState::Untyped => (glyph(cell.ch), bold.add_modifier(Modifier::DIM)),
    };
    let style = if cell.at_cursor {
        base.add_modifier(Modifier::UNDERLINED)
    } else {
        base
    };
    Span::styled(text, style)
}

fn render_typing(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = chunks(area);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim_italic = Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC);

    let header = Paragraph::new(vec![
        Line::from(Span::styled("retype", bold)),
        Line::from(Span::styled(
            "type the text below; arrows, ctrl+arrows, and clicks reposition the cursor",
            dim_italic,
        )),
        Line::from(Span::styled(
            "ctrl+e change text / ctrl+n new passage / ctrl+r restart / esc quit",
            dim_italic,
        )),
    ])
    .alignment(Alignment::Center);
    header.render(chunks[0], buf);

    let text_rect = chunks[1];
    let snap = app.session.snapshot();
    let scroll = scroll_offset(&app.layout, app.session.drill().cursor(), text_rect.height);
    let window_end = scroll + text_rect.height as usize;

    let mut lines: Vec<Line> = Vec::new();
    let mut row_spans: Vec<Span> = Vec::new();
    let mut cur_row = scroll;
    for (i, cell) in snap.cells.iter().enumerate() {
        let row = app.layout.row_of(i);
        if row < scroll {
            continue;
        }
        if row >= window_end {
            break;
        }
        while cur_row < row {
            lines.push(Line::from(std::mem::take(&mut row_spans)));
            cur_row += 1;
        }
        row_spans.push(cell_span(cell));
    }
    if snap.trailing_caret {
        let caret_row = app.layout.row_of(snap.cells.len());
        if (scroll..window_end).contains(&caret_row) {
            while cur_row < caret_row {
                lines.push(Line::from(std::mem::take(&mut row_spans)));
                cur_row += 1;
            }
            row_spans.push(Span::styled(
                " ",
                Style::default().add_modifier(Modifier::UNDERLINED),
            ));
        }
    }
    lines.push(Line::from(row_spans));

    Paragraph::new(lines).render(text_rect, buf);

    let m = &app.metrics;
    let stats = Paragraph::new(Span::styled(
        format!(
            "{:.1}% accuracy   {:.1} wpm   {:.1}% completed",
            m.accuracy, m.wpm, m.percent_finished
        ),
        bold,
    ))
    .alignment(Alignment::Center);
    stats.render(chunks[2], buf);
}

fn render_editor(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = chunks(area);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim_italic = Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC);

    let header = Paragraph::new(vec![
        Line::from(Span::styled("change text", bold)),
        Line::from(Span::styled(
            "paste or type the new reference text",
            dim_italic,
        )),
        Line::from(Span::styled(
            "enter set text / alt+enter newline / esc cancel",
            dim_italic,
        )),
    ])
    .alignment(Alignment::Center);
    header.render(chunks[0], buf);

    let (before, at, after) = app.editor.render_parts();
    let tail: String = at.map(glyph).unwrap_or_default() + after;
    let body = Paragraph::new(format!("{before}│{tail}")).wrap(Wrap { trim: false });
    body.render(chunks[1], buf);
}
