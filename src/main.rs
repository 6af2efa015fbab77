pub mod config;
pub mod drill;
pub mod editor;
pub mod metrics;
pub mod navigate;
pub mod passage;
pub mod runtime;
pub mod session;
pub mod text_model;
pub mod ui;

use crate::{
    config::{Config, ConfigStore, FileConfigStore},
    editor::{EditOutcome, TextEditor},
    metrics::Metrics,
    navigate::GridLayout,
    passage::PassageSet,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    session::Session,
};
use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers, MouseEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::{Duration, SystemTime},
};

/// Metrics refresh cadence while a drill is running.
const TICK_RATE_MS: u64 = 1000;

/// terminal typing practice with free cursor movement
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A typing practice TUI where correct characters lock in place, the cursor moves freely by arrow, word jump, or mouse click, and live accuracy/wpm/completion figures update every second."
)]
pub struct Cli {
    /// custom text to practice against
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// built-in passage set to draw texts from
    #[clap(short = 'l', long = "passage-set", value_enum)]
    passage_set: Option<PassageChoice>,

    /// rows whose tops differ by at most this count as the same row for vertical navigation
    #[clap(long)]
    row_tolerance: Option<i32>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum PassageChoice {
    English,
    Pangrams,
    Code,
}

impl PassageChoice {
    fn as_set(&self) -> PassageSet {
        PassageSet::new(&self.to_string().to_lowercase())
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::value_variants()
            .iter()
            .copied()
            .find(|v| v.to_string().to_lowercase() == name)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AppState {
    Typing,
    EditingText,
}

pub struct App {
    pub session: Session,
    pub state: AppState,
    pub editor: TextEditor,
    pub layout: GridLayout,
    pub metrics: Metrics,
    passages: PassageSet,
    layout_width: u16,
}

impl App {
    pub fn new(cli: &Cli, config: &Config) -> Self {
        let passages = cli
            .passage_set
            .or_else(|| PassageChoice::from_name(&config.passage_set))
            .unwrap_or(PassageChoice::English)
            .as_set();
        let text = match &cli.prompt {
            Some(prompt) => prompt.clone(),
            None => passages.first().to_string(),
        };
        let tolerance = cli.row_tolerance.unwrap_or(config.row_tolerance);
        let session = Session::new(&text, tolerance);
        let layout = GridLayout::new(session.drill().text().chars(), 80);
        let metrics = session.metrics_at(SystemTime::now());
        Self {
            session,
            state: AppState::Typing,
            editor: TextEditor::new(),
            layout,
            metrics,
            passages,
            layout_width: 80,
        }
    }

    /// Rebuild the character grid for the current text at `width` columns.
    pub fn relayout(&mut self, width: u16) {
        self.layout_width = width;
        self.layout = GridLayout::new(self.session.drill().text().chars(), width);
    }

    pub fn refresh_metrics(&mut self) {
        self.metrics = self.session.metrics_at(SystemTime::now());
    }

    fn set_text(&mut self, text: String) {
        self.session.apply(drill::Event::SetText { text }, &self.layout);
        self.relayout(self.layout_width);
    }

    /// Returns true when the app should quit.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        match self.state {
            AppState::EditingText => {
                match self.editor.handle(key) {
                    EditOutcome::Submit => {
                        let text = self.editor.value().to_string();
                        self.set_text(text);
                        self.session
                            .apply(drill::Event::Focus { editor_focused: false }, &self.layout);
                        self.state = AppState::Typing;
                    }
                    EditOutcome::Cancel => {
                        self.session
                            .apply(drill::Event::Focus { editor_focused: false }, &self.layout);
                        self.state = AppState::Typing;
                    }
                    EditOutcome::Continue => {}
                }
                false
            }
            AppState::Typing => {
                let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
                match key.code {
                    KeyCode::Esc => return true,
                    KeyCode::Char('c') if ctrl => return true,
                    KeyCode::Char('e') if ctrl => {
                        self.editor = TextEditor::with_text(&self.session.reference_text());
                        self.session
                            .apply(drill::Event::Focus { editor_focused: true }, &self.layout);
                        self.state = AppState::EditingText;
                    }
                    KeyCode::Char('n') if ctrl => {
                        let text = self.passages.random().to_string();
                        self.set_text(text);
                    }
                    KeyCode::Char('r') if ctrl => {
                        let text = self.session.reference_text();
                        self.set_text(text);
                    }
                    _ => {
                        if let Some(event) = drill_event(key) {
                            self.session.apply(event, &self.layout);
                        }
                    }
                }
                false
            }
        }
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent, area: Rect) {
        if self.state != AppState::Typing {
            return;
        }
        let text = ui::text_area(area);
        if mouse.row < text.y
            || mouse.row >= text.y + text.height
            || mouse.column < text.x
            || mouse.column >= text.x + text.width
        {
            return;
        }
        let scroll = ui::scroll_offset(&self.layout, self.session.drill().cursor(), text.height);
        let top = (mouse.row - text.y) as i32 + scroll as i32;
        let left = (mouse.column - text.x) as i32;
        if let Some(position) = self.layout.position_at(top, left) {
            self.session
                .apply(drill::Event::Click { position }, &self.layout);
        }
    }
}

/// Maps a terminal keystroke onto a typing event, or None when the
/// combination has no meaning in the drill.
fn drill_event(key: KeyEvent) -> Option<drill::Event> {
    let word = key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    let k = match key.code {
        KeyCode::Left => drill::Key::Left,
        KeyCode::Right => drill::Key::Right,
        KeyCode::Up if !word => drill::Key::Up,
        KeyCode::Down if !word => drill::Key::Down,
        KeyCode::Backspace => drill::Key::Backspace,
        KeyCode::Enter => drill::Key::Enter,
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => drill::Key::Char(c),
        _ => return None,
    };
    Some(drill::Event::Key {
        key: k,
        word_modifier: word,
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let mut config = store.load();
    if let Some(choice) = cli.passage_set {
        config.passage_set = choice.to_string().to_lowercase();
    }
    if let Some(tolerance) = cli.row_tolerance {
        config.row_tolerance = tolerance;
    }
    let _ = store.save(&config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&cli, &config);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    loop {
        let size = terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);
        app.relayout(ui::text_area(area).width);
        app.refresh_metrics();
        terminal.draw(|f| ui::ui(app, f))?;

        match runner.step() {
            AppEvent::Tick | AppEvent::Resize => {}
            AppEvent::Mouse(mouse) => app.on_mouse(mouse, area),
            AppEvent::Key(key) => {
                if app.on_key(key) {
                    break;
                }
            }
        }
    }
    Ok(())
}
