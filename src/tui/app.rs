use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::config_io::load_config;
use crate::io::payload_io::load_payload;
use crate::model::ViewerConfig;
use crate::timeline::{FilterKind, Playback, Timeline};

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Filter,
}

/// One row of the filter panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterRow {
    /// Togglable kind checkbox
    Kind(FilterKind),
    /// Tag key heading (not togglable)
    TagKey(String),
    /// Togglable tag value checkbox
    TagValue { key: String, value: String },
}

/// Main application state
pub struct App {
    pub timeline: Timeline,
    pub playback: Playback,
    /// Grey out non-matched rows while a query is selected
    pub query_focus: bool,
    pub theme: Theme,
    pub mode: Mode,
    pub should_quit: bool,
    pub show_help: bool,
    /// Scroll offset of the timeline view (first visible row)
    pub timeline_scroll: usize,
    /// Cursor index into `filter_rows()`
    pub filter_cursor: usize,
    pub filter_scroll: usize,
}

impl App {
    pub fn new(timeline: Timeline, config: &ViewerConfig) -> Self {
        App {
            timeline,
            playback: Playback::new(config.playback.speed),
            query_focus: config.display.query_focus,
            theme: Theme::from_config(&config.ui),
            mode: Mode::Navigate,
            should_quit: false,
            show_help: false,
            timeline_scroll: 0,
            filter_cursor: 0,
            filter_scroll: 0,
        }
    }

    /// Build the flat list of filter panel rows: the four kind checkboxes,
    /// then every tag key with its observed values.
    pub fn filter_rows(&self) -> Vec<FilterRow> {
        let mut rows: Vec<FilterRow> = FilterKind::ALL.into_iter().map(FilterRow::Kind).collect();
        for (key, values) in self.timeline.tag_index() {
            rows.push(FilterRow::TagKey(key.clone()));
            for value in values {
                rows.push(FilterRow::TagValue {
                    key: key.clone(),
                    value: value.clone(),
                });
            }
        }
        rows
    }

    /// Toggle the filter row under the cursor. Tag key headings are inert.
    pub fn toggle_filter_row(&mut self) {
        let rows = self.filter_rows();
        match rows.get(self.filter_cursor) {
            Some(FilterRow::Kind(kind)) => self.timeline.toggle_kind(*kind),
            Some(FilterRow::TagValue { key, value }) => {
                let (key, value) = (key.clone(), value.clone());
                self.timeline.toggle_tag_value(&key, &value);
            }
            _ => {}
        }
    }
}

/// Run the TUI against a payload file
pub fn run(payload: &Path, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let buffer = load_payload(payload)?;
    let mut app = App::new(Timeline::new(buffer), &config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// One thread drives everything: due playback ticks are applied between
/// input polls, so a click and a pending tick can never interleave inside
/// an intent.
fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        app.playback.advance(&mut app.timeline);

        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            app.playback.dispose();
            break;
        }
    }
    Ok(())
}
