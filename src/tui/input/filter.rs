use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Mode};

pub fn handle_filter(app: &mut App, key: KeyEvent) {
    let row_count = app.filter_rows().len();
    match key.code {
        KeyCode::Esc | KeyCode::Char('f') | KeyCode::Char('q') => app.mode = Mode::Navigate,
        KeyCode::Down | KeyCode::Char('j') => {
            if app.filter_cursor + 1 < row_count {
                app.filter_cursor += 1;
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.filter_cursor = app.filter_cursor.saturating_sub(1);
        }
        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_filter_row(),
        _ => {}
    }
}
