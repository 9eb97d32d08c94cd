use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Mode};

pub fn handle_navigate(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('f') => {
            app.mode = Mode::Filter;
            app.filter_cursor = 0;
            app.filter_scroll = 0;
        }

        // Stepping. With nothing selected yet, ↓ selects the first entry
        // and ↑ the last, then steps move one at a time.
        KeyCode::Down | KeyCode::Char('j') => {
            if app.timeline.selected_original().is_none() {
                app.timeline.jump_to_start();
            } else {
                app.timeline.step_forward();
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            if app.timeline.selected_original().is_none() {
                app.timeline.jump_to_end();
            } else {
                app.timeline.step_backward();
            }
        }
        KeyCode::Char('g') | KeyCode::Home => app.timeline.jump_to_start(),
        KeyCode::Char('G') | KeyCode::End => app.timeline.jump_to_end(),
        KeyCode::Enter => {
            let cursor = app.timeline.cursor();
            app.timeline.jump_to(cursor);
        }

        // Playback
        KeyCode::Char(' ') => app.playback.toggle(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.playback.speed_up(),
        KeyCode::Char('-') | KeyCode::Char('_') => app.playback.slow_down(),
        KeyCode::Char('r') => app.playback.reset(&mut app.timeline),

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::payload_io::parse_payload;
    use crate::model::ViewerConfig;
    use crate::timeline::Timeline;
    use crossterm::event::KeyModifiers;
    use serde_json::json;

    fn app() -> App {
        let text = json!({
            "buffer_items": [
                {"type": "event", "timestamp": 10},
                {"type": "event", "timestamp": 20},
                {"type": "event", "timestamp": 30}
            ]
        })
        .to_string();
        App::new(
            Timeline::new(parse_payload(&text).unwrap()),
            &ViewerConfig::default(),
        )
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_navigate(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn first_down_selects_the_first_entry() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        assert_eq!(app.timeline.selected_original(), Some(0));
        assert_eq!(app.timeline.cursor(), 0);

        press(&mut app, KeyCode::Down);
        assert_eq!(app.timeline.cursor(), 1);
    }

    #[test]
    fn first_up_selects_the_last_entry() {
        let mut app = app();
        press(&mut app, KeyCode::Up);
        assert_eq!(app.timeline.selected_original(), Some(2));
        assert_eq!(app.timeline.cursor(), 2);

        press(&mut app, KeyCode::Up);
        assert_eq!(app.timeline.cursor(), 1);
    }

    #[test]
    fn space_toggles_playback() {
        let mut app = app();
        press(&mut app, KeyCode::Char(' '));
        assert!(app.playback.is_playing());
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.playback.is_playing());
    }
}
