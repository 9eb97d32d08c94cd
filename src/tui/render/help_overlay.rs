use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::super::app::App;

const KEYS: &[(&str, &str)] = &[
    ("j / \u{2193}", "step forward"),
    ("k / \u{2191}", "step backward"),
    ("g / G", "jump to start / end"),
    ("enter", "select entry under cursor"),
    ("space", "play / pause"),
    ("+ / -", "playback speed"),
    ("r", "stop and rewind"),
    ("f", "filter panel"),
    ("?", "this help"),
    ("q", "quit"),
];

/// Render the help overlay (centered, on top of everything)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let height = (KEYS.len() + 4) as u16;
    let width = 44u16.min(area.width);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height: height.min(area.height),
    };

    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.selection_border))
        .title(Span::styled(
            " keys ",
            Style::default()
                .fg(app.theme.text_bright)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(app.theme.background));

    let mut lines = vec![Line::default()];
    for (key, action) in KEYS {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:<10}", key),
                Style::default().fg(app.theme.current_step),
            ),
            Span::styled(*action, Style::default().fg(app.theme.text)),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
