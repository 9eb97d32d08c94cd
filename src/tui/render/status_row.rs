use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::super::app::{App, Mode};

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let len = app.timeline.display().len();
    let position = if len == 0 {
        "-/-".to_string()
    } else {
        format!("{}/{}", app.timeline.cursor() + 1, len)
    };
    let play = if app.playback.is_playing() {
        format!("\u{25B6} {}x", app.playback.speed())
    } else {
        format!("\u{2016} {}x", app.playback.speed())
    };

    let mut spans = vec![
        Span::styled(
            format!(" {} ", position),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ),
        Span::styled(
            play,
            Style::default().fg(app.theme.current_step).bg(bg),
        ),
    ];

    let hint = match app.mode {
        Mode::Navigate => "j/k step  g/G ends  space play  +/- speed  r reset  f filter  ? help  q quit",
        Mode::Filter => "j/k move  space toggle  esc done",
    };
    let content_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let hint_width = hint.chars().count();
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(
            hint,
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
