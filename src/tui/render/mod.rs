pub mod detail_view;
pub mod filter_panel;
pub mod help_overlay;
pub mod status_row;
pub mod timeline_view;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use super::app::{App, Mode};

/// Main render function — dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header (1 row) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, app, chunks[0]);

    // Content: timeline on the left, detail or filter panel on the right
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(chunks[1]);

    timeline_view::render_timeline(frame, app, columns[0]);
    match app.mode {
        Mode::Filter => filter_panel::render_filter_panel(frame, app, columns[1]),
        Mode::Navigate => detail_view::render_detail(frame, app, columns[1]),
    }

    status_row::render_status_row(frame, app, chunks[2]);

    if app.show_help {
        help_overlay::render_help_overlay(frame, app, area);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let total = app.timeline.buffer().len();
    let shown = app.timeline.display().len();
    let expanded = app.timeline.expanded().len();

    let mut spans = vec![
        Span::styled(
            " traceline ",
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{} items  ", total),
            Style::default().fg(app.theme.text).bg(bg),
        ),
        Span::styled(
            format!("{}/{} entries shown", shown, expanded),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
    ];
    if app.timeline.filter().is_constrained() {
        spans.push(Span::styled(
            "  [filtered]",
            Style::default().fg(app.theme.matched).bg(bg),
        ));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        area,
    );
}
