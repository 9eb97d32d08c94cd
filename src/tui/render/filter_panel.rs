use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::super::app::{App, FilterRow};

/// Render the filter panel (replaces the detail pane while in filter mode)
pub fn render_filter_panel(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let theme = app.theme.clone();

    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(theme.selection_border).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = app.filter_rows();
    let visible_height = inner.height as usize;

    // Keep the cursor in view
    if app.filter_cursor < app.filter_scroll {
        app.filter_scroll = app.filter_cursor;
    } else if visible_height > 0 && app.filter_cursor >= app.filter_scroll + visible_height {
        app.filter_scroll = app.filter_cursor + 1 - visible_height;
    }

    let mut lines = Vec::with_capacity(visible_height);
    for (i, row) in rows
        .iter()
        .enumerate()
        .skip(app.filter_scroll)
        .take(visible_height)
    {
        let is_cursor = i == app.filter_cursor;
        let row_bg = if is_cursor { theme.selection_bg } else { bg };

        let line = match row {
            FilterRow::Kind(kind) => {
                let active = app.timeline.filter().active_kinds.contains(kind);
                checkbox_line(&theme, row_bg, 1, active, kind.label(), is_cursor)
            }
            FilterRow::TagKey(key) => Line::from(Span::styled(
                format!(" {}:", key),
                Style::default()
                    .fg(theme.text_bright)
                    .bg(row_bg)
                    .add_modifier(Modifier::BOLD),
            )),
            FilterRow::TagValue { key, value } => {
                let active = app.timeline.filter().is_tag_value_active(key, value);
                checkbox_line(&theme, row_bg, 3, active, value, is_cursor)
            }
        };
        lines.push(line);
    }

    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(bg)),
        inner,
    );
}

fn checkbox_line<'a>(
    theme: &super::super::theme::Theme,
    bg: ratatui::style::Color,
    indent: usize,
    active: bool,
    label: &str,
    is_cursor: bool,
) -> Line<'a> {
    let mark = if active { "[x]" } else { "[ ]" };
    let fg = if is_cursor {
        theme.text_bright
    } else if active {
        theme.text
    } else {
        theme.dim
    };
    Line::from(Span::styled(
        format!("{}{} {}", " ".repeat(indent), mark, label),
        Style::default().fg(fg).bg(bg),
    ))
}
