use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::model::timestamp::{format_clock_time, format_full_time};
use crate::model::{ItemKind, RawItem};

use super::super::app::App;
use super::super::theme::Theme;

/// Render the detail pane for the selected item
pub fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let theme = &app.theme;

    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(item) = app.timeline.selected_item() else {
        let hint = Paragraph::new(" select an entry to view details")
            .style(Style::default().fg(theme.dim).bg(bg));
        frame.render_widget(hint, inner);
        return;
    };

    let mut lines: Vec<Line> = Vec::new();
    let label = Span::styled(
        format!(" {} ", item.kind.label().to_uppercase()),
        Style::default()
            .fg(theme.text_bright)
            .bg(theme.selection_bg)
            .add_modifier(Modifier::BOLD),
    );
    let mut header = vec![label];
    if !app.timeline.is_selection_visible() {
        header.push(Span::styled(
            "  (hidden by filter)",
            Style::default().fg(theme.matched).bg(bg),
        ));
    }
    lines.push(Line::from(header));
    lines.push(line_kv(theme, "time", &format_full_time(item.timestamp_ms)));

    // Tags
    if item.tags.is_empty() {
        lines.push(line_dim(theme, "no tags"));
    } else {
        for (key, value) in &item.tags {
            lines.push(line_kv(theme, key, &value.display()));
        }
    }
    lines.push(Line::default());

    match item.kind {
        ItemKind::Event => render_event(theme, item, &mut lines),
        ItemKind::Query => render_query(app, item, &mut lines),
        ItemKind::Prompt => render_prompt(theme, item, &mut lines),
        ItemKind::Other(_) => render_other(theme, item, &mut lines),
    }

    frame.render_widget(
        Paragraph::new(lines)
            .style(Style::default().bg(bg))
            .wrap(Wrap { trim: false }),
        inner,
    );
}

fn line_kv<'a>(theme: &Theme, key: &str, value: &str) -> Line<'a> {
    Line::from(vec![
        Span::styled(
            format!(" {}: ", key),
            Style::default().fg(theme.dim).bg(theme.background),
        ),
        Span::styled(
            value.to_string(),
            Style::default().fg(theme.text).bg(theme.background),
        ),
    ])
}

fn line_dim<'a>(theme: &Theme, text: &str) -> Line<'a> {
    Line::from(Span::styled(
        format!(" {}", text),
        Style::default().fg(theme.dim).bg(theme.background),
    ))
}

fn line_section<'a>(theme: &Theme, title: &str) -> Line<'a> {
    Line::from(Span::styled(
        format!(" {}", title),
        Style::default()
            .fg(theme.text_bright)
            .bg(theme.background)
            .add_modifier(Modifier::BOLD),
    ))
}

fn line_text<'a>(theme: &Theme, text: &str) -> Line<'a> {
    Line::from(Span::styled(
        format!(" {}", text),
        Style::default().fg(theme.text).bg(theme.background),
    ))
}

fn render_event(theme: &Theme, item: &RawItem, lines: &mut Vec<Line>) {
    lines.push(line_section(theme, "event details"));
    lines.push(line_kv(theme, "event type", item.event_kind().unwrap_or("unknown")));
    if let Some(message) = item.message() {
        lines.push(line_kv(theme, "message", message));
    }
    if let Some(metadata) = item.metadata()
        && !metadata.is_empty()
    {
        lines.push(Line::default());
        lines.push(line_section(theme, "metadata"));
        for (key, value) in metadata {
            lines.push(line_kv(theme, key, &compact_value(value)));
        }
    }
}

fn render_query(app: &App, item: &RawItem, lines: &mut Vec<Line>) {
    let theme = &app.theme;
    lines.push(line_section(theme, "query details"));
    lines.push(line_kv(theme, "operation", item.op_name().unwrap_or("unknown operation")));

    if let Some(parameters) = item.parameters()
        && !parameters.is_empty()
    {
        lines.push(Line::default());
        lines.push(line_section(theme, "parameters"));
        for (key, value) in parameters {
            lines.push(line_kv(theme, key, &compact_value(value)));
        }
    }

    let matched = app.timeline.selection().matched_originals();
    if !matched.is_empty() {
        lines.push(Line::default());
        lines.push(line_section(
            theme,
            &format!("matched items ({})", matched.len()),
        ));
        for &original in matched {
            let Some(matched_item) = app.timeline.buffer().get(original) else {
                continue;
            };
            lines.push(Line::from(vec![
                Span::styled(
                    format!(" #{} ", original),
                    Style::default().fg(theme.matched).bg(theme.background),
                ),
                Span::styled(
                    format!(
                        "{} {}  ",
                        matched_item.kind.label(),
                        format_clock_time(matched_item.timestamp_ms)
                    ),
                    Style::default().fg(theme.dim).bg(theme.background),
                ),
                Span::styled(
                    matched_item.summary(),
                    Style::default().fg(theme.text).bg(theme.background),
                ),
            ]));
        }
    }
}

fn render_prompt(theme: &Theme, item: &RawItem, lines: &mut Vec<Line>) {
    lines.push(line_section(theme, "prompt details"));
    let (status, color) = if item.is_complete() {
        ("complete", theme.event)
    } else {
        ("incomplete", theme.prompt_request_incomplete)
    };
    lines.push(Line::from(vec![
        Span::styled(
            " status: ",
            Style::default().fg(theme.dim).bg(theme.background),
        ),
        Span::styled(status, Style::default().fg(color).bg(theme.background)),
    ]));
    lines.push(Line::default());
    lines.push(line_section(theme, "prompt"));
    lines.push(line_text(theme, item.prompt_text().unwrap_or("(none)")));
    if let Some(completion) = item.completion_text() {
        lines.push(Line::default());
        lines.push(line_section(theme, "completion"));
        lines.push(line_text(theme, completion));
    }
}

fn render_other(theme: &Theme, item: &RawItem, lines: &mut Vec<Line>) {
    lines.push(line_section(theme, "raw data"));
    lines.push(line_text(theme, &compact_value(&item.data)));
}

/// Compact one-line rendering of a JSON value for key/value rows
fn compact_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
