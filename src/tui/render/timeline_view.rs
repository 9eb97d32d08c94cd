use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::ItemKind;
use crate::model::timestamp::format_clock_time;
use crate::timeline::{DisplayKind, entry_summary};
use crate::util::unicode::{display_width, sanitize_snippet, truncate_to_width};

use super::super::app::App;

/// Render the timeline rows
pub fn render_timeline(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let visible_height = area.height as usize;
    let len = app.timeline.display().len();

    if len == 0 {
        let msg = if app.timeline.filter().is_constrained() {
            " no entries match the current filter "
        } else {
            " empty buffer "
        };
        let empty = Paragraph::new(msg).style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    // Keep the playback cursor in view
    let cursor = app.timeline.cursor().min(len - 1);
    if cursor < app.timeline_scroll {
        app.timeline_scroll = cursor;
    } else if visible_height > 0 && cursor >= app.timeline_scroll + visible_height {
        app.timeline_scroll = cursor + 1 - visible_height;
    }

    let matched = app.timeline.matched_display_positions();
    let selected_query_pos = selected_query_position(app);
    let focus_active = app.query_focus && selected_query_pos.is_some();
    let has_selection = app.timeline.selected_original().is_some();

    let mut lines = Vec::with_capacity(visible_height);
    for pos in app.timeline_scroll..len.min(app.timeline_scroll + visible_height) {
        let Some((entry, source)) = app.timeline.item_at_display(pos) else {
            continue;
        };
        let is_cursor_row = has_selection && pos == cursor;
        let is_matched = matched.contains(&pos);

        let complete = entry.kind != DisplayKind::PromptRequest || source.is_complete();
        let mut fg = app.theme.kind_color(entry.kind, complete);
        if focus_active && !is_matched && selected_query_pos != Some(pos) {
            fg = app.theme.greyed;
        }
        if is_matched {
            fg = app.theme.matched;
        }
        if is_cursor_row {
            fg = app.theme.current_step;
        } else if has_selection && pos > cursor && !is_matched && !focus_active {
            // Rows the playback has not reached yet
            fg = app.theme.future;
        }

        let marker = if is_cursor_row { "\u{25B6} " } else { "  " };
        let indent = if entry.kind == DisplayKind::PromptCompletion {
            "  "
        } else {
            ""
        };
        let clock = format_clock_time(entry.timestamp_ms);
        let label = entry.kind.label(source);

        let row_style = if is_cursor_row {
            Style::default().fg(fg).bg(app.theme.selection_bg)
        } else {
            Style::default().fg(fg).bg(bg)
        };

        let prefix_width = 2 + clock.len() + 2 + 18 + indent.len();
        let budget = (area.width as usize).saturating_sub(prefix_width + 1);
        let summary = truncate_to_width(&sanitize_snippet(&entry_summary(entry, source)), budget);

        let mut spans = vec![
            Span::styled(marker, row_style),
            Span::styled(
                clock,
                if is_cursor_row {
                    row_style
                } else {
                    Style::default().fg(app.theme.dim).bg(bg)
                },
            ),
            Span::styled("  ", row_style),
            Span::styled(format!("{:<18}", label), row_style.add_modifier(Modifier::BOLD)),
            Span::styled(format!("{}{}", indent, summary), row_style),
        ];

        // Pad the row so the cursor background spans the full width
        if is_cursor_row {
            let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
            if used < area.width as usize {
                spans.push(Span::styled(
                    " ".repeat(area.width as usize - used),
                    row_style,
                ));
            }
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(bg)),
        area,
    );
}

/// Display position of the selected item when it is a query
fn selected_query_position(app: &App) -> Option<usize> {
    let original = app.timeline.selected_original()?;
    let item = app.timeline.buffer().get(original)?;
    if item.kind != ItemKind::Query {
        return None;
    }
    app.timeline.display().position_of_original(original)
}
