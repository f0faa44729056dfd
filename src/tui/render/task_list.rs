use chrono::Local;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::filter::Filter;
use crate::model::task::Task;
use crate::store::FetchState;
use crate::tui::app::{App, Focus};
use crate::util::unicode::{display_width, fit_to_width};

/// Render the task list, or the loading / error / empty panel in its place
pub fn render_task_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;

    match app.store.fetch_state() {
        Some(FetchState::Loading) => {
            let loading = Paragraph::new(" Loading todos\u{2026}")
                .style(Style::default().fg(app.theme.dim).bg(bg));
            frame.render_widget(loading, area);
            return;
        }
        Some(FetchState::Error(msg)) => {
            let lines = vec![
                Line::from(Span::styled(
                    format!(" {}", msg),
                    Style::default().fg(app.theme.red).bg(bg),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    " Press r to retry",
                    Style::default().fg(app.theme.dim).bg(bg),
                )),
            ];
            frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
            return;
        }
        _ => {}
    }

    let tasks = app.visible();
    if tasks.is_empty() {
        let msg = match app.store.filter() {
            Filter::All => " No tasks yet".to_string(),
            filter => format!(" No {} tasks", filter.as_str()),
        };
        let empty = Paragraph::new(msg).style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    // Keep the cursor inside the window
    let visible_height = area.height as usize;
    app.clamp_cursor();
    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    } else if visible_height > 0 && app.cursor >= app.scroll_offset + visible_height {
        app.scroll_offset = app.cursor + 1 - visible_height;
    }

    let end = tasks.len().min(app.scroll_offset + visible_height);
    let width = area.width as usize;
    let lines: Vec<Line> = tasks[app.scroll_offset..end]
        .iter()
        .zip(app.scroll_offset..end)
        .map(|(task, row)| render_task_line(app, task, row == app.cursor, width))
        .collect();

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn render_task_line<'a>(app: &App, task: &Task, is_cursor: bool, width: usize) -> Line<'a> {
    let theme = &app.theme;
    let row_bg = if is_cursor && app.focus == Focus::List {
        theme.selection_bg
    } else {
        theme.background
    };
    let base = Style::default().bg(row_bg);

    let mut spans: Vec<Span> = Vec::new();

    // Column 0: cursor accent
    if is_cursor {
        spans.push(Span::styled("\u{258E}", base.fg(theme.highlight)));
    } else {
        spans.push(Span::styled(" ", base));
    }

    let checkbox = if task.completed { "[x] " } else { "[ ] " };
    spans.push(Span::styled(
        checkbox,
        base.fg(if task.completed { theme.dim } else { theme.text }),
    ));

    // Right-hand metadata: due date then priority
    let mut meta: Vec<Span> = Vec::new();
    if let Some(due) = task.due_date {
        let overdue = !task.completed && due < Local::now().date_naive();
        let color = if overdue { theme.red } else { theme.dim };
        meta.push(Span::styled(format!("due {}", due.format("%Y-%m-%d")), base.fg(color)));
        meta.push(Span::styled("  ", base));
    }
    meta.push(Span::styled(
        format!("{:<6}", task.priority.as_str()),
        base.fg(theme.priority_color(task.priority)),
    ));
    let meta_w: usize = meta.iter().map(|s| display_width(&s.content)).sum();

    let text_w = width.saturating_sub(1 + checkbox.len() + meta_w + 2);
    let text_style = if task.completed {
        base.fg(theme.dim).add_modifier(Modifier::CROSSED_OUT)
    } else if is_cursor {
        base.fg(theme.text_bright)
    } else {
        base.fg(theme.text)
    };
    spans.push(Span::styled(fit_to_width(&task.text, text_w), text_style));
    spans.push(Span::styled("  ", base));
    spans.extend(meta);

    Line::from(spans)
}
