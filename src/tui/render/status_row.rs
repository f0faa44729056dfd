use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Focus};
use crate::util::unicode::{display_width, truncate_to_width};

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let line = if let Some(prompt) = &app.prompt {
        // Inline prompt: label, value, then the message (if any) on the right
        let label = prompt.label();
        let mut spans = vec![
            Span::styled(label, Style::default().fg(app.theme.highlight).bg(bg)),
            Span::styled(
                app.prompt_input.value().to_string(),
                Style::default().fg(app.theme.text_bright).bg(bg),
            ),
        ];
        if let Some(msg) = &app.status {
            let content_width = display_width(label) + display_width(app.prompt_input.value());
            let msg_width = display_width(msg);
            if content_width + msg_width + 1 < width {
                let padding = width - content_width - msg_width;
                spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
                spans.push(Span::styled(
                    msg.clone(),
                    Style::default().fg(app.theme.red).bg(bg),
                ));
            }
        }
        if app.alert.is_none() {
            let col = display_width(label) + app.prompt_input.cursor_col();
            let col = (col as u16).min(area.width.saturating_sub(1));
            frame.set_cursor_position((area.x + col, area.y));
        }
        Line::from(spans)
    } else if let Some(msg) = &app.status {
        Line::from(Span::styled(
            truncate_to_width(msg, width),
            Style::default().fg(app.theme.text).bg(bg),
        ))
    } else {
        Line::from(Span::styled(
            truncate_to_width(key_hints(app), width),
            Style::default().fg(app.theme.dim).bg(bg),
        ))
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn key_hints(app: &App) -> &'static str {
    let remote = app.store.fetch_state().is_some();
    match (app.focus, remote) {
        (Focus::Form, _) => " Enter add  Tab list  Ctrl-C quit",
        (Focus::List, false) => {
            " space toggle  d delete  p priority  u due  e edit  f filter  a add  q quit"
        }
        (Focus::List, true) => {
            " space toggle  d delete  p priority  u due  e edit  f filter  a add  r reload  q quit"
        }
    }
}
