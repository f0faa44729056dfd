use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;
use crate::util::unicode::display_width;

/// Render the blocking error alert; any key dismisses it
pub fn render_alert(frame: &mut Frame, app: &App, area: Rect) {
    let Some(message) = app.alert.as_deref() else {
        return;
    };
    let popup_w: u16 = 48.min(area.width.saturating_sub(2));
    let inner_w = popup_w.saturating_sub(2) as usize;

    let bg = app.theme.background;
    let header_style = Style::default()
        .fg(app.theme.red)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);

    let mut styled_lines: Vec<(String, Style)> = vec![
        (" Error".into(), header_style),
        ("".into(), text_style),
    ];
    for s in wrap_text(" ", message, inner_w) {
        styled_lines.push((s, text_style));
    }
    styled_lines.push(("".into(), text_style));
    styled_lines.push((" Press any key to continue".into(), dim_style));

    // Height from content + 2 for borders
    let popup_h = ((styled_lines.len() as u16) + 2).min(area.height.saturating_sub(2));

    let overlay_area = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, overlay_area);

    let lines: Vec<Line> = styled_lines
        .into_iter()
        .map(|(text, style)| Line::from(Span::styled(text, style)))
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.red).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));

    frame.render_widget(paragraph, overlay_area);
}

/// Word-wrap `text` into lines of at most `max_width` cells, each prefixed
/// with `indent`. Words wider than a line are kept whole.
fn wrap_text(indent: &str, text: &str, max_width: usize) -> Vec<String> {
    let indent_w = display_width(indent);
    let mut lines = Vec::new();
    let mut current = indent.to_string();
    let mut current_w = indent_w;

    for word in text.split_whitespace() {
        let word_w = display_width(word);
        if current_w > indent_w && current_w + 1 + word_w > max_width {
            lines.push(std::mem::replace(&mut current, indent.to_string()));
            current_w = indent_w;
        }
        if current_w > indent_w {
            current.push(' ');
            current_w += 1;
        }
        current.push_str(word);
        current_w += word_w;
    }
    if current_w > indent_w || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}
