use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_segmentation::UnicodeSegmentation;

use crate::tui::app::{App, Focus};
use crate::util::unicode::{display_width, truncate_to_width};

const PLACEHOLDER: &str = "What needs to be done?";

/// Render the add-task form: a bordered single-line input
pub fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let focused = app.focus == Focus::Form && app.prompt.is_none();
    let border_color = if focused {
        app.theme.highlight
    } else {
        app.theme.dim
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" New task ", Style::default().fg(border_color).bg(bg)))
        .border_style(Style::default().fg(border_color).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    let inner_w = inner.width as usize;

    let (text, cursor_col) = if app.input.is_empty() {
        (
            Span::styled(
                truncate_to_width(PLACEHOLDER, inner_w),
                Style::default().fg(app.theme.dim).bg(bg),
            ),
            0,
        )
    } else {
        let (shown, col) = scroll_to_cursor(app.input.value(), app.input.cursor_col(), inner_w);
        (
            Span::styled(shown, Style::default().fg(app.theme.text_bright).bg(bg)),
            col,
        )
    };

    frame.render_widget(Paragraph::new(Line::from(text)).block(block), area);

    if focused && app.alert.is_none() && inner.width > 0 {
        let col = (cursor_col as u16).min(inner.width - 1);
        frame.set_cursor_position((inner.x + col, inner.y));
    }
}

/// Slice of `value` that fits in `width` cells with the cursor visible.
/// Returns the text and the cursor column within it.
fn scroll_to_cursor(value: &str, cursor_col: usize, width: usize) -> (String, usize) {
    if width == 0 {
        return (String::new(), 0);
    }
    if cursor_col < width {
        return (truncate_to_width(value, width), cursor_col);
    }
    // Drop leading graphemes until the cursor lands on the last cell
    let skip = cursor_col + 1 - width;
    let mut skipped = 0;
    let mut start = value.len();
    for (i, g) in value.grapheme_indices(true) {
        if skipped >= skip {
            start = i;
            break;
        }
        skipped += display_width(g);
    }
    let tail = &value[start..];
    (truncate_to_width(tail, width), cursor_col - skipped)
}
