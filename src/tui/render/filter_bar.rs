use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::filter::Filter;
use crate::tui::app::App;

/// Render the filter tabs with per-filter task counts
pub fn render_filter_bar(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let current = app.store.filter();
    let counts = app.store.counts();

    let mut spans: Vec<Span> = vec![Span::styled(" ", Style::default().bg(bg))];
    for (i, filter) in Filter::ALL.iter().copied().enumerate() {
        if i > 0 {
            spans.push(Span::styled("   ", Style::default().bg(bg)));
        }
        let label = format!("{} {} ({})", i + 1, filter.label(), counts.for_filter(filter));
        let style = if filter == current {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.dim).bg(bg)
        };
        spans.push(Span::styled(label, style));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::super::test_helpers::*;
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn counts_per_filter() {
        let mut app = local_app(&["a", "b", "c"]);
        let id = app.store.tasks()[0].id.clone();
        assert!(app.store.toggle(&id));
        let output = render_to_string(60, 1, |frame, area| render_filter_bar(frame, &app, area));
        assert_snapshot!(output.trim(), @"1 All (3)   2 Active (2)   3 Completed (1)");
    }

    #[test]
    fn selected_filter_is_highlighted() {
        let mut app = local_app(&["a"]);
        app.set_filter(Filter::Completed);
        let backend = ratatui::backend::TestBackend::new(60, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render_filter_bar(frame, &app, frame.area()))
            .unwrap();
        let buf = terminal.backend().buffer();
        // "1 All (1)   2 Active (1)   " is 27 cells after the leading space
        let cell = &buf[(28, 0)];
        assert_eq!(cell.symbol(), "3");
        assert_eq!(cell.bg, app.theme.selection_bg);
        assert_eq!(buf[(1, 0)].bg, app.theme.background);
    }
}
