pub mod alert;
pub mod filter_bar;
pub mod form;
pub mod status_row;
pub mod task_list;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use super::app::App;

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: title | form | filter bar | list | status row
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(3), // add form
            Constraint::Length(1), // filter bar
            Constraint::Min(1),    // task list
            Constraint::Length(1), // status row
        ])
        .split(area);

    render_title(frame, app, chunks[0]);
    form::render_form(frame, app, chunks[1]);
    filter_bar::render_filter_bar(frame, app, chunks[2]);
    task_list::render_task_list(frame, app, chunks[3]);
    status_row::render_status_row(frame, app, chunks[4]);

    // Alert (rendered on top of everything)
    if app.alert.is_some() {
        alert::render_alert(frame, app, area);
    }
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let mut spans = vec![
        Span::styled(
            " ticklist",
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", app.source_label),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
    ];
    if app.store.pending() > 0 {
        spans.push(Span::styled(
            "  syncing\u{2026}",
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
    }
    let line = Line::from(spans);
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}

#[cfg(test)]
mod tests {
    use super::test_helpers::*;
    use super::*;
    use crate::store::synced::tests::{FakeBackend, remote};

    #[test]
    fn full_screen_local() {
        let mut app = local_app(&["Buy milk", "Walk dog"]);
        let output = render_app(&mut app);
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].contains("ticklist  local"));
        assert!(output.contains("New task"));
        assert!(output.contains("All (2)"));
        assert!(output.contains("Buy milk"));
        assert!(output.contains("Walk dog"));
    }

    #[test]
    fn title_shows_syncing_while_requests_are_pending() {
        let (release, gate) = std::sync::mpsc::channel();
        let mut backend = FakeBackend::with_records(vec![remote("1", "Buy milk")]);
        backend.gate = Some(gate);
        let mut app = remote_app(backend);
        settle(&mut app);
        assert!(!render_app(&mut app).lines().next().unwrap().contains("syncing"));

        app.focus = crate::tui::app::Focus::List;
        app.toggle_selected();
        assert!(render_app(&mut app).lines().next().unwrap().contains("syncing"));

        release.send(()).unwrap();
        settle(&mut app);
        let output = render_app(&mut app);
        assert!(!output.lines().next().unwrap().contains("syncing"));
        assert!(output.contains("[x] Buy milk"));
    }

    #[test]
    fn alert_overlays_screen() {
        let mut app = local_app(&["Buy milk"]);
        app.alert = Some("could not add todo: server returned 500".into());
        let output = render_app(&mut app);
        assert!(output.contains("Error"));
        assert!(output.contains("server returned 500"));
        assert!(output.contains("Press any key"));
    }
}
