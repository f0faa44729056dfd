use std::thread;
use std::time::{Duration, Instant};

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::store::synced::tests::FakeBackend;
use crate::store::{BackgroundStore, SyncedStore, TaskStore};
use crate::tui::app::App;
use crate::tui::theme::Theme;

pub const TERM_W: u16 = 60;
pub const TERM_H: u16 = 16;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Render the whole screen at the default test size
pub fn render_app(app: &mut App) -> String {
    render_to_string(TERM_W, TERM_H, |frame, _area| super::render(frame, app))
}

/// App over a local store holding one task per entry
pub fn local_app(texts: &[&str]) -> App {
    let mut store = TaskStore::new();
    for text in texts {
        store.add(text);
    }
    App::new(Box::new(store), Theme::default(), "local")
}

/// App over a background store; the initial fetch is already in flight
pub fn remote_app(backend: FakeBackend) -> App {
    let store = BackgroundStore::spawn(SyncedStore::new(backend));
    App::new(Box::new(store), Theme::default(), "http://fake")
}

/// Poll until the worker has answered every request
pub fn settle(app: &mut App) {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        app.poll_remote();
        if app.store.pending() == 0 {
            return;
        }
        assert!(Instant::now() < deadline, "worker did not answer in time");
        thread::sleep(Duration::from_millis(2));
    }
}
