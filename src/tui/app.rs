use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::api::parse_due_date;
use crate::model::filter::Filter;
use crate::model::task::{Task, TaskPatch};
use crate::store::{FetchState, SyncError, TodoStore};

use super::input;
use super::render;
use super::text_input::TextInput;
use super::theme::Theme;

/// Which part of the screen receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Form,
    List,
}

/// Inline prompt shown in the status row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    EditText { id: String },
    DueDate { id: String },
}

impl Prompt {
    pub fn label(&self) -> &'static str {
        match self {
            Prompt::EditText { .. } => "Text: ",
            Prompt::DueDate { .. } => "Due (YYYY-MM-DD, empty clears): ",
        }
    }
}

/// Main application state
pub struct App {
    pub store: Box<dyn TodoStore>,
    pub theme: Theme,
    /// Shown in the title bar ("local" or the API url)
    pub source_label: String,
    pub focus: Focus,
    /// Add-task form contents
    pub input: TextInput,
    pub prompt: Option<Prompt>,
    pub prompt_input: TextInput,
    /// Cursor index into the visible (filtered) list
    pub cursor: usize,
    pub scroll_offset: usize,
    /// Blocking error notification; any key dismisses it
    pub alert: Option<String>,
    /// Transient message in the status row
    pub status: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(store: Box<dyn TodoStore>, theme: Theme, source_label: impl Into<String>) -> Self {
        let mut app = App {
            store,
            theme,
            source_label: source_label.into(),
            focus: Focus::Form,
            input: TextInput::default(),
            prompt: None,
            prompt_input: TextInput::default(),
            cursor: 0,
            scroll_offset: 0,
            alert: None,
            status: None,
            should_quit: false,
        };
        if app.store.fetch_state().is_some() {
            app.request_fetch();
        }
        app
    }

    /// Tasks under the current filter
    pub fn visible(&self) -> Vec<Task> {
        self.store.visible()
    }

    pub fn selected(&self) -> Option<Task> {
        self.visible().into_iter().nth(self.cursor)
    }

    /// True while the list area shows the loading or fetch-error panel
    pub fn list_blocked(&self) -> bool {
        matches!(
            self.store.fetch_state(),
            Some(FetchState::Loading | FetchState::Error(_))
        )
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.visible().len();
        if len == 0 {
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(len - 1);
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.store.set_filter(filter);
        self.cursor = 0;
        self.scroll_offset = 0;
    }

    // --- Remote state ---

    /// Start a (re)load. The list shows the loading panel until it lands.
    pub fn request_fetch(&mut self) {
        self.store.fetch_all();
    }

    /// Apply whatever the server has answered since the last call. A fetch
    /// failure stays in the store's fetch state, which the list area
    /// renders with a retry hint; failed mutations raise the alert.
    pub fn poll_remote(&mut self) {
        for err in self.store.poll() {
            self.report(err);
        }
        self.clamp_cursor();
    }

    // --- Task operations ---

    fn report(&mut self, err: SyncError) {
        tracing::warn!(error = %err, "operation failed");
        self.alert = Some(err.to_string());
    }

    /// Submit the add form. Blank input is ignored and left in place.
    pub fn submit_form(&mut self) {
        if self.store.add(self.input.value()) {
            tracing::debug!("submitted task");
            self.input.clear();
            self.status = None;
        }
    }

    pub fn toggle_selected(&mut self) {
        let Some(task) = self.selected() else { return };
        self.store.toggle(&task.id);
        self.clamp_cursor();
    }

    pub fn delete_selected(&mut self) {
        let Some(task) = self.selected() else { return };
        self.store.delete(&task.id);
        self.clamp_cursor();
    }

    pub fn cycle_priority_selected(&mut self) {
        let Some(task) = self.selected() else { return };
        self.store.update(&task.id, &TaskPatch::priority(task.priority.cycle()));
    }

    pub fn begin_edit_text(&mut self) {
        let Some(task) = self.selected() else { return };
        self.prompt_input = TextInput::with_value(task.text);
        self.prompt = Some(Prompt::EditText { id: task.id });
    }

    pub fn begin_due_date(&mut self) {
        let Some(task) = self.selected() else { return };
        let current = task
            .due_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        self.prompt_input = TextInput::with_value(current);
        self.prompt = Some(Prompt::DueDate { id: task.id });
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
        self.prompt_input.clear();
    }

    /// Apply the prompt's value. An unparseable date keeps the prompt open.
    pub fn commit_prompt(&mut self) {
        let Some(prompt) = self.prompt.clone() else { return };
        let value = self.prompt_input.value().trim().to_string();
        let (id, patch) = match prompt {
            Prompt::EditText { id } => (id, TaskPatch::text(value)),
            Prompt::DueDate { id } => {
                let date = if value.is_empty() {
                    None
                } else {
                    match parse_due_date(&value) {
                        Some(d) => Some(d),
                        None => {
                            self.status = Some(format!("invalid date '{}', use YYYY-MM-DD", value));
                            return;
                        }
                    }
                };
                (id, TaskPatch::due_date(date))
            }
        };
        self.cancel_prompt();
        self.status = None;
        self.store.update(&id, &patch);
    }
}

/// Run the TUI over `store` until the user quits
pub fn run(
    store: Box<dyn TodoStore>,
    theme: Theme,
    source_label: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(store, theme, source_label);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal if we panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    tracing::info!(source = source_label, "tui started");
    let result = run_event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    tracing::info!("tui exited");

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.poll_remote();
        terminal.draw(|frame| render::render(frame, app))?;

        // Short timeout so server replies show up without a keypress
        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
