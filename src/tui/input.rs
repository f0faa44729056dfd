use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::filter::Filter;

use super::app::{App, Focus};
use super::text_input::TextInput;

/// Handle a key event. Overlays take precedence: alert, then prompt,
/// then whichever pane has focus.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.alert.is_some() {
        app.alert = None;
        return;
    }

    if app.prompt.is_some() {
        handle_prompt(app, key);
        return;
    }

    match app.focus {
        Focus::Form => handle_form(app, key),
        Focus::List => handle_list(app, key),
    }
}

/// Shared line-editing keys. Returns true if the key was consumed.
fn edit_line(input: &mut TextInput, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => input.insert(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.home(),
        KeyCode::End => input.end(),
        _ => return false,
    }
    true
}

fn handle_prompt(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.commit_prompt(),
        KeyCode::Esc => app.cancel_prompt(),
        _ => {
            edit_line(&mut app.prompt_input, key);
        }
    }
}

fn handle_form(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_form(),
        KeyCode::Esc | KeyCode::Tab | KeyCode::Down => app.focus = Focus::List,
        _ => {
            edit_line(&mut app.input, key);
        }
    }
}

fn handle_list(app: &mut App, key: KeyEvent) {
    // Keys that work regardless of the fetch state
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('a') | KeyCode::Char('i') | KeyCode::Tab => {
            app.focus = Focus::Form;
            return;
        }
        KeyCode::Char('1') => return app.set_filter(Filter::All),
        KeyCode::Char('2') => return app.set_filter(Filter::Active),
        KeyCode::Char('3') => return app.set_filter(Filter::Completed),
        KeyCode::Char('f') => {
            let next = app.store.filter().next();
            return app.set_filter(next);
        }
        KeyCode::Char('r') => {
            if app.store.fetch_state().is_some() {
                app.request_fetch();
            }
            return;
        }
        _ => {}
    }

    if app.list_blocked() {
        return;
    }

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') => app.move_cursor(-1),
        KeyCode::Up => {
            if app.cursor == 0 {
                app.focus = Focus::Form;
            } else {
                app.move_cursor(-1);
            }
        }
        KeyCode::Char('g') | KeyCode::Home => app.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => {
            app.cursor = app.visible().len().saturating_sub(1);
        }
        KeyCode::Char(' ') | KeyCode::Char('x') | KeyCode::Enter => app.toggle_selected(),
        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
        KeyCode::Char('p') => app.cycle_priority_selected(),
        KeyCode::Char('u') => app.begin_due_date(),
        KeyCode::Char('e') => app.begin_edit_text(),
        _ => {}
    }
}
