use std::time::Duration;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::api::{ApiError, HttpBackend, parse_due_date};
use crate::io::token;
use crate::model::config::{Config, ConfigOverrides};
use crate::model::task::TaskPatch;
use crate::ops::task_ops;
use crate::store::SyncedStore;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Command-line and environment values that feed the config layers
pub fn overrides(cli: &Cli) -> ConfigOverrides {
    ConfigOverrides {
        config_path: cli.config.clone(),
        api_url: cli.api_url.clone(),
        log_level: cli.log_level.clone(),
        token: cli.token.clone(),
    }
}

pub fn dispatch(command: Commands, json: bool, config: &Config) -> CmdResult {
    match command {
        Commands::List(args) => cmd_list(args, json, config),
        Commands::Add(args) => cmd_add(args, json, config),
        Commands::Toggle(args) => cmd_toggle(args, json, config),
        Commands::Delete(args) => cmd_delete(args, json, config),
        Commands::Update(args) => cmd_update(args, json, config),
        Commands::Login(args) => cmd_login(args, config),
        Commands::Logout => cmd_logout(config),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Synced store over HTTP, authenticated with the configured or stored token
pub fn connect(config: &Config) -> Result<SyncedStore<HttpBackend>, ApiError> {
    let token = match &config.token {
        Some(t) => t.clone(),
        None => token::read_token(config.token_file.as_deref()),
    };
    if token.is_empty() {
        tracing::debug!("no api token; requests are unauthenticated");
    }
    let backend = HttpBackend::new(
        &config.api_url,
        token,
        Duration::from_secs(config.timeout_secs),
    )?;
    Ok(SyncedStore::new(backend))
}

/// Connect and load the remote collection
fn load_store(config: &Config) -> Result<SyncedStore<HttpBackend>, Box<dyn std::error::Error>> {
    let mut store = connect(config)?;
    store.fetch_all()?;
    Ok(store)
}

fn not_found(id: &str) -> Box<dyn std::error::Error> {
    format!("not found: {}", id).into()
}

/// Build the patch for `update`, validating field values
fn build_patch(args: &UpdateArgs) -> Result<TaskPatch, String> {
    let text = match &args.text {
        Some(t) => match task_ops::normalize_text(t) {
            Some(t) => Some(t.to_string()),
            None => return Err("text cannot be blank".into()),
        },
        None => None,
    };
    let due_date = if args.clear_due {
        Some(None)
    } else if let Some(raw) = &args.due {
        match parse_due_date(raw) {
            Some(d) => Some(Some(d)),
            None => return Err(format!("invalid date '{}' (expected YYYY-MM-DD)", raw)),
        }
    } else {
        None
    };
    let patch = TaskPatch {
        text,
        completed: args.completed,
        priority: args.priority,
        due_date,
    };
    if patch.is_empty() {
        return Err(
            "nothing to update (pass --text, --completed, --priority, --due or --clear-due)".into(),
        );
    }
    Ok(patch)
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, json: bool, config: &Config) -> CmdResult {
    let store = load_store(config)?;
    let tasks = task_ops::filtered_view(store.tasks(), args.filter);
    print_tasks(&tasks, json)?;
    Ok(())
}

fn cmd_add(args: AddArgs, json: bool, config: &Config) -> CmdResult {
    let text = args.text.join(" ");
    let mut store = connect(config)?;
    match store.add(&text)? {
        Some(task) => print_task(&task, json)?,
        None => tracing::debug!("blank text, nothing added"),
    }
    Ok(())
}

fn cmd_toggle(args: IdArgs, json: bool, config: &Config) -> CmdResult {
    let mut store = load_store(config)?;
    if !store.toggle(&args.id)? {
        return Err(not_found(&args.id));
    }
    if let Some(task) = task_ops::find_task(store.tasks(), &args.id) {
        print_task(task, json)?;
    }
    Ok(())
}

fn cmd_delete(args: IdArgs, json: bool, config: &Config) -> CmdResult {
    let mut store = load_store(config)?;
    let Some(task) = task_ops::find_task(store.tasks(), &args.id).cloned() else {
        return Err(not_found(&args.id));
    };
    store.delete(&args.id)?;
    if json {
        print_task(&task, true)?;
    } else {
        println!("deleted {}", task.id);
    }
    Ok(())
}

fn cmd_update(args: UpdateArgs, json: bool, config: &Config) -> CmdResult {
    let patch = build_patch(&args)?;
    let mut store = load_store(config)?;
    if !store.update(&args.id, &patch)? {
        return Err(not_found(&args.id));
    }
    if let Some(task) = task_ops::find_task(store.tasks(), &args.id) {
        print_task(task, json)?;
    }
    Ok(())
}

fn cmd_login(args: LoginArgs, config: &Config) -> CmdResult {
    let value = args.token.trim();
    if value.is_empty() {
        return Err("token cannot be blank".into());
    }
    token::write_token(config.token_file.as_deref(), value)?;
    println!("token saved");
    Ok(())
}

fn cmd_logout(config: &Config) -> CmdResult {
    if token::clear_token(config.token_file.as_deref())? {
        println!("token removed");
    } else {
        println!("no stored token");
    }
    Ok(())
}
