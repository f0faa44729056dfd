use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;

use ticklist::cli::commands::Cli;
use ticklist::cli::handlers;
use ticklist::io::config_io;
use ticklist::model::config::Config;
use ticklist::store::{BackgroundStore, TaskStore, TodoStore};
use ticklist::tui::theme::Theme;

fn main() {
    let cli = Cli::parse();

    let config = match config_io::load_config(&handlers::overrides(&cli)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        None => {
            // No subcommand → launch TUI; logs go to a file since the
            // terminal belongs to ratatui
            let _guard = init_file_logging(&config.log_level, config.log_file.as_deref());
            run_tui(&config, cli.remote)
        }
        Some(command) => {
            init_stderr_logging(&config.log_level);
            handlers::dispatch(command, cli.json, &config)
        }
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run_tui(config: &Config, remote: bool) -> Result<(), Box<dyn std::error::Error>> {
    let theme = Theme::from_colors(&config.ui_colors);
    let store: Box<dyn TodoStore> = if remote {
        Box::new(BackgroundStore::spawn(handlers::connect(config)?))
    } else {
        Box::new(TaskStore::new())
    };
    let label = if remote { config.api_url.as_str() } else { "local" };
    ticklist::tui::run(store, theme, label)
}

fn env_filter(level: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level))
}

fn init_stderr_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter(level))
        .with_target(false)
        .init();
}

fn init_file_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("ticklist.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = match log_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter(level))
        .with_ansi(false)
        .init();

    Some(guard)
}
