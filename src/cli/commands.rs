use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::model::filter::Filter;
use crate::model::task::Priority;

#[derive(Parser)]
#[command(name = "tick", about = concat!("[x] ticklist v", env!("CARGO_PKG_VERSION"), " - a todo list for the terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Open the TUI against the remote API instead of a local list
    #[arg(long)]
    pub remote: bool,

    /// Base URL of the todo API
    #[arg(long, global = true, env = "TICK_API_URL")]
    pub api_url: Option<String>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level or filter directive (e.g. debug, ticklist=trace)
    #[arg(long, global = true, env = "TICK_LOG")]
    pub log_level: Option<String>,

    /// Bearer token; overrides the stored token
    #[arg(long, global = true, env = "TICK_TOKEN", hide_env_values = true, hide = true)]
    pub token: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List todos
    List(ListArgs),
    /// Add a todo
    Add(AddArgs),
    /// Toggle a todo between open and completed
    Toggle(IdArgs),
    /// Delete a todo
    Delete(IdArgs),
    /// Change fields of a todo
    Update(UpdateArgs),
    /// Store the API token
    Login(LoginArgs),
    /// Remove the stored API token
    Logout,
}

#[derive(Args)]
pub struct ListArgs {
    /// Which todos to show (all, active, completed)
    #[arg(long, short, default_value = "all")]
    pub filter: Filter,
}

#[derive(Args)]
pub struct AddArgs {
    /// Todo text (multiple words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct IdArgs {
    /// Todo ID
    pub id: String,
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Todo ID
    pub id: String,
    /// New text
    #[arg(long)]
    pub text: Option<String>,
    /// Completion flag (true or false)
    #[arg(long)]
    pub completed: Option<bool>,
    /// Priority (low, medium, high)
    #[arg(long)]
    pub priority: Option<Priority>,
    /// Due date (YYYY-MM-DD)
    #[arg(long, conflicts_with = "clear_due")]
    pub due: Option<String>,
    /// Remove the due date
    #[arg(long)]
    pub clear_due: bool,
}

#[derive(Args)]
pub struct LoginArgs {
    /// Bearer token issued by the API
    pub token: String,
}
