use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Contents of config.toml. Every field is optional so a file can override
/// any subset of the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub api: ApiSection,
    pub log: LogSection,
    pub ui: UiSection,
}

/// `[api]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    /// Where the bearer token is stored (default: next to config.toml)
    pub token_file: Option<PathBuf>,
}

/// `[log]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Filter directive (trace, debug, info, warn, error)
    pub level: Option<String>,
    /// TUI log file (default: ticklist.log in the temp dir)
    pub file: Option<PathBuf>,
}

/// `[ui]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// Hex color overrides keyed by theme slot (e.g. `high = "#FF4444"`)
    pub colors: HashMap<String, String>,
}

/// Values given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub api_url: Option<String>,
    pub log_level: Option<String>,
    pub token: Option<String>,
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub timeout_secs: u64,
    pub token_file: Option<PathBuf>,
    /// Token given directly (flag or TICK_TOKEN); wins over the token file
    pub token: Option<String>,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub ui_colors: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            token_file: None,
            token: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_file: None,
            ui_colors: HashMap::new(),
        }
    }
}
