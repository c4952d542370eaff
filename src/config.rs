//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::view::SidebarEntry;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub shell: ShellConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Navigation shell configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ShellConfig {
    /// Backend origin the native host fetches panels from
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Panel restored when nothing was persisted; runs the dashboard initializer
    #[serde(default = "default_home_url")]
    pub home_url: String,

    /// Panel that runs the debtor chart initializer
    #[serde(default = "default_debtors_url")]
    pub debtors_url: String,

    /// JSON endpoint behind the dashboard
    #[serde(default = "default_details_url")]
    pub details_url: String,

    /// Element holding the embedded client records
    #[serde(default = "default_client_data_id")]
    pub client_data_id: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Sidebar links, in display order
    #[serde(default = "default_sidebar")]
    pub sidebar: Vec<SidebarLink>,
}

/// A configured sidebar link
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SidebarLink {
    pub label: String,
    pub url: String,
}

impl From<&SidebarLink> for SidebarEntry {
    fn from(link: &SidebarLink) -> Self {
        SidebarEntry::new(link.url.clone(), link.label.clone())
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_home_url() -> String {
    crate::model::DEFAULT_HOME_URL.to_string()
}

fn default_debtors_url() -> String {
    "/debtors".to_string()
}

fn default_details_url() -> String {
    "/home/details".to_string()
}

fn default_client_data_id() -> String {
    "client-data".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_sidebar() -> Vec<SidebarLink> {
    [
        ("Dashboard", "/home"),
        ("Approved Orders", "/approved_orders"),
        ("Debtors", "/debtors"),
        ("Payments", "/payments"),
        ("Clients", "/client_list_partial"),
        ("BDC", "/bdc"),
        ("Register Client", "/admin/register_client"),
        ("Settings", "/admin/settings"),
    ]
    .into_iter()
    .map(|(label, url)| SidebarLink {
        label: label.to_string(),
        url: url.to_string(),
    })
    .collect()
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            home_url: default_home_url(),
            debtors_url: default_debtors_url(),
            details_url: default_details_url(),
            client_data_id: default_client_data_id(),
            request_timeout_secs: default_request_timeout(),
            sidebar: default_sidebar(),
        }
    }
}

impl ShellConfig {
    /// Sidebar links as view entries
    pub fn sidebar_entries(&self) -> Vec<SidebarEntry> {
        self.sidebar.iter().map(SidebarEntry::from).collect()
    }
}

/// Navigation state persistence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding the persisted navigation keys
    #[serde(default = "default_state_file")]
    pub state_file: String,
}

fn default_state_file() -> String {
    dirs::data_local_dir()
        .map(|p| {
            p.join("admin-shell")
                .join("state.json")
                .to_string_lossy()
                .to_string()
        })
        .unwrap_or_else(|| "./admin_shell_state.json".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
        }
    }
}

impl StorageConfig {
    /// State file path with a leading `~/` expanded
    pub fn state_path(&self) -> PathBuf {
        match (self.state_file.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(&self.state_file),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("admin-shell").join("config.toml")),
            Some(PathBuf::from("./admin-shell.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(base_url) = var("ADMIN_SHELL_BASE_URL") {
            self.shell.base_url = base_url;
        }
        if let Some(home_url) = var("ADMIN_SHELL_HOME_URL") {
            self.shell.home_url = home_url;
        }
        if let Some(timeout) = var("ADMIN_SHELL_REQUEST_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.shell.request_timeout_secs = t;
            }
        }

        if let Some(state_file) = var("ADMIN_SHELL_STATE_FILE") {
            self.storage.state_file = state_file;
        }

        if let Some(level) = var("ADMIN_SHELL_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("ADMIN_SHELL_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Admin Shell Configuration
#
# Environment variables override these settings:
# - ADMIN_SHELL_BASE_URL
# - ADMIN_SHELL_HOME_URL
# - ADMIN_SHELL_REQUEST_TIMEOUT
# - ADMIN_SHELL_STATE_FILE
# - ADMIN_SHELL_LOG_LEVEL
# - ADMIN_SHELL_LOG_FORMAT

[shell]
# Backend serving the panel fragments
base_url = "http://localhost:5000"

# Panel shown when no navigation was persisted (runs the dashboard)
home_url = "/home"

# Panel that draws the per-client debt charts
debtors_url = "/debtors"

# Dashboard summary endpoint
details_url = "/home/details"

# Element id of the embedded client records in the debtors panel
client_data_id = "client-data"

# Request timeout in seconds
request_timeout_secs = 30

[[shell.sidebar]]
label = "Dashboard"
url = "/home"

[[shell.sidebar]]
label = "Approved Orders"
url = "/approved_orders"

[[shell.sidebar]]
label = "Debtors"
url = "/debtors"

[[shell.sidebar]]
label = "Payments"
url = "/payments"

[[shell.sidebar]]
label = "Clients"
url = "/client_list_partial"

[[shell.sidebar]]
label = "BDC"
url = "/bdc"

[[shell.sidebar]]
label = "Register Client"
url = "/admin/register_client"

[[shell.sidebar]]
label = "Settings"
url = "/admin/settings"

[storage]
# File holding the last visited panel (adminLastUrl / adminLastLabel)
state_file = "~/.local/share/admin-shell/state.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
