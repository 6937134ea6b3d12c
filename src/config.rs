//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and `PULSEBOARD_*` environment overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::chart::Theme;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub router: RoutingConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub profile: ProfileConfig,

    #[serde(default)]
    pub theme: ThemeConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where datasets are read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// JSON files in a local directory
    #[default]
    Directory,
    /// A dataset server reached over HTTP
    Http,
}

impl std::str::FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "directory" | "dir" => Ok(SourceKind::Directory),
            "http" => Ok(SourceKind::Http),
            other => Err(format!("unknown data source: {}", other)),
        }
    }
}

/// Dataset source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default)]
    pub source: SourceKind,

    #[serde(default = "default_data_dir")]
    pub dir: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_base_url() -> String {
    "http://127.0.0.1:8090".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::default(),
            dir: default_data_dir(),
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl DataConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Routing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RoutingConfig {
    #[serde(default = "default_home_route")]
    pub home_route: String,
}

fn default_home_route() -> String {
    "home".to_string()
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            home_route: default_home_route(),
        }
    }
}

/// Dashboard login
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default = "default_password")]
    pub password: String,
}

fn default_username() -> String {
    "analyst".to_string()
}

fn default_password() -> String {
    "pulseboard".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            password: default_password(),
        }
    }
}

/// Text shown in page headers and footers
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProfileConfig {
    /// Dashboard title on the home page
    #[serde(default = "default_brand")]
    pub brand: String,

    /// Whose activity the dashboard tracks
    #[serde(default = "default_subject")]
    pub subject: String,

    /// Name of the service whose before/after impact is compared
    #[serde(default = "default_service")]
    pub service: String,

    /// "Last updated" date shown in source footers
    #[serde(default = "default_updated")]
    pub updated: String,
}

fn default_brand() -> String {
    "◆ Pulseboard".to_string()
}

fn default_subject() -> String {
    "the creator".to_string()
}

fn default_service() -> String {
    "Pulseboard".to_string()
}

fn default_updated() -> String {
    "2026-02-09".to_string()
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            brand: default_brand(),
            subject: default_subject(),
            service: default_service(),
            updated: default_updated(),
        }
    }
}

impl ProfileConfig {
    /// Possessive form of the subject (`the creator's`)
    pub fn possessive(&self) -> String {
        if self.subject.ends_with('s') {
            format!("{}'", self.subject)
        } else {
            format!("{}'s", self.subject)
        }
    }
}

/// Chart colour overrides
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThemeConfig {
    pub accent: Option<String>,
    pub categorical: Option<Vec<String>>,
}

impl ThemeConfig {
    /// Default theme with the configured overrides applied
    pub fn to_theme(&self) -> Theme {
        let mut theme = Theme::default();
        if let Some(accent) = &self.accent {
            theme.accent = accent.clone();
        }
        if let Some(categorical) = self.categorical.as_ref().filter(|c| !c.is_empty()) {
            theme.categorical = categorical.clone();
        }
        theme
    }
}

/// Dataset server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8090
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
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

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
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
            dirs::config_dir().map(|p| p.join("pulseboard").join("config.toml")),
            Some(PathBuf::from("/etc/pulseboard/config.toml")),
            Some(PathBuf::from("./pulseboard.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!(path = ?path, "Loaded config");
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!(path = ?path, error = %e, "Failed to load config");
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `PULSEBOARD_*` overrides read through `lookup`
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(source) = lookup("PULSEBOARD_DATA_SOURCE") {
            match source.parse() {
                Ok(kind) => self.data.source = kind,
                Err(e) => tracing::warn!(error = %e, "Ignoring PULSEBOARD_DATA_SOURCE"),
            }
        }
        if let Some(dir) = lookup("PULSEBOARD_DATA_DIR") {
            self.data.dir = dir;
        }
        if let Some(url) = lookup("PULSEBOARD_DATA_URL") {
            self.data.base_url = url;
        }

        if let Some(home) = lookup("PULSEBOARD_HOME_ROUTE") {
            self.router.home_route = home;
        }

        if let Some(username) = lookup("PULSEBOARD_USERNAME") {
            self.auth.username = username;
        }
        if let Some(password) = lookup("PULSEBOARD_PASSWORD") {
            self.auth.password = password;
        }

        if let Some(host) = lookup("PULSEBOARD_SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PULSEBOARD_SERVER_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }

        if let Some(level) = lookup("PULSEBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("PULSEBOARD_LOG_FORMAT") {
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
    r##"# Pulseboard Configuration
#
# Environment variables override these settings:
# - PULSEBOARD_DATA_SOURCE
# - PULSEBOARD_DATA_DIR
# - PULSEBOARD_DATA_URL
# - PULSEBOARD_HOME_ROUTE
# - PULSEBOARD_USERNAME
# - PULSEBOARD_PASSWORD
# - PULSEBOARD_SERVER_HOST
# - PULSEBOARD_SERVER_PORT
# - PULSEBOARD_LOG_LEVEL
# - PULSEBOARD_LOG_FORMAT

[data]
# Where datasets come from: "directory" or "http"
source = "directory"

# Directory holding the exported *.json datasets
dir = "./data"

# Dataset server used when source = "http"
base_url = "http://127.0.0.1:8090"

# HTTP request timeout in seconds
request_timeout_secs = 10

[router]
# Page shown for an empty fragment
home_route = "home"

[auth]
# Dashboard login
username = "analyst"
password = "pulseboard"

[profile]
# Home page title
brand = "◆ Pulseboard"

# Whose activity is tracked (used in page captions)
subject = "the creator"

# Service whose before/after impact is compared
service = "Pulseboard"

# Shown as "Last updated" in page footers
updated = "2026-02-09"

[theme]
# Optional chart colour overrides
# accent = "#93f3db"
# categorical = ["#93f3db", "#5b5b5b", "#66d9c2", "#0e0e0f", "#a0a0a0"]

[server]
# Dataset server bind address
host = "127.0.0.1"
port = 8090

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"##
    .to_string()
}
