//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub routes: RouteConfig,

    #[serde(default)]
    pub account: AccountConfig,

    #[serde(default)]
    pub credentials: CredentialsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("stride/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Routes the host navigates to on redirect
#[derive(Debug, Clone, Deserialize)]
pub struct RouteConfig {
    #[serde(default = "default_home_route")]
    pub home: String,

    #[serde(default = "default_login_route")]
    pub login: String,
}

fn default_home_route() -> String {
    "/".to_string()
}

fn default_login_route() -> String {
    "/login_system/login.html".to_string()
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            home: default_home_route(),
            login: default_login_route(),
        }
    }
}

/// Account view configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
    /// Local asset shown as the avatar in every account view
    #[serde(default = "default_avatar_asset")]
    pub avatar_asset: String,

    #[serde(default = "default_max_avatar_bytes")]
    pub max_avatar_bytes: u64,
}

fn default_avatar_asset() -> String {
    "profile_pic.jpg".to_string()
}

fn default_max_avatar_bytes() -> u64 {
    5 * 1024 * 1024 // 5 MiB
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            avatar_asset: default_avatar_asset(),
            max_avatar_bytes: default_max_avatar_bytes(),
        }
    }
}

/// Optional login credentials used by the CLI host
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialsConfig {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CredentialsConfig {
    /// Both halves of the credential pair, if configured
    pub fn pair(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some((user.as_str(), pass.as_str())),
            _ => None,
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
            dirs::config_dir().map(|p| p.join("stride").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
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
        // Client overrides
        if let Ok(url) = std::env::var("STRIDE_BASE_URL") {
            self.client.base_url = url;
        }
        if let Ok(timeout) = std::env::var("STRIDE_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse() {
                self.client.request_timeout_secs = t;
            }
        }

        // Credentials
        if let Ok(username) = std::env::var("STRIDE_USERNAME") {
            self.credentials.username = Some(username);
        }
        if let Ok(password) = std::env::var("STRIDE_PASSWORD") {
            self.credentials.password = Some(password);
        }

        // Logging overrides
        if let Ok(level) = std::env::var("STRIDE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("STRIDE_LOG_FORMAT") {
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
    r#"# Stride Configuration
#
# Environment variables override these settings:
# - STRIDE_BASE_URL
# - STRIDE_TIMEOUT_SECS
# - STRIDE_USERNAME
# - STRIDE_PASSWORD
# - STRIDE_LOG_LEVEL
# - STRIDE_LOG_FORMAT

[client]
# Backend base URL
base_url = "http://localhost:5000"

# Request timeout in seconds
request_timeout_secs = 30

[routes]
# Where a 401 on the dashboard sends the user
home = "/"

# Where a 401 on plan creation sends the user
login = "/login_system/login.html"

[account]
# Avatar image shown in every account view
avatar_asset = "profile_pic.jpg"

# Largest avatar upload accepted before sending (bytes)
max_avatar_bytes = 5242880

[credentials]
# Log in before running a command
# username = ""
# password = ""

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
