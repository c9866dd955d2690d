//! Configuration loading and discovery for `chalkx.toml`
//!
//! Values are layered: built-in defaults, then the config file, then
//! environment variables, then command-line flags.

use super::schema::ChalkxConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file searched for.
pub const CONFIG_FILE: &str = "chalkx.toml";

/// Environment variable holding the backend base URL.
pub const ENV_BACKEND_URL: &str = "CHALKX_BACKEND_URL";
/// Environment variable overriding the listen host.
pub const ENV_HOST: &str = "CHALKX_HOST";
/// Environment variable overriding the listen port.
pub const ENV_PORT: &str = "CHALKX_PORT";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse chalkx.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// An environment override could not be used
    #[error("Invalid value '{value}' for {var}")]
    Env { var: &'static str, value: String },
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override listen host
    pub host: Option<String>,
    /// Override listen port
    pub port: Option<u16>,
    /// Override backend base URL
    pub backend_url: Option<String>,
}

/// Find chalkx.toml by walking up from the current working directory,
/// falling back to `$XDG_CONFIG_HOME/chalkx/chalkx.toml`.
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }
    find_xdg_config()
}

/// Find chalkx.toml in the XDG config directory (or `~/.config`).
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("chalkx").join(CONFIG_FILE);
    config_path.exists().then_some(config_path)
}

/// Find chalkx.toml by walking up from `start`.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;
    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from `path`, or from the discovered file, or defaults.
///
/// An explicit path that does not exist is an error; a missing discovered
/// file is not.
pub fn load_config(path: Option<&Path>) -> Result<ChalkxConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(default_config()),
    }
}

fn load_config_file(path: &Path) -> Result<ChalkxConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: ChalkxConfig = toml::from_str(&contents)?;
    validate(&config)?;
    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

fn validate(config: &ChalkxConfig) -> Result<(), ConfigError> {
    let issues = config.validate();
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(issues.into_iter().map(|e| e.to_string()).collect()))
    }
}

/// Configuration used when no chalkx.toml is found.
pub fn default_config() -> ChalkxConfig {
    ChalkxConfig::default()
}

/// Apply `CHALKX_*` environment overrides from the process environment.
pub fn apply_env_overrides(config: &mut ChalkxConfig) -> Result<(), ConfigError> {
    apply_env_overrides_from(config, |var| env::var(var).ok())
}

/// Apply environment overrides read through `lookup`.
///
/// Empty values are ignored.
pub fn apply_env_overrides_from<F>(config: &mut ChalkxConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

    if let Some(url) = get(ENV_BACKEND_URL) {
        config.backend.url = url;
    }
    if let Some(host) = get(ENV_HOST) {
        config.server.host = host;
    }
    if let Some(port) = get(ENV_PORT) {
        config.server.port = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::Env { var: ENV_PORT, value: port.clone() })?;
    }
    validate(config)
}

/// Merge CLI overrides into a configuration. CLI values win.
pub fn merge_cli_overrides(config: &mut ChalkxConfig, overrides: &CliOverrides) {
    if let Some(ref host) = overrides.host {
        config.server.host = host.clone();
    }
    if let Some(port) = overrides.port {
        config.server.port = port;
    }
    if let Some(ref url) = overrides.backend_url {
        config.backend.url = url.clone();
    }
}
