//! Configuration schema types for `chalkx.toml`
//!
//! Defines the structure and validation rules for the proxy and board
//! settings. Every section is optional; missing values take defaults.

use serde::{Deserialize, Serialize};

use crate::canvas::MAX_CANVAS_SIDE;
use crate::color::parse_color;
use crate::tool::Tool;

/// Address the analysis proxy listens on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// TCP port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// The separately hosted analysis service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL; requests go to `{url}/api/analyze`
    #[serde(default = "default_backend_url")]
    pub url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self { url: default_backend_url() }
    }
}

pub fn default_backend_url() -> String {
    "http://localhost:5000".to_string()
}

/// Board defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Raster width for boards not fitted to a container
    #[serde(default = "default_width")]
    pub width: u32,
    /// Raster height for boards not fitted to a container
    #[serde(default = "default_height")]
    pub height: u32,
    /// Background / eraser color
    #[serde(default = "default_background")]
    pub background: String,
    /// Initial chalk color
    #[serde(default = "default_color")]
    pub color: String,
    /// Initial pencil size
    #[serde(default = "default_pencil_size")]
    pub pencil_size: u32,
    /// Initial eraser size
    #[serde(default = "default_eraser_size")]
    pub eraser_size: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            background: default_background(),
            color: default_color(),
            pencil_size: default_pencil_size(),
            eraser_size: default_eraser_size(),
        }
    }
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}

fn default_background() -> String {
    "#1a1a1a".to_string()
}

fn default_color() -> String {
    "#FFFFFF".to_string()
}

fn default_pencil_size() -> u32 {
    Tool::Pencil.default_size()
}

fn default_eraser_size() -> u32 {
    Tool::Eraser.default_size()
}

/// Logging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: default_log_filter() }
    }
}

fn default_log_filter() -> String {
    "chalkx=info,warn".to_string()
}

/// Complete `chalkx.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChalkxConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// A single problem found by [`ChalkxConfig::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ChalkxConfig {
    /// Check values serde cannot; returns every issue found.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        let mut issue = |field: &'static str, message: String| {
            issues.push(ConfigIssue { field, message });
        };

        if self.server.host.trim().is_empty() {
            issue("server.host", "must not be empty".to_string());
        }

        let url = self.backend.url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            issue("backend.url", format!("'{}' must start with http:// or https://", url));
        }

        let sides = 1..=MAX_CANVAS_SIDE;
        if !sides.contains(&self.canvas.width) || !sides.contains(&self.canvas.height) {
            issue(
                "canvas",
                format!(
                    "size {}x{} must be between 1 and {} pixels per side",
                    self.canvas.width, self.canvas.height, MAX_CANVAS_SIDE
                ),
            );
        }
        if let Err(e) = parse_color(&self.canvas.background) {
            issue("canvas.background", e.to_string());
        }
        if let Err(e) = parse_color(&self.canvas.color) {
            issue("canvas.color", e.to_string());
        }

        for (field, tool, size) in [
            ("canvas.pencil_size", Tool::Pencil, self.canvas.pencil_size),
            ("canvas.eraser_size", Tool::Eraser, self.canvas.eraser_size),
        ] {
            let (min, max) = tool.size_range();
            if size < min || size > max {
                issue(field, format!("{} is outside {}..={}", size, min, max));
            }
        }

        issues
    }
}
