//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.bubble/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use clap::ValueEnum;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::Mode;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BubbleConfig {
    #[serde(default)]
    pub widget: WidgetConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct WidgetConfig {
    pub base_url: Option<String>,
    pub mode: Option<Mode>,
    pub markdown: Option<bool>,
    pub renderer_timeout_ms: Option<u64>,
    pub title: Option<String>,
    pub greeting: Option<String>,
    pub start_open: Option<bool>,
}

/// Values taken from CLI flags. `None`/`false` means "not given".
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub mode: Option<Mode>,
    pub plain: bool,
    pub open: bool,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_RENDERER_TIMEOUT_MS: u64 = 2000;
pub const DEFAULT_TITLE: &str = "Chat with us";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub mode: Mode,
    pub markdown: bool,
    pub renderer_timeout: Duration,
    pub title: String,
    pub greeting: Option<String>,
    pub start_open: bool,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            mode: Mode::default(),
            markdown: true,
            renderer_timeout: Duration::from_millis(DEFAULT_RENDERER_TIMEOUT_MS),
            title: DEFAULT_TITLE.to_string(),
            greeting: None,
            start_open: false,
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.bubble/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".bubble").join("config.toml"))
}

/// Load config from `~/.bubble/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `BubbleConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<BubbleConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(BubbleConfig::default());
        }
    };
    load_config_from(&path)
}

/// Same as [`load_config`] for an explicit path.
pub fn load_config_from(path: &Path) -> Result<BubbleConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(BubbleConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: BubbleConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Bubble Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [widget]
# base_url = "http://localhost:8000"  # Or set BUBBLE_BASE_URL; requests go to <base_url>/api/chat
# mode = "streaming"                  # "buffered" or "streaming"; or set BUBBLE_MODE
# markdown = true                     # false always shows replies as plain text
# renderer_timeout_ms = 2000          # give up on the Markdown renderer after this long
# title = "Chat with us"
# greeting = "Hi! How can I help?"
# start_open = false                  # open the panel instead of showing the bubble
"#;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG_TEMPLATE) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &BubbleConfig, cli: &Overrides) -> ResolvedConfig {
    let widget = &config.widget;

    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| std::env::var("BUBBLE_BASE_URL").ok())
        .or_else(|| widget.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Mode: CLI → env → config → default
    let mode = cli
        .mode
        .or_else(env_mode)
        .or(widget.mode)
        .unwrap_or_default();

    // --plain wins over everything
    let markdown = !cli.plain && widget.markdown.unwrap_or(true);

    ResolvedConfig {
        base_url,
        mode,
        markdown,
        renderer_timeout: Duration::from_millis(
            widget
                .renderer_timeout_ms
                .unwrap_or(DEFAULT_RENDERER_TIMEOUT_MS),
        ),
        title: widget
            .title
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        greeting: widget.greeting.clone().filter(|g| !g.trim().is_empty()),
        start_open: cli.open || widget.start_open.unwrap_or(false),
    }
}

fn env_mode() -> Option<Mode> {
    let raw = std::env::var("BUBBLE_MODE").ok()?;
    match Mode::from_str(raw.trim(), true) {
        Ok(mode) => Some(mode),
        Err(_) => {
            warn!("Ignoring BUBBLE_MODE={:?}: expected buffered or streaming", raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = BubbleConfig::default();
        assert!(config.widget.base_url.is_none());
        assert!(config.widget.mode.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = BubbleConfig::default();
        let resolved = resolve(&config, &Overrides::default());
        assert!(resolved.markdown);
        assert_eq!(
            resolved.renderer_timeout,
            Duration::from_millis(DEFAULT_RENDERER_TIMEOUT_MS)
        );
        assert_eq!(resolved.title, DEFAULT_TITLE);
        assert!(resolved.greeting.is_none());
        assert!(!resolved.start_open);
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = BubbleConfig {
            widget: WidgetConfig {
                markdown: Some(false),
                renderer_timeout_ms: Some(50),
                title: Some("Support".to_string()),
                greeting: Some("Hello there!".to_string()),
                start_open: Some(true),
                ..Default::default()
            },
        };
        let resolved = resolve(&config, &Overrides::default());
        assert!(!resolved.markdown);
        assert_eq!(resolved.renderer_timeout, Duration::from_millis(50));
        assert_eq!(resolved.title, "Support");
        assert_eq!(resolved.greeting.as_deref(), Some("Hello there!"));
        assert!(resolved.start_open);
    }

    #[test]
    fn test_resolve_cli_wins() {
        let config = BubbleConfig {
            widget: WidgetConfig {
                base_url: Some("http://from-config".to_string()),
                mode: Some(Mode::Streaming),
                ..Default::default()
            },
        };
        let cli = Overrides {
            base_url: Some("http://from-cli".to_string()),
            mode: Some(Mode::Buffered),
            plain: true,
            open: true,
        };
        let resolved = resolve(&config, &cli);
        assert_eq!(resolved.base_url, "http://from-cli");
        assert_eq!(resolved.mode, Mode::Buffered);
        assert!(!resolved.markdown);
        assert!(resolved.start_open);
    }

    #[test]
    fn test_blank_greeting_is_dropped() {
        let config = BubbleConfig {
            widget: WidgetConfig {
                greeting: Some("   ".to_string()),
                ..Default::default()
            },
        };
        assert!(resolve(&config, &Overrides::default()).greeting.is_none());
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[widget]
base_url = "https://chat.example.com"
mode = "buffered"
markdown = false
renderer_timeout_ms = 500
title = "Ask us"
greeting = "Hey!"
start_open = true
"#;
        let config: BubbleConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.widget.base_url.as_deref(),
            Some("https://chat.example.com")
        );
        assert_eq!(config.widget.mode, Some(Mode::Buffered));
        assert_eq!(config.widget.markdown, Some(false));
        assert_eq!(config.widget.renderer_timeout_ms, Some(500));
        assert_eq!(config.widget.start_open, Some(true));
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing; everything else stays default
        let toml_str = r#"
[widget]
mode = "streaming"
"#;
        let config: BubbleConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.widget.mode, Some(Mode::Streaming));
        assert!(config.widget.base_url.is_none());
        assert!(config.widget.greeting.is_none());
    }

    #[test]
    fn test_unknown_mode_is_parse_error() {
        let toml_str = r#"
[widget]
mode = "telepathy"
"#;
        assert!(toml::from_str::<BubbleConfig>(toml_str).is_err());
    }

    #[test]
    fn test_default_template_is_all_comments() {
        // Generated file must parse to an empty config
        let config: BubbleConfig = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert!(config.widget.base_url.is_none());
    }

    #[test]
    fn test_load_config_from_missing_path_generates_default() {
        let dir = std::env::temp_dir().join(format!("bubble-config-{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.toml");
        let config = load_config_from(&path).unwrap();
        assert!(config.widget.mode.is_none());
        assert!(path.exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_config_from_malformed_file() {
        let dir = std::env::temp_dir().join(format!("bubble-config-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[widget\nmode = ").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));
        let _ = fs::remove_dir_all(&dir);
    }
}
