//! # Configuration Persistence
//!
//! User settings stored as JSON in the platform config directory:
//!
//! ```text
//! ~/.config/widgetbook/config.json
//! ```
//!
//! ```json
//! {
//!   "theme": "Nord",
//!   "sidebar_width": 34,
//!   "commands": [
//!     { "name": "Top", "program": "top", "group": "Commands" },
//!     { "name": "Disk usage", "program": "du", "args": ["-sh", "."] }
//!   ]
//! }
//! ```
//!
//! Every field is optional. `commands` become bridged entries that run in a
//! pseudo-terminal.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Narrowest sidebar that still fits the cursor marker, an arrow and a name.
pub const MIN_SIDEBAR_WIDTH: u16 = 12;

/// An external command shown as a gallery entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandSpec {
    /// Entry label.
    pub name: String,
    /// Executable, resolved through `PATH`.
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Group to register the entry under; root level when absent.
    #[serde(default)]
    pub group: Option<String>,
}

/// Persisted user configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// The name of the selected theme (must match a built-in theme name).
    #[serde(default = "default_theme_name")]
    pub theme: String,
    #[serde(default = "default_sidebar_width")]
    pub sidebar_width: u16,
    #[serde(default)]
    pub commands: Vec<CommandSpec>,
}

fn default_theme_name() -> String {
    "Catppuccin Mocha".to_string()
}

fn default_sidebar_width() -> u16 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme_name(),
            sidebar_width: default_sidebar_width(),
            commands: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from disk. Returns `Config::default()` if the file
    /// does not exist or cannot be parsed.
    pub fn load() -> Self {
        Self::try_load().unwrap_or_default()
    }

    fn try_load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific path. Returns `Config::default()` if
    /// the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save the current configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Sidebar width with the lower bound applied.
    pub fn sidebar_width(&self) -> u16 {
        self.sidebar_width.max(MIN_SIDEBAR_WIDTH)
    }

    /// Return the path to the config file.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "widgetbook")
            .context("Could not determine config directory")?;
        Ok(dirs.config_dir().join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.theme, "Catppuccin Mocha");
        assert_eq!(config.sidebar_width, 30);
        assert!(config.commands.is_empty());
    }

    #[test]
    fn test_deserialize_empty_object_uses_defaults() {
        let config: Config = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_deserialize_commands() {
        let json = r#"{
            "commands": [
                { "name": "Top", "program": "top", "group": "Commands" },
                { "name": "List", "program": "ls", "args": ["-la"] }
            ]
        }"#;
        let config: Config = serde_json::from_str(json).expect("deserialize");
        assert_eq!(config.commands.len(), 2);
        assert_eq!(config.commands[0].group.as_deref(), Some("Commands"));
        assert!(config.commands[0].args.is_empty());
        assert_eq!(config.commands[1].args, vec!["-la".to_string()]);
        assert_eq!(config.commands[1].group, None);
    }

    #[test]
    fn test_command_requires_program() {
        let json = r#"{ "commands": [ { "name": "Broken" } ] }"#;
        assert!(serde_json::from_str::<Config>(json).is_err());
    }

    #[test]
    fn test_sidebar_width_floor() {
        let config = Config {
            sidebar_width: 3,
            ..Config::default()
        };
        assert_eq!(config.sidebar_width(), MIN_SIDEBAR_WIDTH);
        assert_eq!(Config::default().sidebar_width(), 30);
    }

    #[test]
    fn test_save_to_load_from_roundtrip() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let config_path = temp_dir.path().join("subdir").join("config.json");

        let config = Config {
            theme: "Dracula".to_string(),
            sidebar_width: 40,
            commands: vec![CommandSpec {
                name: "Clock".to_string(),
                program: "date".to_string(),
                args: vec![],
                group: Some("Shell".to_string()),
            }],
        };

        config.save_to(&config_path).expect("save_to");
        let loaded = Config::load_from(&config_path).expect("load_from");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_from_missing_file_returns_default() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let config_path = temp_dir.path().join("does_not_exist.json");

        let loaded = Config::load_from(&config_path).expect("load_from");
        assert_eq!(loaded.theme, "Catppuccin Mocha");
    }

    #[test]
    fn test_load_from_malformed_file_errors() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let config_path = temp_dir.path().join("config.json");
        fs::write(&config_path, "{ not json").expect("write");

        let err = Config::load_from(&config_path).expect_err("parse error");
        assert!(format!("{err:#}").contains("Failed to parse config file"));
    }

    #[test]
    fn test_deny_unknown_fields() {
        let json = r#"{"theme": "Nord", "unknown_field": true}"#;
        let result: Result<Config, _> = serde_json::from_str(json);
        assert!(result.is_err(), "should reject unknown fields");
    }
}
