//! Configuration handling for Tally
//!
//! Configuration is stored in `.tally/config.toml` (project) and
//! `~/.config/tally/config.toml` (global). Every field has a default, so
//! missing files and missing keys are fine.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Filter, SortMode};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Initial view used when no session state has been saved yet
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ViewConfig {
    pub filter: Filter,
    pub sort: SortMode,
}

/// Prompt auto-hide delays
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimerConfig {
    /// How long a delete or clear can be undone
    pub undo_seconds: u64,

    /// How long the all-done celebration stays up
    pub celebration_seconds: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            undo_seconds: 5,
            celebration_seconds: 4,
        }
    }
}

/// Longest accepted prompt delay: one day
pub const MAX_TIMER_SECONDS: u64 = 86_400;

/// Converts a delay, saturating instead of panicking on huge values
fn window(seconds: u64) -> chrono::Duration {
    i64::try_from(seconds)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .unwrap_or(chrono::Duration::MAX)
}

fn check_timer(name: &str, seconds: u64) -> Result<(), ConfigError> {
    if !(1..=MAX_TIMER_SECONDS).contains(&seconds) {
        return Err(ConfigError::Invalid(format!(
            "timers.{} must be between 1 and {}, got {}",
            name, MAX_TIMER_SECONDS, seconds
        )));
    }
    Ok(())
}

impl TimerConfig {
    pub fn undo_window(&self) -> chrono::Duration {
        window(self.undo_seconds)
    }

    pub fn celebration_window(&self) -> chrono::Duration {
        window(self.celebration_seconds)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_timer("undo_seconds", self.undo_seconds)?;
        check_timer("celebration_seconds", self.celebration_seconds)
    }
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ProjectConfig {
    pub view: ViewConfig,
    pub timers: TimerConfig,
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration for the data directory rooted at `root`
    pub fn for_root(root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project_config(root)?;

        Ok(Self {
            project,
            global,
            project_root: Some(root.to_path_buf()),
        })
    }

    /// Returns the platform directories for Tally
    pub fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("dev", "tally", "tally")
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads project configuration from a specific root
    fn load_project_config(root: &Path) -> Result<ProjectConfig> {
        let config_path = root.join(".tally").join("config.toml");

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        Self::parse_project_config(&content).context("Failed to load project config")
    }

    /// Parses and validates project configuration text
    pub fn parse_project_config(content: &str) -> Result<ProjectConfig, ConfigError> {
        let config: ProjectConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.timers.validate()?;
        Ok(config)
    }

    /// Finds the project root by looking for a `.tally/` directory at
    /// `start` or one of its ancestors
    pub fn find_project_root(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            if current.join(".tally").is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = ProjectConfig::default();
        assert_eq!(config.view.filter, Filter::All);
        assert_eq!(config.view.sort, SortMode::Date);
        assert_eq!(config.timers.undo_seconds, 5);
        assert_eq!(config.timers.celebration_seconds, 4);
        assert_eq!(GlobalConfig::default().default_format, OutputFormat::Text);
    }

    #[test]
    fn parse_project_config() {
        let toml = r#"
[view]
filter = "active"
sort = "priority"

[timers]
undo_seconds = 30
"#;

        let config = Config::parse_project_config(toml).unwrap();
        assert_eq!(config.view.filter, Filter::Active);
        assert_eq!(config.view.sort, SortMode::Priority);
        assert_eq!(config.timers.undo_seconds, 30);
        assert_eq!(config.timers.celebration_seconds, 4);
        assert_eq!(config.timers.undo_window(), chrono::Duration::seconds(30));
    }

    #[test]
    fn reject_zero_undo_window() {
        let err = Config::parse_project_config("[timers]\nundo_seconds = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn reject_oversized_timers() {
        let err = Config::parse_project_config("[timers]\nundo_seconds = 10000000000000000\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = Config::parse_project_config("[timers]\ncelebration_seconds = 86401\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let config = Config::parse_project_config("[timers]\nundo_seconds = 86400\n").unwrap();
        assert_eq!(config.timers.undo_window(), chrono::Duration::days(1));
    }

    #[test]
    fn huge_window_saturates() {
        let timers = TimerConfig {
            undo_seconds: u64::MAX,
            celebration_seconds: 10_000_000_000_000_000,
        };
        assert_eq!(timers.undo_window(), chrono::Duration::MAX);
        assert_eq!(timers.celebration_window(), chrono::Duration::MAX);
    }

    #[test]
    fn reject_unknown_sort() {
        let err = Config::parse_project_config("[view]\nsort = \"random\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn parse_global_config() {
        let config: GlobalConfig = toml::from_str("default_format = \"json\"\n").unwrap();
        assert_eq!(config.default_format, OutputFormat::Json);
    }

    #[test]
    fn find_project_root() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".tally")).unwrap();

        let sub_dir = dir.path().join("sub").join("dir");
        fs::create_dir_all(&sub_dir).unwrap();

        let root = Config::find_project_root(&sub_dir);
        assert_eq!(root.as_deref(), Some(dir.path()));
    }
}
