//! Project management
//!
//! A project is any directory holding a `.tally/` folder. Commands run
//! outside a project fall back to the per-user data directory, so a lone
//! user never has to run `tally init`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::state::{read_session_state, write_session_state};
use super::{Config, FileStore, SessionState};

/// Environment variable that pins the data root
pub const HOME_ENV: &str = "TALLY_HOME";

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not a tally project: {0} (run 'tally init' first)")]
    NotInProject(PathBuf),

    #[error("Could not determine a data directory for this user")]
    NoDataDir,
}

/// A Tally project
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let tally_dir = root.join(".tally");

        if !tally_dir.is_dir() {
            return Err(ProjectError::NotInProject(root).into());
        }

        let config = Config::for_root(&root)?;

        Ok(Self { root, config })
    }

    /// Finds the project for `cwd`: `$TALLY_HOME`, then the nearest
    /// ancestor with `.tally/`, then the user data directory
    pub fn locate(cwd: &Path) -> Result<Self> {
        if let Some(home) = std::env::var_os(HOME_ENV) {
            tracing::debug!(target: "tally", home = ?home, "Using {}", HOME_ENV);
            return Self::open_or_init(PathBuf::from(home));
        }

        if let Some(root) = Config::find_project_root(cwd) {
            return Self::open(root);
        }

        let data_dir = Config::project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(ProjectError::NoDataDir)?;
        Self::open_or_init(data_dir)
    }

    fn open_or_init(root: PathBuf) -> Result<Self> {
        if root.join(".tally").is_dir() {
            Self::open(root)
        } else {
            Self::init(root)
        }
    }

    /// Initializes a new project at the given path. Existing files are kept.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let tally_dir = root.join(".tally");

        fs::create_dir_all(&tally_dir).with_context(|| {
            format!("Failed to create .tally directory: {}", tally_dir.display())
        })?;

        let config_path = tally_dir.join("config.toml");
        if !config_path.exists() {
            let default_config = r#"# Tally configuration

[view]
# Initial filter: all, active or completed
filter = "all"
# Initial sort: date, priority, due or status
sort = "date"

[timers]
# Seconds during which a delete or clear can be undone
undo_seconds = 5
# Seconds the all-done celebration stays visible
celebration_seconds = 4
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        let gitignore_path = tally_dir.join(".gitignore");
        if !gitignore_path.exists() {
            let gitignore = r#"# Per-user session state (view settings, pending undo)
state.json

# Interrupted writes
*.tmp
"#;
            fs::write(&gitignore_path, gitignore).with_context(|| {
                format!("Failed to write .gitignore: {}", gitignore_path.display())
            })?;
        }

        let config = Config::for_root(&root)?;

        Ok(Self { root, config })
    }

    /// Returns the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the `.tally` directory path
    pub fn tally_dir(&self) -> PathBuf {
        self.root.join(".tally")
    }

    /// Returns the project configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the task store
    pub fn task_store(&self) -> FileStore {
        FileStore::in_dir(&self.tally_dir())
    }

    /// Loads saved session state, falling back to the configured view
    pub fn session_state(&self) -> SessionState {
        read_session_state(&self.tally_dir()).unwrap_or_else(|| SessionState {
            filter: self.config.project.view.filter,
            sort: self.config.project.view.sort,
            ..Default::default()
        })
    }

    /// Saves session state
    pub fn save_session_state(&self, state: &SessionState) -> Result<()> {
        let dir = self.tally_dir();
        write_session_state(&dir, state)
            .with_context(|| format!("Failed to write session state in {}", dir.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Filter, SortMode};
    use crate::storage::Store;
    use tempfile::TempDir;

    #[test]
    fn init_creates_structure() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        assert!(project.tally_dir().is_dir());
        assert!(project.tally_dir().join("config.toml").is_file());
        assert!(project.tally_dir().join(".gitignore").is_file());
        assert_eq!(project.config().project.timers.undo_seconds, 5);
    }

    #[test]
    fn open_requires_tally_dir() {
        let dir = TempDir::new().unwrap();
        assert!(Project::open(dir.path()).is_err());

        Project::init(dir.path()).unwrap();
        assert!(Project::open(dir.path()).is_ok());
    }

    #[test]
    fn task_store_lives_in_tally_dir() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();
        let store = project.task_store();

        store.save(&[]).unwrap();
        assert!(project.tally_dir().join("tasks.json").is_file());
    }

    #[test]
    fn session_state_defaults_to_configured_view() {
        let dir = TempDir::new().unwrap();
        Project::init(dir.path()).unwrap();
        fs::write(
            dir.path().join(".tally/config.toml"),
            "[view]\nfilter = \"active\"\nsort = \"status\"\n",
        )
        .unwrap();

        let project = Project::open(dir.path()).unwrap();
        let state = project.session_state();
        assert_eq!(state.filter, Filter::Active);
        assert_eq!(state.sort, SortMode::Status);
        assert!(state.pending_undo.is_none());
    }

    #[test]
    fn session_state_round_trip() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        let state = SessionState {
            filter: Filter::Completed,
            ..Default::default()
        };
        project.save_session_state(&state).unwrap();
        assert_eq!(project.session_state(), state);
    }
}
