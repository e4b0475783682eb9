//! # Storage Layer
//!
//! Persistence for the task list and the surrounding CLI state.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Tasks | JSON array | `.tally/tasks.json` |
//! | Session state | JSON object | `.tally/state.json` |
//! | Config | TOML | `.tally/config.toml` |
//!
//! ## The `Store` seam
//!
//! The task list only ever sees the [`Store`] trait: load the whole list,
//! save the whole list. Failures are never fatal. [`load_or_empty`] turns
//! unreadable or corrupt data into an empty list, and the session logs and
//! ignores failed saves, keeping the in-memory list authoritative.
//!
//! ## Key Types
//!
//! - [`FileStore`] - JSON file with locking and atomic replace
//! - [`MemoryStore`] - in-process slot, used by embedders and tests
//! - [`Project`] - locates `.tally/` and hands out stores
//! - [`Config`] - project and global configuration
//! - [`SessionState`] - view settings and pending undo between invocations

mod json;
mod memory;
mod config;
mod project;
mod state;

use thiserror::Error;

use crate::domain::Task;

pub use json::FileStore;
pub use memory::MemoryStore;
pub use config::{Config, ConfigError, GlobalConfig, OutputFormat, ProjectConfig, TimerConfig, ViewConfig};
pub use project::{Project, ProjectError};
pub use state::SessionState;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read task store: {0}")]
    Read(String),

    #[error("Stored task list is corrupt: {0}")]
    Corrupt(String),

    #[error("Failed to write task store: {0}")]
    Write(String),

    #[error("Failed to serialize tasks: {0}")]
    Serialize(String),
}

impl StorageError {
    /// True for failures on the load path
    pub fn is_read(&self) -> bool {
        matches!(self, StorageError::Read(_) | StorageError::Corrupt(_))
    }
}

/// Key-value persistence for the ordered task list
pub trait Store {
    /// Loads the saved list; an empty store yields an empty list
    fn load(&self) -> Result<Vec<Task>, StorageError>;

    /// Replaces the saved list
    fn save(&self, tasks: &[Task]) -> Result<(), StorageError>;
}

impl<S: Store + ?Sized> Store for &S {
    fn load(&self) -> Result<Vec<Task>, StorageError> {
        (**self).load()
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        (**self).save(tasks)
    }
}

/// Loads the task list, recovering from read errors with an empty list
pub fn load_or_empty<S: Store + ?Sized>(store: &S) -> Vec<Task> {
    match store.load() {
        Ok(tasks) => tasks,
        Err(e) => {
            tracing::warn!(target: "tally", error = %e, "Discarding unreadable task list");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_store_loads_empty() {
        let store = MemoryStore::with_raw("not json {{{");
        assert!(store.load().unwrap_err().is_read());
        assert!(load_or_empty(&store).is_empty());
    }

    #[test]
    fn empty_store_loads_empty() {
        let store = MemoryStore::new();
        assert!(load_or_empty(&store).is_empty());
    }

    #[test]
    fn store_through_reference() {
        let store = MemoryStore::new();
        let by_ref: &MemoryStore = &store;
        by_ref.save(&[]).unwrap();
        assert_eq!(store.raw().as_deref(), Some("[]"));
    }
}
