use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Filter, SortMode, UndoEntry};

/// Persisted CLI session state (written to `.tally/state.json`)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SessionState {
    /// Last selected filter
    #[serde(default)]
    pub filter: Filter,
    /// Last selected sort
    #[serde(default)]
    pub sort: SortMode,
    /// Buffer for the most recent delete or clear
    #[serde(default)]
    pub pending_undo: Option<UndoEntry>,
    /// When the undo offer lapses
    #[serde(default)]
    pub undo_deadline: Option<DateTime<Utc>>,
}

/// Read `state.json` from the tally directory
pub fn read_session_state(tally_dir: &Path) -> Option<SessionState> {
    let path = tally_dir.join("state.json");
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write `state.json` to the tally directory
pub fn write_session_state(tally_dir: &Path, state: &SessionState) -> Result<(), std::io::Error> {
    let path = tally_dir.join("state.json");
    let content = serde_json::to_string_pretty(state)?;
    fs::write(&path, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Task, TaskDraft, TaskId};
    use tempfile::TempDir;

    #[test]
    fn write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let now = Utc::now();
        let task = Task::from_draft(TaskId::from_raw(9), TaskDraft::new("Gone"), now).unwrap();
        let state = SessionState {
            filter: Filter::Completed,
            sort: SortMode::Due,
            pending_undo: Some(UndoEntry::Single { task, index: 2 }),
            undo_deadline: Some(now),
        };

        write_session_state(dir.path(), &state).unwrap();
        let loaded = read_session_state(dir.path()).unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn read_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_session_state(dir.path()).is_none());
    }

    #[test]
    fn read_malformed_json_returns_none() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("state.json"), "not json {{{").unwrap();
        assert!(read_session_state(dir.path()).is_none());
    }

    #[test]
    fn serde_defaults_on_empty_object() {
        let state: SessionState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, SessionState::default());
    }
}
