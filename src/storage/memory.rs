//! In-memory task store
//!
//! Holds the serialized list in a single slot, the way a browser key-value
//! entry would. Writes can be made to fail to exercise the quota path.

use std::cell::{Cell, RefCell};

use super::{StorageError, Store};
use crate::domain::Task;

/// Single-slot store kept in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: RefCell<Option<String>>,
    reject_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `raw` (which may be invalid JSON)
    pub fn with_raw(raw: impl Into<String>) -> Self {
        let store = Self::new();
        *store.slot.borrow_mut() = Some(raw.into());
        store
    }

    /// Creates a store holding `tasks`
    pub fn with_tasks(tasks: &[Task]) -> Result<Self, StorageError> {
        let store = Self::new();
        store.save(tasks)?;
        store.writes.set(0);
        Ok(store)
    }

    /// Makes subsequent saves fail (or succeed again)
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.set(reject);
    }

    /// The raw serialized slot
    pub fn raw(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    /// Number of successful saves
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Result<Vec<Task>, StorageError> {
        match self.slot.borrow().as_deref() {
            None => Ok(Vec::new()),
            Some(raw) => {
                serde_json::from_str(raw).map_err(|e| StorageError::Corrupt(e.to_string()))
            }
        }
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        if self.reject_writes.get() {
            return Err(StorageError::Write("quota exceeded".to_string()));
        }
        let raw = serde_json::to_string(tasks).map_err(|e| StorageError::Serialize(e.to_string()))?;
        *self.slot.borrow_mut() = Some(raw);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TaskDraft, TaskId};
    use chrono::Utc;

    #[test]
    fn save_and_load() {
        let task = Task::from_draft(TaskId::from_raw(1), TaskDraft::new("A"), Utc::now()).unwrap();
        let store = MemoryStore::new();
        store.save(&[task.clone()]).unwrap();

        assert_eq!(store.load().unwrap(), vec![task]);
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn rejected_write_keeps_previous_slot() {
        let store = MemoryStore::new();
        store.save(&[]).unwrap();
        store.reject_writes(true);

        let err = store.save(&[]).unwrap_err();
        assert!(matches!(err, StorageError::Write(_)));
        assert_eq!(store.raw().as_deref(), Some("[]"));
        assert_eq!(store.write_count(), 1);
    }
}
