//! JSON file storage for tasks
//!
//! Tasks are stored in `.tally/tasks.json` as one JSON array in manual
//! order. Uses file locking and write-then-rename so a crash mid-save never
//! leaves a half-written list behind.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use super::{StorageError, Store};
use crate::domain::Task;

/// Store for the task list as a JSON file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a new task store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the default store inside a `.tally` directory
    pub fn in_dir(tally_dir: &Path) -> Self {
        Self::new(tally_dir.join("tasks.json"))
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_error(&self, what: &str, e: impl std::fmt::Display) -> StorageError {
        StorageError::Write(format!("{} {}: {}", what, self.path.display(), e))
    }
}

impl Store for FileStore {
    fn load(&self) -> Result<Vec<Task>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)
            .map_err(|e| StorageError::Read(format!("{}: {}", self.path.display(), e)))?;

        file.lock_shared()
            .map_err(|e| StorageError::Read(format!("failed to acquire read lock: {}", e)))?;

        let content = std::io::read_to_string(BufReader::new(&file))
            .map_err(|e| StorageError::Read(format!("{}: {}", self.path.display(), e)))?;

        // Lock is released when file is dropped
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| StorageError::Corrupt(e.to_string()))
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.write_error("failed to create directory for", e))?;
        }

        let content =
            serde_json::to_string_pretty(tasks).map_err(|e| StorageError::Serialize(e.to_string()))?;

        let temp_path = self.path.with_extension("json.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| self.write_error("failed to create temp file for", e))?;

            file.lock_exclusive()
                .map_err(|e| self.write_error("failed to lock", e))?;

            let write_all = |file: &File| -> std::io::Result<()> {
                let mut writer = BufWriter::new(file);
                writer.write_all(content.as_bytes())?;
                writer.write_all(b"\n")?;
                writer.flush()
            };
            write_all(&file).map_err(|e| self.write_error("failed to write", e))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| self.write_error("failed to replace", e))?;

        Ok(())
    }
}
