//! One-step undo buffer for destructive actions

use serde::{Deserialize, Serialize};

use super::id::TaskId;
use super::task::Task;

/// What the last destructive action removed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UndoEntry {
    /// A single deleted task and the index it occupied before removal
    Single { task: Task, index: usize },
    /// Completed tasks removed by clear-completed, in list order
    Bulk { tasks: Vec<Task> },
}

impl UndoEntry {
    /// Message shown alongside the undo prompt
    pub fn message(&self) -> String {
        match self {
            UndoEntry::Single { .. } => "Task deleted".to_string(),
            UndoEntry::Bulk { tasks } => format!("{} completed tasks cleared", tasks.len()),
        }
    }

    /// Number of tasks an undo would restore
    pub fn len(&self) -> usize {
        match self {
            UndoEntry::Single { .. } => 1,
            UndoEntry::Bulk { tasks } => tasks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Highest task ID held in the buffer
    pub fn max_id(&self) -> Option<TaskId> {
        match self {
            UndoEntry::Single { task, .. } => Some(task.id),
            UndoEntry::Bulk { tasks } => tasks.iter().map(|t| t.id).max(),
        }
    }

    /// Puts the buffered tasks back into `tasks`.
    ///
    /// A single task goes back to its recorded index, clamped to the current
    /// length. The index is not adjusted for changes made since the delete.
    /// A bulk entry is appended after the surviving tasks.
    pub fn restore_into(self, tasks: &mut Vec<Task>) {
        match self {
            UndoEntry::Single { task, index } => {
                let index = index.min(tasks.len());
                tasks.insert(index, task);
            }
            UndoEntry::Bulk { tasks: cleared } => tasks.extend(cleared),
        }
    }
}
