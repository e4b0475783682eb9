//! Domain models for Tally
//!
//! Contains the core task list logic without any I/O concerns.

mod id;
mod task;
mod undo;
mod list;
pub mod view;

pub use id::{IdError, TaskId};
pub use task::{parse_due_date, ParseError, Priority, Task, TaskDraft};
pub use undo::UndoEntry;
pub use list::{Action, Effect, Effects, TaskList};
pub use view::{Filter, Progress, SortMode};
