//! Tally - a local-first task list manager
//!
//! Tally keeps a single ordered list of short tasks. Tasks can be added,
//! edited, completed, reordered, filtered and sorted, and the last delete
//! or clear can be undone for a few seconds.
//!
//! The crate is layered:
//!
//! - [`domain`] - the task list state machine; returns effects, does no I/O
//! - [`storage`] - the [`storage::Store`] seam, file and memory stores, config
//! - [`session`] - runs the state machine against a store and a presenter
//! - [`cli`] - the `tally` binary

pub mod domain;
pub mod storage;
pub mod session;
pub mod cli;

pub use domain::{Action, Effect, Filter, Priority, SortMode, Task, TaskDraft, TaskId, TaskList};
pub use session::{Presenter, Session, ViewModel};
pub use storage::{FileStore, MemoryStore, Store};
