//! # Command-Line Interface
//!
//! The `tally` binary: one command per user action.
//!
//! ## Commands
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Setup | Create a task list | `init` |
//! | Tasks | Change the list | `add`, `toggle`, `edit`, `delete`, `move` |
//! | Bulk | Whole-list actions | `complete-all`, `clear-completed`, `undo` |
//! | View | Read the list | `list --filter active --sort due`, `progress` |
//!
//! ## Output Formats
//!
//! All commands support the `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Logging
//!
//! Logs go to stderr. `--verbose` (or `-v`) turns on debug logs; otherwise
//! `RUST_LOG` applies, defaulting to warnings only.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod render;
mod task;

pub use app::{Cli, Commands, run};
pub use output::{Output, OutputFormat};
pub use render::CliPresenter;
