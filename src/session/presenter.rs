//! The presentation seam
//!
//! A [`Presenter`] receives a typed [`ViewModel`] after every state change,
//! plus the prompt show/hide notifications. How it draws them is its own
//! business.

use serde::Serialize;

use crate::domain::{Filter, Progress, SortMode, Task, TaskId, TaskList};

/// Everything a renderer needs to draw the list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    /// Filtered and sorted tasks
    pub tasks: Vec<Task>,
    pub progress: Progress,
    pub filter: Filter,
    pub sort: SortMode,
    /// Task currently in edit mode
    pub editing: Option<TaskId>,
    /// Undo prompt text, if an undo is on offer
    pub undo_message: Option<String>,
    pub celebrating: bool,
}

impl ViewModel {
    pub fn build(list: &TaskList, celebrating: bool) -> Self {
        Self {
            tasks: list.filtered_tasks(),
            progress: list.progress(),
            filter: list.filter(),
            sort: list.sort(),
            editing: list.editing(),
            undo_message: list.pending_undo().map(|entry| entry.message()),
            celebrating,
        }
    }
}

/// Receives render requests and prompt notifications
pub trait Presenter {
    fn render(&mut self, view: &ViewModel);

    fn show_undo(&mut self, _message: &str) {}

    fn hide_undo(&mut self) {}

    fn celebrate(&mut self) {}

    fn hide_celebration(&mut self) {}

    /// Clear the new-task inputs after a successful add
    fn reset_input(&mut self) {}
}

/// Presenter that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn render(&mut self, _view: &ViewModel) {}
}
