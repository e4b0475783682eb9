//! The task list state machine
//!
//! [`TaskList`] owns the tasks in manual order plus the view settings,
//! the edit cursor and the undo buffer. Operations mutate the list and
//! return the side effects the caller should carry out ([`Effect`]).
//! Nothing here performs I/O.
//!
//! Operations on unknown IDs, an undo with nothing buffered, and a reorder
//! with a missing endpoint are no-ops and return no effects.

use chrono::{DateTime, Utc};

use super::id::TaskId;
use super::task::{Task, TaskDraft};
use super::undo::UndoEntry;
use super::view::{self, Filter, Progress, SortMode};

/// A side effect requested by a state transition, in the order it should run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Write the task list to the store
    Persist,
    /// Refresh the presentation from the current view
    Render,
    /// Every task is now complete
    Celebrate,
    /// Offer an undo with this message
    ShowUndo(String),
    /// Withdraw the undo offer
    HideUndo,
    /// Clear the new-task input fields
    ResetInput,
}

pub type Effects = Vec<Effect>;

/// A user action, as delivered by the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Add(TaskDraft),
    Toggle(TaskId),
    StartEdit(TaskId),
    SaveEdit { id: TaskId, text: String },
    Delete(TaskId),
    ClearCompleted,
    Undo,
    MarkAllComplete,
    Reorder { dragged: TaskId, target: TaskId },
    SetFilter(Filter),
    SetSort(SortMode),
}

/// Task list state
#[derive(Debug, Clone, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
    filter: Filter,
    sort: SortMode,
    editing: Option<TaskId>,
    pending_undo: Option<UndoEntry>,
}

impl TaskList {
    /// Creates a list holding `tasks` in the given manual order
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            ..Default::default()
        }
    }

    /// Sets the initial view without emitting effects
    pub fn with_view(mut self, filter: Filter, sort: SortMode) -> Self {
        self.filter = filter;
        self.sort = sort;
        self
    }

    /// Reinstates an undo buffer carried over from an earlier session
    pub fn with_pending_undo(mut self, entry: Option<UndoEntry>) -> Self {
        self.pending_undo = entry;
        self
    }

    /// Tasks in manual order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn sort(&self) -> SortMode {
        self.sort
    }

    /// The task currently in edit mode
    pub fn editing(&self) -> Option<TaskId> {
        self.editing
    }

    pub fn pending_undo(&self) -> Option<&UndoEntry> {
        self.pending_undo.as_ref()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Highest ID among live tasks and the undo buffer
    fn highest_id(&self) -> Option<TaskId> {
        let live = self.tasks.iter().map(|t| t.id).max();
        let buffered = self.pending_undo.as_ref().and_then(UndoEntry::max_id);
        live.max(buffered)
    }

    fn all_completed(&self) -> bool {
        !self.tasks.is_empty() && self.tasks.iter().all(|t| t.completed)
    }

    /// Runs an action
    pub fn apply(&mut self, action: Action, now: DateTime<Utc>) -> Effects {
        match action {
            Action::Add(draft) => self.add_task(draft, now),
            Action::Toggle(id) => self.toggle_task(id),
            Action::StartEdit(id) => self.start_edit(id),
            Action::SaveEdit { id, text } => self.save_edit(id, &text),
            Action::Delete(id) => self.delete_task(id),
            Action::ClearCompleted => self.clear_completed(),
            Action::Undo => self.undo_delete(),
            Action::MarkAllComplete => self.mark_all_complete(),
            Action::Reorder { dragged, target } => self.reorder(dragged, target),
            Action::SetFilter(filter) => self.set_filter(filter),
            Action::SetSort(sort) => self.set_sort(sort),
        }
    }

    /// Prepends a new task. Blank text is ignored, as is an add once the
    /// ID space is exhausted.
    pub fn add_task(&mut self, draft: TaskDraft, now: DateTime<Utc>) -> Effects {
        let Some(id) = TaskId::next(now, self.highest_id()) else {
            return Vec::new();
        };
        let Some(task) = Task::from_draft(id, draft, now) else {
            return Vec::new();
        };

        self.tasks.insert(0, task);
        vec![Effect::Persist, Effect::Render, Effect::ResetInput]
    }

    /// Flips completion. Celebrates when this completes the last open task.
    pub fn toggle_task(&mut self, id: TaskId) -> Effects {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Vec::new();
        };

        let was_completed = task.completed;
        task.completed = !was_completed;

        let mut effects = vec![Effect::Persist, Effect::Render];
        if !was_completed && self.all_completed() {
            effects.push(Effect::Celebrate);
        }
        effects
    }

    /// Puts a task into edit mode, dropping any other task's draft
    pub fn start_edit(&mut self, id: TaskId) -> Effects {
        if self.position(id).is_none() {
            return Vec::new();
        }
        self.editing = Some(id);
        vec![Effect::Render]
    }

    /// Commits an edit if the text is non-blank. Always leaves edit mode.
    pub fn save_edit(&mut self, id: TaskId, new_text: &str) -> Effects {
        let committed = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .map(|t| t.rename(new_text))
            .unwrap_or(false);

        self.editing = None;

        if committed {
            vec![Effect::Persist, Effect::Render]
        } else {
            vec![Effect::Render]
        }
    }

    /// Removes a task and buffers it for undo
    pub fn delete_task(&mut self, id: TaskId) -> Effects {
        let Some(index) = self.position(id) else {
            return Vec::new();
        };

        let task = self.tasks.remove(index);
        if self.editing == Some(id) {
            self.editing = None;
        }

        let entry = UndoEntry::Single { task, index };
        let message = entry.message();
        self.pending_undo = Some(entry);

        vec![Effect::Persist, Effect::Render, Effect::ShowUndo(message)]
    }

    /// Removes every completed task and buffers them for undo
    pub fn clear_completed(&mut self) -> Effects {
        if !self.tasks.iter().any(|t| t.completed) {
            return Vec::new();
        }

        let (cleared, kept): (Vec<Task>, Vec<Task>) =
            std::mem::take(&mut self.tasks).into_iter().partition(|t| t.completed);
        self.tasks = kept;

        if let Some(editing) = self.editing {
            if cleared.iter().any(|t| t.id == editing) {
                self.editing = None;
            }
        }

        let entry = UndoEntry::Bulk { tasks: cleared };
        let message = entry.message();
        self.pending_undo = Some(entry);

        vec![Effect::Persist, Effect::Render, Effect::ShowUndo(message)]
    }

    /// Restores whatever the last destructive action removed
    pub fn undo_delete(&mut self) -> Effects {
        let Some(entry) = self.pending_undo.take() else {
            return Vec::new();
        };

        entry.restore_into(&mut self.tasks);
        vec![Effect::HideUndo, Effect::Persist, Effect::Render]
    }

    /// Drops the undo buffer once the undo offer has timed out.
    /// Returns true if something was buffered.
    pub fn expire_undo(&mut self) -> bool {
        self.pending_undo.take().is_some()
    }

    /// Completes every task
    pub fn mark_all_complete(&mut self) -> Effects {
        let had_incomplete = self.tasks.iter().any(|t| !t.completed);
        for task in &mut self.tasks {
            task.completed = true;
        }

        let mut effects = vec![Effect::Persist, Effect::Render];
        if had_incomplete && !self.tasks.is_empty() {
            effects.push(Effect::Celebrate);
        }
        effects
    }

    /// Moves `dragged` to the index `target` occupies before the move
    pub fn reorder(&mut self, dragged: TaskId, target: TaskId) -> Effects {
        if dragged == target {
            return Vec::new();
        }
        let (Some(from), Some(to)) = (self.position(dragged), self.position(target)) else {
            return Vec::new();
        };

        let task = self.tasks.remove(from);
        self.tasks.insert(to, task);
        vec![Effect::Persist, Effect::Render]
    }

    pub fn set_filter(&mut self, filter: Filter) -> Effects {
        self.filter = filter;
        vec![Effect::Render]
    }

    pub fn set_sort(&mut self, sort: SortMode) -> Effects {
        self.sort = sort;
        vec![Effect::Render]
    }

    /// The filtered and sorted view. Does not change the manual order.
    pub fn filtered_tasks(&self) -> Vec<Task> {
        view::project(&self.tasks, self.filter, self.sort)
    }

    pub fn progress(&self) -> Progress {
        Progress::of(&self.tasks)
    }
}
