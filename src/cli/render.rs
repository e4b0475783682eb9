//! Terminal presenter
//!
//! The CLI runs one action per process, so instead of drawing on every
//! render it remembers what the session asked for and the command prints a
//! summary at the end.

use chrono::{Local, NaiveDate};

use super::output::Output;
use crate::domain::{view::due_label, Task};
use crate::session::{Presenter, ViewModel};

#[derive(Debug, Default)]
pub struct CliPresenter {
    pub last_view: Option<ViewModel>,
    pub undo_message: Option<String>,
    pub celebrated: bool,
}

impl Presenter for CliPresenter {
    fn render(&mut self, view: &ViewModel) {
        self.last_view = Some(view.clone());
    }

    fn show_undo(&mut self, message: &str) {
        self.undo_message = Some(message.to_string());
    }

    fn hide_undo(&mut self) {
        self.undo_message = None;
    }

    fn celebrate(&mut self) {
        self.celebrated = true;
    }
}

pub const CELEBRATION: &str = "All tasks completed! Great job!";

/// One line per task: checkbox, ID, priority, text, due label, local
/// creation date, editing marker
pub fn task_row(task: &Task, today: NaiveDate, editing: bool) -> String {
    let check = if task.completed { "[x]" } else { "[ ]" };
    let mut row = format!(
        "{} {}  {:<6}  {}",
        check,
        task.id,
        task.priority.as_str().to_uppercase(),
        task.text
    );
    if let Some(due) = task.due_date {
        row.push_str(&format!("  ({})", due_label(due, today)));
    }
    let added = task.created_at.with_timezone(&Local).date_naive();
    row.push_str(&format!("  Added {}", added.format("%Y-%m-%d")));
    if editing {
        row.push_str("  [editing]");
    }
    row
}

/// Prints the list view followed by progress and any pending undo
pub fn print_view(output: &Output, view: &ViewModel, today: NaiveDate) {
    if output.is_json() {
        output.data(view);
        return;
    }

    if view.tasks.is_empty() {
        output.line("All caught up! No tasks to show.");
    } else {
        for task in &view.tasks {
            output.line(&task_row(task, today, view.editing == Some(task.id)));
        }
    }

    output.blank();
    output.line(&format!(
        "{} ({:.0}%)  filter: {}  sort: {}",
        view.progress.summary(),
        view.progress.percentage,
        view.filter,
        view.sort
    ));
    if let Some(message) = &view.undo_message {
        output.line(&format!("{} (run 'tally undo' to restore)", message));
    }
}
