//! Task CLI commands
//!
//! Each command resumes the session from disk, dispatches one action and
//! writes the session state back, so an undo offer survives between
//! invocations until its window closes.

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, Utc};

use super::output::Output;
use super::render::{print_view, task_row, CliPresenter, CELEBRATION};
use crate::domain::{Action, Effect, Effects, Filter, Priority, SortMode, TaskDraft, TaskId};
use crate::session::Session;
use crate::storage::{FileStore, Project};

type CliSession = Session<FileStore, CliPresenter>;

/// A project plus a resumed session, pinned to one clock reading
pub struct Context<'a> {
    project: &'a Project,
    session: CliSession,
    now: DateTime<Utc>,
    today: NaiveDate,
}

impl<'a> Context<'a> {
    pub fn open(project: &'a Project) -> Self {
        let now = Utc::now();
        let session = Session::resume(
            project.task_store(),
            CliPresenter::default(),
            project.config().project.timers,
            project.session_state(),
            now,
        );
        Self {
            project,
            session,
            now,
            today: Local::now().date_naive(),
        }
    }

    fn dispatch(&mut self, action: Action) -> Effects {
        self.session.dispatch(action, self.now)
    }

    fn undo_seconds(&self) -> u64 {
        self.project.config().project.timers.undo_seconds
    }

    /// Writes view settings and the undo buffer back to disk
    pub fn finish(self) -> Result<()> {
        self.project.save_session_state(&self.session.snapshot())
    }
}

/// Prints `message`, flagging the celebration in JSON and adding the
/// celebration line in text
fn report_with_celebration(output: &Output, ctx: &Context, message: &str) {
    let celebrated = ctx.session.presenter().celebrated;
    output.success_with(message, serde_json::json!({ "celebrate": celebrated }));
    if celebrated {
        output.line(CELEBRATION);
    }
}

fn not_found(output: &Output, id: TaskId) {
    output.unchanged(&format!("No task with id {}", id));
}

pub fn add(
    output: &Output,
    ctx: &mut Context,
    text: &str,
    priority: Priority,
    due: Option<NaiveDate>,
) -> Result<()> {
    let draft = TaskDraft {
        text: text.to_string(),
        priority,
        due_date: due,
    };

    let effects = ctx.dispatch(Action::Add(draft));
    if effects.is_empty() {
        output.unchanged("Nothing added: task text is empty");
        return Ok(());
    }

    let task = &ctx.session.list().tasks()[0];
    if output.is_json() {
        output.data(task);
    } else {
        output.success(&format!("Added task {}: {}", task.id, task.text));
    }
    Ok(())
}

pub fn list(
    output: &Output,
    ctx: &mut Context,
    filter: Option<Filter>,
    sort: Option<SortMode>,
) -> Result<()> {
    if let Some(filter) = filter {
        ctx.dispatch(Action::SetFilter(filter));
    }
    if let Some(sort) = sort {
        ctx.dispatch(Action::SetSort(sort));
    }

    print_view(output, &ctx.session.view(), ctx.today);
    Ok(())
}

pub fn toggle(output: &Output, ctx: &mut Context, id: TaskId) -> Result<()> {
    if ctx.dispatch(Action::Toggle(id)).is_empty() {
        not_found(output, id);
        return Ok(());
    }

    let Some(task) = ctx.session.list().get(id) else {
        return Ok(());
    };
    let verb = if task.completed { "Completed" } else { "Reopened" };
    let message = format!("{} task {}: {}", verb, task.id, task.text);
    report_with_celebration(output, ctx, &message);
    Ok(())
}

/// Edits go through edit mode exactly as an inline editor would: start,
/// then save. Blank text is rejected and the task keeps its old text.
pub fn edit(output: &Output, ctx: &mut Context, id: TaskId, text: &str) -> Result<()> {
    if ctx.dispatch(Action::StartEdit(id)).is_empty() {
        not_found(output, id);
        return Ok(());
    }

    let effects = ctx.dispatch(Action::SaveEdit {
        id,
        text: text.to_string(),
    });

    if effects.contains(&Effect::Persist) {
        if let Some(task) = ctx.session.list().get(id) {
            output.success(&format!("Updated task {}: {}", task.id, task.text));
        }
    } else {
        output.unchanged("Edit discarded: task text cannot be empty");
    }
    Ok(())
}

pub fn delete(output: &Output, ctx: &mut Context, id: TaskId) -> Result<()> {
    if ctx.dispatch(Action::Delete(id)).is_empty() {
        not_found(output, id);
        return Ok(());
    }

    report_undo_offer(output, ctx);
    Ok(())
}

pub fn clear_completed(output: &Output, ctx: &mut Context) -> Result<()> {
    if ctx.dispatch(Action::ClearCompleted).is_empty() {
        output.unchanged("No completed tasks to clear");
        return Ok(());
    }

    report_undo_offer(output, ctx);
    Ok(())
}

fn report_undo_offer(output: &Output, ctx: &Context) {
    let message = ctx
        .session
        .presenter()
        .undo_message
        .clone()
        .unwrap_or_default();
    output.success(&format!(
        "{}. Run 'tally undo' within {}s to restore.",
        message,
        ctx.undo_seconds()
    ));
}

pub fn undo(output: &Output, ctx: &mut Context) -> Result<()> {
    let Some(count) = ctx.session.list().pending_undo().map(|entry| entry.len()) else {
        output.unchanged("Nothing to undo");
        return Ok(());
    };

    ctx.dispatch(Action::Undo);
    let noun = if count == 1 { "task" } else { "tasks" };
    output.success(&format!("Restored {} {}", count, noun));
    Ok(())
}

pub fn complete_all(output: &Output, ctx: &mut Context) -> Result<()> {
    ctx.dispatch(Action::MarkAllComplete);

    let total = ctx.session.list().tasks().len();
    report_with_celebration(output, ctx, &format!("Marked {} tasks complete", total));
    Ok(())
}

pub fn reorder(output: &Output, ctx: &mut Context, dragged: TaskId, target: TaskId) -> Result<()> {
    if ctx
        .dispatch(Action::Reorder { dragged, target })
        .is_empty()
    {
        output.unchanged("Nothing moved: ids must be two different existing tasks");
        return Ok(());
    }

    let position = ctx
        .session
        .list()
        .tasks()
        .iter()
        .position(|t| t.id == dragged)
        .map(|i| i + 1)
        .unwrap_or_default();
    output.success(&format!("Moved task {} to position {}", dragged, position));

    if !output.is_json() {
        output.blank();
        for task in ctx.session.list().tasks() {
            output.line(&task_row(task, ctx.today, false));
        }
    }
    Ok(())
}

pub fn progress(output: &Output, ctx: &Context) -> Result<()> {
    let progress = ctx.session.list().progress();
    if output.is_json() {
        output.data(&progress);
    } else {
        output.success(&format!("{} ({:.0}%)", progress.summary(), progress.percentage));
    }
    Ok(())
}
