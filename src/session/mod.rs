//! # Session
//!
//! Drives a [`TaskList`]: feeds it actions, carries out the effects it
//! returns, and keeps the prompt timers.
//!
//! | Effect | Carried out as |
//! |--------|----------------|
//! | `Persist` | [`Store::save`]; failures are logged and ignored |
//! | `Render` | [`Presenter::render`] with a fresh [`ViewModel`] |
//! | `ShowUndo` | presenter notified, undo timer (re)armed |
//! | `HideUndo` | presenter notified, undo timer cancelled |
//! | `Celebrate` | presenter notified, celebration timer armed |
//! | `ResetInput` | presenter notified |
//!
//! Everything runs on the caller's thread. Timers only fire when the host
//! calls [`Session::tick`]. When the undo timer fires the undo buffer is
//! dropped, so an undo after the offer has lapsed does nothing.

mod presenter;
mod timer;

use chrono::{DateTime, Utc};

use crate::domain::{Action, Effect, Effects, TaskList};
use crate::storage::{load_or_empty, SessionState, Store, TimerConfig};

pub use presenter::{NullPresenter, Presenter, ViewModel};
pub use timer::{Prompt, TimerSlot, Timers};

/// A task list bound to a store and a presenter
pub struct Session<S: Store, P: Presenter> {
    list: TaskList,
    store: S,
    presenter: P,
    timers: Timers,
    config: TimerConfig,
    celebrating: bool,
}

impl<S: Store, P: Presenter> Session<S, P> {
    /// Loads the list from `store` with the default view
    pub fn open(store: S, presenter: P, config: TimerConfig) -> Self {
        let list = TaskList::new(load_or_empty(&store));
        Self::with_list(list, store, presenter, config)
    }

    /// Loads the list and reinstates view settings and any pending undo
    /// from an earlier session, expiring the undo if its window has passed
    pub fn resume(
        store: S,
        presenter: P,
        config: TimerConfig,
        state: SessionState,
        now: DateTime<Utc>,
    ) -> Self {
        let has_undo = state.pending_undo.is_some();
        let list = TaskList::new(load_or_empty(&store))
            .with_view(state.filter, state.sort)
            .with_pending_undo(state.pending_undo);

        let mut session = Self::with_list(list, store, presenter, config);
        if has_undo {
            match state.undo_deadline {
                Some(deadline) => session.timers.arm_at(Prompt::Undo, deadline),
                None => session.timers.arm(Prompt::Undo, now, config.undo_window()),
            }
        }
        session.tick(now);
        session
    }

    fn with_list(list: TaskList, store: S, presenter: P, config: TimerConfig) -> Self {
        Self {
            list,
            store,
            presenter,
            timers: Timers::default(),
            config,
            celebrating: false,
        }
    }

    pub fn list(&self) -> &TaskList {
        &self.list
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn view(&self) -> ViewModel {
        ViewModel::build(&self.list, self.celebrating)
    }

    /// Renders the current view without changing anything
    pub fn render(&mut self) {
        let view = self.view();
        self.presenter.render(&view);
    }

    /// View settings and pending undo, for the next session
    pub fn snapshot(&self) -> SessionState {
        let pending_undo = self.list.pending_undo().cloned();
        let undo_deadline = pending_undo
            .as_ref()
            .and_then(|_| self.timers.deadline(Prompt::Undo));
        SessionState {
            filter: self.list.filter(),
            sort: self.list.sort(),
            pending_undo,
            undo_deadline,
        }
    }

    /// Applies an action and carries out its effects. Returns the effects.
    pub fn dispatch(&mut self, action: Action, now: DateTime<Utc>) -> Effects {
        tracing::debug!(target: "tally", ?action, "Dispatching");
        let effects = self.list.apply(action, now);
        if effects.is_empty() {
            tracing::debug!(target: "tally", "Action was a no-op");
        }
        for effect in &effects {
            self.run(effect, now);
        }
        effects
    }

    /// Fires every timer whose deadline has passed
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<Prompt> {
        let fired = self.timers.fire_due(now);
        for prompt in &fired {
            match prompt {
                Prompt::Undo => {
                    if self.list.expire_undo() {
                        tracing::debug!(target: "tally", "Undo window closed");
                    }
                    self.presenter.hide_undo();
                }
                Prompt::Celebration => {
                    self.celebrating = false;
                    self.presenter.hide_celebration();
                }
            }
        }
        fired
    }

    fn run(&mut self, effect: &Effect, now: DateTime<Utc>) {
        match effect {
            Effect::Persist => self.persist(),
            Effect::Render => self.render(),
            Effect::Celebrate => {
                self.celebrating = true;
                self.presenter.celebrate();
                self.timers
                    .arm(Prompt::Celebration, now, self.config.celebration_window());
            }
            Effect::ShowUndo(message) => {
                self.presenter.show_undo(message);
                self.timers.arm(Prompt::Undo, now, self.config.undo_window());
            }
            Effect::HideUndo => {
                self.presenter.hide_undo();
                self.timers.cancel(Prompt::Undo);
            }
            Effect::ResetInput => self.presenter.reset_input(),
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(self.list.tasks()) {
            tracing::error!(
                target: "tally",
                error = %e,
                "Failed to save tasks; keeping changes in memory only"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Task, TaskDraft, TaskId};
    use crate::storage::MemoryStore;
    use chrono::{Duration, TimeZone};

    #[derive(Debug, Default)]
    struct Recorder {
        renders: Vec<ViewModel>,
        events: Vec<String>,
    }

    impl Presenter for Recorder {
        fn render(&mut self, view: &ViewModel) {
            self.renders.push(view.clone());
        }

        fn show_undo(&mut self, message: &str) {
            self.events.push(format!("show_undo:{}", message));
        }

        fn hide_undo(&mut self) {
            self.events.push("hide_undo".into());
        }

        fn celebrate(&mut self) {
            self.events.push("celebrate".into());
        }

        fn hide_celebration(&mut self) {
            self.events.push("hide_celebration".into());
        }

        fn reset_input(&mut self) {
            self.events.push("reset_input".into());
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    fn session() -> Session<MemoryStore, Recorder> {
        Session::open(MemoryStore::new(), Recorder::default(), TimerConfig::default())
    }

    fn add(session: &mut Session<MemoryStore, Recorder>, text: &str, at: DateTime<Utc>) -> TaskId {
        session.dispatch(Action::Add(TaskDraft::new(text)), at);
        session.list().tasks()[0].id
    }

    #[test]
    fn open_loads_saved_tasks() {
        let task = Task::from_draft(TaskId::from_raw(1), TaskDraft::new("Saved"), t0()).unwrap();
        let store = MemoryStore::with_tasks(&[task]).unwrap();
        let session = Session::open(store, NullPresenter, TimerConfig::default());
        assert_eq!(session.list().tasks().len(), 1);
    }

    #[test]
    fn open_recovers_from_corrupt_store() {
        let store = MemoryStore::with_raw("{oops");
        let session = Session::open(store, NullPresenter, TimerConfig::default());
        assert!(session.list().tasks().is_empty());
    }

    #[test]
    fn add_persists_and_renders() {
        let mut session = session();
        add(&mut session, "Buy milk", t0());

        assert_eq!(session.store().write_count(), 1);
        assert_eq!(session.store().load().unwrap().len(), 1);
        let last = session.presenter().renders.last().unwrap();
        assert_eq!(last.tasks[0].text, "Buy milk");
        assert_eq!(last.progress.summary(), "0 of 1 tasks completed");
        assert_eq!(session.presenter().events, vec!["reset_input"]);
    }

    #[test]
    fn failed_save_keeps_memory_state() {
        let mut session = session();
        session.store().reject_writes(true);
        add(&mut session, "Unsaved", t0());

        assert_eq!(session.list().tasks().len(), 1);
        assert_eq!(session.store().write_count(), 0);
        assert!(session.store().raw().is_none());
    }

    #[test]
    fn undo_within_window_restores_and_cancels_timer() {
        let mut session = session();
        let id = add(&mut session, "A", t0());
        session.dispatch(Action::Delete(id), t0());
        assert_eq!(
            session.timers().deadline(Prompt::Undo),
            Some(t0() + Duration::seconds(5))
        );

        session.tick(t0() + Duration::seconds(4));
        session.dispatch(Action::Undo, t0() + Duration::seconds(4));

        assert_eq!(session.list().tasks().len(), 1);
        assert_eq!(session.timers().deadline(Prompt::Undo), None);
        assert_eq!(
            session.presenter().events,
            vec!["reset_input", "show_undo:Task deleted", "hide_undo"]
        );
    }

    #[test]
    fn expired_undo_is_dropped() {
        let mut session = session();
        let id = add(&mut session, "A", t0());
        session.dispatch(Action::Delete(id), t0());

        let fired = session.tick(t0() + Duration::seconds(5));
        assert_eq!(fired, vec![Prompt::Undo]);
        assert!(session.list().pending_undo().is_none());

        let effects = session.dispatch(Action::Undo, t0() + Duration::seconds(6));
        assert!(effects.is_empty());
        assert!(session.list().tasks().is_empty());
    }

    #[test]
    fn new_undo_prompt_replaces_pending_timer() {
        let mut session = session();
        let a = add(&mut session, "A", t0());
        let b = add(&mut session, "B", t0());
        session.dispatch(Action::Delete(a), t0());
        session.dispatch(Action::Delete(b), t0() + Duration::seconds(3));

        assert!(session.tick(t0() + Duration::seconds(6)).is_empty());
        session.dispatch(Action::Undo, t0() + Duration::seconds(6));

        let texts: Vec<_> = session.list().tasks().iter().map(|t| t.text.clone()).collect();
        assert_eq!(texts, vec!["B"]);
    }

    #[test]
    fn celebration_shows_and_hides() {
        let mut session = session();
        let id = add(&mut session, "Only", t0());
        session.dispatch(Action::Toggle(id), t0());
        assert!(session.view().celebrating);

        session.tick(t0() + Duration::seconds(4));
        assert!(!session.view().celebrating);
        assert_eq!(
            session.presenter().events,
            vec!["reset_input", "celebrate", "hide_celebration"]
        );
    }

    #[test]
    fn view_changes_do_not_persist() {
        let mut session = session();
        add(&mut session, "A", t0());
        let writes = session.store().write_count();

        session.dispatch(Action::SetFilter(crate::domain::Filter::Completed), t0());
        assert_eq!(session.store().write_count(), writes);
        assert!(session.presenter().renders.last().unwrap().tasks.is_empty());
    }

    #[test]
    fn snapshot_and_resume_keep_undo_deadline() {
        let mut session = session();
        let id = add(&mut session, "A", t0());
        session.dispatch(Action::Delete(id), t0());
        let state = session.snapshot();
        assert_eq!(state.undo_deadline, Some(t0() + Duration::seconds(5)));

        let store = MemoryStore::with_tasks(&[]).unwrap();
        let mut resumed = Session::resume(
            store,
            NullPresenter,
            TimerConfig::default(),
            state.clone(),
            t0() + Duration::seconds(2),
        );
        resumed.dispatch(Action::Undo, t0() + Duration::seconds(2));
        assert_eq!(resumed.list().tasks().len(), 1);

        let store = MemoryStore::with_tasks(&[]).unwrap();
        let late = Session::resume(
            store,
            NullPresenter,
            TimerConfig::default(),
            state,
            t0() + Duration::seconds(30),
        );
        assert!(late.list().pending_undo().is_none());
    }
}
