//! Prompt auto-hide timers
//!
//! One slot per prompt kind. Arming a slot replaces whatever deadline it
//! held, so at most one hide is pending per prompt. Nothing runs in the
//! background: the owner polls [`Timers::fire_due`] with the current time.

use chrono::{DateTime, Duration, Utc};

/// Prompts that hide themselves after a delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    Undo,
    Celebration,
}

/// A single replaceable deadline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerSlot {
    deadline: Option<DateTime<Utc>>,
}

impl TimerSlot {
    pub fn arm(&mut self, deadline: DateTime<Utc>) {
        self.deadline = Some(deadline);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Clears and reports the slot if its deadline has passed
    fn take_due(&mut self, now: DateTime<Utc>) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Hide timers for the undo prompt and the celebration
#[derive(Debug, Clone, Default)]
pub struct Timers {
    undo: TimerSlot,
    celebration: TimerSlot,
}

impl Timers {
    fn slot_mut(&mut self, prompt: Prompt) -> &mut TimerSlot {
        match prompt {
            Prompt::Undo => &mut self.undo,
            Prompt::Celebration => &mut self.celebration,
        }
    }

    /// Starts (or restarts) the hide timer for `prompt`. A deadline past
    /// the end of representable time is clamped to it.
    pub fn arm(&mut self, prompt: Prompt, now: DateTime<Utc>, delay: Duration) {
        let deadline = now
            .checked_add_signed(delay)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.slot_mut(prompt).arm(deadline);
    }

    /// Restores a deadline carried over from an earlier session
    pub fn arm_at(&mut self, prompt: Prompt, deadline: DateTime<Utc>) {
        self.slot_mut(prompt).arm(deadline);
    }

    pub fn cancel(&mut self, prompt: Prompt) {
        self.slot_mut(prompt).cancel();
    }

    pub fn deadline(&self, prompt: Prompt) -> Option<DateTime<Utc>> {
        match prompt {
            Prompt::Undo => self.undo.deadline(),
            Prompt::Celebration => self.celebration.deadline(),
        }
    }

    /// Returns the prompts whose deadlines have passed, clearing their slots
    pub fn fire_due(&mut self, now: DateTime<Utc>) -> Vec<Prompt> {
        let mut fired = Vec::new();
        if self.undo.take_due(now) {
            fired.push(Prompt::Undo);
        }
        if self.celebration.take_due(now) {
            fired.push(Prompt::Celebration);
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    #[test]
    fn fires_once_after_deadline() {
        let mut timers = Timers::default();
        timers.arm(Prompt::Undo, t0(), Duration::seconds(5));

        assert!(timers.fire_due(t0() + Duration::seconds(4)).is_empty());
        assert_eq!(timers.fire_due(t0() + Duration::seconds(5)), vec![Prompt::Undo]);
        assert!(timers.fire_due(t0() + Duration::seconds(60)).is_empty());
    }

    #[test]
    fn rearming_replaces_deadline() {
        let mut timers = Timers::default();
        timers.arm(Prompt::Undo, t0(), Duration::seconds(5));
        timers.arm(Prompt::Undo, t0() + Duration::seconds(3), Duration::seconds(5));

        assert!(timers.fire_due(t0() + Duration::seconds(6)).is_empty());
        assert_eq!(timers.fire_due(t0() + Duration::seconds(8)), vec![Prompt::Undo]);
    }

    #[test]
    fn cancel_clears_slot() {
        let mut timers = Timers::default();
        timers.arm(Prompt::Undo, t0(), Duration::seconds(5));
        timers.cancel(Prompt::Undo);
        assert_eq!(timers.deadline(Prompt::Undo), None);
        assert!(timers.fire_due(t0() + Duration::seconds(10)).is_empty());
    }

    #[test]
    fn slots_are_independent() {
        let mut timers = Timers::default();
        timers.arm(Prompt::Undo, t0(), Duration::seconds(5));
        timers.arm(Prompt::Celebration, t0(), Duration::seconds(4));

        assert_eq!(
            timers.fire_due(t0() + Duration::seconds(4)),
            vec![Prompt::Celebration]
        );
        assert_eq!(
            timers.deadline(Prompt::Undo),
            Some(t0() + Duration::seconds(5))
        );
    }

    #[test]
    fn overlong_delay_clamps_deadline() {
        let mut timers = Timers::default();
        timers.arm(Prompt::Undo, t0(), Duration::MAX);

        assert_eq!(timers.deadline(Prompt::Undo), Some(DateTime::<Utc>::MAX_UTC));
        assert!(timers.fire_due(t0() + Duration::days(365)).is_empty());
    }
}
