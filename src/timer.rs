use web_time::{Duration, Instant};

use crate::action::Action;
use crate::request::RequestId;

#[derive(Debug, Clone)]
struct Timer {
    id: RequestId,
    deadline: Instant,
    action: Action,
}

/// Pending delayed dispatches. Time only moves when the owner calls
/// [`TimerQueue::pop_due`].
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    timers: Vec<Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `action` at `now + delay`, replacing a timer with the same id.
    pub fn schedule(&mut self, id: RequestId, now: Instant, delay: Duration, action: Action) {
        self.cancel(id);
        self.timers.push(Timer {
            id,
            deadline: now + delay,
            action,
        });
    }

    /// Returns whether a timer was pending under `id`.
    pub fn cancel(&mut self, id: RequestId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.id != id);
        self.timers.len() != before
    }

    /// Removes and returns the earliest action due at `now`.
    ///
    /// One at a time, so that an action dispatched for one timer can still
    /// cancel the next.
    pub fn pop_due(&mut self, now: Instant) -> Option<Action> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.deadline <= now)
            .min_by_key(|(_, timer)| timer.deadline)
            .map(|(index, _)| index)?;
        Some(self.timers.remove(index).action)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.iter().map(|timer| timer.deadline).min()
    }
}
