/// Deferred one-shot actions, checked against the simulation clock.
use crate::progression::Carryover;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeferredAction {
    /// Rebuild the level keeping score and lives.
    RestartLevel(Carryover),
    /// Rebuild the level from default score and lives.
    FullReset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledEvent {
    pub due_at: u64,
    pub action: DeferredAction,
}

/// Pending deferred actions.  A restart or reset replaces the whole
/// `GameState`, schedule included; a terminal outcome clears whatever is
/// still pending before queueing its full reset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schedule {
    entries: Vec<ScheduledEvent>,
}

impl Schedule {
    pub fn push(&mut self, due_at: u64, action: DeferredAction) {
        self.entries.push(ScheduledEvent { due_at, action });
    }

    /// Remove and return every action due at or before `now`, earliest
    /// first.  Actions scheduled for the same instant keep insertion order.
    pub fn take_due(&mut self, now: u64) -> Vec<DeferredAction> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.entries.drain(..).partition(|e| e.due_at <= now);
        self.entries = pending;
        due.sort_by_key(|e| e.due_at);
        due.into_iter().map(|e| e.action).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[ScheduledEvent] {
        &self.entries
    }
}
