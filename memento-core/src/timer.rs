//! Logical timers.
//!
//! Time is a [`Duration`] on a clock supplied by the host. Tests drive it
//! by hand; the browser passes `Date.now()`. Nothing here sleeps.

use std::collections::BTreeMap;
use std::time::Duration;

/// Handle to a scheduled timer, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug)]
pub struct Scheduler<T> {
    next_id: u64,
    // Keyed by (deadline, handle) so equal deadlines fire in scheduling order.
    pending: BTreeMap<(Duration, TimerHandle), T>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: BTreeMap::new(),
        }
    }

    pub fn schedule(&mut self, deadline: Duration, payload: T) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.insert((deadline, handle), payload);
        handle
    }

    /// Cancel a pending timer, returning its payload. Fired or unknown handles yield `None`.
    pub fn cancel(&mut self, handle: TimerHandle) -> Option<T> {
        let key = self
            .pending
            .keys()
            .find(|(_, pending)| *pending == handle)
            .copied()?;
        self.pending.remove(&key)
    }

    /// Remove and return every payload whose deadline is at or before `now`, earliest first.
    pub fn expire(&mut self, now: Duration) -> Vec<T> {
        let later = self.pending.split_off(&(now, TimerHandle(u64::MAX)));
        let due = std::mem::replace(&mut self.pending, later);
        due.into_values().collect()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.keys().next().map(|(deadline, _)| *deadline)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
