//! One-shot timer policy for reverting copy feedback.
//!
//! The browser only offers one-shot timeouts, while the page keeps one
//! deadline per copied trigger. At most one timeout is armed at a time, always
//! for the earliest pending deadline. When it fires, the page reverts what is
//! due and the next timeout is armed for whatever is still pending.

use std::time::Duration;

use memento_core::{Document, Page, PreferenceStore};

/// Margin past a deadline so a timeout never lands just before it.
const WAKE_MARGIN: Duration = Duration::from_millis(1);

#[derive(Debug, Default)]
pub struct RestoreSchedule {
    armed: Option<Duration>,
}

impl RestoreSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy completed. Returns the delay of a timeout to arm, unless the armed
    /// one already comes first.
    pub fn after_copy<D: Document, S: PreferenceStore>(
        &mut self,
        page: &Page<D, S>,
        now: Duration,
    ) -> Option<Duration> {
        let deadline = page.next_deadline()?;
        if self.armed.is_some_and(|armed| armed <= deadline) {
            return None;
        }
        self.armed = Some(deadline);
        Some(deadline.saturating_sub(now) + WAKE_MARGIN)
    }

    /// The armed timeout fired. Reverts what is due and returns the delay of the
    /// next timeout while feedback is still pending.
    pub fn fired<D: Document, S: PreferenceStore>(
        &mut self,
        page: &mut Page<D, S>,
        now: Duration,
    ) -> Option<Duration> {
        self.armed = None;
        page.advance(now);
        self.after_copy(page, now)
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }
}
