//! Copy-to-clipboard feedback.
//!
//! The clipboard write belongs to the host. On the web it is an async promise,
//! so activation is split into [`CopyFeedback::payload`], the write itself, and
//! [`CopyFeedback::copied`] or [`CopyFeedback::failed`]. [`CopyFeedback::activate`]
//! chains them for hosts with a synchronous clipboard.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, error};

use crate::dom::{Document, Selector, closest, find_all, find_first};
use crate::labels::CopyLabels;
use crate::sections::{CARD_CLASS, COPY_PAYLOAD_ATTR, COPY_TRIGGER_CLASS};
use crate::timer::{Scheduler, TimerHandle};

/// How long the "copied" state stays up.
pub const COPIED_FEEDBACK: Duration = Duration::from_millis(1500);

pub const TRIGGER_COPIED_CLASS: &str = "command__btn--copied";
pub const CARD_COPIED_CLASS: &str = "command--copied";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("clipboard write failed: {0}")]
pub struct ClipboardError(pub String);

pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard that keeps every write in memory.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    writes: Vec<String>,
    fail: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard that rejects every write, like a browser without permission.
    pub fn denied() -> Self {
        Self {
            writes: Vec::new(),
            fail: true,
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.writes.last().map(String::as_str)
    }

    pub fn writes(&self) -> &[String] {
        &self.writes
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.fail {
            return Err(ClipboardError("permission denied".to_string()));
        }
        self.writes.push(text.to_string());
        Ok(())
    }
}

#[derive(Debug)]
struct Feedback<N> {
    trigger: N,
    card: Option<N>,
    label: Option<N>,
    original_label: Option<String>,
    original_aria: Option<String>,
    timer: TimerHandle,
}

#[derive(Debug)]
pub struct CopyFeedback<N> {
    labels: CopyLabels,
    duration: Duration,
    active: Vec<Feedback<N>>,
    timers: Scheduler<N>,
}

impl<N: Clone + PartialEq> CopyFeedback<N> {
    pub fn new(labels: CopyLabels) -> Self {
        Self::with_duration(labels, COPIED_FEEDBACK)
    }

    pub fn with_duration(labels: CopyLabels, duration: Duration) -> Self {
        Self {
            labels,
            duration,
            active: Vec::new(),
            timers: Scheduler::new(),
        }
    }

    /// Every copy trigger in the document that carries a payload.
    pub fn triggers<D: Document<Node = N>>(&self, doc: &D) -> Vec<N> {
        find_all(doc, &doc.document_element(), Selector::Class(COPY_TRIGGER_CLASS))
            .into_iter()
            .filter(|trigger| self.payload(doc, trigger).is_some())
            .collect()
    }

    /// The literal text a trigger copies. Triggers without one do nothing.
    pub fn payload<D: Document<Node = N>>(&self, doc: &D, trigger: &N) -> Option<String> {
        doc.attribute(trigger, COPY_PAYLOAD_ATTR)
            .filter(|payload| !payload.is_empty())
    }

    /// Write the payload and show feedback. Returns whether anything was copied.
    pub fn activate<D, C>(
        &mut self,
        doc: &mut D,
        clipboard: &mut C,
        trigger: &N,
        now: Duration,
    ) -> bool
    where
        D: Document<Node = N>,
        C: Clipboard + ?Sized,
    {
        let Some(payload) = self.payload(doc, trigger) else {
            return false;
        };

        match clipboard.write_text(&payload) {
            Ok(()) => {
                self.copied(doc, trigger, now);
                true
            }
            Err(err) => {
                self.failed(&err);
                false
            }
        }
    }

    /// Apply the "copied" state and (re)start the revert timer.
    pub fn copied<D: Document<Node = N>>(&mut self, doc: &mut D, trigger: &N, now: Duration) {
        let deadline = now + self.duration;

        if let Some(active) = self.active.iter_mut().find(|f| f.trigger == *trigger) {
            // Re-activation restarts the window; the originals captured the first time stay.
            self.timers.cancel(active.timer);
            active.timer = self.timers.schedule(deadline, trigger.clone());
            debug!(?deadline, "copy feedback restarted");
            return;
        }

        let card = closest(doc, trigger, Selector::Class(CARD_CLASS));
        let label = find_first(doc, trigger, Selector::Tag("span"));
        let original_label = label.as_ref().map(|label| doc.text(label));
        let original_aria = doc.attribute(trigger, "aria-label");

        doc.add_class(trigger, TRIGGER_COPIED_CLASS);
        if let Some(card) = &card {
            doc.add_class(card, CARD_COPIED_CLASS);
        }
        doc.set_attribute(trigger, "aria-label", &self.labels.copied_aria);
        if let Some(label) = &label {
            doc.set_text(label, &self.labels.copied);
        }

        let timer = self.timers.schedule(deadline, trigger.clone());
        self.active.push(Feedback {
            trigger: trigger.clone(),
            card,
            label,
            original_label,
            original_aria,
            timer,
        });
    }

    pub fn failed(&self, err: &ClipboardError) {
        error!("error while copying: {err}");
    }

    /// Revert every trigger whose window has elapsed. Returns how many were reverted.
    pub fn tick<D: Document<Node = N>>(&mut self, doc: &mut D, now: Duration) -> usize {
        let expired = self.timers.expire(now);
        for trigger in &expired {
            let Some(index) = self.active.iter().position(|f| f.trigger == *trigger) else {
                continue;
            };
            let feedback = self.active.remove(index);
            self.restore(doc, feedback);
        }
        expired.len()
    }

    fn restore<D: Document<Node = N>>(&self, doc: &mut D, feedback: Feedback<N>) {
        doc.remove_class(&feedback.trigger, TRIGGER_COPIED_CLASS);
        if let Some(card) = &feedback.card {
            doc.remove_class(card, CARD_COPIED_CLASS);
        }
        let aria = feedback
            .original_aria
            .unwrap_or_else(|| self.labels.idle_aria.clone());
        doc.set_attribute(&feedback.trigger, "aria-label", &aria);
        if let (Some(label), Some(text)) = (&feedback.label, &feedback.original_label) {
            doc.set_text(label, text);
        }
    }

    pub fn is_copied(&self, trigger: &N) -> bool {
        self.active.iter().any(|f| f.trigger == *trigger)
    }

    /// When the next revert is due, for hosts that arm a real timer.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Category, Entry};
    use crate::sections::render_sections;
    use crate::virtual_dom::{NodeId, VirtualDocument};

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn page(values: &[&str]) -> (VirtualDocument, Vec<NodeId>) {
        let mut doc = VirtualDocument::new();
        let root = doc.document_element();
        let app = doc.create_element("main").unwrap();
        doc.append_child(&root, &app);
        let category = Category {
            id: "basics".to_string(),
            icon: "fas fa-play".to_string(),
            title: "Basics".to_string(),
            toggle_label: None,
            entries: values
                .iter()
                .map(|value| Entry {
                    description: format!("Run {value}"),
                    value: value.to_string(),
                })
                .collect(),
        };
        render_sections(&mut doc, &app, &[category]).unwrap();
        let triggers = find_all(&doc, &root, Selector::Class(COPY_TRIGGER_CLASS));
        (doc, triggers)
    }

    fn label_text(doc: &VirtualDocument, trigger: &NodeId) -> String {
        let span = find_first(doc, trigger, Selector::Tag("span")).unwrap();
        doc.text(&span)
    }

    #[test]
    fn test_copies_payload_and_shows_feedback() {
        let (mut doc, triggers) = page(&["git status"]);
        let trigger = triggers[0];
        let card = doc.parent(&trigger).unwrap();
        let mut clipboard = MemoryClipboard::new();
        let mut feedback = CopyFeedback::new(CopyLabels::default());

        assert!(feedback.activate(&mut doc, &mut clipboard, &trigger, ms(0)));

        assert_eq!(clipboard.contents(), Some("git status"));
        assert!(doc.has_class(&trigger, TRIGGER_COPIED_CLASS));
        assert!(doc.has_class(&card, CARD_COPIED_CLASS));
        assert_eq!(
            doc.attribute(&trigger, "aria-label").as_deref(),
            Some("The command has been copied.")
        );
        assert_eq!(label_text(&doc, &trigger), "Copied!");
    }

    #[test]
    fn test_reverts_after_window_and_not_before() {
        let (mut doc, triggers) = page(&["git status"]);
        let trigger = triggers[0];
        let mut clipboard = MemoryClipboard::new();
        let mut feedback = CopyFeedback::new(CopyLabels::default());
        feedback.activate(&mut doc, &mut clipboard, &trigger, ms(100));

        assert_eq!(feedback.next_deadline(), Some(ms(1600)));
        assert_eq!(feedback.tick(&mut doc, ms(1599)), 0);
        assert!(doc.has_class(&trigger, TRIGGER_COPIED_CLASS));

        assert_eq!(feedback.tick(&mut doc, ms(1600)), 1);
        assert!(!doc.has_class(&trigger, TRIGGER_COPIED_CLASS));
        assert!(!feedback.is_copied(&trigger));
        assert_eq!(
            doc.attribute(&trigger, "aria-label").as_deref(),
            Some("Copy the command.")
        );
        assert_eq!(label_text(&doc, &trigger), "Copy");
    }

    #[test]
    fn test_reactivation_restarts_window_and_keeps_original_label() {
        let (mut doc, triggers) = page(&["git status"]);
        let trigger = triggers[0];
        let mut clipboard = MemoryClipboard::new();
        let mut feedback = CopyFeedback::new(CopyLabels::default());

        feedback.activate(&mut doc, &mut clipboard, &trigger, ms(0));
        feedback.activate(&mut doc, &mut clipboard, &trigger, ms(1000));

        assert_eq!(feedback.tick(&mut doc, ms(1500)), 0);
        assert!(doc.has_class(&trigger, TRIGGER_COPIED_CLASS));

        feedback.tick(&mut doc, ms(2500));
        assert!(!doc.has_class(&trigger, TRIGGER_COPIED_CLASS));
        assert_eq!(label_text(&doc, &trigger), "Copy");
        assert_eq!(clipboard.writes().len(), 2);
    }

    #[test]
    fn test_triggers_are_independent() {
        let (mut doc, triggers) = page(&["git add .", "git commit"]);
        let mut clipboard = MemoryClipboard::new();
        let mut feedback = CopyFeedback::new(CopyLabels::default());

        feedback.activate(&mut doc, &mut clipboard, &triggers[0], ms(0));
        feedback.activate(&mut doc, &mut clipboard, &triggers[1], ms(700));

        feedback.tick(&mut doc, ms(1500));
        assert!(!doc.has_class(&triggers[0], TRIGGER_COPIED_CLASS));
        assert!(doc.has_class(&triggers[1], TRIGGER_COPIED_CLASS));
        assert_eq!(clipboard.contents(), Some("git commit"));
    }

    #[test]
    fn test_clipboard_failure_shows_no_feedback() {
        let (mut doc, triggers) = page(&["git status"]);
        let mut clipboard = MemoryClipboard::denied();
        let mut feedback = CopyFeedback::new(CopyLabels::default());

        assert!(!feedback.activate(&mut doc, &mut clipboard, &triggers[0], ms(0)));
        assert!(!doc.has_class(&triggers[0], TRIGGER_COPIED_CLASS));
        assert_eq!(label_text(&doc, &triggers[0]), "Copy");
    }

    #[test]
    fn test_trigger_without_payload_is_a_no_op() {
        let (mut doc, triggers) = page(&["git status"]);
        let bare = doc.create_element("button").unwrap();
        doc.add_class(&bare, COPY_TRIGGER_CLASS);
        let mut clipboard = MemoryClipboard::new();
        let mut feedback = CopyFeedback::new(CopyLabels::default());

        assert!(!feedback.activate(&mut doc, &mut clipboard, &bare, ms(0)));
        assert!(clipboard.writes().is_empty());
        assert_eq!(feedback.triggers(&doc), triggers);
    }
}
