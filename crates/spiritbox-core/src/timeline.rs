//! In-memory event timeline.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::event::{Event, EventSink};

/// An [`EventSink`] that keeps every event in memory, in push order.
///
/// Debug and operator surfaces read the timeline; the engine only pushes.
#[derive(Debug, Default)]
pub struct EventTimeline {
    events: Mutex<Vec<Event>>,
}

impl EventTimeline {
    /// Creates an empty timeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<Event>> {
        // A panic while pushing cannot leave the Vec half-written.
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a snapshot of every event pushed so far.
    #[must_use]
    pub fn list(&self) -> Vec<Event> {
        self.guard().clone()
    }

    /// Returns the events whose kind equals `kind`.
    #[must_use]
    pub fn of_kind(&self, kind: &str) -> Vec<Event> {
        self.guard()
            .iter()
            .filter(|event| event.kind == kind)
            .cloned()
            .collect()
    }

    /// Number of events pushed so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.guard().len()
    }

    /// Whether no event has been pushed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }
}

impl EventSink for EventTimeline {
    fn push(&self, event: Event) {
        self.guard().push(event);
    }
}
