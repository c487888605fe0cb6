//! Domain events for a spirit box session.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use spiritbox_core::agent::{GameResult, GhostRole};
use spiritbox_core::clock::Clock;
use spiritbox_core::event::{DomainEvent, Event, EventActor, EventMetadata, EventSink};
use tracing::warn;
use uuid::Uuid;

use super::actions::{CuratorActions, GhostActions};

/// Event payload variants of a session.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SessionEventKind {
    /// A session was started for a scenario.
    SessionStarted {
        /// Scenario type of the loaded scenario.
        scenario_type: String,
        /// Content fingerprint of the loaded scenario.
        fingerprint: String,
    },
    /// The running session was stopped.
    SessionStopped {
        /// Final activity level.
        activity_level: f64,
        /// Terminal result, if one was reached.
        game_result: Option<GameResult>,
    },
    /// The curator's validated actions.
    CuratorActed {
        /// What was applied.
        actions: CuratorActions,
    },
    /// A ghost's validated actions.
    GhostActed {
        /// The ghost.
        role: GhostRole,
        /// What was applied.
        actions: GhostActions,
    },
    /// A ghost's glitch was accepted.
    GlitchSignaled {
        /// The ghost that glitched.
        role: GhostRole,
        /// Activity level at the time.
        activity_level: f64,
    },
    /// A proposal was rejected or degraded.
    Warning {
        /// Human-readable description.
        message: String,
    },
    /// A turn ran to completion.
    TurnCompleted {
        /// Ghosts that answered, in order.
        order: Vec<GhostRole>,
        /// Activity level at the end of the turn.
        activity_level: f64,
        /// Terminal result, if the curator ended the session.
        game_result: Option<GameResult>,
    },
}

impl DomainEvent for SessionEventKind {
    fn event_type(&self) -> &'static str {
        match self {
            Self::SessionStarted { .. } => "session.started",
            Self::SessionStopped { .. } => "session.stopped",
            Self::CuratorActed { .. } => "curator.acted",
            Self::GhostActed { .. } => "ghost.acted",
            Self::GlitchSignaled { .. } => "ghost.glitch_signaled",
            Self::Warning { .. } => "system.warning",
            Self::TurnCompleted { .. } => "turn.completed",
        }
    }

    fn actor(&self) -> EventActor {
        match self {
            Self::CuratorActed { .. } => EventActor::Curator,
            Self::GhostActed { role, .. } | Self::GlitchSignaled { role, .. } => role.actor(),
            Self::SessionStarted { .. }
            | Self::SessionStopped { .. }
            | Self::Warning { .. }
            | Self::TurnCompleted { .. } => EventActor::System,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(self).expect("SessionEventKind serialization is infallible")
    }
}

/// Stamps events with session metadata and pushes them to a sink.
///
/// Sequence numbers start at 1 and grow by one per event for the lifetime
/// of the session.
pub struct EventRecorder {
    session_id: Uuid,
    sink: Arc<dyn EventSink>,
    clock: Arc<dyn Clock>,
    next_sequence: i64,
}

impl EventRecorder {
    /// Creates a recorder for `session_id`.
    #[must_use]
    pub fn new(session_id: Uuid, sink: Arc<dyn EventSink>, clock: Arc<dyn Clock>) -> Self {
        Self {
            session_id,
            sink,
            clock,
            next_sequence: 1,
        }
    }

    /// The session this recorder stamps events with.
    #[must_use]
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// The current time according to the injected clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Records one event caused by `correlation_id`.
    pub fn record(&mut self, correlation_id: Uuid, kind: &SessionEventKind) {
        let event = Event {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                session_id: self.session_id,
                correlation_id,
                sequence_number: self.next_sequence,
                occurred_at: self.clock.now(),
            },
            actor: kind.actor(),
            kind: kind.event_type().to_owned(),
            payload: kind.to_payload(),
        };
        self.next_sequence += 1;
        self.sink.push(event);
    }

    /// Logs a warning and records it as a `system.warning` event.
    pub fn warn(&mut self, correlation_id: Uuid, message: impl Into<String>) {
        let message = message.into();
        warn!(session_id = %self.session_id, %correlation_id, "{message}");
        self.record(correlation_id, &SessionEventKind::Warning { message });
    }
}

impl std::fmt::Debug for EventRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRecorder")
            .field("session_id", &self.session_id)
            .field("next_sequence", &self.next_sequence)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spiritbox_core::timeline::EventTimeline;
    use spiritbox_test_support::FixedClock;

    fn recorder() -> (Arc<EventTimeline>, EventRecorder) {
        let timeline = Arc::new(EventTimeline::new());
        let clock = Arc::new(FixedClock::default());
        let recorder = EventRecorder::new(Uuid::new_v4(), timeline.clone(), clock);
        (timeline, recorder)
    }

    #[test]
    fn test_record_assigns_increasing_sequence_numbers() {
        let (timeline, mut recorder) = recorder();
        let turn = Uuid::new_v4();

        recorder.record(
            turn,
            &SessionEventKind::TurnCompleted {
                order: vec![GhostRole::Primary],
                activity_level: 1.1,
                game_result: None,
            },
        );
        recorder.warn(turn, "activity change rejected");

        let events = timeline.list();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].metadata.sequence_number, 1);
        assert_eq!(events[1].metadata.sequence_number, 2);
        assert!(events.iter().all(|e| e.metadata.correlation_id == turn));
        assert_eq!(events[1].kind, "system.warning");
        assert_eq!(events[1].actor, EventActor::System);
        assert_eq!(events[1].payload["message"], "activity change rejected");
    }

    #[test]
    fn test_ghost_events_are_attributed_to_the_ghost() {
        let kind = SessionEventKind::GlitchSignaled {
            role: GhostRole::Secondary,
            activity_level: 5.0,
        };

        assert_eq!(kind.actor(), EventActor::Secondary);
        assert_eq!(kind.event_type(), "ghost.glitch_signaled");
        assert_eq!(kind.to_payload()["role"], "secondary");
    }
}
