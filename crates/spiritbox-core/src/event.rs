//! Audit event abstractions.
//!
//! The turn engine pushes one immutable [`Event`] for every decision it
//! makes and every warning it raises. Events flow one way: the engine never
//! reads them back.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventActor {
    /// The engine itself (warnings, lifecycle).
    System,
    /// The primary ghost persona.
    Primary,
    /// The secondary ghost persona.
    Secondary,
    /// The supervising curator persona.
    Curator,
}

impl fmt::Display for EventActor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::System => "system",
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Curator => "curator",
        };
        f.write_str(name)
    }
}

/// Metadata attached to every event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Session this event belongs to.
    pub session_id: Uuid,
    /// Turn (or administrative command) that caused this event.
    pub correlation_id: Uuid,
    /// Strictly increasing position within the session, starting at 1.
    pub sequence_number: i64,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
}

/// An immutable audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Who produced the event.
    pub actor: EventActor,
    /// Dotted event type name, e.g. `curator.acted`.
    pub kind: String,
    /// Event-specific payload.
    pub payload: serde_json::Value,
}

/// Trait implemented by typed event payload enums.
pub trait DomainEvent: Send + Sync + fmt::Debug {
    /// Returns the event type name.
    fn event_type(&self) -> &'static str;

    /// Returns the actor the event is attributed to.
    fn actor(&self) -> EventActor;

    /// Serializes the event payload to JSON.
    fn to_payload(&self) -> serde_json::Value;
}

/// Append-only destination for events.
pub trait EventSink: Send + Sync {
    /// Appends one event.
    fn push(&self, event: Event);
}
