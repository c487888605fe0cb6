//! Validated per-turn outcomes.
//!
//! These are what the engine actually applied, as opposed to the raw
//! proposals the personas returned.

use serde::Serialize;
use spiritbox_core::agent::{GameResult, GhostRole, NoteUpdate, SpeechContent};
use uuid::Uuid;

/// What the curator's proposal amounted to after validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CuratorActions {
    /// The curator's justification.
    pub reasoning: String,
    /// Note update for the primary ghost.
    pub primary_note: NoteUpdate,
    /// Note update for the secondary ghost.
    pub secondary_note: NoteUpdate,
    /// Activity level after an accepted change.
    pub new_activity_level: Option<f64>,
    /// Timer total after an accepted adjustment.
    pub new_timer_total: Option<f64>,
    /// Proposed transcript correction, applied by the orchestrator.
    pub user_prompt_correction: Option<String>,
    /// Terminal result, if the curator ended the session.
    pub game_result: Option<GameResult>,
}

/// What a ghost's proposal amounted to after validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GhostActions {
    /// The ghost's justification.
    pub reasoning: String,
    /// Sanitized speech.
    pub speech: SpeechContent,
    /// Whether a glitch was signaled.
    pub glitch: bool,
}

/// Outcome of one executed turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnResult {
    /// Correlation id shared by every event of this turn.
    pub turn_id: Uuid,
    /// The utterance after any accepted correction.
    pub query: String,
    /// Terminal result; when set, no ghost answered.
    pub game_result: Option<GameResult>,
    /// Validated curator outcome.
    pub curator: CuratorActions,
    /// Primary ghost outcome, if it answered.
    pub primary: Option<GhostActions>,
    /// Secondary ghost outcome, if it answered.
    pub secondary: Option<GhostActions>,
    /// Order in which the ghosts answered.
    pub order: Vec<GhostRole>,
    /// Activity level at the end of the turn.
    pub activity_level: f64,
}

impl TurnResult {
    /// The outcome of `role`, if it answered.
    #[must_use]
    pub fn ghost(&self, role: GhostRole) -> Option<&GhostActions> {
        match role {
            GhostRole::Primary => self.primary.as_ref(),
            GhostRole::Secondary => self.secondary.as_ref(),
        }
    }
}
