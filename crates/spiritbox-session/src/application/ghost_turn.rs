//! Ghost turn handler.

use spiritbox_core::agent::{GhostAgent, GhostPrompt, GhostRole, SpeechContent, SpeechForms};
use spiritbox_core::error::DomainError;
use tracing::debug;
use uuid::Uuid;

use crate::domain::actions::GhostActions;
use crate::domain::config::SessionConfig;
use crate::domain::conversation::Message;
use crate::domain::events::{EventRecorder, SessionEventKind};
use crate::domain::speech::{sanitize, word_limit_for};
use crate::domain::state::SessionState;

/// Transcript annotation recorded for an accepted glitch.
pub const GLITCH_ANNOTATION: &str = "[glitch]";

/// Speech shapes unlocked at `activity_level`.
#[must_use]
pub fn speech_forms(config: &SessionConfig, activity_level: f64) -> SpeechForms {
    SpeechForms {
        word_list: activity_level >= config.speech_min_wordlist_level,
        sentence: activity_level >= config.speech_min_sentence_level,
    }
}

/// Everything a ghost turn reads besides the mutable session state.
#[derive(Debug, Clone, Copy)]
pub struct GhostTurn<'a> {
    /// The ghost answering.
    pub role: GhostRole,
    /// Turn this answer belongs to.
    pub turn_id: Uuid,
    /// The effective (possibly corrected) utterance.
    pub query: &'a str,
}

/// Runs one ghost for the current turn.
///
/// The glitch is gated on the activity level and the speech is sanitized
/// before it reaches the transcript. Exactly one `ghost.acted` event is
/// recorded per successful call.
///
/// # Errors
///
/// Returns `DomainError::AgentFailed` if the ghost call fails.
pub async fn run_ghost(
    ghost: &dyn GhostAgent,
    turn: GhostTurn<'_>,
    config: &SessionConfig,
    state: &mut SessionState,
    recorder: &mut EventRecorder,
) -> Result<GhostActions, DomainError> {
    let GhostTurn {
        role,
        turn_id,
        query,
    } = turn;
    let activity_level = state.game.activity_level();
    let prompt = GhostPrompt {
        role,
        activity_level,
        remaining_time: state.game.remaining_time(recorder.now()),
        note: state.notes.note_for(role).cloned(),
        transcript: state.conversation.to_string(),
        query: query.to_owned(),
        speech_forms: speech_forms(config, activity_level),
    };
    let proposal = ghost
        .ask(&prompt)
        .await
        .map_err(|e| DomainError::agent(role.actor(), e))?;
    debug!(%turn_id, %role, ?proposal, "ghost proposal received");

    let glitch = if proposal.glitch && activity_level < config.glitch_min_level {
        recorder.warn(
            turn_id,
            format!(
                "suppressed {role} ghost glitch at activity level {activity_level} \
                 (minimum {})",
                config.glitch_min_level
            ),
        );
        false
    } else if proposal.glitch {
        recorder.record(
            turn_id,
            &SessionEventKind::GlitchSignaled {
                role,
                activity_level,
            },
        );
        state
            .conversation
            .push(Message::new(role.into(), GLITCH_ANNOTATION));
        true
    } else {
        false
    };

    let limit = word_limit_for(
        &proposal.content,
        config.wordlist_word_limit,
        config.sentence_word_limit,
    );
    let mut speech = sanitize(proposal.content, limit);
    if speech.is_silent() {
        speech = SpeechContent::Silent;
    } else {
        state
            .conversation
            .push(Message::new(role.into(), speech.as_transcript_text()));
    }

    let actions = GhostActions {
        reasoning: proposal.reasoning,
        speech,
        glitch,
    };
    recorder.record(
        turn_id,
        &SessionEventKind::GhostActed {
            role,
            actions: actions.clone(),
        },
    );
    Ok(actions)
}
