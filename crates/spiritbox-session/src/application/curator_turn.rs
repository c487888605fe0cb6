//! Curator turn handler.
//!
//! Asks the curator for its proposal and applies whatever part of it passes
//! validation. Each field is accepted or rejected on its own; a rejected
//! field is logged as a warning and leaves state untouched.

use spiritbox_core::agent::{CuratorAgent, CuratorPrompt, GhostRole, Responder};
use spiritbox_core::error::DomainError;
use spiritbox_core::event::EventActor;
use tracing::debug;
use uuid::Uuid;

use crate::domain::actions::CuratorActions;
use crate::domain::conversation::{Message, MessageRole};
use crate::domain::events::{EventRecorder, SessionEventKind};
use crate::domain::state::SessionState;

/// Largest activity change a single curator proposal may make.
pub const MAX_ACTIVITY_DELTA: f64 = 1.0;

const DELTA_TOLERANCE: f64 = 1e-9;

fn build_prompt(
    state: &SessionState,
    recorder: &EventRecorder,
    query: &str,
    next_responder: Option<Responder>,
) -> CuratorPrompt {
    CuratorPrompt {
        activity_level: state.game.activity_level(),
        remaining_time: state.game.remaining_time(recorder.now()),
        primary_note: state.notes.primary.clone(),
        secondary_note: state.notes.secondary.clone(),
        transcript: state.conversation.to_string(),
        next_responder,
        query: query.to_owned(),
    }
}

fn apply_activity_level(
    proposed: f64,
    state: &mut SessionState,
    recorder: &mut EventRecorder,
    turn_id: Uuid,
) -> Option<f64> {
    let current = state.game.activity_level();
    if !proposed.is_finite() {
        recorder.warn(turn_id, format!("ignoring non-finite activity level {proposed}"));
        return None;
    }
    if (proposed - current).abs() > MAX_ACTIVITY_DELTA + DELTA_TOLERANCE {
        recorder.warn(
            turn_id,
            format!(
                "rejected activity level change from {current} to {proposed}: \
                 exceeds {MAX_ACTIVITY_DELTA}"
            ),
        );
        return None;
    }

    state.game.set_activity_level(proposed);
    let applied = state.game.activity_level();
    state.conversation.push(Message::new(
        MessageRole::Curator,
        format!("Activity level changed from {current} to {applied}"),
    ));
    Some(applied)
}

fn apply_timer_delta(
    delta: f64,
    state: &mut SessionState,
    recorder: &mut EventRecorder,
    turn_id: Uuid,
) -> Option<f64> {
    if !delta.is_finite() {
        recorder.warn(turn_id, format!("ignoring non-finite timer change {delta}"));
        return None;
    }
    let Some(total) = state.game.adjust_timer(delta) else {
        recorder.warn(
            turn_id,
            format!("rejected timer change of {delta} seconds: session has no timer"),
        );
        return None;
    };

    state.conversation.push(Message::new(
        MessageRole::Curator,
        format!("Timer adjusted by {delta:+} seconds, {total:.0} seconds in total"),
    ));
    Some(total)
}

/// Runs the curator for one turn or administrative command.
///
/// `next_responder` is the ghost (or ghosts) about to answer, or `None`
/// for an operator instruction. A proposed transcript correction is only
/// recorded in the returned actions; applying it is the caller's job.
///
/// # Errors
///
/// Returns `DomainError::AgentFailed` if the curator call fails. Nothing
/// has been applied in that case.
pub async fn run_curator(
    curator: &dyn CuratorAgent,
    state: &mut SessionState,
    recorder: &mut EventRecorder,
    turn_id: Uuid,
    query: &str,
    next_responder: Option<Responder>,
) -> Result<CuratorActions, DomainError> {
    let prompt = build_prompt(state, recorder, query, next_responder);
    let proposal = curator
        .ask(&prompt)
        .await
        .map_err(|e| DomainError::agent(EventActor::Curator, e))?;
    debug!(%turn_id, ?proposal, "curator proposal received");

    state.notes.apply(GhostRole::Primary, &proposal.primary_note);
    state.notes.apply(GhostRole::Secondary, &proposal.secondary_note);

    let new_activity_level = proposal
        .activity_level
        .and_then(|level| apply_activity_level(level, state, recorder, turn_id));
    let new_timer_total = proposal
        .timer_delta
        .and_then(|delta| apply_timer_delta(delta, state, recorder, turn_id));

    let actions = CuratorActions {
        reasoning: proposal.reasoning,
        primary_note: proposal.primary_note,
        secondary_note: proposal.secondary_note,
        new_activity_level,
        new_timer_total,
        user_prompt_correction: proposal
            .user_prompt_correction
            .filter(|text| !text.trim().is_empty()),
        game_result: proposal.game_result,
    };

    recorder.record(
        turn_id,
        &SessionEventKind::CuratorActed {
            actions: actions.clone(),
        },
    );
    Ok(actions)
}
