//! Runs a script against a real session.

use std::sync::Arc;

use serde::Serialize;
use spiritbox_content::domain::scenario::ScenarioDefinition;
use spiritbox_core::clock::Clock;
use spiritbox_core::error::DomainError;
use spiritbox_core::event::Event;
use spiritbox_core::rng::DeterministicRng;
use spiritbox_core::timeline::EventTimeline;
use spiritbox_session::application::host::SessionHost;
use spiritbox_session::domain::actions::{CuratorActions, TurnResult};
use spiritbox_session::domain::config::SessionConfig;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::script::{Script, ScriptBoard, ScriptFactory, Step};

/// What one script step produced.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepOutcome {
    /// A participant turn.
    Turn {
        /// The turn result.
        result: TurnResult,
    },
    /// An operator command.
    Command {
        /// The instruction given.
        instruction: String,
        /// The curator's validated response.
        actions: Option<CuratorActions>,
    },
}

/// Everything a replay produced.
#[derive(Debug, Serialize)]
pub struct ReplayReport {
    /// The replayed session.
    pub session_id: Uuid,
    /// One outcome per executed step.
    pub outcomes: Vec<StepOutcome>,
    /// Steps left unplayed because the session had already finished.
    pub skipped_steps: usize,
    /// The full event timeline.
    pub events: Vec<Event>,
}

/// Replays `script` in a fresh session over `scenario`.
///
/// # Errors
///
/// Returns `AppError::Domain` if the session cannot start or a step fails.
pub async fn run(
    scenario: ScenarioDefinition,
    config: SessionConfig,
    script: &Script,
    rng: Box<dyn DeterministicRng>,
    clock: Arc<dyn Clock>,
) -> Result<ReplayReport, AppError> {
    let board = Arc::new(ScriptBoard::new());
    let timeline = Arc::new(EventTimeline::new());
    let mut host = SessionHost::new(
        Arc::new(ScriptFactory::new(board.clone())),
        config,
        timeline.clone(),
        clock,
    );
    let session_id = host.start(scenario, rng)?;

    let mut outcomes = Vec::with_capacity(script.steps.len());
    let mut skipped_steps = 0;
    for (index, step) in script.steps.iter().enumerate() {
        board.load(step);
        let outcome = match step {
            Step::Turn { utterance, .. } => host
                .execute(utterance)
                .await
                .map(|result| StepOutcome::Turn { result }),
            Step::Command { command, .. } => host
                .execute_command(command)
                .await
                .map(|actions| StepOutcome::Command {
                    instruction: command.clone(),
                    actions,
                }),
        };
        match outcome {
            Ok(outcome) => outcomes.push(outcome),
            Err(DomainError::SessionFinished) => {
                skipped_steps = script.steps.len() - index;
                warn!(skipped_steps, "session finished before the script ended");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    host.stop();
    info!(%session_id, steps = outcomes.len(), "replay finished");
    Ok(ReplayReport {
        session_id,
        outcomes,
        skipped_steps,
        events: timeline.list(),
    })
}
