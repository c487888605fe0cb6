//! Turn orchestrator.
//!
//! One orchestrator owns one session's mutable state exclusively. Calls are
//! not reentrant: `&mut self` on every entry point makes the caller finish
//! one turn before starting the next.

use std::sync::Arc;

use spiritbox_content::domain::scenario::ScenarioDefinition;
use spiritbox_core::agent::{GameResult, GhostRole, Responder};
use spiritbox_core::error::DomainError;
use spiritbox_core::rng::DeterministicRng;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::application::curator_turn::run_curator;
use crate::application::ghost_turn::{GhostTurn, run_ghost};
use crate::application::personas::Personas;
use crate::domain::actions::{CuratorActions, TurnResult};
use crate::domain::config::SessionConfig;
use crate::domain::conversation::{Conversation, Message, MessageRole};
use crate::domain::events::{EventRecorder, SessionEventKind};
use crate::domain::notes::CuratorNotes;
use crate::domain::selection;
use crate::domain::state::{GameState, SessionState};

/// Runs turns of one session.
pub struct TurnOrchestrator {
    scenario: Arc<ScenarioDefinition>,
    config: SessionConfig,
    state: SessionState,
    personas: Personas,
    rng: Box<dyn DeterministicRng>,
    recorder: EventRecorder,
    outcome: Option<GameResult>,
}

impl TurnOrchestrator {
    /// Creates an orchestrator with fresh state. The timer, if configured,
    /// starts now.
    #[must_use]
    pub fn new(
        scenario: Arc<ScenarioDefinition>,
        config: SessionConfig,
        personas: Personas,
        rng: Box<dyn DeterministicRng>,
        recorder: EventRecorder,
    ) -> Self {
        let state = SessionState::new(&config, recorder.now());
        Self {
            scenario,
            config,
            state,
            personas,
            rng,
            recorder,
            outcome: None,
        }
    }

    /// Session identifier stamped on every event.
    #[must_use]
    pub fn session_id(&self) -> Uuid {
        self.recorder.session_id()
    }

    /// The scenario being played.
    #[must_use]
    pub fn scenario(&self) -> &Arc<ScenarioDefinition> {
        &self.scenario
    }

    /// The session configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Activity level and timer.
    #[must_use]
    pub fn game(&self) -> &GameState {
        &self.state.game
    }

    /// The transcript.
    #[must_use]
    pub fn conversation(&self) -> &Conversation {
        &self.state.conversation
    }

    /// The curator's current notes.
    #[must_use]
    pub fn notes(&self) -> &CuratorNotes {
        &self.state.notes
    }

    /// Terminal result, once the session has one.
    #[must_use]
    pub fn outcome(&self) -> Option<GameResult> {
        self.outcome
    }

    fn ensure_running(&self) -> Result<(), DomainError> {
        if self.outcome.is_some() {
            return Err(DomainError::SessionFinished);
        }
        Ok(())
    }

    /// Handles one participant utterance.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SessionFinished` after a terminal result and
    /// `DomainError::AgentFailed` if any persona call fails. Transcript
    /// appends made before the failure are kept.
    #[instrument(skip(self), fields(session_id = %self.recorder.session_id()))]
    pub async fn execute(&mut self, query: &str) -> Result<TurnResult, DomainError> {
        self.ensure_running()?;
        let turn_id = Uuid::new_v4();

        self.state
            .conversation
            .push(Message::new(MessageRole::User, query));
        let responder = selection::choose(self.state.game.activity_level(), self.rng.as_mut());
        debug!(%turn_id, %responder, "responder selected");

        let curator = run_curator(
            self.personas.curator.as_ref(),
            &mut self.state,
            &mut self.recorder,
            turn_id,
            query,
            Some(responder),
        )
        .await?;

        if let Some(result) = curator.game_result {
            return Ok(self.finish(turn_id, query, result, curator));
        }

        let query = self.apply_correction(turn_id, query, curator.user_prompt_correction.as_deref());

        let order = match responder {
            Responder::Primary => vec![GhostRole::Primary],
            Responder::Secondary => vec![GhostRole::Secondary],
            Responder::Both => selection::both_order(self.rng.as_mut()).to_vec(),
        };

        // Sequential on purpose: the second ghost reads the first one's
        // answer from the transcript.
        let mut primary = None;
        let mut secondary = None;
        for &role in &order {
            let turn = GhostTurn {
                role,
                turn_id,
                query: &query,
            };
            let actions = run_ghost(
                self.personas.ghost(role),
                turn,
                &self.config,
                &mut self.state,
                &mut self.recorder,
            )
            .await?;
            match role {
                GhostRole::Primary => primary = Some(actions),
                GhostRole::Secondary => secondary = Some(actions),
            }
        }

        self.state.game.increment_activity();
        let activity_level = self.state.game.activity_level();
        self.recorder.record(
            turn_id,
            &SessionEventKind::TurnCompleted {
                order: order.clone(),
                activity_level,
                game_result: None,
            },
        );
        info!(%turn_id, ?order, activity_level, "turn completed");

        Ok(TurnResult {
            turn_id,
            query,
            game_result: None,
            curator,
            primary,
            secondary,
            order,
            activity_level,
        })
    }

    /// Runs only the curator against an operator instruction. Nothing is
    /// pushed to the transcript as a user message and no ghost answers.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SessionFinished` after a terminal result and
    /// `DomainError::AgentFailed` if the curator call fails.
    #[instrument(skip(self), fields(session_id = %self.recorder.session_id()))]
    pub async fn execute_administrative_command(
        &mut self,
        instruction: &str,
    ) -> Result<CuratorActions, DomainError> {
        self.ensure_running()?;
        let command_id = Uuid::new_v4();

        let actions = run_curator(
            self.personas.curator.as_ref(),
            &mut self.state,
            &mut self.recorder,
            command_id,
            instruction,
            None,
        )
        .await?;

        if let Some(result) = actions.game_result {
            self.outcome = Some(result);
            info!(%command_id, ?result, "operator command ended the session");
        }
        Ok(actions)
    }

    /// Records `session.stopped` and consumes the orchestrator.
    pub fn close(mut self) {
        let activity_level = self.state.game.activity_level();
        self.recorder.record(
            Uuid::new_v4(),
            &SessionEventKind::SessionStopped {
                activity_level,
                game_result: self.outcome,
            },
        );
        info!(session_id = %self.recorder.session_id(), "session stopped");
    }

    fn finish(
        &mut self,
        turn_id: Uuid,
        query: &str,
        result: GameResult,
        curator: CuratorActions,
    ) -> TurnResult {
        self.outcome = Some(result);
        let activity_level = self.state.game.activity_level();
        self.recorder.record(
            turn_id,
            &SessionEventKind::TurnCompleted {
                order: Vec::new(),
                activity_level,
                game_result: Some(result),
            },
        );
        info!(%turn_id, ?result, "session reached a terminal result");

        TurnResult {
            turn_id,
            query: query.to_owned(),
            game_result: Some(result),
            curator,
            primary: None,
            secondary: None,
            order: Vec::new(),
            activity_level,
        }
    }

    fn apply_correction(&mut self, turn_id: Uuid, query: &str, correction: Option<&str>) -> String {
        let Some(corrected) = correction else {
            return query.to_owned();
        };
        match self
            .state
            .conversation
            .correct_latest_user(query, corrected)
        {
            Ok(()) => {
                info!(%turn_id, original = query, corrected, "transcript corrected");
                corrected.to_owned()
            }
            Err(e) => {
                self.recorder
                    .warn(turn_id, format!("skipped transcript correction: {e}"));
                query.to_owned()
            }
        }
    }
}

impl std::fmt::Debug for TurnOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnOrchestrator")
            .field("session_id", &self.recorder.session_id())
            .field("state", &self.state)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use spiritbox_core::agent::{CuratorProposal, GhostProposal, SpeechContent};
    use spiritbox_core::timeline::EventTimeline;
    use spiritbox_test_support::{FixedClock, MockRng, ScriptedCurator, ScriptedGhost, sample_scenario};

    use super::*;

    struct Harness {
        orchestrator: TurnOrchestrator,
        curator: ScriptedCurator,
        primary: ScriptedGhost,
        secondary: ScriptedGhost,
        timeline: Arc<EventTimeline>,
    }

    fn harness(
        curator: Vec<CuratorProposal>,
        primary: Vec<GhostProposal>,
        secondary: Vec<GhostProposal>,
        rng: Box<dyn DeterministicRng>,
    ) -> Harness {
        let curator = ScriptedCurator::new(curator);
        let primary = ScriptedGhost::new(primary);
        let secondary = ScriptedGhost::new(secondary);
        let timeline = Arc::new(EventTimeline::new());
        let recorder = EventRecorder::new(
            Uuid::new_v4(),
            timeline.clone(),
            Arc::new(FixedClock::default()),
        );
        let personas = Personas {
            curator: Arc::new(curator.clone()),
            primary: Arc::new(primary.clone()),
            secondary: Arc::new(secondary.clone()),
        };
        let config = SessionConfig {
            timer_seconds: None,
            ..SessionConfig::default()
        };
        let orchestrator = TurnOrchestrator::new(
            Arc::new(sample_scenario()),
            config,
            personas,
            rng,
            recorder,
        );
        Harness {
            orchestrator,
            curator,
            primary,
            secondary,
            timeline,
        }
    }

    fn words(items: &[&str]) -> SpeechContent {
        SpeechContent::Words(items.iter().map(|w| (*w).to_owned()).collect())
    }

    #[tokio::test]
    async fn test_low_activity_turn_runs_primary_and_increments() {
        // Arrange
        let mut h = harness(
            vec![CuratorProposal::default()],
            vec![GhostProposal {
                content: words(&["cold"]),
                ..GhostProposal::default()
            }],
            vec![],
            Box::new(MockRng),
        );

        // Act
        let result = h.orchestrator.execute("Is anyone here?").await.unwrap();

        // Assert
        assert_eq!(result.order, vec![GhostRole::Primary]);
        assert_eq!(result.primary.unwrap().speech, words(&["COLD"]));
        assert!(result.secondary.is_none());
        assert!((result.activity_level - 1.1).abs() < 1e-9);
        assert!(h.secondary.prompts().is_empty());

        let transcript = h.orchestrator.conversation().messages();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].role, MessageRole::User);
        assert_eq!(transcript[1].content, "COLD");

        let kinds: Vec<String> = h.timeline.list().into_iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec!["curator.acted", "ghost.acted", "turn.completed"]);
        assert!(
            h.timeline
                .list()
                .iter()
                .all(|e| e.metadata.correlation_id == result.turn_id)
        );
    }

    #[tokio::test]
    async fn test_terminal_result_skips_ghosts_and_growth() {
        // Arrange
        let mut h = harness(
            vec![CuratorProposal {
                game_result: Some(GameResult::Win),
                ..CuratorProposal::default()
            }],
            vec![],
            vec![],
            Box::new(MockRng),
        );

        // Act
        let result = h.orchestrator.execute("Be gone, Malkanar!").await.unwrap();

        // Assert
        assert_eq!(result.game_result, Some(GameResult::Win));
        assert!(result.order.is_empty());
        assert!((h.orchestrator.game().activity_level() - 1.0).abs() < f64::EPSILON);
        assert!(h.primary.prompts().is_empty());
        assert_eq!(h.orchestrator.outcome(), Some(GameResult::Win));
        assert!(matches!(
            h.orchestrator.execute("Hello?").await,
            Err(DomainError::SessionFinished)
        ));
        assert!(matches!(
            h.orchestrator.execute_administrative_command("reset").await,
            Err(DomainError::SessionFinished)
        ));
    }

    #[tokio::test]
    async fn test_administrative_command_runs_curator_only() {
        // Arrange
        let mut h = harness(
            vec![CuratorProposal {
                reasoning: "Operator asked for more tension".to_owned(),
                activity_level: Some(2.0),
                ..CuratorProposal::default()
            }],
            vec![],
            vec![],
            Box::new(MockRng),
        );

        // Act
        let actions = h
            .orchestrator
            .execute_administrative_command("Raise the activity")
            .await
            .unwrap();

        // Assert
        assert_eq!(actions.reasoning, "Operator asked for more tension");
        assert_eq!(actions.new_activity_level, Some(2.0));
        assert!(
            h.orchestrator
                .conversation()
                .messages()
                .iter()
                .all(|m| m.role != MessageRole::User)
        );
        let prompts = h.curator.prompts();
        assert_eq!(prompts[0].next_responder, None);
        assert_eq!(prompts[0].query, "Raise the activity");
        assert!(h.primary.prompts().is_empty());
        assert!(h.timeline.of_kind("turn.completed").is_empty());
    }

    #[tokio::test]
    async fn test_close_records_session_stopped() {
        // Arrange
        let h = harness(vec![], vec![], vec![], Box::new(MockRng));

        // Act
        h.orchestrator.close();

        // Assert
        let stopped = h.timeline.of_kind("session.stopped");
        assert_eq!(stopped.len(), 1);
        assert_eq!(stopped[0].metadata.sequence_number, 1);
    }
}
