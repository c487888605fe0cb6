//! Replay scripts and the personas that play them back.
//!
//! A script is a list of steps. Each step carries the proposals the
//! personas should return while that step runs; a ghost that is not
//! selected for a turn simply leaves its proposal unused.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde::Deserialize;
use spiritbox_content::domain::scenario::ScenarioDefinition;
use spiritbox_core::agent::{
    CuratorAgent, CuratorPrompt, CuratorProposal, GhostAgent, GhostPrompt, GhostProposal,
    GhostRole,
};
use spiritbox_core::error::{AgentError, DomainError};
use spiritbox_session::application::personas::{PersonaFactory, Personas};
use spiritbox_session::domain::config::SessionConfig;
use tracing::debug;

use crate::error::AppError;

/// One scripted step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    /// A participant utterance.
    Turn {
        /// What the participant said.
        utterance: String,
        /// The curator's proposal for this turn.
        #[serde(default)]
        curator: CuratorProposal,
        /// The primary ghost's proposal, used if it is selected.
        #[serde(default)]
        primary: GhostProposal,
        /// The secondary ghost's proposal, used if it is selected.
        #[serde(default)]
        secondary: GhostProposal,
    },
    /// An operator instruction to the curator.
    Command {
        /// The instruction.
        command: String,
        /// The curator's proposal for this command.
        #[serde(default)]
        curator: CuratorProposal,
    },
}

/// A whole replay script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Script {
    /// Steps, in order.
    pub steps: Vec<Step>,
}

impl Script {
    /// Parses a JSON script.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Json` if the document is not a valid script.
    pub fn parse(source: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Reads and parses a JSON script file.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the file cannot be read and `AppError::Json`
    /// if it is not a valid script.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        Self::parse(&std::fs::read_to_string(path)?)
    }
}

#[derive(Debug, Default)]
struct Slots {
    curator: Option<CuratorProposal>,
    primary: Option<GhostProposal>,
    secondary: Option<GhostProposal>,
}

/// Holds the proposals of the step currently being replayed.
#[derive(Debug, Default)]
pub struct ScriptBoard {
    slots: Mutex<Slots>,
}

impl ScriptBoard {
    /// Creates an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Loads the proposals of `step`, discarding any unused ones from the
    /// previous step.
    pub fn load(&self, step: &Step) {
        let mut slots = self.guard();
        match step {
            Step::Turn {
                curator,
                primary,
                secondary,
                ..
            } => {
                *slots = Slots {
                    curator: Some(curator.clone()),
                    primary: Some(primary.clone()),
                    secondary: Some(secondary.clone()),
                };
            }
            Step::Command { curator, .. } => {
                *slots = Slots {
                    curator: Some(curator.clone()),
                    ..Slots::default()
                };
            }
        }
    }

    fn take_curator(&self) -> Option<CuratorProposal> {
        self.guard().curator.take()
    }

    fn take_ghost(&self, role: GhostRole) -> Option<GhostProposal> {
        let mut slots = self.guard();
        match role {
            GhostRole::Primary => slots.primary.take(),
            GhostRole::Secondary => slots.secondary.take(),
        }
    }
}

#[derive(Debug)]
struct BoardCurator(Arc<ScriptBoard>);

#[async_trait]
impl CuratorAgent for BoardCurator {
    async fn ask(&self, prompt: &CuratorPrompt) -> Result<CuratorProposal, AgentError> {
        debug!(query = %prompt.query, "replaying curator proposal");
        self.0
            .take_curator()
            .ok_or_else(|| AgentError::InvalidResponse("no scripted curator proposal".into()))
    }
}

#[derive(Debug)]
struct BoardGhost {
    board: Arc<ScriptBoard>,
    role: GhostRole,
}

#[async_trait]
impl GhostAgent for BoardGhost {
    async fn ask(&self, prompt: &GhostPrompt) -> Result<GhostProposal, AgentError> {
        debug!(role = %self.role, query = %prompt.query, "replaying ghost proposal");
        self.board.take_ghost(self.role).ok_or_else(|| {
            AgentError::InvalidResponse(format!("no scripted {} ghost proposal", self.role))
        })
    }
}

/// Builds personas that answer from a shared [`ScriptBoard`].
#[derive(Debug, Clone)]
pub struct ScriptFactory {
    board: Arc<ScriptBoard>,
}

impl ScriptFactory {
    /// Creates a factory over `board`.
    #[must_use]
    pub fn new(board: Arc<ScriptBoard>) -> Self {
        Self { board }
    }
}

impl PersonaFactory for ScriptFactory {
    fn build(
        &self,
        scenario: &ScenarioDefinition,
        config: &SessionConfig,
    ) -> Result<Personas, DomainError> {
        debug!(
            scenario_type = %scenario.scenario_type,
            curator_model = %config.curator.model,
            ghost_model = %config.ghost.model,
            "building scripted personas"
        );
        Ok(Personas {
            curator: Arc::new(BoardCurator(self.board.clone())),
            primary: Arc::new(BoardGhost {
                board: self.board.clone(),
                role: GhostRole::Primary,
            }),
            secondary: Arc::new(BoardGhost {
                board: self.board.clone(),
                role: GhostRole::Secondary,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use spiritbox_core::agent::{GameResult, NoteUpdate, SpeechContent};
    use spiritbox_test_support::sample_scenario;

    use super::*;

    const SCRIPT: &str = r#"{
        "steps": [
            {
                "kind": "turn",
                "utterance": "Is anyone here?",
                "curator": { "reasoning": "Opening", "primary_ghost_note": "Be shy" },
                "primary": { "reasoning": "Scared", "content": ["cold"], "glitch": false }
            },
            {
                "kind": "command",
                "command": "Raise the activity",
                "curator": { "reasoning": "Operator", "activity_level": 2.0 }
            },
            {
                "kind": "turn",
                "utterance": "Be gone, Malkanar!",
                "curator": { "reasoning": "Ritual spoken", "game_result": "win" }
            }
        ]
    }"#;

    #[test]
    fn test_parse_reads_turns_and_commands() {
        let script = Script::parse(SCRIPT).unwrap();

        assert_eq!(script.steps.len(), 3);
        match &script.steps[0] {
            Step::Turn {
                utterance,
                curator,
                primary,
                secondary,
            } => {
                assert_eq!(utterance, "Is anyone here?");
                assert_eq!(curator.primary_note, NoteUpdate::Set("Be shy".to_owned()));
                assert_eq!(primary.content, SpeechContent::Words(vec!["cold".to_owned()]));
                assert_eq!(secondary, &GhostProposal::default());
            }
            Step::Command { .. } => panic!("expected a turn"),
        }
        assert!(matches!(
            &script.steps[2],
            Step::Turn { curator, .. } if curator.game_result == Some(GameResult::Win)
        ));
    }

    #[test]
    fn test_load_reads_script_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, SCRIPT).unwrap();

        let script = Script::load(&path).unwrap();
        let missing = Script::load(&dir.path().join("missing.json"));

        assert_eq!(script, Script::parse(SCRIPT).unwrap());
        assert!(matches!(missing, Err(AppError::Io(_))));
    }

    #[test]
    fn test_parse_rejects_unknown_step_kind() {
        let result = Script::parse(r#"{ "steps": [{ "kind": "dance" }] }"#);

        assert!(matches!(result, Err(AppError::Json(_))));
    }

    #[tokio::test]
    async fn test_board_personas_answer_once_per_step() {
        // Arrange
        let script = Script::parse(SCRIPT).unwrap();
        let board = Arc::new(ScriptBoard::new());
        let personas = ScriptFactory::new(board.clone())
            .build(&sample_scenario(), &SessionConfig::default())
            .unwrap();
        let prompt = CuratorPrompt {
            activity_level: 1.0,
            remaining_time: None,
            primary_note: None,
            secondary_note: None,
            transcript: String::new(),
            next_responder: None,
            query: "Is anyone here?".to_owned(),
        };

        // Act
        board.load(&script.steps[0]);
        let first = personas.curator.ask(&prompt).await;
        let second = personas.curator.ask(&prompt).await;

        // Assert
        assert_eq!(first.unwrap().reasoning, "Opening");
        assert!(matches!(second, Err(AgentError::InvalidResponse(_))));
    }
}
