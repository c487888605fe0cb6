//! Session host: owns at most one running session.

use std::sync::Arc;

use spiritbox_content::application::ingest::fingerprint;
use spiritbox_content::domain::scenario::ScenarioDefinition;
use spiritbox_core::clock::Clock;
use spiritbox_core::error::DomainError;
use spiritbox_core::event::EventSink;
use spiritbox_core::rng::DeterministicRng;
use tracing::info;
use uuid::Uuid;

use crate::application::orchestrator::TurnOrchestrator;
use crate::application::personas::PersonaFactory;
use crate::domain::actions::{CuratorActions, TurnResult};
use crate::domain::config::SessionConfig;
use crate::domain::events::{EventRecorder, SessionEventKind};

/// Starts, stops and forwards to the single running session.
pub struct SessionHost {
    factory: Arc<dyn PersonaFactory>,
    config: SessionConfig,
    sink: Arc<dyn EventSink>,
    clock: Arc<dyn Clock>,
    session: Option<TurnOrchestrator>,
}

impl SessionHost {
    /// Creates an idle host.
    #[must_use]
    pub fn new(
        factory: Arc<dyn PersonaFactory>,
        config: SessionConfig,
        sink: Arc<dyn EventSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            factory,
            config,
            sink,
            clock,
            session: None,
        }
    }

    /// Whether a session is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    /// The running session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&TurnOrchestrator> {
        self.session.as_ref()
    }

    /// The scenario of the running session, if any.
    #[must_use]
    pub fn current_scenario(&self) -> Option<&ScenarioDefinition> {
        self.session.as_ref().map(|session| session.scenario().as_ref())
    }

    /// Starts a session for `scenario` and returns its id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SessionAlreadyRunning` if a session is running,
    /// `DomainError::Scenario` if the scenario is invalid, and whatever the
    /// persona factory fails with.
    pub fn start(
        &mut self,
        scenario: ScenarioDefinition,
        rng: Box<dyn DeterministicRng>,
    ) -> Result<Uuid, DomainError> {
        if self.session.is_some() {
            return Err(DomainError::SessionAlreadyRunning);
        }
        scenario.validate()?;
        let fingerprint = fingerprint(&scenario)?;
        let personas = self.factory.build(&scenario, &self.config)?;

        let session_id = Uuid::new_v4();
        let mut recorder = EventRecorder::new(session_id, self.sink.clone(), self.clock.clone());
        recorder.record(
            Uuid::new_v4(),
            &SessionEventKind::SessionStarted {
                scenario_type: scenario.scenario_type.clone(),
                fingerprint: fingerprint.clone(),
            },
        );
        info!(
            %session_id,
            scenario_type = %scenario.scenario_type,
            %fingerprint,
            "session started"
        );

        self.session = Some(TurnOrchestrator::new(
            Arc::new(scenario),
            self.config.clone(),
            personas,
            rng,
            recorder,
        ));
        Ok(session_id)
    }

    /// Stops the running session. Returns whether one was running.
    pub fn stop(&mut self) -> bool {
        match self.session.take() {
            Some(session) => {
                session.close();
                true
            }
            None => false,
        }
    }

    /// Forwards an utterance to the running session.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NoActiveSession` when idle, otherwise whatever
    /// the turn fails with.
    pub async fn execute(&mut self, query: &str) -> Result<TurnResult, DomainError> {
        let session = self.session.as_mut().ok_or(DomainError::NoActiveSession)?;
        session.execute(query).await
    }

    /// Forwards an operator instruction to the running session. Returns
    /// `None` when idle.
    ///
    /// # Errors
    ///
    /// Returns whatever the administrative command fails with.
    pub async fn execute_command(
        &mut self,
        instruction: &str,
    ) -> Result<Option<CuratorActions>, DomainError> {
        match self.session.as_mut() {
            Some(session) => session
                .execute_administrative_command(instruction)
                .await
                .map(Some),
            None => Ok(None),
        }
    }
}

impl std::fmt::Debug for SessionHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHost")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
