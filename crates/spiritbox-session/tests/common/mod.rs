//! Shared helpers for session integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use spiritbox_content::domain::scenario::ScenarioDefinition;
use spiritbox_core::agent::{CuratorProposal, GhostProposal, SpeechContent};
use spiritbox_core::error::DomainError;
use spiritbox_core::rng::DeterministicRng;
use spiritbox_core::timeline::EventTimeline;
use spiritbox_session::application::orchestrator::TurnOrchestrator;
use spiritbox_session::application::personas::{PersonaFactory, Personas};
use spiritbox_session::domain::config::SessionConfig;
use spiritbox_session::domain::events::EventRecorder;
use spiritbox_test_support::{FixedClock, ScriptedCurator, ScriptedGhost, sample_scenario};
use uuid::Uuid;

/// Scripted personas plus handles to inspect what they were asked.
#[derive(Debug, Clone)]
pub struct Cast {
    pub curator: ScriptedCurator,
    pub primary: ScriptedGhost,
    pub secondary: ScriptedGhost,
}

impl Cast {
    pub fn new(
        curator: Vec<CuratorProposal>,
        primary: Vec<GhostProposal>,
        secondary: Vec<GhostProposal>,
    ) -> Self {
        Self {
            curator: ScriptedCurator::new(curator),
            primary: ScriptedGhost::new(primary),
            secondary: ScriptedGhost::new(secondary),
        }
    }

    pub fn personas(&self) -> Personas {
        Personas {
            curator: Arc::new(self.curator.clone()),
            primary: Arc::new(self.primary.clone()),
            secondary: Arc::new(self.secondary.clone()),
        }
    }
}

/// A factory handing out the same scripted cast for every session.
#[derive(Debug)]
pub struct CastFactory(pub Cast);

impl PersonaFactory for CastFactory {
    fn build(
        &self,
        _scenario: &ScenarioDefinition,
        _config: &SessionConfig,
    ) -> Result<Personas, DomainError> {
        Ok(self.0.personas())
    }
}

/// A factory that cannot build personas.
#[derive(Debug)]
pub struct BrokenFactory;

impl PersonaFactory for BrokenFactory {
    fn build(
        &self,
        _scenario: &ScenarioDefinition,
        _config: &SessionConfig,
    ) -> Result<Personas, DomainError> {
        Err(DomainError::Infrastructure("model endpoint unavailable".into()))
    }
}

/// Config without a timer, starting at `activity_level`.
pub fn config_at(activity_level: f64) -> SessionConfig {
    SessionConfig {
        initial_activity_level: activity_level,
        timer_seconds: None,
        ..SessionConfig::default()
    }
}

/// An orchestrator over the sample scenario with a fixed clock.
pub fn orchestrator(
    cast: &Cast,
    config: SessionConfig,
    rng: Box<dyn DeterministicRng>,
) -> (TurnOrchestrator, Arc<EventTimeline>) {
    orchestrator_with(cast.personas(), config, rng)
}

/// Like [`orchestrator`], with hand-assembled personas.
pub fn orchestrator_with(
    personas: Personas,
    config: SessionConfig,
    rng: Box<dyn DeterministicRng>,
) -> (TurnOrchestrator, Arc<EventTimeline>) {
    let timeline = Arc::new(EventTimeline::new());
    let recorder = EventRecorder::new(
        Uuid::new_v4(),
        timeline.clone(),
        Arc::new(FixedClock::default()),
    );
    let orchestrator = TurnOrchestrator::new(
        Arc::new(sample_scenario()),
        config,
        personas,
        rng,
        recorder,
    );
    (orchestrator, timeline)
}

pub fn words(items: &[&str]) -> SpeechContent {
    SpeechContent::Words(items.iter().map(|w| (*w).to_owned()).collect())
}
