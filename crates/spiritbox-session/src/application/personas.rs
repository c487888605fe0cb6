//! The personas a session talks to, and how they are built.

use std::sync::Arc;

use spiritbox_content::domain::scenario::ScenarioDefinition;
use spiritbox_core::agent::{CuratorAgent, GhostAgent, GhostRole};
use spiritbox_core::error::DomainError;

use crate::domain::config::SessionConfig;

/// One curator and two ghosts, bound to a scenario.
#[derive(Clone)]
pub struct Personas {
    /// The supervising curator.
    pub curator: Arc<dyn CuratorAgent>,
    /// The primary ghost.
    pub primary: Arc<dyn GhostAgent>,
    /// The secondary ghost.
    pub secondary: Arc<dyn GhostAgent>,
}

impl Personas {
    /// The ghost agent playing `role`.
    #[must_use]
    pub fn ghost(&self, role: GhostRole) -> &dyn GhostAgent {
        match role {
            GhostRole::Primary => self.primary.as_ref(),
            GhostRole::Secondary => self.secondary.as_ref(),
        }
    }
}

impl std::fmt::Debug for Personas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Personas").finish_non_exhaustive()
    }
}

/// Builds the personas for a newly started session.
///
/// Implementations typically render the scenario into each persona's system
/// instructions and pick models from the config.
pub trait PersonaFactory: Send + Sync {
    /// Builds personas for `scenario`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if a persona cannot be constructed.
    fn build(
        &self,
        scenario: &ScenarioDefinition,
        config: &SessionConfig,
    ) -> Result<Personas, DomainError>;
}
