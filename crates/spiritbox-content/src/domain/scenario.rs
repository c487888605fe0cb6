//! Scenario definition types.

use serde::{Deserialize, Serialize};
use spiritbox_core::agent::GhostRole;
use spiritbox_core::error::DomainError;

/// A ritual the participants can perform by speaking its phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RitualDefinition {
    /// Ritual name.
    pub name: String,
    /// What the ritual does and when it applies.
    pub description: String,
    /// The phrase participants have to say.
    pub phrase: String,
}

/// Identity of one ghost persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GhostDefinition {
    /// Ghost name.
    pub name: String,
    /// Personality description.
    pub personality: String,
    /// What the ghost is trying to achieve.
    pub goals: String,
    /// Backstory.
    pub backstory: String,
    /// Example responses.
    pub hints: Vec<String>,
    /// Ritual tied to this ghost, if any.
    #[serde(default)]
    pub ritual: Option<RitualDefinition>,
    /// Memories the participants have to unlock, if any.
    #[serde(default)]
    pub key_memories: Option<Vec<String>>,
}

/// How the session is won.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalGoalDefinition {
    /// Textual explanation of the goal.
    pub description: String,
    /// Ritual that has to be performed to win, if any.
    #[serde(default)]
    pub ritual: Option<RitualDefinition>,
}

/// Immutable narrative content for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioDefinition {
    /// Short scenario category, e.g. "lost spirit and evil spirit".
    pub scenario_type: String,
    /// Setting description.
    pub scenario_description: String,
    /// The primary ghost.
    pub primary_ghost: GhostDefinition,
    /// The secondary ghost.
    pub secondary_ghost: GhostDefinition,
    /// Lore known to both ghosts.
    pub shared_lore: String,
    /// Win condition.
    pub final_goal: FinalGoalDefinition,
}

impl ScenarioDefinition {
    /// The definition of the ghost playing `role`.
    #[must_use]
    pub fn ghost(&self, role: GhostRole) -> &GhostDefinition {
        match role {
            GhostRole::Primary => &self.primary_ghost,
            GhostRole::Secondary => &self.secondary_ghost,
        }
    }

    /// Checks that every field a persona relies on is filled in.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Scenario` naming the first offending field.
    pub fn validate(&self) -> Result<(), DomainError> {
        require("scenario_type", &self.scenario_type)?;
        require("scenario_description", &self.scenario_description)?;
        require("shared_lore", &self.shared_lore)?;
        require("final_goal.description", &self.final_goal.description)?;
        if let Some(ritual) = &self.final_goal.ritual {
            validate_ritual("final_goal.ritual", ritual)?;
        }
        for role in [GhostRole::Primary, GhostRole::Secondary] {
            validate_ghost(role, self.ghost(role))?;
        }
        Ok(())
    }
}

fn require(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Scenario(format!("{field} must not be empty")));
    }
    Ok(())
}

fn validate_ritual(prefix: &str, ritual: &RitualDefinition) -> Result<(), DomainError> {
    require(&format!("{prefix}.name"), &ritual.name)?;
    require(&format!("{prefix}.phrase"), &ritual.phrase)
}

fn validate_ghost(role: GhostRole, ghost: &GhostDefinition) -> Result<(), DomainError> {
    let prefix = format!("{role}_ghost");
    require(&format!("{prefix}.name"), &ghost.name)?;
    require(&format!("{prefix}.personality"), &ghost.personality)?;
    require(&format!("{prefix}.goals"), &ghost.goals)?;
    require(&format!("{prefix}.backstory"), &ghost.backstory)?;
    if ghost.hints.iter().all(|hint| hint.trim().is_empty()) {
        return Err(DomainError::Scenario(format!(
            "{prefix}.hints must contain at least one example"
        )));
    }
    if let Some(ritual) = &ghost.ritual {
        validate_ritual(&format!("{prefix}.ritual"), ritual)?;
    }
    Ok(())
}
