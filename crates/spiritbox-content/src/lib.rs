//! Spiritbox: Scenario Content.
//!
//! Read-only narrative content for one session: the two ghost identities,
//! their rituals and memories, shared lore and the final goal. Scenarios are
//! authored as JSON or YAML files and never mutated once a session starts.

pub mod application;
pub mod domain;
