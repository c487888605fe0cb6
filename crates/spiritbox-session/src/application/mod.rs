//! Turn handlers, the orchestrator, and the session host.

pub mod curator_turn;
pub mod ghost_turn;
pub mod host;
pub mod orchestrator;
pub mod personas;
