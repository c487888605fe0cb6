//! Shared test doubles and fixtures for the spirit box engine.

mod agents;
mod clock;
mod rng;
mod scenario;

pub use agents::{FailingCurator, FailingGhost, ScriptedCurator, ScriptedGhost};
pub use clock::{FixedClock, ManualClock};
pub use rng::{MockRng, SequenceRng};
pub use scenario::sample_scenario;
