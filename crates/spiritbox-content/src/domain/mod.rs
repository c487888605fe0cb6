//! Scenario domain types.

pub mod scenario;
