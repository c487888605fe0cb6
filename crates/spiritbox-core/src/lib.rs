//! Spiritbox Core: shared abstractions for the turn engine.
//!
//! This crate defines the traits and types every other crate depends on:
//! the determinism seams (clock, RNG), the audit event sink, and the persona
//! ports through which curator and ghost agents are consulted. It contains
//! no game logic.

pub mod agent;
pub mod clock;
pub mod error;
pub mod event;
pub mod rng;
pub mod timeline;
