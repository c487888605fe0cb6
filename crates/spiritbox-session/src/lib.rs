//! Spiritbox: Turn Orchestration.
//!
//! Given one participant utterance, decides which ghost(s) answer, lets the
//! curator validate and steer the session, applies only the proposals that
//! pass validation, and returns a structured turn result for presentation.

pub mod application;
pub mod domain;
