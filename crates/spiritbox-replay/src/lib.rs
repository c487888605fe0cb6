//! Spiritbox replay harness.
//!
//! Drives a real session through the turn engine from a script of
//! utterances, operator commands and canned persona proposals, and reports
//! every turn result together with the event timeline.

pub mod error;
pub mod replay;
pub mod script;
pub mod settings;
