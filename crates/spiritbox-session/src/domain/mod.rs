//! Domain model of a running session.

pub mod actions;
pub mod config;
pub mod conversation;
pub mod events;
pub mod notes;
pub mod selection;
pub mod speech;
pub mod state;
