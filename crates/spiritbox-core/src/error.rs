//! Domain error types.

use thiserror::Error;

use crate::event::EventActor;

/// Failure of a single persona agent call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AgentError {
    /// The remote request could not be completed.
    #[error("agent request failed: {0}")]
    Request(String),

    /// The remote agent did not answer in time.
    #[error("agent call timed out")]
    Timeout,

    /// The agent answered with something that does not fit its schema.
    #[error("invalid agent response: {0}")]
    InvalidResponse(String),
}

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A persona agent call failed; the whole turn fails with it.
    #[error("{persona} agent failed: {source}")]
    AgentFailed {
        /// The persona whose call failed.
        persona: EventActor,
        /// The underlying agent error.
        #[source]
        source: AgentError,
    },

    /// No session is currently running.
    #[error("no active session")]
    NoActiveSession,

    /// A session is already running and must be stopped first.
    #[error("a session is already running")]
    SessionAlreadyRunning,

    /// The session already reached a win/lose result.
    #[error("session already finished")]
    SessionFinished,

    /// A validation error in domain logic or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// A scenario could not be read or parsed.
    #[error("scenario error: {0}")]
    Scenario(String),

    /// An infrastructure error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Wraps an agent failure for the given persona.
    #[must_use]
    pub fn agent(persona: EventActor, source: AgentError) -> Self {
        Self::AgentFailed { persona, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_failure_message_names_persona() {
        let err = DomainError::agent(EventActor::Curator, AgentError::Timeout);

        assert_eq!(err.to_string(), "curator agent failed: agent call timed out");
    }
}
