//! Scripted persona agents for tests.
//!
//! Each scripted agent answers from a queue and records every prompt it was
//! given. Clones share the queue and the recording, so a test can keep one
//! handle while the session owns another.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use spiritbox_core::agent::{
    CuratorAgent, CuratorPrompt, CuratorProposal, GhostAgent, GhostPrompt, GhostProposal,
};
use spiritbox_core::error::AgentError;

#[derive(Debug)]
struct Script<P, R> {
    replies: Mutex<VecDeque<Result<R, AgentError>>>,
    prompts: Mutex<Vec<P>>,
}

impl<P: Clone, R: Default> Script<P, R> {
    fn new(replies: Vec<Result<R, AgentError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn answer(&self, prompt: &P) -> Result<R, AgentError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        // An exhausted script keeps answering with an empty proposal.
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(R::default()))
    }

    fn prompts(&self) -> Vec<P> {
        self.prompts.lock().unwrap().clone()
    }
}

/// A curator that replays scripted proposals.
#[derive(Debug, Clone)]
pub struct ScriptedCurator {
    script: Arc<Script<CuratorPrompt, CuratorProposal>>,
}

impl ScriptedCurator {
    /// Answers with `proposals` in order, then with empty proposals.
    #[must_use]
    pub fn new(proposals: Vec<CuratorProposal>) -> Self {
        Self::with_results(proposals.into_iter().map(Ok).collect())
    }

    /// Answers with `results` in order, failures included.
    #[must_use]
    pub fn with_results(results: Vec<Result<CuratorProposal, AgentError>>) -> Self {
        Self {
            script: Arc::new(Script::new(results)),
        }
    }

    /// Every prompt received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn prompts(&self) -> Vec<CuratorPrompt> {
        self.script.prompts()
    }
}

#[async_trait]
impl CuratorAgent for ScriptedCurator {
    async fn ask(&self, prompt: &CuratorPrompt) -> Result<CuratorProposal, AgentError> {
        self.script.answer(prompt)
    }
}

/// A ghost that replays scripted proposals.
#[derive(Debug, Clone)]
pub struct ScriptedGhost {
    script: Arc<Script<GhostPrompt, GhostProposal>>,
}

impl ScriptedGhost {
    /// Answers with `proposals` in order, then with empty proposals.
    #[must_use]
    pub fn new(proposals: Vec<GhostProposal>) -> Self {
        Self::with_results(proposals.into_iter().map(Ok).collect())
    }

    /// Answers with `results` in order, failures included.
    #[must_use]
    pub fn with_results(results: Vec<Result<GhostProposal, AgentError>>) -> Self {
        Self {
            script: Arc::new(Script::new(results)),
        }
    }

    /// Every prompt received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn prompts(&self) -> Vec<GhostPrompt> {
        self.script.prompts()
    }
}

#[async_trait]
impl GhostAgent for ScriptedGhost {
    async fn ask(&self, prompt: &GhostPrompt) -> Result<GhostProposal, AgentError> {
        self.script.answer(prompt)
    }
}

/// A curator whose every call fails with the given error.
#[derive(Debug, Clone)]
pub struct FailingCurator(pub AgentError);

#[async_trait]
impl CuratorAgent for FailingCurator {
    async fn ask(&self, _prompt: &CuratorPrompt) -> Result<CuratorProposal, AgentError> {
        Err(self.0.clone())
    }
}

/// A ghost whose every call fails with the given error.
#[derive(Debug, Clone)]
pub struct FailingGhost(pub AgentError);

#[async_trait]
impl GhostAgent for FailingGhost {
    async fn ask(&self, _prompt: &GhostPrompt) -> Result<GhostProposal, AgentError> {
        Err(self.0.clone())
    }
}
