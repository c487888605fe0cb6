//! The session transcript.

use std::fmt;

use serde::{Deserialize, Serialize};
use spiritbox_core::agent::GhostRole;
use thiserror::Error;

/// Who a transcript message is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// A participant utterance.
    User,
    /// The primary ghost.
    Primary,
    /// The secondary ghost.
    Secondary,
    /// A curator annotation.
    Curator,
}

impl From<GhostRole> for MessageRole {
    fn from(role: GhostRole) -> Self {
        match role {
            GhostRole::Primary => Self::Primary,
            GhostRole::Secondary => Self::Secondary,
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::User => "user",
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Curator => "curator",
        };
        f.write_str(name)
    }
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Author of the message.
    pub role: MessageRole,
    /// Message text.
    pub content: String,
}

impl Message {
    /// Creates a message.
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Why a transcript correction was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorrectionError {
    /// The transcript has no user message yet.
    #[error("transcript has no user message to correct")]
    NoUserMessage,
    /// The latest user message is not the utterance the correction targets.
    #[error("latest user message {found:?} does not match {expected:?}")]
    Mismatch {
        /// The utterance the correction was meant for.
        expected: String,
        /// What the latest user message actually says.
        found: String,
    },
}

/// Append-only ordered transcript.
///
/// Messages are never reordered or removed. The only in-place edit is
/// [`Conversation::correct_latest_user`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Creates an empty transcript.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// All messages in order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the transcript is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recent message.
    #[must_use]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    fn latest_user_index(&self) -> Option<usize> {
        self.messages
            .iter()
            .rposition(|message| message.role == MessageRole::User)
    }

    /// The most recent user message.
    #[must_use]
    pub fn latest_user(&self) -> Option<&Message> {
        self.latest_user_index().map(|index| &self.messages[index])
    }

    /// Rewrites the most recent user message, but only if it still reads
    /// exactly `expected`.
    ///
    /// # Errors
    ///
    /// Returns `CorrectionError` and leaves the transcript untouched when
    /// there is no user message or its content differs from `expected`.
    pub fn correct_latest_user(
        &mut self,
        expected: &str,
        corrected: impl Into<String>,
    ) -> Result<(), CorrectionError> {
        let index = self
            .latest_user_index()
            .ok_or(CorrectionError::NoUserMessage)?;
        let message = &mut self.messages[index];
        if message.content != expected {
            return Err(CorrectionError::Mismatch {
                expected: expected.to_owned(),
                found: message.content.clone(),
            });
        }
        message.content = corrected.into();
        Ok(())
    }
}

/// Renders one `role: content` line per message, marking the newest user
/// message as the current interaction.
impl fmt::Display for Conversation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current = self.latest_user_index();
        for (index, message) in self.messages.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            if Some(index) == current {
                write!(f, "(current interaction) >> ")?;
            }
            write!(f, "{}: {}", message.role, message.content)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript() -> Conversation {
        let mut conversation = Conversation::new();
        conversation.push(Message::new(MessageRole::User, "Is anyone here?"));
        conversation.push(Message::new(MessageRole::Primary, "COLD"));
        conversation.push(Message::new(MessageRole::User, "Be gone Melonar"));
        conversation.push(Message::new(MessageRole::Curator, "Activity level changed"));
        conversation
    }

    #[test]
    fn test_render_marks_only_latest_user_message() {
        let rendered = transcript().to_string();

        assert_eq!(
            rendered,
            "user: Is anyone here?\n\
             primary: COLD\n\
             (current interaction) >> user: Be gone Melonar\n\
             curator: Activity level changed"
        );
    }

    #[test]
    fn test_render_empty_transcript_is_empty() {
        assert_eq!(Conversation::new().to_string(), "");
    }

    #[test]
    fn test_correct_latest_user_replaces_matching_message() {
        let mut conversation = transcript();

        conversation
            .correct_latest_user("Be gone Melonar", "Be gone, Malkanar!")
            .unwrap();

        assert_eq!(
            conversation.latest_user().map(|m| m.content.as_str()),
            Some("Be gone, Malkanar!")
        );
        assert_eq!(conversation.messages()[0].content, "Is anyone here?");
        assert_eq!(conversation.len(), 4);
    }

    #[test]
    fn test_correct_latest_user_rejects_mismatch() {
        let mut conversation = transcript();
        let before = conversation.clone();

        let result = conversation.correct_latest_user("Is anyone here?", "Hello?");

        assert_eq!(
            result,
            Err(CorrectionError::Mismatch {
                expected: "Is anyone here?".to_owned(),
                found: "Be gone Melonar".to_owned(),
            })
        );
        assert_eq!(conversation, before);
    }

    #[test]
    fn test_correct_latest_user_without_user_message() {
        let mut conversation = Conversation::new();
        conversation.push(Message::new(MessageRole::Curator, "note"));

        assert_eq!(
            conversation.correct_latest_user("x", "y"),
            Err(CorrectionError::NoUserMessage)
        );
    }

    #[test]
    fn test_message_role_from_ghost_role() {
        assert_eq!(MessageRole::from(GhostRole::Secondary), MessageRole::Secondary);
        assert_eq!(MessageRole::Primary.to_string(), "primary");
    }
}
