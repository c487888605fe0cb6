//! Persona ports and their typed schemas.
//!
//! The engine never talks to a language model directly. It hands a
//! [`CuratorPrompt`] or [`GhostPrompt`] (the template inputs) to an agent
//! implementation and receives an already-parsed proposal back. Proposals are
//! untrusted: the session crate validates every field before applying it.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AgentError;
use crate::event::EventActor;

/// One of the two responding ghost personas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GhostRole {
    /// The primary ghost, active from the first turn.
    Primary,
    /// The secondary ghost, joining as activity rises.
    Secondary,
}

impl GhostRole {
    /// The event actor that represents this ghost.
    #[must_use]
    pub fn actor(self) -> EventActor {
        match self {
            Self::Primary => EventActor::Primary,
            Self::Secondary => EventActor::Secondary,
        }
    }
}

impl fmt::Display for GhostRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.actor().fmt(f)
    }
}

/// Which ghost(s) answer the current utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Responder {
    /// Only the primary ghost.
    Primary,
    /// Only the secondary ghost.
    Secondary,
    /// Both ghosts, one after the other.
    Both,
}

impl fmt::Display for Responder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Both => "both",
        };
        f.write_str(name)
    }
}

/// Terminal outcome of a session, decided by the curator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameResult {
    /// The participants reached the final goal.
    Win,
    /// The haunting is deemed irrecoverable.
    Lose,
}

/// A curator instruction for one ghost's note.
///
/// On the wire a missing or `null` note leaves the note alone, an empty
/// string clears it and any other string replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NoteUpdate {
    /// Leave the stored note untouched.
    #[default]
    Unchanged,
    /// Clear the stored note.
    Reset,
    /// Replace the stored note.
    Set(String),
}

impl From<Option<String>> for NoteUpdate {
    fn from(raw: Option<String>) -> Self {
        match raw {
            None => Self::Unchanged,
            Some(text) if text.is_empty() => Self::Reset,
            Some(text) => Self::Set(text),
        }
    }
}

impl Serialize for NoteUpdate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unchanged => serializer.serialize_none(),
            Self::Reset => serializer.serialize_str(""),
            Self::Set(text) => serializer.serialize_str(text),
        }
    }
}

impl<'de> Deserialize<'de> for NoteUpdate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<String>::deserialize(deserializer).map(Self::from)
    }
}

/// What a ghost wants to say.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SpeechContent {
    /// A short list of single words, spoken one at a time.
    Words(Vec<String>),
    /// One sentence.
    Sentence(String),
    /// Nothing to say.
    #[default]
    Silent,
}

impl SpeechContent {
    /// Whether there is nothing to speak: silent, an empty list, or a blank
    /// sentence.
    #[must_use]
    pub fn is_silent(&self) -> bool {
        match self {
            Self::Words(words) => words.is_empty(),
            Self::Sentence(sentence) => sentence.trim().is_empty(),
            Self::Silent => true,
        }
    }

    /// The content as one line of transcript text.
    #[must_use]
    pub fn as_transcript_text(&self) -> String {
        match self {
            Self::Words(words) => words.join(" "),
            Self::Sentence(sentence) => sentence.clone(),
            Self::Silent => String::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSpeech {
    Words(Vec<String>),
    Sentence(String),
}

impl Serialize for SpeechContent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Words(words) => words.serialize(serializer),
            Self::Sentence(sentence) => serializer.serialize_str(sentence),
            Self::Silent => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for SpeechContent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<RawSpeech>::deserialize(deserializer)? {
            None => Self::Silent,
            Some(RawSpeech::Words(words)) => Self::Words(words),
            Some(RawSpeech::Sentence(sentence)) => Self::Sentence(sentence),
        })
    }
}

/// The curator's raw, unvalidated proposal for one turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CuratorProposal {
    /// Short justification, recorded for audit.
    pub reasoning: String,
    /// Note for the primary ghost.
    #[serde(alias = "primary_ghost_note")]
    pub primary_note: NoteUpdate,
    /// Note for the secondary ghost.
    #[serde(alias = "secondary_ghost_note")]
    pub secondary_note: NoteUpdate,
    /// Requested absolute activity level.
    pub activity_level: Option<f64>,
    /// Requested change of the timer total, in seconds.
    pub timer_delta: Option<f64>,
    /// Corrected text for the utterance that was just transcribed.
    pub user_prompt_correction: Option<String>,
    /// Ends the session when present.
    pub game_result: Option<GameResult>,
}

/// A ghost's raw, unvalidated proposal for one turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GhostProposal {
    /// Short justification, recorded for audit.
    pub reasoning: String,
    /// What the ghost wants to say.
    pub content: SpeechContent,
    /// Whether the ghost wants to trigger a glitch.
    pub glitch: bool,
}

/// Template inputs for one curator call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CuratorPrompt {
    /// Current activity level.
    pub activity_level: f64,
    /// Seconds left on the countdown, `None` when the session has no timer.
    pub remaining_time: Option<f64>,
    /// Note currently held by the primary ghost.
    pub primary_note: Option<String>,
    /// Note currently held by the secondary ghost.
    pub secondary_note: Option<String>,
    /// Rendered transcript.
    pub transcript: String,
    /// Ghost(s) about to answer; `None` for administrative commands.
    pub next_responder: Option<Responder>,
    /// The utterance or operator instruction being handled.
    pub query: String,
}

/// Which speech shapes a ghost may currently use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpeechForms {
    /// The word-list form is unlocked.
    pub word_list: bool,
    /// The sentence form is unlocked.
    pub sentence: bool,
}

/// Template inputs for one ghost call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GhostPrompt {
    /// The ghost being asked.
    pub role: GhostRole,
    /// Current activity level.
    pub activity_level: f64,
    /// Seconds left on the countdown, `None` when the session has no timer.
    pub remaining_time: Option<f64>,
    /// The curator's current note for this ghost.
    pub note: Option<String>,
    /// Rendered transcript, including earlier ghosts of this turn.
    pub transcript: String,
    /// The (possibly corrected) utterance.
    pub query: String,
    /// Speech shapes unlocked at the current activity level.
    pub speech_forms: SpeechForms,
}

fn write_timer(f: &mut fmt::Formatter<'_>, remaining_time: Option<f64>) -> fmt::Result {
    match remaining_time {
        Some(seconds) => writeln!(f, "- Timer: {seconds:.0} seconds remaining"),
        None => writeln!(f, "- Timer: N/A"),
    }
}

fn note_text(note: Option<&String>) -> &str {
    note.map_or("None", String::as_str)
}

impl fmt::Display for CuratorPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### Current Game State")?;
        writeln!(f, "- Activity Level: {}", self.activity_level)?;
        write_timer(f, self.remaining_time)?;
        writeln!(f, "- Curator Notes:")?;
        writeln!(f, "  - Primary Ghost: {}", note_text(self.primary_note.as_ref()))?;
        writeln!(
            f,
            "  - Secondary Ghost: {}",
            note_text(self.secondary_note.as_ref())
        )?;
        match self.next_responder {
            Some(responder) => writeln!(f, "- Next Responder: {responder}")?,
            None => writeln!(f, "- Next Responder: none (operator instruction)")?,
        }
        writeln!(f, "- Transcript:\n```\n{}\n```", self.transcript)?;
        write!(f, "- User question: {}", self.query)
    }
}

impl fmt::Display for GhostPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### Current Game State ({} ghost)", self.role)?;
        writeln!(f, "- Activity Level: {}", self.activity_level)?;
        write_timer(f, self.remaining_time)?;
        writeln!(f, "- Curator Note: {}", note_text(self.note.as_ref()))?;
        writeln!(
            f,
            "- Allowed speech: word list {}, sentence {}",
            if self.speech_forms.word_list { "yes" } else { "no" },
            if self.speech_forms.sentence { "yes" } else { "no" },
        )?;
        writeln!(f, "- Transcript:\n```\n{}\n```", self.transcript)?;
        write!(f, "- User question: {}", self.query)
    }
}

/// Port to the supervising curator agent.
#[async_trait]
pub trait CuratorAgent: Send + Sync {
    /// Asks the curator for its proposal on the current turn.
    async fn ask(&self, prompt: &CuratorPrompt) -> Result<CuratorProposal, AgentError>;
}

/// Port to one ghost agent.
#[async_trait]
pub trait GhostAgent: Send + Sync {
    /// Asks the ghost for its proposal on the current turn.
    async fn ask(&self, prompt: &GhostPrompt) -> Result<GhostProposal, AgentError>;
}
