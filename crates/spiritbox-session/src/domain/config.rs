//! Session configuration.

use serde::{Deserialize, Serialize};
use spiritbox_core::error::DomainError;

use super::state::{MAX_ACTIVITY_LEVEL, MIN_ACTIVITY_LEVEL};

/// Model settings for one persona, passed through to the persona factory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaSettings {
    /// Model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
}

/// Tunables of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Curator model settings.
    pub curator: PersonaSettings,
    /// Ghost model settings, shared by both ghosts.
    pub ghost: PersonaSettings,
    /// Activity level at session start.
    pub initial_activity_level: f64,
    /// Countdown length in seconds; `None` or `<= 0` disables the timer.
    pub timer_seconds: Option<f64>,
    /// Added to the activity level after every completed turn.
    pub activity_growth_factor: f64,
    /// Glitches below this activity level are suppressed.
    pub glitch_min_level: f64,
    /// Activity level from which ghosts may answer with a word list.
    pub speech_min_wordlist_level: f64,
    /// Activity level from which ghosts may answer with a sentence.
    pub speech_min_sentence_level: f64,
    /// Maximum number of entries in a word-list answer.
    pub wordlist_word_limit: usize,
    /// Maximum number of words in a sentence answer.
    pub sentence_word_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            curator: PersonaSettings {
                model: "gpt-4o-mini".to_owned(),
                temperature: 0.2,
            },
            ghost: PersonaSettings {
                model: "gpt-4o-mini".to_owned(),
                temperature: 0.5,
            },
            initial_activity_level: 1.0,
            timer_seconds: Some(900.0),
            activity_growth_factor: 0.1,
            glitch_min_level: 1.5,
            speech_min_wordlist_level: 3.0,
            speech_min_sentence_level: 7.0,
            wordlist_word_limit: 3,
            sentence_word_limit: 12,
        }
    }
}

impl SessionConfig {
    /// Parses a JSON config document; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the document does not parse or
    /// the resulting config is invalid.
    pub fn from_json_str(source: &str) -> Result<Self, DomainError> {
        let config: Self = serde_json::from_str(source)
            .map_err(|e| DomainError::Validation(format!("invalid session config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every tunable is usable.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` describing the first bad field.
    pub fn validate(&self) -> Result<(), DomainError> {
        let numbers = [
            ("initial_activity_level", self.initial_activity_level),
            ("activity_growth_factor", self.activity_growth_factor),
            ("glitch_min_level", self.glitch_min_level),
            ("speech_min_wordlist_level", self.speech_min_wordlist_level),
            ("speech_min_sentence_level", self.speech_min_sentence_level),
            ("curator.temperature", self.curator.temperature),
            ("ghost.temperature", self.ghost.temperature),
        ];
        for (name, value) in numbers {
            if !value.is_finite() {
                return Err(DomainError::Validation(format!("{name} must be finite")));
            }
        }
        if let Some(timer) = self.timer_seconds {
            if !timer.is_finite() {
                return Err(DomainError::Validation("timer_seconds must be finite".to_owned()));
            }
        }
        if !(MIN_ACTIVITY_LEVEL..=MAX_ACTIVITY_LEVEL).contains(&self.initial_activity_level) {
            return Err(DomainError::Validation(format!(
                "initial_activity_level must be within [{MIN_ACTIVITY_LEVEL}, {MAX_ACTIVITY_LEVEL}]"
            )));
        }
        if self.activity_growth_factor < 0.0 {
            return Err(DomainError::Validation(
                "activity_growth_factor must not be negative".to_owned(),
            ));
        }
        if self.wordlist_word_limit == 0 || self.sentence_word_limit == 0 {
            return Err(DomainError::Validation("word limits must be positive".to_owned()));
        }
        Ok(())
    }
}
