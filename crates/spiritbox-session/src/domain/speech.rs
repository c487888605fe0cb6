//! Speech sanitizer.
//!
//! Ghost speech is displayed and synthesized word by word, so every word is
//! uppercased and the amount of speech per turn is capped. Pure apart from
//! logging.

use spiritbox_core::agent::SpeechContent;
use tracing::warn;

/// Which word cap applies to a piece of content.
#[must_use]
pub fn word_limit_for(content: &SpeechContent, wordlist_limit: usize, sentence_limit: usize) -> usize {
    match content {
        SpeechContent::Words(_) => wordlist_limit,
        SpeechContent::Sentence(_) | SpeechContent::Silent => sentence_limit,
    }
}

/// Longest whitespace-delimited token of `phrase`; the first one wins ties.
fn longest_token(phrase: &str) -> &str {
    phrase
        .split_whitespace()
        .fold("", |longest, token| {
            if token.chars().count() > longest.chars().count() {
                token
            } else {
                longest
            }
        })
}

fn sanitize_word(word: &str) -> String {
    if word.chars().any(char::is_whitespace) {
        let replacement = longest_token(word);
        warn!(word, replacement, "ghost returned a phrase as a single word");
        replacement.to_uppercase()
    } else {
        word.to_uppercase()
    }
}

/// Normalizes and bounds a ghost's proposed speech.
///
/// A sentence is re-tokenized on whitespace, uppercased and cut to
/// `word_limit` words. A word list has each phrase-like entry reduced to its
/// longest token, every entry uppercased, and is cut to `word_limit`
/// entries.
#[must_use]
pub fn sanitize(content: SpeechContent, word_limit: usize) -> SpeechContent {
    match content {
        SpeechContent::Sentence(sentence) => {
            let words: Vec<&str> = sentence.split_whitespace().collect();
            if words.len() > word_limit {
                warn!(
                    before = words.len(),
                    after = word_limit,
                    "trimming ghost sentence"
                );
            }
            let kept: Vec<String> = words
                .into_iter()
                .take(word_limit)
                .map(str::to_uppercase)
                .collect();
            SpeechContent::Sentence(kept.join(" "))
        }
        SpeechContent::Words(words) => {
            if words.len() > word_limit {
                warn!(
                    before = words.len(),
                    after = word_limit,
                    "trimming ghost word list"
                );
            }
            let mut sanitized: Vec<String> = words.iter().map(|word| sanitize_word(word)).collect();
            sanitized.truncate(word_limit);
            SpeechContent::Words(sanitized)
        }
        SpeechContent::Silent => SpeechContent::Silent,
    }
}
