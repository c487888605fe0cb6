//! Curator notes: one latest-write-wins directive per ghost.

use serde::Serialize;
use spiritbox_core::agent::{GhostRole, NoteUpdate};

/// The curator's current directive for each ghost.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CuratorNotes {
    /// Directive for the primary ghost.
    pub primary: Option<String>,
    /// Directive for the secondary ghost.
    pub secondary: Option<String>,
}

impl CuratorNotes {
    /// The note held for `role`.
    #[must_use]
    pub fn note_for(&self, role: GhostRole) -> Option<&String> {
        match role {
            GhostRole::Primary => self.primary.as_ref(),
            GhostRole::Secondary => self.secondary.as_ref(),
        }
    }

    fn slot(&mut self, role: GhostRole) -> &mut Option<String> {
        match role {
            GhostRole::Primary => &mut self.primary,
            GhostRole::Secondary => &mut self.secondary,
        }
    }

    /// Applies an update: the note is either left alone or replaced as a
    /// whole. Returns whether anything was written.
    pub fn apply(&mut self, role: GhostRole, update: &NoteUpdate) -> bool {
        match update {
            NoteUpdate::Unchanged => false,
            NoteUpdate::Reset => {
                *self.slot(role) = None;
                true
            }
            NoteUpdate::Set(text) => {
                *self.slot(role) = Some(text.clone());
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_whole_note() {
        let mut notes = CuratorNotes {
            primary: Some("Be vague".to_owned()),
            secondary: None,
        };

        let written = notes.apply(GhostRole::Primary, &NoteUpdate::Set("Mention the door".to_owned()));

        assert!(written);
        assert_eq!(notes.note_for(GhostRole::Primary).map(String::as_str), Some("Mention the door"));
        assert_eq!(notes.secondary, None);
    }

    #[test]
    fn test_reset_clears_note() {
        let mut notes = CuratorNotes {
            primary: None,
            secondary: Some("Stay quiet".to_owned()),
        };

        assert!(notes.apply(GhostRole::Secondary, &NoteUpdate::Reset));
        assert_eq!(notes.note_for(GhostRole::Secondary), None);
    }

    #[test]
    fn test_unchanged_leaves_note_alone() {
        let mut notes = CuratorNotes {
            primary: Some("Keep it short".to_owned()),
            secondary: None,
        };
        let before = notes.clone();

        assert!(!notes.apply(GhostRole::Primary, &NoteUpdate::Unchanged));
        assert_eq!(notes, before);
    }
}
