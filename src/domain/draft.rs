// src/domain/draft.rs
use crate::domain::{NewNote, NoteImage};

/// Form state for a note that has not been submitted yet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub name: String,
    pub description: String,
    pub image: NoteImage,
}

impl NoteDraft {
    /// Both text fields must be non-empty
    pub fn is_submittable(&self) -> bool {
        !self.name.is_empty() && !self.description.is_empty()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn to_new_note(&self) -> NewNote {
        NewNote {
            name: self.name.clone(),
            description: self.description.clone(),
            image: self.image.pending_key().map(str::to_string),
        }
    }
}

/// A file picked for attachment. An empty name means nothing was picked.
#[derive(Debug, Clone, Default)]
pub struct AttachedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl AttachedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}
