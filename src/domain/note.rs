// src/domain/note.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned by the remote note store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub String);

impl NoteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Image attachment of a note.
///
/// A freshly attached or freshly fetched note carries the storage key
/// (`PendingKey`); hydration turns it into a fetchable reference (`Resolved`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum NoteImage {
    #[default]
    Unset,
    PendingKey(String),
    Resolved(String),
}

impl NoteImage {
    /// Map the wire representation; an empty key counts as no image
    pub fn from_key(key: Option<String>) -> Self {
        match key {
            Some(key) if !key.is_empty() => NoteImage::PendingKey(key),
            _ => NoteImage::Unset,
        }
    }

    pub fn pending_key(&self) -> Option<&str> {
        match self {
            NoteImage::PendingKey(key) => Some(key),
            _ => None,
        }
    }

    pub fn resolved_url(&self) -> Option<&str> {
        match self {
            NoteImage::Resolved(url) => Some(url),
            _ => None,
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, NoteImage::Unset)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub id: Option<NoteId>,
    pub name: String,
    pub description: String,
    pub image: NoteImage,
}

impl Note {
    /// Identity used when rendering: the id if persisted, else the name
    pub fn display_key(&self) -> &str {
        match &self.id {
            Some(id) => id.as_str(),
            None => &self.name,
        }
    }
}

/// Payload of the create mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewNote {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}
