// src/domain/mod.rs
pub mod draft;
pub mod error;
pub mod note;

pub use draft::{AttachedFile, NoteDraft};
pub use error::SyncError;
pub use note::{NewNote, Note, NoteId, NoteImage};
