// src/domain/error.rs
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("Remote note store error: {0}")]
    RemoteStore(String),
    #[error("Blob store error: {0}")]
    BlobStore(String),
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
    #[error("Note not found: {0}")]
    NoteNotFound(String),
    #[error("Not signed in")]
    NotSignedIn,
}
