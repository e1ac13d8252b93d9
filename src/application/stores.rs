// src/application/stores.rs
use crate::domain::{NewNote, Note, NoteId, SyncError};
use async_trait::async_trait;

/// Authoritative store of note records
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Notes in the order the store returns them. Images come back as pending keys.
    async fn list_notes(&self) -> Result<Vec<Note>, SyncError>;

    /// Returns the canonical created record
    async fn create_note(&self, input: NewNote) -> Result<Note, SyncError>;

    async fn delete_note(&self, id: &NoteId) -> Result<(), SyncError>;
}

/// Key-value store for raw image bytes
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), SyncError>;

    /// Resolve a key into a fetchable reference (URL)
    async fn get(&self, key: &str) -> Result<String, SyncError>;
}
