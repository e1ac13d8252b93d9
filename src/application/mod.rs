// src/application/mod.rs
pub mod note_sync;
pub mod stores;

pub use note_sync::{CreateOutcome, DeleteOutcome, NoteSync};
pub use stores::{BlobStore, NoteStore};
