// src/infrastructure/mod.rs
pub mod blob;
pub mod graphql;
pub mod renderer;

pub use blob::{FsBlobStore, HttpBlobStore};
pub use graphql::GraphqlNoteStore;
