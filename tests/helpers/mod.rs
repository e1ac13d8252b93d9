#[allow(dead_code)]
pub mod stub_server;

use anyhow::{Context, Result};
use notekeeper::domain::{Note, NoteId, NoteImage};
use notekeeper::infrastructure::FsBlobStore;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test fixture for a blob store backed by a temporary directory
#[allow(dead_code)]
pub struct TestBlobDir {
    _temp_dir: TempDir,
    pub root: PathBuf,
}

#[allow(dead_code)]
impl TestBlobDir {
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir()
            .context("Failed to create temporary directory")?;
        let root = temp_dir.path().join("blobs");

        Ok(Self {
            _temp_dir: temp_dir,
            root,
        })
    }

    /// Seed an object directly on disk
    pub fn with_object(self, key: &str, bytes: &[u8]) -> Result<Self> {
        std::fs::create_dir_all(&self.root)
            .context("Failed to create blob directory")?;
        std::fs::write(self.root.join(key), bytes)
            .context("Failed to write blob fixture")?;
        Ok(self)
    }

    pub fn open_store(&self) -> FsBlobStore {
        FsBlobStore::new(self.root.clone())
    }
}

/// A note as the remote store would return it
#[allow(dead_code)]
pub fn stored_note(id: &str, name: &str, image_key: Option<&str>) -> Note {
    Note {
        id: Some(NoteId::new(id)),
        name: name.to_string(),
        description: format!("About {name}"),
        image: NoteImage::from_key(image_key.map(str::to_string)),
    }
}

/// Known fixture notes
#[allow(dead_code)]
pub mod test_notes {
    pub const GROCERIES: &str = "note-groceries";
    pub const HOLIDAY: &str = "note-holiday";
    pub const HOLIDAY_IMAGE: &str = "beach.png";
    pub const NONEXISTENT: &str = "note-missing";
}
