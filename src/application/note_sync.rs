// src/application/note_sync.rs
use crate::application::{BlobStore, NoteStore};
use crate::domain::{AttachedFile, Note, NoteDraft, NoteImage, SyncError};
use futures::future::join_all;
use tracing::{debug, error, info, instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The note appended to the local list
    Created(Note),
    /// Draft was missing a name or description; nothing happened
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum DeleteOutcome {
    /// Note had no id; nothing happened
    Skipped,
    Confirmed,
    /// Removed locally but the remote delete failed
    Diverged(SyncError),
}

/// Owns the in-memory note list and the pending draft, and mediates between
/// user actions, the remote note store and the blob store.
///
/// The list is a cache: it is replaced by `fetch_notes` and otherwise only
/// changed optimistically by `create_note` and `delete_note`.
pub struct NoteSync<S: NoteStore, B: BlobStore> {
    store: S,
    blobs: B,
    notes: Vec<Note>,
    draft: NoteDraft,
}

impl<S: NoteStore, B: BlobStore> NoteSync<S, B> {
    pub fn new(store: S, blobs: B) -> Self {
        Self {
            store,
            blobs,
            notes: Vec::new(),
            draft: NoteDraft::default(),
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn draft(&self) -> &NoteDraft {
        &self.draft
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    /// Replace the list with the store's notes, images resolved.
    ///
    /// All image lookups run concurrently and are awaited to completion. If any
    /// of them failed the list is left as it was.
    #[instrument(level = "debug", skip(self))]
    pub async fn fetch_notes(&mut self) -> Result<(), SyncError> {
        let fetched = self.store.list_notes().await?;
        debug!(count = fetched.len(), "Fetched notes, hydrating images");

        let notes = self.hydrate(fetched).await?;
        info!(count = notes.len(), "Loaded notes");
        self.notes = notes;
        Ok(())
    }

    async fn hydrate(&self, notes: Vec<Note>) -> Result<Vec<Note>, SyncError> {
        let blobs = &self.blobs;
        let settled = join_all(notes.into_iter().map(|mut note| async move {
            if let Some(key) = note.image.pending_key().map(str::to_string) {
                let url = blobs.get(&key).await?;
                note.image = NoteImage::Resolved(url);
            }
            Ok::<_, SyncError>(note)
        }))
        .await;

        settled.into_iter().collect()
    }

    /// Record the file as the draft's image, upload it, then reload every note.
    ///
    /// `None` or a nameless file is a no-op.
    #[instrument(level = "debug", skip_all)]
    pub async fn attach_image(&mut self, file: Option<AttachedFile>) -> Result<(), SyncError> {
        let file = match file {
            Some(file) if !file.is_empty() => file,
            _ => return Ok(()),
        };

        self.draft.image = NoteImage::PendingKey(file.name.clone());
        debug!(key = %file.name, bytes = file.bytes.len(), "Uploading image");
        self.blobs.put(&file.name, file.bytes).await?;

        self.fetch_notes().await
    }

    /// Submit the draft and append the created note to the list.
    ///
    /// The draft is cleared only when everything succeeded.
    #[instrument(level = "debug", skip(self))]
    pub async fn create_note(&mut self) -> Result<CreateOutcome, SyncError> {
        if !self.draft.is_submittable() {
            debug!("Draft is missing name or description, not creating");
            return Ok(CreateOutcome::Skipped);
        }

        let created = self.store.create_note(self.draft.to_new_note()).await?;

        // The draft's key is resolved, not the one echoed by the store
        if let Some(key) = self.draft.image.pending_key().map(str::to_string) {
            let url = self.blobs.get(&key).await?;
            self.draft.image = NoteImage::Resolved(url);
        }

        let note = Note {
            image: self.draft.image.clone(),
            ..created
        };
        info!(id = ?note.id, name = %note.name, "Created note");

        self.notes.push(note.clone());
        self.draft.reset();
        Ok(CreateOutcome::Created(note))
    }

    /// Remove the note locally, then remotely.
    ///
    /// A remote failure is logged and returned as `Diverged`; the local list is
    /// not rolled back.
    #[instrument(level = "debug", skip_all, fields(id = ?note.id))]
    pub async fn delete_note(&mut self, note: &Note) -> DeleteOutcome {
        let Some(id) = note.id.clone() else {
            debug!("Note has no id, not deleting");
            return DeleteOutcome::Skipped;
        };

        self.notes.retain(|n| n.id.as_ref() != Some(&id));

        match self.store.delete_note(&id).await {
            Ok(()) => {
                info!(%id, "Deleted note");
                DeleteOutcome::Confirmed
            }
            Err(e) => {
                error!(%id, error = %e, "Failed to delete note remotely");
                DeleteOutcome::Diverged(e)
            }
        }
    }
}
