// src/lib.rs
pub mod application;
pub mod auth;
pub mod cli;
pub mod config;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod ports;
pub mod util;

use anyhow::{Context, Result};
use application::{BlobStore, CreateOutcome, DeleteOutcome, NoteStore, NoteSync};
use auth::Session;
use cli::args::{Args, Command};
use config::{Config, StorageBackend};
use domain::{AttachedFile, Note, NoteImage, SyncError};
use infrastructure::{FsBlobStore, GraphqlNoteStore, HttpBlobStore};
use ports::HtmlPresenter;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

pub async fn run(args: Args) -> Result<()> {
    debug!(?args, "Starting notekeeper with arguments");

    let config = Config::resolve(args.config.as_deref())?;
    let mut session = Session::from_config(&config)?;

    if let Command::SignOut = args.command {
        session.sign_out()?;
        println!("Signed out");
        return Ok(());
    }

    session
        .require_signed_in()
        .context("Configure an API key or sign in with a token file first")?;

    // Initialize infrastructure
    let timeout = Duration::from_secs(config.api.timeout_secs);
    let store = GraphqlNoteStore::new(&config.api.endpoint, &session, timeout)?;

    match config.storage.backend {
        StorageBackend::Http => {
            let blobs = HttpBlobStore::new(
                &config.storage.base_url,
                config.storage.public_url.as_deref(),
                &session,
                timeout,
            )?;
            execute(NoteSync::new(store, blobs), args.command).await
        }
        StorageBackend::Fs => {
            debug!(root = ?config.storage.root, "Using local blob directory");
            let blobs = FsBlobStore::new(config.storage.root.clone());
            execute(NoteSync::new(store, blobs), args.command).await
        }
    }
}

async fn execute<S: NoteStore, B: BlobStore>(
    mut sync: NoteSync<S, B>,
    command: Command,
) -> Result<()> {
    match command {
        Command::List { json, open } => {
            sync.fetch_notes().await.context("Failed to load notes")?;

            if json {
                println!("{}", serde_json::to_string_pretty(sync.notes())?);
            } else if open {
                let html = HtmlPresenter::new().render(sync.notes());
                let mut renderer = infrastructure::renderer::ContentRenderer::new();
                let path = renderer.create_temp_file(&html)?;
                renderer.open_in_browser(&path).await?;
            } else {
                for note in sync.notes() {
                    println!("{}", format_note_line(note));
                }
            }
        }
        Command::Create {
            name,
            description,
            image,
        } => {
            sync.set_name(name);
            sync.set_description(description);

            let file = match image {
                Some(path) => Some(read_attachment(&path).await?),
                None => None,
            };
            sync.attach_image(file)
                .await
                .context("Failed to attach image")?;

            match sync.create_note().await.context("Failed to create note")? {
                CreateOutcome::Created(note) => {
                    info!(key = note.display_key(), "Note created");
                    println!("{}", format_note_line(&note));
                }
                CreateOutcome::Skipped => {
                    println!("Name and description are both required, nothing created");
                }
            }
        }
        Command::Delete { note_id } => {
            sync.fetch_notes().await.context("Failed to load notes")?;

            let note = sync
                .notes()
                .iter()
                .find(|n| n.id.as_ref().is_some_and(|id| id.as_str() == note_id))
                .cloned()
                .ok_or_else(|| SyncError::NoteNotFound(note_id.clone()))?;

            match sync.delete_note(&note).await {
                DeleteOutcome::Confirmed => println!("Deleted note {note_id}"),
                DeleteOutcome::Diverged(e) => {
                    warn!(%note_id, error = %e, "Note removed locally only");
                    println!("Deleted note {note_id} locally; the remote delete failed: {e}");
                }
                DeleteOutcome::Skipped => println!("Note {note_id} has no id, nothing deleted"),
            }
        }
        // Handled before the session gate
        Command::SignOut => {}
    }
    Ok(())
}

/// Read a file for attachment; the storage key is the file name
pub async fn read_attachment(path: &Path) -> Result<AttachedFile> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("Not a file: {}", path.display()))?;

    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read image {}", path.display()))?;

    Ok(AttachedFile::new(name, bytes))
}

/// One tab-separated line per note: key, name, description, image
pub fn format_note_line(note: &Note) -> String {
    let image = match &note.image {
        NoteImage::Unset => "-",
        NoteImage::PendingKey(key) => key.as_str(),
        NoteImage::Resolved(url) => url.as_str(),
    };
    format!(
        "{}\t{}\t{}\t{}",
        note.display_key(),
        note.name,
        note.description,
        image
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NoteId;
    use crate::util::testing;
    use tempfile::TempDir;

    #[ctor::ctor]
    fn init() {
        testing::init_test_setup().expect("Failed to initialize test setup");
    }

    #[test]
    fn given_note_with_resolved_image_when_formatting_then_tab_separated() {
        let note = Note {
            id: Some(NoteId::new("abc")),
            name: "Cat".to_string(),
            description: "Napping".to_string(),
            image: NoteImage::Resolved("https://cdn.test/cat.png".to_string()),
        };

        assert_eq!(
            format_note_line(&note),
            "abc\tCat\tNapping\thttps://cdn.test/cat.png"
        );
    }

    #[test]
    fn given_note_without_image_when_formatting_then_dash() {
        let note = Note {
            id: None,
            name: "Cat".to_string(),
            description: "Napping".to_string(),
            image: NoteImage::Unset,
        };

        assert_eq!(format_note_line(&note), "Cat\tCat\tNapping\t-");
    }

    #[tokio::test]
    async fn given_file_when_reading_attachment_then_key_is_file_name() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cat.png");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let file = read_attachment(&path).await.unwrap();

        assert_eq!(file.name, "cat.png");
        assert_eq!(file.bytes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn given_missing_file_when_reading_attachment_then_error() {
        let temp_dir = TempDir::new().unwrap();

        let result = read_attachment(&temp_dir.path().join("missing.png")).await;

        assert!(result.is_err());
    }
}
