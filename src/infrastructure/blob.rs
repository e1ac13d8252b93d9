// src/infrastructure/blob.rs
use crate::application::BlobStore;
use crate::auth::Session;
use crate::domain::SyncError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

/// Keys are flat object names; anything that could address outside the store is refused
fn validate_key(key: &str) -> Result<(), SyncError> {
    if key.is_empty() || key == "." || key == ".." || key.contains(['/', '\\', '\0']) {
        return Err(SyncError::InvalidKey(key.to_string()));
    }
    Ok(())
}

fn object_url(base: &Url, key: &str) -> Result<Url, SyncError> {
    validate_key(key)?;
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| SyncError::BlobStore(format!("Cannot append a key to {base}")))?
        .pop_if_empty()
        .push(key);
    Ok(url)
}

/// Blob store reached over plain HTTP: objects are uploaded with `PUT` and
/// fetched from a public base URL.
#[derive(Debug)]
pub struct HttpBlobStore {
    client: reqwest::Client,
    base_url: Url,
    public_url: Url,
    token: Option<String>,
}

impl HttpBlobStore {
    pub fn new(
        base_url: &str,
        public_url: Option<&str>,
        session: &Session,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid storage base URL: {base_url:?}"))?;
        let public_url = match public_url {
            Some(public) => Url::parse(public)
                .with_context(|| format!("Invalid storage public URL: {public:?}"))?,
            None => base_url.clone(),
        };

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        debug!(%base_url, %public_url, "Created HttpBlobStore");
        Ok(Self {
            client,
            base_url,
            public_url,
            token: session.token().map(str::to_string),
        })
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    #[instrument(level = "debug", skip(self, bytes), fields(size = bytes.len()))]
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), SyncError> {
        let url = object_url(&self.base_url, key)?;
        let mut request = self.client.put(url).body(bytes);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, token);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| SyncError::BlobStore(format!("Upload of {key} failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::BlobStore(format!(
                "Upload of {key} failed with HTTP {status}: {body}"
            )));
        }

        info!(key, "Uploaded object");
        Ok(())
    }

    #[instrument(level = "trace", skip(self))]
    async fn get(&self, key: &str) -> Result<String, SyncError> {
        object_url(&self.public_url, key).map(String::from)
    }
}

/// Blob store kept in a local directory, handing out `file://` URLs
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    #[instrument(level = "debug", skip(self, bytes), fields(size = bytes.len()))]
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), SyncError> {
        validate_key(key)?;
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| SyncError::BlobStore(format!("Failed to create {}: {e}", self.root.display())))?;

        let path = self.root.join(key);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| SyncError::BlobStore(format!("Failed to write {}: {e}", path.display())))?;

        info!(?path, "Stored object");
        Ok(())
    }

    #[instrument(level = "trace", skip(self))]
    async fn get(&self, key: &str) -> Result<String, SyncError> {
        validate_key(key)?;
        let path = tokio::fs::canonicalize(self.root.join(key))
            .await
            .map_err(|_| SyncError::BlobStore(format!("No object stored under {key}")))?;

        Url::from_file_path(&path)
            .map(String::from)
            .map_err(|_| SyncError::BlobStore(format!("Cannot build URL for {}", path.display())))
    }
}
