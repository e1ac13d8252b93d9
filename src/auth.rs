// src/auth.rs
use crate::config::Config;
use crate::domain::SyncError;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Credentials of the signed-in user
#[derive(Debug, Clone)]
pub struct Session {
    api_key: Option<String>,
    token: Option<String>,
    token_file: PathBuf,
}

impl Session {
    pub fn from_config(config: &Config) -> Result<Self> {
        let token_file = config.auth.token_file.clone();
        let token = read_token(&token_file)?;
        debug!(?token_file, has_token = token.is_some(), "Loaded session");

        Ok(Self {
            api_key: config.api.api_key.clone(),
            token,
            token_file,
        })
    }

    pub fn is_signed_in(&self) -> bool {
        self.api_key.is_some() || self.token.is_some()
    }

    /// Fails with `NotSignedIn` when there are no credentials at all
    pub fn require_signed_in(&self) -> Result<(), SyncError> {
        if self.is_signed_in() {
            Ok(())
        } else {
            Err(SyncError::NotSignedIn)
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Sent unchanged as the `Authorization` header to both the API and the blob store
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Forget the session token, locally and on disk
    pub fn sign_out(&mut self) -> Result<()> {
        self.token = None;
        if self.token_file.exists() {
            std::fs::remove_file(&self.token_file).with_context(|| {
                format!("Failed to remove token file {}", self.token_file.display())
            })?;
        }
        info!(token_file = ?self.token_file, "Signed out");
        Ok(())
    }
}

fn read_token(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read token file {}", path.display()))?;
    let token = content.trim();
    Ok((!token.is_empty()).then(|| token.to_string()))
}
