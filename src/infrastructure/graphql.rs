// src/infrastructure/graphql.rs
use crate::application::NoteStore;
use crate::auth::Session;
use crate::constants::API_KEY_HEADER;
use crate::domain::{NewNote, Note, NoteId, NoteImage, SyncError};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, instrument};

pub const LIST_NOTES: &str = "query ListNotes {
  listNotes {
    items { id name description image }
  }
}";

pub const CREATE_NOTE: &str = "mutation CreateNote($input: CreateNoteInput!) {
  createNote(input: $input) { id name description image }
}";

pub const DELETE_NOTE: &str = "mutation DeleteNote($input: DeleteNoteInput!) {
  deleteNote(input: $input) { id }
}";

#[derive(Debug, Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

/// A note as the API returns it
#[derive(Debug, Deserialize)]
struct NoteRecord {
    id: String,
    name: String,
    description: String,
    #[serde(default)]
    image: Option<String>,
}

impl From<NoteRecord> for Note {
    fn from(record: NoteRecord) -> Self {
        Note {
            id: Some(NoteId(record.id)),
            name: record.name,
            description: record.description,
            image: NoteImage::from_key(record.image),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListNotesData {
    list_notes: NoteConnection,
}

#[derive(Debug, Deserialize)]
struct NoteConnection {
    items: Vec<NoteRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateNoteData {
    create_note: NoteRecord,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteNoteData {
    #[allow(dead_code)]
    delete_note: Option<serde_json::Value>,
}

/// Decode a GraphQL response envelope. Any reported error fails the call.
fn decode_response<T: DeserializeOwned>(body: &str) -> Result<T, SyncError> {
    let response: GraphqlResponse<T> = serde_json::from_str(body)
        .map_err(|e| SyncError::RemoteStore(format!("Malformed response: {e}")))?;

    if !response.errors.is_empty() {
        let messages: Vec<_> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(SyncError::RemoteStore(messages.join("; ")));
    }

    response
        .data
        .ok_or_else(|| SyncError::RemoteStore("Response carried no data".to_string()))
}

/// Remote note store reached over HTTP GraphQL
#[derive(Debug)]
pub struct GraphqlNoteStore {
    endpoint: String,
    client: reqwest::Client,
}

impl GraphqlNoteStore {
    pub fn new(endpoint: &str, session: &Session, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(key) = session.api_key() {
            headers.insert(
                API_KEY_HEADER,
                HeaderValue::from_str(key).context("API key is not a valid header value")?,
            );
        }
        if let Some(token) = session.token() {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(token).context("Token is not a valid header value")?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        debug!(endpoint, "Created GraphqlNoteStore");
        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
        })
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, SyncError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&GraphqlRequest { query, variables })
            .send()
            .await
            .map_err(|e| SyncError::RemoteStore(format!("Request failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| SyncError::RemoteStore(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(SyncError::RemoteStore(format!("HTTP {status}: {body}")));
        }

        decode_response(&body)
    }
}

#[async_trait]
impl NoteStore for GraphqlNoteStore {
    #[instrument(level = "debug", skip(self))]
    async fn list_notes(&self) -> Result<Vec<Note>, SyncError> {
        let data: ListNotesData = self.execute(LIST_NOTES, json!({})).await?;
        Ok(data.list_notes.items.into_iter().map(Note::from).collect())
    }

    #[instrument(level = "debug", skip(self))]
    async fn create_note(&self, input: NewNote) -> Result<Note, SyncError> {
        let data: CreateNoteData = self
            .execute(CREATE_NOTE, json!({ "input": input }))
            .await?;
        Ok(data.create_note.into())
    }

    #[instrument(level = "debug", skip(self))]
    async fn delete_note(&self, id: &NoteId) -> Result<(), SyncError> {
        let _: DeleteNoteData = self
            .execute(DELETE_NOTE, json!({ "input": { "id": id } }))
            .await?;
        Ok(())
    }
}
