// src/util/testing.rs

use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::{BlobStore, NoteStore};
use crate::domain::{NewNote, Note, NoteId, NoteImage, SyncError};

/// Base of the URLs `MockBlobStore` hands out by default
pub const MOCK_BLOB_BASE: &str = "https://blobs.test";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    List,
    Create(NewNote),
    Delete(NoteId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobCall {
    /// Key and byte count
    Put(String, usize),
    Get(String),
    /// Recorded when a get finishes, successfully or not
    GetSettled(String),
}

/// Shared record of calls made against a mock. Clone it before moving the
/// mock into the controller.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    store: Arc<Mutex<Vec<StoreCall>>>,
    blob: Arc<Mutex<Vec<BlobCall>>>,
}

impl CallLog {
    pub fn store_calls(&self) -> Vec<StoreCall> {
        self.store.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn blob_calls(&self) -> Vec<BlobCall> {
        self.blob.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record_store(&self, call: StoreCall) {
        if let Ok(mut calls) = self.store.lock() {
            calls.push(call);
        }
    }

    fn record_blob(&self, call: BlobCall) {
        if let Ok(mut calls) = self.blob.lock() {
            calls.push(call);
        }
    }
}

/// Shared mock of the remote note store
///
/// # Examples
///
/// ```
/// use notekeeper::util::testing::MockNoteStore;
/// use notekeeper::domain::{Note, NoteId, NoteImage};
///
/// let mock = MockNoteStore::builder()
///     .with_note(Note {
///         id: Some(NoteId::new("1")),
///         name: "Groceries".to_string(),
///         description: "Milk".to_string(),
///         image: NoteImage::Unset,
///     })
///     .with_delete_failure("1", "offline")
///     .build();
/// ```
pub struct MockNoteStore {
    notes: Vec<Note>,
    list_failure: Option<String>,
    create_failure: Option<String>,
    delete_failures: HashMap<NoteId, String>,
    next_id: AtomicUsize,
    calls: CallLog,
}

impl MockNoteStore {
    pub fn builder() -> MockNoteStoreBuilder {
        MockNoteStoreBuilder::new()
    }

    pub fn calls(&self) -> CallLog {
        self.calls.clone()
    }
}

#[async_trait]
impl NoteStore for MockNoteStore {
    async fn list_notes(&self) -> Result<Vec<Note>, SyncError> {
        self.calls.record_store(StoreCall::List);
        match &self.list_failure {
            Some(msg) => Err(SyncError::RemoteStore(msg.clone())),
            None => Ok(self.notes.clone()),
        }
    }

    async fn create_note(&self, input: NewNote) -> Result<Note, SyncError> {
        self.calls.record_store(StoreCall::Create(input.clone()));
        if let Some(msg) = &self.create_failure {
            return Err(SyncError::RemoteStore(msg.clone()));
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(Note {
            id: Some(NoteId::new(format!("created-{n}"))),
            name: input.name,
            description: input.description,
            image: NoteImage::from_key(input.image),
        })
    }

    async fn delete_note(&self, id: &NoteId) -> Result<(), SyncError> {
        self.calls.record_store(StoreCall::Delete(id.clone()));
        match self.delete_failures.get(id) {
            Some(msg) => Err(SyncError::RemoteStore(msg.clone())),
            None => Ok(()),
        }
    }
}

/// Builder for MockNoteStore
pub struct MockNoteStoreBuilder {
    notes: Vec<Note>,
    list_failure: Option<String>,
    create_failure: Option<String>,
    delete_failures: HashMap<NoteId, String>,
}

impl MockNoteStoreBuilder {
    pub fn new() -> Self {
        Self {
            notes: vec![],
            list_failure: None,
            create_failure: None,
            delete_failures: HashMap::new(),
        }
    }

    /// Add a note returned by list_notes, in insertion order
    pub fn with_note(mut self, note: Note) -> Self {
        self.notes.push(note);
        self
    }

    pub fn with_list_failure(mut self, message: &str) -> Self {
        self.list_failure = Some(message.to_string());
        self
    }

    pub fn with_create_failure(mut self, message: &str) -> Self {
        self.create_failure = Some(message.to_string());
        self
    }

    /// Configure delete_note to fail for a specific ID
    pub fn with_delete_failure(mut self, id: &str, message: &str) -> Self {
        self.delete_failures
            .insert(NoteId::new(id), message.to_string());
        self
    }

    pub fn build(self) -> MockNoteStore {
        MockNoteStore {
            notes: self.notes,
            list_failure: self.list_failure,
            create_failure: self.create_failure,
            delete_failures: self.delete_failures,
            next_id: AtomicUsize::new(1),
            calls: CallLog::default(),
        }
    }
}

impl Default for MockNoteStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared mock of the blob store. Unless configured otherwise `get` resolves
/// `key` to `{MOCK_BLOB_BASE}/{key}`.
pub struct MockBlobStore {
    urls: HashMap<String, String>,
    get_failures: HashSet<String>,
    put_failures: HashSet<String>,
    get_delays: HashMap<String, Duration>,
    calls: CallLog,
}

impl MockBlobStore {
    pub fn builder() -> MockBlobStoreBuilder {
        MockBlobStoreBuilder::new()
    }

    pub fn calls(&self) -> CallLog {
        self.calls.clone()
    }
}

#[async_trait]
impl BlobStore for MockBlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), SyncError> {
        self.calls
            .record_blob(BlobCall::Put(key.to_string(), bytes.len()));
        if self.put_failures.contains(key) {
            return Err(SyncError::BlobStore(format!("upload of {key} rejected")));
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<String, SyncError> {
        self.calls.record_blob(BlobCall::Get(key.to_string()));
        if let Some(delay) = self.get_delays.get(key) {
            tokio::time::sleep(*delay).await;
        }
        self.calls.record_blob(BlobCall::GetSettled(key.to_string()));

        if self.get_failures.contains(key) {
            return Err(SyncError::BlobStore(format!("no object for {key}")));
        }
        Ok(self
            .urls
            .get(key)
            .cloned()
            .unwrap_or_else(|| format!("{MOCK_BLOB_BASE}/{key}")))
    }
}

/// Builder for MockBlobStore
pub struct MockBlobStoreBuilder {
    urls: HashMap<String, String>,
    get_failures: HashSet<String>,
    put_failures: HashSet<String>,
    get_delays: HashMap<String, Duration>,
}

impl MockBlobStoreBuilder {
    pub fn new() -> Self {
        Self {
            urls: HashMap::new(),
            get_failures: HashSet::new(),
            put_failures: HashSet::new(),
            get_delays: HashMap::new(),
        }
    }

    /// Resolve `key` to a specific URL
    pub fn with_url(mut self, key: &str, url: &str) -> Self {
        self.urls.insert(key.to_string(), url.to_string());
        self
    }

    pub fn with_get_failure(mut self, key: &str) -> Self {
        self.get_failures.insert(key.to_string());
        self
    }

    pub fn with_put_failure(mut self, key: &str) -> Self {
        self.put_failures.insert(key.to_string());
        self
    }

    /// Delay the get for `key` before it settles
    pub fn with_get_delay(mut self, key: &str, delay: Duration) -> Self {
        self.get_delays.insert(key.to_string(), delay);
        self
    }

    pub fn build(self) -> MockBlobStore {
        MockBlobStore {
            urls: self.urls,
            get_failures: self.get_failures,
            put_failures: self.put_failures,
            get_delays: self.get_delays,
            calls: CallLog::default(),
        }
    }
}

impl Default for MockBlobStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Log output captured on the current thread while the guard from `install` lives
///
/// Use with the default current-thread `#[tokio::test]` runtime so every event
/// of the test is emitted on the capturing thread.
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let buf = self.buf.clone();
        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(move || CapturedWriter(buf.clone())),
        );
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        self.buf
            .lock()
            .map(|b| String::from_utf8_lossy(&b).into_owned())
            .unwrap_or_default()
    }
}

struct CapturedWriter(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for CapturedWriter {
    fn write(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
        if let Ok(mut buf) = self.0.lock() {
            buf.extend_from_slice(bytes);
        }
        Ok(bytes.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub fn init_test_setup() -> Result<()> {
    // Set up logging first
    setup_test_logging();

    info!("Test Setup complete");
    Ok(())
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "trace");
    }

    // Create a filter for noisy modules
    let noisy_modules = ["hyper", "reqwest", "mio", "h2"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[ctor::ctor]
    fn init() {
        init_test_setup().expect("Failed to initialize test setup");
    }

    #[tokio::test]
    async fn given_created_notes_when_creating_then_ids_are_distinct() {
        let store = MockNoteStore::builder().build();
        let input = NewNote {
            name: "A".to_string(),
            description: "B".to_string(),
            image: None,
        };

        let first = store.create_note(input.clone()).await.expect("create");
        let second = store.create_note(input).await.expect("create");

        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn given_list_failure_configured_when_listing_then_returns_error() {
        let store = MockNoteStore::builder().with_list_failure("down").build();

        let result = store.list_notes().await;

        assert_eq!(result, Err(SyncError::RemoteStore("down".to_string())));
        assert_eq!(store.calls().store_calls(), vec![StoreCall::List]);
    }

    #[tokio::test]
    async fn given_no_url_configured_when_getting_then_uses_default_base() {
        let blobs = MockBlobStore::builder().build();

        let url = blobs.get("a.png").await.expect("get");

        assert_eq!(url, "https://blobs.test/a.png");
    }

    #[test]
    fn given_installed_capture_when_logging_then_contents_hold_event() {
        let logs = CapturedLogs::default();

        {
            let _guard = logs.install();
            tracing::error!(key = "a.png", "lookup failed");
        }
        tracing::error!("after the guard");

        let output = logs.contents();
        assert!(output.contains("ERROR"));
        assert!(output.contains("lookup failed"));
        assert!(output.contains("key=\"a.png\""));
        assert!(!output.contains("after the guard"));
    }

    #[tokio::test]
    async fn given_get_failure_configured_when_getting_then_still_records_settle() {
        let blobs = MockBlobStore::builder().with_get_failure("a.png").build();

        let result = blobs.get("a.png").await;

        assert!(result.is_err());
        assert_eq!(
            blobs.calls().blob_calls(),
            vec![
                BlobCall::Get("a.png".to_string()),
                BlobCall::GetSettled("a.png".to_string()),
            ]
        );
    }
}
