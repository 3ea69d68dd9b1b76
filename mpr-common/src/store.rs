//! Record store: the full record collection as one JSON document
//!
//! Every mutation is a complete load → modify → save cycle over the whole
//! document. Without a write lock, interleaved cycles lose updates (last
//! writer wins). [`RecordStore::with_write_lock`] serializes the mutating
//! cycles within one process.
//!
//! Elements are kept as raw JSON values. Only new records go through the
//! typed model; existing elements are written back as they were read, with
//! status updates patched in place.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

use crate::models::{next_id, MissingPersonRecord, RecordStatus};
use crate::{Error, Result};

/// Raw storage behind a [`RecordStore`]
pub trait RecordBackend: Send + Sync {
    /// Current document text, `None` when no document exists yet
    fn read(&self) -> Result<Option<String>>;

    /// Replace the whole document
    fn write(&self, contents: &str) -> Result<()>;

    /// Human-readable location for log lines
    fn describe(&self) -> String;
}

/// Store document on the local filesystem
///
/// Handles are opened per call; nothing is held between requests.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordBackend for FileBackend {
    fn read(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Io(e)),
        }
    }

    fn write(&self, contents: &str) -> Result<()> {
        // Plain overwrite: no temp file, no rename, no backup
        std::fs::write(&self.path, contents).map_err(|e| {
            Error::Storage(format!("{}: {}", self.path.display(), e))
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Store document held in memory (tests, ephemeral runs)
#[derive(Debug, Default)]
pub struct MemoryBackend {
    document: Mutex<Option<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing document text
    pub fn with_document(contents: impl Into<String>) -> Self {
        Self {
            document: Mutex::new(Some(contents.into())),
        }
    }

    /// Snapshot of the current document text
    pub fn document(&self) -> Option<String> {
        self.document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl RecordBackend for MemoryBackend {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.document())
    }

    fn write(&self, contents: &str) -> Result<()> {
        *self
            .document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(contents.to_string());
        Ok(())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}

/// Record collection access shared by all HTTP handlers
///
/// Cheap to clone; clones share the backend and the optional write lock.
#[derive(Clone)]
pub struct RecordStore {
    backend: Arc<dyn RecordBackend>,
    write_lock: Option<Arc<AsyncMutex<()>>>,
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("backend", &self.backend.describe())
            .field("write_lock", &self.write_lock.is_some())
            .finish()
    }
}

impl RecordStore {
    pub fn new(backend: impl RecordBackend + 'static) -> Self {
        Self::from_backend(Arc::new(backend))
    }

    pub fn from_backend(backend: Arc<dyn RecordBackend>) -> Self {
        Self {
            backend,
            write_lock: None,
        }
    }

    /// File-backed store at `path`
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(FileBackend::new(path))
    }

    /// Store starting from an empty in-memory document
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Serialize `append`/`update_status` cycles behind one async mutex
    pub fn with_write_lock(mut self) -> Self {
        self.write_lock = Some(Arc::new(AsyncMutex::new(())));
        self
    }

    pub fn is_write_locked(&self) -> bool {
        self.write_lock.is_some()
    }

    pub fn describe(&self) -> String {
        self.backend.describe()
    }

    /// Load the full collection
    ///
    /// Never fails: a missing document, unparsable content or a non-array
    /// top level all yield an empty collection. Elements are returned as
    /// stored, whatever their shape, so a later save writes them back intact.
    pub fn load(&self) -> Vec<Value> {
        match self.backend.read() {
            Ok(Some(text)) => parse_document(&text),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Store document {} unreadable, treating as empty: {}", self.describe(), e);
                Vec::new()
            }
        }
    }

    /// Overwrite the document with `elements`
    pub fn save(&self, elements: &[Value]) -> Result<()> {
        let contents = to_pretty_json(elements)?;
        self.backend.write(&contents)
    }

    /// First element whose `id` is the string `id`
    pub fn find_by_id(&self, id: &str) -> Option<Value> {
        self.load().into_iter().find(|element| has_id(element, id))
    }

    /// Load the collection off the async reactor
    pub async fn list(&self) -> Result<Vec<Value>> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.load())
            .await
            .map_err(|e| Error::Storage(format!("Store task failed: {}", e)))
    }

    /// Assign the next id to `record`, append it and save
    ///
    /// Returns the record as stored.
    pub async fn append(&self, record: MissingPersonRecord) -> Result<MissingPersonRecord> {
        let _guard = self.lock_for_write().await;
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.append_blocking(record))
            .await
            .map_err(|e| Error::Storage(format!("Store task failed: {}", e)))?
    }

    /// Set the status of the element with `id` and save
    ///
    /// Returns the updated element, or `Error::NotFound` without writing
    /// when nothing matches.
    pub async fn update_status(&self, id: &str, status: RecordStatus) -> Result<Value> {
        let _guard = self.lock_for_write().await;
        let store = self.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || store.update_status_blocking(&id, status))
            .await
            .map_err(|e| Error::Storage(format!("Store task failed: {}", e)))?
    }

    pub fn append_blocking(&self, mut record: MissingPersonRecord) -> Result<MissingPersonRecord> {
        let mut elements = self.load();
        // Every element counts, records or not
        record.id = next_id(elements.len());
        elements.push(serde_json::to_value(&record)?);
        self.save(&elements)?;
        info!("Record {} appended ({} total)", record.id, elements.len());
        Ok(record)
    }

    pub fn update_status_blocking(&self, id: &str, status: RecordStatus) -> Result<Value> {
        let mut elements = self.load();
        let Some(Value::Object(fields)) = elements.iter_mut().find(|element| has_id(element, id))
        else {
            return Err(Error::NotFound(format!("record {}", id)));
        };
        fields.insert("status".to_string(), Value::String(status.to_string()));
        let updated = Value::Object(fields.clone());
        self.save(&elements)?;
        info!("Record {} status set to {}", id, status);
        Ok(updated)
    }

    async fn lock_for_write(&self) -> Option<OwnedMutexGuard<()>> {
        match &self.write_lock {
            Some(lock) => Some(lock.clone().lock_owned().await),
            None => None,
        }
    }
}

/// Pretty-printed JSON (two-space indent, non-ASCII written literally,
/// object keys in document order)
pub fn to_pretty_json(elements: &[Value]) -> Result<String> {
    Ok(serde_json::to_string_pretty(elements)?)
}

/// Ids only match when stored as JSON strings
fn has_id(element: &Value, id: &str) -> bool {
    element.get("id").and_then(Value::as_str) == Some(id)
}

fn parse_document(text: &str) -> Vec<Value> {
    match serde_json::from_str(text) {
        Ok(Value::Array(elements)) => elements,
        Ok(_) => {
            debug!("Store document top level is not an array, treating as empty");
            Vec::new()
        }
        Err(e) => {
            debug!("Store document is not valid JSON, treating as empty: {}", e);
            Vec::new()
        }
    }
}
