use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::document::Document;

/// Errors that can occur during persistence operations
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize state: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to write state: {0}")]
    WriteError(#[from] std::io::Error),

    #[error("Failed to read state file: {0}")]
    ReadError(String),

    #[error("Invalid state data: {0}")]
    InvalidState(String),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// A saved document plus when and by which version it was written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub document: Document,
    /// Seconds since the UNIX epoch
    pub timestamp: u64,
    /// Version of the application when the snapshot was taken
    pub version: String,
}

impl DocumentSnapshot {
    pub fn new(document: &Document) -> Self {
        Self {
            document: document.clone(),
            timestamp: timestamp_secs(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn into_document(self) -> Document {
        if self.version != env!("CARGO_PKG_VERSION") {
            log::warn!(
                "Snapshot version {} differs from current version {}",
                self.version,
                env!("CARGO_PKG_VERSION")
            );
        }
        self.document
    }
}

fn timestamp_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Saves and loads documents as JSON files in one directory
#[derive(Debug, Clone)]
pub struct DocumentStore {
    dir: PathBuf,
}

impl DocumentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PersistenceResult<PathBuf> {
        let valid = !name.is_empty()
            && !name.starts_with('.')
            && !name.contains(['/', '\\']);
        if !valid {
            return Err(PersistenceError::InvalidState(format!(
                "invalid document name {name:?}"
            )));
        }
        Ok(self.dir.join(format!("{name}.emojiart.json")))
    }

    /// Save a document under `name`, returning the file written
    pub fn save(&self, name: &str, document: &Document) -> PersistenceResult<PathBuf> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.dir)?;

        let json = serde_json::to_string_pretty(&DocumentSnapshot::new(document))?;
        fs::write(&path, json)?;
        log::info!("Saved document {} to {}", name, path.display());
        Ok(path)
    }

    /// Load a document by name
    pub fn load(&self, name: &str) -> PersistenceResult<Document> {
        let path = self.path_for(name)?;
        let json = fs::read_to_string(&path)
            .map_err(|e| PersistenceError::ReadError(format!("{}: {}", path.display(), e)))?;
        let snapshot: DocumentSnapshot = serde_json::from_str(&json)?;
        // Round-trip through the document codec so id counters are repaired.
        let document = snapshot.into_document();
        let document = Document::from_json(&serde_json::to_string(&document)?)
            .map_err(|e| PersistenceError::InvalidState(e.to_string()))?;
        log::info!("Loaded document {} ({} emoji)", name, document.emojis().len());
        Ok(document)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).map(|path| path.exists()).unwrap_or(false)
    }

    /// Names of all saved documents, sorted
    pub fn list(&self) -> PersistenceResult<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut names: Vec<String> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .strip_suffix(".emojiart.json")
                    .map(str::to_owned)
            })
            .collect();
        names.sort();
        Ok(names)
    }
}
