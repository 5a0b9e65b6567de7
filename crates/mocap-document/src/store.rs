//! Document store - the file boundary
//!
//! Parsing and serializing documents to paths. The splicing engine only
//! sees parsed values; everything touching the filesystem goes through a
//! [`DocumentStore`].

use crate::error::StoreError;
use crate::mocap::MocapDocument;
use crate::scene::SceneDocument;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Load and save documents by path
pub trait DocumentStore {
    /// Parse the document at `path`
    ///
    /// # Errors
    /// Read failure or invalid JSON.
    fn load(&self, path: &Path) -> Result<Value, StoreError>;

    /// Serialize `document` to `path`
    ///
    /// # Errors
    /// Write or serialization failure.
    fn save(&self, path: &Path, document: &Value) -> Result<(), StoreError>;

    /// Load and validate a scene document
    ///
    /// # Errors
    /// As [`DocumentStore::load`], or `Document` when the shape is wrong.
    fn load_scene(&self, path: &Path) -> Result<SceneDocument, StoreError> {
        let value = self.load(path)?;
        SceneDocument::from_value(value).map_err(|source| StoreError::Document {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load and validate a mocap document
    ///
    /// # Errors
    /// As [`DocumentStore::load`], or `Document` when the shape is wrong.
    fn load_mocap(&self, path: &Path) -> Result<MocapDocument, StoreError> {
        let value = self.load(path)?;
        MocapDocument::from_value(value).map_err(|source| StoreError::Document {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Filesystem-backed store
#[derive(Debug, Clone, Copy)]
pub struct FileStore {
    /// Indent output
    pretty: bool,
    /// Create missing parent directories on save
    create_dirs: bool,
}

impl FileStore {
    /// Create store with pretty output and directory creation
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            pretty: true,
            create_dirs: true,
        }
    }

    /// With compact output
    #[inline]
    #[must_use]
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    /// Without parent directory creation
    #[inline]
    #[must_use]
    pub fn without_dir_creation(mut self) -> Self {
        self.create_dirs = false;
        self
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for FileStore {
    fn load(&self, path: &Path) -> Result<Value, StoreError> {
        let text = fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let value = serde_json::from_str(&text).map_err(|source| StoreError::Syntax {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "loaded document");
        Ok(value)
    }

    fn save(&self, path: &Path, document: &Value) -> Result<(), StoreError> {
        let text = if self.pretty {
            serde_json::to_string_pretty(document)
        } else {
            serde_json::to_string(document)
        }
        .map_err(|source| StoreError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;

        if self.create_dirs {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                    path: path.to_path_buf(),
                    source,
                })?;
            }
        }

        fs::write(path, &text).map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "saved document");
        Ok(())
    }
}

/// In-memory store keyed by path
///
/// Single-threaded; used where the hand-off file never needs to reach disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RefCell<HashMap<PathBuf, Value>>,
}

impl MemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document at `path`
    pub fn insert(&self, path: impl Into<PathBuf>, document: Value) {
        self.documents.borrow_mut().insert(path.into(), document);
    }

    /// Copy of the document at `path`
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<Value> {
        self.documents.borrow().get(path).cloned()
    }

    /// Whether a document exists at `path`
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.documents.borrow().contains_key(path)
    }

    /// Number of stored documents
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.borrow().len()
    }

    /// Whether the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.borrow().is_empty()
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self, path: &Path) -> Result<Value, StoreError> {
        self.get(path).ok_or_else(|| StoreError::NotFound {
            path: path.to_path_buf(),
        })
    }

    fn save(&self, path: &Path, document: &Value) -> Result<(), StoreError> {
        self.insert(path, document.clone());
        Ok(())
    }
}

impl<S: DocumentStore + ?Sized> DocumentStore for &S {
    fn load(&self, path: &Path) -> Result<Value, StoreError> {
        (**self).load(path)
    }

    fn save(&self, path: &Path, document: &Value) -> Result<(), StoreError> {
        (**self).save(path, document)
    }
}
