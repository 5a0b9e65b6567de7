//! Scene-backed host
//!
//! The live state *is* an in-memory scene document. Record access edits
//! the document in place and a reload swaps it for whatever the store
//! returns. This is what the binary drives, and it lets every load path
//! run end to end without a running host.

use super::{EntityDirectory, RecordAccess, SceneSession};
use crate::error::HostError;
use crate::splicer::CORE_CONTROL_ID;
use crate::timing::{RESET_FIELDS, RESET_VALUE, TIMING_MASTER_ID};
use mocap_document::{locator, DocumentStore, FileStore, Record, SceneDocument};
use serde_json::Value;
use std::path::Path;

/// Host whose live state is a scene document
#[derive(Debug)]
pub struct SceneHost<S: DocumentStore> {
    scene: SceneDocument,
    store: S,
    core_control_id: String,
    reloads: usize,
}

impl SceneHost<FileStore> {
    /// Load the scene at `path` from disk
    ///
    /// # Errors
    /// Read, syntax, or scene-shape failure.
    pub fn open(path: &Path) -> Result<Self, HostError> {
        let store = FileStore::new();
        let scene = store.load_scene(path)?;
        Ok(Self::new(scene, store))
    }
}

impl<S: DocumentStore> SceneHost<S> {
    /// Create host over a scene; reloads go through `store`
    #[must_use]
    pub fn new(scene: SceneDocument, store: S) -> Self {
        Self {
            scene,
            store,
            core_control_id: CORE_CONTROL_ID.to_string(),
            reloads: 0,
        }
    }

    /// With a different core control atom id
    #[inline]
    #[must_use]
    pub fn with_core_control_id(mut self, core_control_id: impl Into<String>) -> Self {
        self.core_control_id = core_control_id.into();
        self
    }

    /// Current live scene
    #[inline]
    #[must_use]
    pub fn scene(&self) -> &SceneDocument {
        &self.scene
    }

    /// Consume into the live scene
    #[inline]
    #[must_use]
    pub fn into_scene(self) -> SceneDocument {
        self.scene
    }

    /// Number of completed reloads
    #[inline]
    #[must_use]
    pub fn reload_count(&self) -> usize {
        self.reloads
    }

    fn records_mut(&mut self, atom_id: &str) -> Result<&mut Vec<Value>, HostError> {
        let atom = self
            .scene
            .atom_mut(atom_id)
            .ok_or_else(|| HostError::AtomNotFound(atom_id.to_string()))?;
        Ok(atom.into_storables_mut()?)
    }

    fn slot_mut(&mut self, atom_id: &str, record_id: &str) -> Result<&mut Value, HostError> {
        let records = self.records_mut(atom_id)?;
        locator::find_mut(records, record_id)
            .ok_or_else(|| HostError::record_not_found(atom_id, record_id))
    }
}

impl<S: DocumentStore> EntityDirectory for SceneHost<S> {
    fn contains_atom(&self, atom_id: &str) -> bool {
        self.scene.atom(atom_id).is_some()
    }

    fn atom_type(&self, atom_id: &str) -> Option<String> {
        self.scene
            .atom(atom_id)
            .and_then(|atom| atom.atom_type())
            .map(str::to_string)
    }

    fn storable_ids(&self, atom_id: &str) -> Option<Vec<String>> {
        self.scene
            .atom(atom_id)
            .map(|atom| atom.record_ids().into_iter().map(str::to_string).collect())
    }
}

impl<S: DocumentStore> RecordAccess for SceneHost<S> {
    fn fetch(&self, atom_id: &str, record_id: &str) -> Option<Record> {
        self.scene
            .atom(atom_id)?
            .record(record_id)
            .cloned()
            .and_then(Record::from_value)
    }

    fn restore(&mut self, atom_id: &str, record: &Record) -> Result<(), HostError> {
        let record_id = record.id().ok_or_else(|| HostError::InvalidRecord {
            atom_id: atom_id.to_string(),
            reason: "record has no id".to_string(),
        })?;
        *self.slot_mut(atom_id, record_id)? = record.clone().into_value();
        tracing::trace!(atom = atom_id, record = record_id, "restored record");
        Ok(())
    }

    fn reset(&mut self, atom_id: &str, record_id: &str) -> Result<(), HostError> {
        *self.slot_mut(atom_id, record_id)? = Record::new(record_id).into_value();
        tracing::trace!(atom = atom_id, record = record_id, "reset record");
        Ok(())
    }
}

impl<S: DocumentStore> SceneSession for SceneHost<S> {
    fn current_scene(&self) -> Result<SceneDocument, HostError> {
        Ok(self.scene.clone())
    }

    fn reload(&mut self, path: &Path) -> Result<(), HostError> {
        self.scene = self.store.load_scene(path)?;
        self.reloads += 1;
        tracing::info!(path = %path.display(), "reloaded scene");
        Ok(())
    }

    fn rewind_playback(&mut self) -> Result<(), HostError> {
        let core_control_id = self.core_control_id.clone();
        let master = self
            .slot_mut(&core_control_id, TIMING_MASTER_ID)?
            .as_object_mut()
            .ok_or_else(|| HostError::InvalidRecord {
                atom_id: core_control_id.clone(),
                reason: format!("{TIMING_MASTER_ID} is not an object"),
            })?;
        for field in RESET_FIELDS {
            master.insert(field.to_string(), Value::String(RESET_VALUE.to_string()));
        }
        tracing::debug!(atom = %core_control_id, "rewound playback");
        Ok(())
    }
}
