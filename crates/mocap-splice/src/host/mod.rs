//! Host collaborator interfaces
//!
//! The engine never reaches for a global scene controller. Everything it
//! needs from the running host is passed in through these traits:
//!
//! - [`EntityDirectory`]: which atoms exist, their type and record ids
//! - [`RecordAccess`]: fetch, restore and reset live records
//! - [`SceneSession`]: snapshot the scene, reload it, rewind playback
//!
//! [`SceneHost`] implements all three over an in-memory scene document.

mod scene_host;

pub use scene_host::SceneHost;

use crate::error::HostError;
use mocap_document::{Record, SceneDocument};
use std::path::Path;

/// Resolves atoms and lists their records
pub trait EntityDirectory {
    /// Whether an atom with this id exists
    fn contains_atom(&self, atom_id: &str) -> bool;

    /// Type of the atom, `None` if absent or untyped
    fn atom_type(&self, atom_id: &str) -> Option<String>;

    /// Record ids of the atom in host order, `None` if the atom is absent
    fn storable_ids(&self, atom_id: &str) -> Option<Vec<String>>;
}

/// Reads and writes live records
pub trait RecordAccess {
    /// Current representation of a record, `None` when it does not exist
    fn fetch(&self, atom_id: &str, record_id: &str) -> Option<Record>;

    /// Overwrite the live record identified by `record`'s id
    ///
    /// # Errors
    /// `RecordNotFound`/`AtomNotFound` on a lookup miss, `InvalidRecord` if
    /// the record has no id.
    fn restore(&mut self, atom_id: &str, record: &Record) -> Result<(), HostError>;

    /// Return a live record to its default state
    ///
    /// # Errors
    /// `RecordNotFound`/`AtomNotFound` on a lookup miss.
    fn reset(&mut self, atom_id: &str, record_id: &str) -> Result<(), HostError>;
}

/// Whole-scene effects
pub trait SceneSession {
    /// Snapshot of the live scene as a document
    ///
    /// # Errors
    /// Host-specific.
    fn current_scene(&self) -> Result<SceneDocument, HostError>;

    /// Replace the live scene with the document stored at `path`
    ///
    /// # Errors
    /// Store or document errors while loading.
    fn reload(&mut self, path: &Path) -> Result<(), HostError>;

    /// Move the timing controller back to frame zero
    ///
    /// # Errors
    /// Host-specific.
    fn rewind_playback(&mut self) -> Result<(), HostError>;
}

/// Everything the switcher needs from a host
pub trait Host: EntityDirectory + RecordAccess + SceneSession {}

impl<T: EntityDirectory + RecordAccess + SceneSession + ?Sized> Host for T {}
