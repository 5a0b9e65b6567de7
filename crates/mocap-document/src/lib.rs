//! Mocap Document Model
//!
//! The subset of scene and mocap document structure the splicing engine
//! reads, deletes, inserts, or patches.
//!
//! # Core Concepts
//!
//! - [`SceneDocument`]: full scene with an `atoms` array
//! - [`MocapDocument`]: portable `CoreControl` + `Person` sections
//! - [`Record`]: one storable, identified by its `id` field
//! - [`locator`]: first-match lookup returning found / not found
//! - [`DocumentStore`]: parse from and serialize to paths
//!
//! # Example
//!
//! ```rust,ignore
//! use mocap_document::{DocumentStore, FileStore};
//!
//! let store = FileStore::new();
//! let scene = store.load_scene("Saves/scene/dance.json".as_ref())?;
//! let person = scene.atom("Person").expect("person atom");
//! println!("{} records", person.record_ids().len());
//! ```

#![warn(unreachable_pub)]

pub mod error;
pub mod locator;
pub mod mocap;
pub mod record;
pub mod scene;
pub mod store;

pub use error::{DocumentError, DocumentResult, MocapSection, Section, StoreError};
pub use locator::Identified;
pub use mocap::{MocapDocument, StorableSection};
pub use record::Record;
pub use scene::{Atom, AtomMut, SceneDocument};
pub use store::{DocumentStore, FileStore, MemoryStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with documents
    pub use crate::error::{DocumentError, MocapSection, Section, StoreError};
    pub use crate::locator::{self, Identified};
    pub use crate::mocap::{MocapDocument, StorableSection};
    pub use crate::record::Record;
    pub use crate::scene::SceneDocument;
    pub use crate::store::{DocumentStore, FileStore, MemoryStore};
}
