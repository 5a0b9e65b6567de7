//! Mocap Splicing Engine
//!
//! Moves a person's captured motion between full scene documents and
//! portable mocap documents.
//!
//! # Architecture
//!
//! ```text
//! load:  mocap + scene ──▶ Splicer ──▶ scene' ──▶ store ──▶ host reload
//!                    └───▶ LiveRestorer ──▶ live records (alternative)
//! save:  live records ──▶ Exporter ──▶ mocap ──▶ store
//! ```
//!
//! # Core Concepts
//!
//! - [`AnimationIds`]: which records of a person are animation data
//! - [`Splicer`]: clear/add the person's records, merge playback timing
//! - [`Exporter`]: assemble a minimal mocap document from live records
//! - [`LiveRestorer`]: in-place alternative to splice-and-reload
//! - [`host`]: collaborator traits the engine is driven through
//! - [`MocapSwitcher`]: binds to a person and runs load/save
//!
//! # Example
//!
//! ```rust,ignore
//! use mocap_splice::prelude::*;
//! use std::path::Path;
//!
//! let mut host = SceneHost::open(Path::new("Saves/scene/dance.json"))?;
//! let switcher = MocapSwitcher::bind(SwitcherConfig::new(), &host, FileStore::new())?;
//! let report = switcher.load_and_apply(&mut host, Path::new("mocap/wave.json"))?;
//! for warning in &report.warnings {
//!     eprintln!("warning: {warning}");
//! }
//! ```

#![warn(unreachable_pub)]

pub mod classifier;
pub mod config;
pub mod error;
pub mod exporter;
pub mod host;
pub mod live;
pub mod splicer;
pub mod switcher;
pub mod timing;

pub use classifier::{control_id_of, is_animation_id, AnimationIds, AnimationPair};
pub use config::{ApplyStrategy, SwitcherConfig};
pub use error::{ConfigError, HostError, MergeError, SpliceError, SwitcherError, SwitcherResult};
pub use exporter::{Exporter, ROOT_CONTROL_ID};
pub use host::{EntityDirectory, Host, RecordAccess, SceneHost, SceneSession};
pub use live::LiveRestorer;
pub use splicer::{SpliceOutcome, SpliceReport, Splicer, CORE_CONTROL_ID};
pub use switcher::{MocapSwitcher, PERSON_ATOM_TYPE};
pub use timing::{merge_timing_master, TIMING_MASTER_ID};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for loading and saving mocap
    pub use crate::classifier::{control_id_of, AnimationIds};
    pub use crate::config::{ApplyStrategy, SwitcherConfig};
    pub use crate::error::{SpliceError, SwitcherError, SwitcherResult};
    pub use crate::exporter::Exporter;
    pub use crate::host::{EntityDirectory, Host, RecordAccess, SceneHost, SceneSession};
    pub use crate::live::LiveRestorer;
    pub use crate::splicer::{SpliceReport, Splicer};
    pub use crate::switcher::MocapSwitcher;
    pub use mocap_document::prelude::*;
}
