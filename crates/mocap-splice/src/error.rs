//! Error types for the splicing engine
//!
//! - `SpliceError`: fatal, aborts the whole load
//! - `MergeError`: timing-master merge failure, reported as a warning
//! - `HostError`: collaborator failures (lookup, reload, store)
//! - `SwitcherError`: everything a load or save can surface to the user

use mocap_document::{DocumentError, StoreError};
use std::path::PathBuf;

/// Fatal errors while applying mocap data to a person
#[derive(Debug, thiserror::Error)]
pub enum SpliceError {
    /// A record required while clearing is missing
    #[error("clearing animation data failed: {source}")]
    Clear {
        /// Missing record or list
        #[source]
        source: DocumentError,
    },

    /// A record required while adding is missing
    #[error("adding animation data failed: {source}")]
    Add {
        /// Missing record or list
        #[source]
        source: DocumentError,
    },

    /// Host rejected a live record operation
    #[error("host error: {0}")]
    Host(#[from] HostError),
}

impl SpliceError {
    /// Wrap a clearing failure
    #[inline]
    pub fn clear(source: DocumentError) -> Self {
        Self::Clear { source }
    }

    /// Wrap an adding failure
    #[inline]
    pub fn add(source: DocumentError) -> Self {
        Self::Add { source }
    }

    /// Identifier of the missing record, if any
    #[must_use]
    pub fn missing_record_id(&self) -> Option<&str> {
        match self {
            Self::Clear { source } | Self::Add { source } => source.missing_record_id(),
            Self::Host(HostError::RecordNotFound { record_id, .. }) => Some(record_id.as_str()),
            Self::Host(_) => None,
        }
    }
}

/// Best-effort timing-master merge failures
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// Mocap carries no timing-master record
    #[error("selected mocap file does not contain MotionAnimationMaster data: {source}")]
    MissingMocapTimingMaster {
        /// Missing section or record
        #[source]
        source: DocumentError,
    },

    /// Mocap timing section cannot be read as a record list
    #[error("selected mocap file has unreadable MotionAnimationMaster data: {source}")]
    MalformedMocapTimingMaster {
        /// Decode failure
        #[source]
        source: DocumentError,
    },

    /// Target atom carries no timing-master record
    #[error("atom '{atom_id}' has no MotionAnimationMaster record")]
    MissingTargetTimingMaster {
        /// Core control atom id
        atom_id: String,
    },

    /// Target atom is malformed
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Host rejected the restore
    #[error("host error: {0}")]
    Host(#[from] HostError),
}

/// Collaborator failures
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// No atom with that id
    #[error("atom '{0}' not found")]
    AtomNotFound(String),

    /// Atom has no record with that id
    #[error("atom '{atom_id}' has no record '{record_id}'")]
    RecordNotFound {
        /// Atom id
        atom_id: String,
        /// Record id
        record_id: String,
    },

    /// Record handed to the host is unusable
    #[error("invalid record for atom '{atom_id}': {reason}")]
    InvalidRecord {
        /// Atom id
        atom_id: String,
        /// What is wrong
        reason: String,
    },

    /// Scene document is malformed
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Store failure during load or reload
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl HostError {
    /// Create record-not-found error
    #[inline]
    pub fn record_not_found(atom_id: impl Into<String>, record_id: impl Into<String>) -> Self {
        Self::RecordNotFound {
            atom_id: atom_id.into(),
            record_id: record_id.into(),
        }
    }

    /// Whether this is a plain lookup miss
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RecordNotFound { .. } | Self::AtomNotFound(_))
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {}: {source}", path.display())]
    Read {
        /// File path
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be encoded
    #[error("config serialization failed: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is out of range
    #[error("invalid config value for '{key}': {reason}")]
    Invalid {
        /// Offending key
        key: &'static str,
        /// Why it is rejected
        reason: String,
    },
}

/// Errors surfaced by a load or save
#[derive(Debug, thiserror::Error)]
pub enum SwitcherError {
    /// Bound atom is not a person
    #[error("plugin is for use with 'Person' atom, not '{actual}' (atom '{atom_id}')")]
    NotAPerson {
        /// Atom id
        atom_id: String,
        /// Actual atom type
        actual: String,
    },

    /// Splice or live restore failed
    #[error("loading mocap failed: {0}")]
    Splice(#[from] SpliceError),

    /// Export or mocap shape failed
    #[error("mocap document error: {0}")]
    Document(#[from] DocumentError),

    /// Collaborator failure
    #[error("host error: {0}")]
    Host(#[from] HostError),

    /// File boundary failure
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration failure
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result alias for switcher operations
pub type SwitcherResult<T> = Result<T, SwitcherError>;
