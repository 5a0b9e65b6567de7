//! Error types for scene and mocap documents
//!
//! Provides error handling for:
//! - Document-format violations (a required section or record is absent)
//! - Store operations (file read/write, JSON syntax)

use std::fmt;
use std::path::PathBuf;

/// Named top-level sections of a mocap document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MocapSection {
    /// Timing controller data (`CoreControl`)
    CoreControl,
    /// Person animation/control data (`Person`)
    Person,
}

impl MocapSection {
    /// JSON key of the section
    #[inline]
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::CoreControl => "CoreControl",
            Self::Person => "Person",
        }
    }
}

impl fmt::Display for MocapSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Where a record lookup happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    /// Atom fragment inside a scene document
    SceneAtom(String),
    /// Section of a mocap document
    Mocap(MocapSection),
    /// Live entity owned by the host
    LiveAtom(String),
}

impl Section {
    /// Scene atom section
    #[inline]
    pub fn scene_atom(id: impl Into<String>) -> Self {
        Self::SceneAtom(id.into())
    }

    /// Live atom section
    #[inline]
    pub fn live_atom(id: impl Into<String>) -> Self {
        Self::LiveAtom(id.into())
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SceneAtom(id) => write!(f, "scene atom '{id}'"),
            Self::Mocap(section) => write!(f, "mocap section '{section}'"),
            Self::LiveAtom(id) => write!(f, "live atom '{id}'"),
        }
    }
}

/// Document-format errors
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Document root is not a JSON object
    #[error("document root must be an object, found {found}")]
    RootNotObject {
        /// JSON kind that was found instead
        found: &'static str,
    },

    /// Scene document lacks its `atoms` array
    #[error("scene document has no 'atoms' array")]
    MissingAtoms,

    /// Atom or section lacks its `storables` array
    #[error("{section} has no 'storables' array")]
    MissingStorables {
        /// Offending section
        section: Section,
    },

    /// Mocap document lacks a required section
    #[error("selected mocap file does not contain a '{0}' section")]
    MissingSection(MocapSection),

    /// Mocap section is present but not a record list
    #[error("mocap section '{section}' is malformed: {source}")]
    MalformedSection {
        /// Offending section
        section: MocapSection,
        /// Decode failure
        #[source]
        source: serde_json::Error,
    },

    /// Required record is absent
    #[error("{section} does not contain record '{record_id}'")]
    RecordNotFound {
        /// Identifier that was looked up
        record_id: String,
        /// Where it was looked up
        section: Section,
    },

    /// Document text or shape could not be decoded
    #[error("malformed document: {0}")]
    Malformed(#[source] serde_json::Error),
}

impl DocumentError {
    /// Create record-not-found error
    #[inline]
    pub fn record_not_found(record_id: impl Into<String>, section: Section) -> Self {
        Self::RecordNotFound {
            record_id: record_id.into(),
            section,
        }
    }

    /// Identifier of the missing record, if this is a lookup failure
    #[must_use]
    pub fn missing_record_id(&self) -> Option<&str> {
        match self {
            Self::RecordNotFound { record_id, .. } => Some(record_id.as_str()),
            _ => None,
        }
    }
}

/// Errors from a document store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error during read
    #[error("io error reading {}: {source}", path.display())]
    Read {
        /// File path
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// IO error during write
    #[error("io error writing {}: {source}", path.display())]
    Write {
        /// File path
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// File is not valid JSON
    #[error("syntax error in {}: {source}", path.display())]
    Syntax {
        /// File path
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: serde_json::Error,
    },

    /// Document could not be encoded
    #[error("serialization failed for {}: {source}", path.display())]
    Serialize {
        /// File path
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: serde_json::Error,
    },

    /// File parsed but has the wrong shape
    #[error("invalid document in {}: {source}", path.display())]
    Document {
        /// File path
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: DocumentError,
    },

    /// No document stored at path (in-memory stores)
    #[error("no document at {}", path.display())]
    NotFound {
        /// Requested path
        path: PathBuf,
    },
}

/// Result alias for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_not_found_names_record_and_section() {
        let err = DocumentError::record_not_found("headControl", Section::scene_atom("Person"));
        assert_eq!(
            err.to_string(),
            "scene atom 'Person' does not contain record 'headControl'"
        );
        assert_eq!(err.missing_record_id(), Some("headControl"));
    }

    #[test]
    fn missing_section_display() {
        let err = DocumentError::MissingSection(MocapSection::Person);
        assert_eq!(
            err.to_string(),
            "selected mocap file does not contain a 'Person' section"
        );
        assert_eq!(err.missing_record_id(), None);
    }

    #[test]
    fn section_display() {
        assert_eq!(
            Section::Mocap(MocapSection::CoreControl).to_string(),
            "mocap section 'CoreControl'"
        );
        assert_eq!(Section::live_atom("Person#2").to_string(), "live atom 'Person#2'");
    }

    #[test]
    fn store_error_display() {
        let err = StoreError::NotFound {
            path: PathBuf::from("saves/tmp.json"),
        };
        assert_eq!(err.to_string(), "no document at saves/tmp.json");
    }
}
