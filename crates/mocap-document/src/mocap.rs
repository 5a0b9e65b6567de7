//! Mocap documents
//!
//! A standalone document with two sections, `CoreControl` and `Person`,
//! each shaped like an atom fragment (`{ "storables": [...] }`).
//!
//! `Person` is decoded up front. `CoreControl` is kept as raw JSON and only
//! decoded when asked for, so a damaged timing section never stops the
//! person data from loading.

use crate::error::{DocumentError, MocapSection, Section};
use crate::locator;
use crate::record::Record;
use crate::scene::kind_of;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Record list shaped like one atom fragment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorableSection {
    /// Records in document order
    #[serde(default)]
    pub storables: Vec<Record>,
}

impl StorableSection {
    /// Create empty section
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from records
    #[inline]
    #[must_use]
    pub fn from_records(storables: Vec<Record>) -> Self {
        Self { storables }
    }

    /// Append a record
    #[inline]
    pub fn push(&mut self, record: Record) {
        self.storables.push(record);
    }

    /// Record with the given id
    #[inline]
    #[must_use]
    pub fn record(&self, id: &str) -> Option<&Record> {
        locator::find(&self.storables, id)
    }

    /// Identifiers in document order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.storables.iter().filter_map(Record::id)
    }

    /// Number of records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.storables.len()
    }

    /// Whether the section holds no records
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storables.is_empty()
    }

    /// Encode as `{ "storables": [...] }`
    #[must_use]
    pub fn into_value(self) -> Value {
        let records = self.storables.into_iter().map(Record::into_value).collect();
        let mut map = Map::new();
        map.insert("storables".to_string(), Value::Array(records));
        Value::Object(map)
    }
}

/// Portable mocap document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MocapDocument {
    #[serde(rename = "CoreControl", default, skip_serializing_if = "Option::is_none")]
    core_control: Option<Value>,
    #[serde(rename = "Person")]
    person: StorableSection,
}

impl MocapDocument {
    /// Create from both sections
    #[inline]
    #[must_use]
    pub fn new(core_control: StorableSection, person: StorableSection) -> Self {
        Self {
            core_control: Some(core_control.into_value()),
            person,
        }
    }

    /// Validate and decode a parsed document
    ///
    /// A missing or malformed `CoreControl` section is accepted here; it
    /// only matters to the timing-master merge, which treats it as a
    /// recoverable failure.
    ///
    /// # Errors
    /// - `RootNotObject` if the root is not an object
    /// - `MissingSection(Person)` if there is no `Person` section
    /// - `Malformed` if the `Person` section or one of its records has the wrong shape
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        let Some(map) = value.as_object() else {
            return Err(DocumentError::RootNotObject {
                found: kind_of(&value),
            });
        };
        if !map.contains_key(MocapSection::Person.key()) {
            return Err(DocumentError::MissingSection(MocapSection::Person));
        }
        serde_json::from_value(value).map_err(DocumentError::Malformed)
    }

    /// Parse from JSON text
    ///
    /// # Errors
    /// `Malformed` on invalid JSON, otherwise as [`MocapDocument::from_value`].
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(text).map_err(DocumentError::Malformed)?;
        Self::from_value(value)
    }

    /// Whether the document carries a `CoreControl` section at all
    #[inline]
    #[must_use]
    pub fn has_core_control(&self) -> bool {
        self.core_control.is_some()
    }

    /// Decoded timing controller section
    ///
    /// # Errors
    /// - `MissingSection(CoreControl)` when absent
    /// - `MalformedSection` when it is not a record list
    pub fn core_control(&self) -> Result<StorableSection, DocumentError> {
        let raw = self
            .core_control
            .as_ref()
            .ok_or(DocumentError::MissingSection(MocapSection::CoreControl))?;
        StorableSection::deserialize(raw).map_err(|source| DocumentError::MalformedSection {
            section: MocapSection::CoreControl,
            source,
        })
    }

    /// Person section
    #[inline]
    #[must_use]
    pub fn person(&self) -> &StorableSection {
        &self.person
    }

    /// Person record, or a document-format error naming it
    ///
    /// # Errors
    /// `RecordNotFound` in the `Person` section.
    pub fn person_record(&self, id: &str) -> Result<&Record, DocumentError> {
        locator::require(
            &self.person.storables,
            id,
            &Section::Mocap(MocapSection::Person),
        )
    }

    /// Copy of a `CoreControl` record
    ///
    /// # Errors
    /// As [`MocapDocument::core_control`], or `RecordNotFound`.
    pub fn core_control_record(&self, id: &str) -> Result<Record, DocumentError> {
        let section = self.core_control()?;
        locator::require(
            &section.storables,
            id,
            &Section::Mocap(MocapSection::CoreControl),
        )
        .cloned()
    }

    /// Encode as a JSON value
    ///
    /// # Errors
    /// Fails only if a record holds a non-string map key, which cannot
    /// happen for documents built from JSON.
    pub fn to_value(&self) -> Result<Value, DocumentError> {
        serde_json::to_value(self).map_err(DocumentError::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_both_sections() {
        let doc = MocapDocument::from_value(json!({
            "CoreControl": {"storables": [{"id": "MotionAnimationMaster", "loop": "true"}]},
            "Person": {"storables": [{"id": "control"}, {"id": "headControl"}]}
        }))
        .unwrap();

        assert_eq!(doc.person().ids().collect::<Vec<_>>(), vec!["control", "headControl"]);
        let master = doc.core_control_record("MotionAnimationMaster").unwrap();
        assert_eq!(master.get("loop"), Some(&json!("true")));
    }

    #[test]
    fn missing_person_section_is_fatal() {
        let err = MocapDocument::from_value(json!({"CoreControl": {"storables": []}})).unwrap_err();
        assert!(matches!(err, DocumentError::MissingSection(MocapSection::Person)));
    }

    #[test]
    fn missing_core_control_is_deferred() {
        let doc = MocapDocument::from_value(json!({"Person": {"storables": []}})).unwrap();
        assert!(!doc.has_core_control());
        assert!(matches!(
            doc.core_control(),
            Err(DocumentError::MissingSection(MocapSection::CoreControl))
        ));
    }

    #[test]
    fn malformed_core_control_is_deferred() {
        for core_control in [
            json!({"storables": "garbage"}),
            json!({"storables": ["MotionAnimationMaster"]}),
            json!(7),
        ] {
            let doc = MocapDocument::from_value(json!({
                "CoreControl": core_control,
                "Person": {"storables": [{"id": "control"}]}
            }))
            .unwrap();
            assert_eq!(doc.person().len(), 1);
            assert!(doc.has_core_control());
            let err = doc.core_control_record("MotionAnimationMaster").unwrap_err();
            assert!(matches!(
                err,
                DocumentError::MalformedSection {
                    section: MocapSection::CoreControl,
                    ..
                }
            ));
        }
    }

    #[test]
    fn missing_storables_defaults_to_empty() {
        let doc = MocapDocument::from_value(json!({"Person": {}})).unwrap();
        assert!(doc.person().is_empty());
    }

    #[test]
    fn non_object_record_is_malformed() {
        let err = MocapDocument::from_value(json!({"Person": {"storables": ["control"]}})).unwrap_err();
        assert!(matches!(err, DocumentError::Malformed(_)));
    }

    #[test]
    fn person_record_names_section() {
        let doc = MocapDocument::new(StorableSection::new(), StorableSection::new());
        let err = doc.person_record("headControl").unwrap_err();
        assert_eq!(
            err.to_string(),
            "mocap section 'Person' does not contain record 'headControl'"
        );
    }

    #[test]
    fn encodes_section_keys() {
        let doc = MocapDocument::new(
            StorableSection::from_records(vec![Record::new("MotionAnimationMaster")]),
            StorableSection::from_records(vec![Record::new("control")]),
        );
        assert_eq!(
            doc.to_value().unwrap(),
            json!({
                "CoreControl": {"storables": [{"id": "MotionAnimationMaster"}]},
                "Person": {"storables": [{"id": "control"}]}
            })
        );
    }
}
