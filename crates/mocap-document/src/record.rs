//! Storable records
//!
//! A record is a JSON object whose `id` field names its role within one
//! atom. All other fields are role-specific and carried verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field holding the record identifier
pub const ID_FIELD: &str = "id";
/// Field holding captured animation steps
pub const STEPS_FIELD: &str = "steps";
/// Field holding scene-local trigger wiring
pub const TRIGGERS_FIELD: &str = "triggers";

/// One storable record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Create record holding only its identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert(ID_FIELD.to_string(), Value::String(id.into()));
        Self(map)
    }

    /// Wrap an existing field map
    #[inline]
    #[must_use]
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Wrap a JSON value, `None` unless it is an object
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Record identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_FIELD).and_then(Value::as_str)
    }

    /// Field value
    #[inline]
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Set a field, returning the previous value
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    /// Builder form of [`Record::set`]
    #[inline]
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// Number of captured animation steps
    ///
    /// Zero when the record has no `steps` array.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.0
            .get(STEPS_FIELD)
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    /// Whether the record carries captured motion
    #[inline]
    #[must_use]
    pub fn has_motion(&self) -> bool {
        self.step_count() > 0
    }

    /// Replace trigger wiring with an empty list
    pub fn clear_triggers(&mut self) {
        self.0
            .insert(TRIGGERS_FIELD.to_string(), Value::Array(Vec::new()));
    }

    /// Field map
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Mutable field map
    #[inline]
    pub fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }

    /// Convert into a JSON object value
    #[inline]
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        record.into_value()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
