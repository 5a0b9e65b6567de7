//! Scene documents
//!
//! A scene is an object with an `atoms` array. Each atom is an object with
//! an `id`, an optional `type`, and a `storables` record list. Everything
//! else in the document is opaque and preserved as-is.

use crate::error::{DocumentError, Section};
use crate::locator;
use serde_json::{Map, Value};

/// Top-level field holding the atom list
pub const ATOMS_FIELD: &str = "atoms";
/// Atom field holding the record list
pub const STORABLES_FIELD: &str = "storables";
/// Atom field holding the atom identifier
pub const ATOM_ID_FIELD: &str = "id";
/// Atom field holding the atom type
pub const ATOM_TYPE_FIELD: &str = "type";

/// Full scene document
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDocument {
    root: Value,
}

impl SceneDocument {
    /// Validate and wrap a parsed document
    ///
    /// # Errors
    /// - `RootNotObject` if the root is not an object
    /// - `MissingAtoms` if there is no `atoms` array
    pub fn from_value(root: Value) -> Result<Self, DocumentError> {
        let Some(map) = root.as_object() else {
            return Err(DocumentError::RootNotObject {
                found: kind_of(&root),
            });
        };
        if !map.get(ATOMS_FIELD).is_some_and(Value::is_array) {
            return Err(DocumentError::MissingAtoms);
        }
        Ok(Self { root })
    }

    /// Parse from JSON text
    ///
    /// # Errors
    /// `Malformed` on invalid JSON, otherwise as [`SceneDocument::from_value`].
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(text).map_err(DocumentError::Malformed)?;
        Self::from_value(value)
    }

    /// Underlying JSON value
    #[inline]
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// Consume into the underlying JSON value
    #[inline]
    #[must_use]
    pub fn into_value(self) -> Value {
        self.root
    }

    /// All atom fragments in document order
    #[must_use]
    pub fn atoms(&self) -> &[Value] {
        self.root
            .get(ATOMS_FIELD)
            .and_then(Value::as_array)
            .map_or(&[], Vec::as_slice)
    }

    /// Identifiers of all atoms that have one
    pub fn atom_ids(&self) -> impl Iterator<Item = &str> {
        self.atoms()
            .iter()
            .filter_map(|atom| atom.get(ATOM_ID_FIELD).and_then(Value::as_str))
    }

    /// Atom fragment with the given id
    #[must_use]
    pub fn atom(&self, id: &str) -> Option<Atom<'_>> {
        self.atoms()
            .iter()
            .filter_map(Value::as_object)
            .find(|map| atom_id(map) == Some(id))
            .map(|map| Atom { map })
    }

    /// Mutable atom fragment with the given id
    pub fn atom_mut(&mut self, id: &str) -> Option<AtomMut<'_>> {
        self.root
            .get_mut(ATOMS_FIELD)
            .and_then(Value::as_array_mut)?
            .iter_mut()
            .filter_map(Value::as_object_mut)
            .find(|map| atom_id(map) == Some(id))
            .map(|map| AtomMut { map })
    }
}

/// Read-only view of one atom fragment
#[derive(Debug, Clone, Copy)]
pub struct Atom<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Atom<'a> {
    /// Atom identifier
    #[must_use]
    pub fn id(&self) -> Option<&'a str> {
        atom_id(self.map)
    }

    /// Atom type (e.g. `"Person"`)
    #[must_use]
    pub fn atom_type(&self) -> Option<&'a str> {
        self.map.get(ATOM_TYPE_FIELD).and_then(Value::as_str)
    }

    /// Record list
    ///
    /// # Errors
    /// `MissingStorables` if the atom has no `storables` array.
    pub fn storables(&self) -> Result<&'a [Value], DocumentError> {
        self.map
            .get(STORABLES_FIELD)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .ok_or_else(|| DocumentError::MissingStorables {
                section: self.section(),
            })
    }

    /// Record with the given id, `None` when absent or no record list
    #[must_use]
    pub fn record(&self, id: &str) -> Option<&'a Value> {
        self.storables().ok().and_then(|list| locator::find(list, id))
    }

    /// Identifiers of all records
    #[must_use]
    pub fn record_ids(&self) -> Vec<&'a str> {
        use crate::locator::Identified;
        self.storables()
            .map(|list| list.iter().filter_map(Identified::record_id).collect())
            .unwrap_or_default()
    }

    /// Lookup section for error reporting
    #[must_use]
    pub fn section(&self) -> Section {
        Section::scene_atom(self.id().unwrap_or_default())
    }

    /// Underlying field map
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &'a Map<String, Value> {
        self.map
    }
}

/// Mutable view of one atom fragment
#[derive(Debug)]
pub struct AtomMut<'a> {
    map: &'a mut Map<String, Value>,
}

impl AtomMut<'_> {
    /// Atom identifier
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        atom_id(self.map)
    }

    /// Read-only view of the same atom
    #[must_use]
    pub fn as_atom(&self) -> Atom<'_> {
        Atom { map: &*self.map }
    }

    /// Mutable record list
    ///
    /// # Errors
    /// `MissingStorables` if the atom has no `storables` array.
    pub fn storables_mut(&mut self) -> Result<&mut Vec<Value>, DocumentError> {
        let section = self.as_atom().section();
        self.map
            .get_mut(STORABLES_FIELD)
            .and_then(Value::as_array_mut)
            .ok_or(DocumentError::MissingStorables { section })
    }

    /// Underlying field map
    #[inline]
    pub fn fields_mut(&mut self) -> &mut Map<String, Value> {
        self.map
    }
}

impl<'a> AtomMut<'a> {
    /// Consume into the mutable record list
    ///
    /// # Errors
    /// `MissingStorables` if the atom has no `storables` array.
    pub fn into_storables_mut(self) -> Result<&'a mut Vec<Value>, DocumentError> {
        let section = self.as_atom().section();
        let map = self.map;
        map.get_mut(STORABLES_FIELD)
            .and_then(Value::as_array_mut)
            .ok_or(DocumentError::MissingStorables { section })
    }
}

fn atom_id(map: &Map<String, Value>) -> Option<&str> {
    map.get(ATOM_ID_FIELD).and_then(Value::as_str)
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scene() -> SceneDocument {
        SceneDocument::from_value(json!({
            "version": "1.20",
            "atoms": [
                {"id": "CoreControl", "type": "CoreControl", "storables": [{"id": "MotionAnimationMaster"}]},
                {"id": "Person", "type": "Person", "storables": [{"id": "control"}, {"id": "headControl"}]},
                {"id": "Light", "type": "InvisibleLight"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn rejects_non_object_root() {
        let err = SceneDocument::from_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, DocumentError::RootNotObject { found: "array" }));
    }

    #[test]
    fn rejects_missing_atoms() {
        let err = SceneDocument::from_value(json!({"atoms": {}})).unwrap_err();
        assert!(matches!(err, DocumentError::MissingAtoms));
    }

    #[test]
    fn from_json_reports_syntax() {
        assert!(matches!(
            SceneDocument::from_json("{\"atoms\": ["),
            Err(DocumentError::Malformed(_))
        ));
    }

    #[test]
    fn atom_lookup() {
        let scene = scene();
        let person = scene.atom("Person").unwrap();
        assert_eq!(person.atom_type(), Some("Person"));
        assert_eq!(person.record_ids(), vec!["control", "headControl"]);
        assert!(person.record("headControl").is_some());
        assert!(scene.atom("Nobody").is_none());
        assert_eq!(
            scene.atom_ids().collect::<Vec<_>>(),
            vec!["CoreControl", "Person", "Light"]
        );
    }

    #[test]
    fn atom_without_storables() {
        let scene = scene();
        let light = scene.atom("Light").unwrap();
        let err = light.storables().unwrap_err();
        assert_eq!(err.to_string(), "scene atom 'Light' has no 'storables' array");
        assert!(light.record("anything").is_none());
    }

    #[test]
    fn atom_mut_edits_in_place() {
        let mut scene = scene();
        {
            let mut person = scene.atom_mut("Person").unwrap();
            person.storables_mut().unwrap().push(json!({"id": "hipControl"}));
        }
        assert_eq!(
            scene.atom("Person").unwrap().record_ids(),
            vec!["control", "headControl", "hipControl"]
        );
        assert_eq!(scene.as_value()["version"], "1.20");
    }

    #[test]
    fn into_storables_outlives_view() {
        let mut scene = scene();
        let records = scene.atom_mut("Person").unwrap().into_storables_mut().unwrap();
        records.retain(|r| r["id"] != "control");
        assert_eq!(scene.atom("Person").unwrap().record_ids(), vec!["headControl"]);
        assert!(scene.atom_mut("Light").unwrap().into_storables_mut().is_err());
    }
}
