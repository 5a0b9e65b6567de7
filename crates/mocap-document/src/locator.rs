//! Record lookup within a `storables` list
//!
//! Lookups return `Option`: callers decide whether absence is fatal
//! ([`require`]) or tolerated.

use crate::error::{DocumentError, Section};
use crate::record::{Record, ID_FIELD};
use serde_json::Value;

/// Anything stored in a record list that exposes an identifier
pub trait Identified {
    /// Record identifier, `None` when absent or not a string
    fn record_id(&self) -> Option<&str>;
}

impl Identified for Value {
    #[inline]
    fn record_id(&self) -> Option<&str> {
        self.get(ID_FIELD).and_then(Value::as_str)
    }
}

impl Identified for Record {
    #[inline]
    fn record_id(&self) -> Option<&str> {
        self.id()
    }
}

/// Index of the first record with the given id
#[must_use]
pub fn position<T: Identified>(records: &[T], id: &str) -> Option<usize> {
    records.iter().position(|r| r.record_id() == Some(id))
}

/// First record with the given id
#[must_use]
pub fn find<'a, T: Identified>(records: &'a [T], id: &str) -> Option<&'a T> {
    records.iter().find(|r| r.record_id() == Some(id))
}

/// First record with the given id, mutable
pub fn find_mut<'a, T: Identified>(records: &'a mut [T], id: &str) -> Option<&'a mut T> {
    records.iter_mut().find(|r| r.record_id() == Some(id))
}

/// First record with the given id, or a document-format error naming it
///
/// # Errors
/// [`DocumentError::RecordNotFound`] when no record matches.
pub fn require<'a, T: Identified>(
    records: &'a [T],
    id: &str,
    section: &Section,
) -> Result<&'a T, DocumentError> {
    find(records, id).ok_or_else(|| DocumentError::record_not_found(id, section.clone()))
}

/// Remove the first record with the given id
///
/// Remaining records keep their relative order.
pub fn remove<T: Identified>(records: &mut Vec<T>, id: &str) -> Option<T> {
    position(records, id).map(|index| records.remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records() -> Vec<Value> {
        vec![
            json!({"id": "control", "on": "true"}),
            json!({"id": "headControl"}),
            json!({"noId": true}),
            json!({"id": "headAnimation", "steps": []}),
            json!({"id": "headControl", "duplicate": true}),
        ]
    }

    #[test]
    fn find_returns_first_match() {
        let list = records();
        let found = find(&list, "headControl").unwrap();
        assert!(found.get("duplicate").is_none());
        assert_eq!(position(&list, "headAnimation"), Some(3));
    }

    #[test]
    fn find_reports_absence() {
        let list = records();
        assert!(find(&list, "hipControl").is_none());
        assert!(position(&list, "").is_none());
    }

    #[test]
    fn require_names_missing_record() {
        let list = records();
        let err = require(&list, "hipControl", &Section::scene_atom("Person")).unwrap_err();
        assert_eq!(err.missing_record_id(), Some("hipControl"));
    }

    #[test]
    fn remove_preserves_order_of_others() {
        let mut list = records();
        let removed = remove(&mut list, "headControl").unwrap();
        assert_eq!(removed, json!({"id": "headControl"}));
        let ids: Vec<_> = list.iter().map(Identified::record_id).collect();
        assert_eq!(
            ids,
            vec![Some("control"), None, Some("headAnimation"), Some("headControl")]
        );
    }

    #[test]
    fn works_on_typed_records() {
        let list = vec![Record::new("a"), Record::new("b")];
        assert_eq!(find(&list, "b").and_then(Record::id), Some("b"));

        let mut list = list;
        find_mut(&mut list, "a").unwrap().set("x", "1");
        assert_eq!(list[0].get("x"), Some(&json!("1")));
    }
}
