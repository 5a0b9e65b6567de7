//! Timing-master merge
//!
//! Copies the global playback parameters from a mocap document onto the
//! core control's `MotionAnimationMaster` record. Playback always restarts
//! from the beginning after a load, so the counters are reset rather than
//! copied. Fields not listed here (e.g. triggers) are left alone.

use crate::error::MergeError;
use mocap_document::{locator, AtomMut, DocumentError, MocapDocument, Record};
use serde_json::{Map, Value};

/// Id of the timing-master record on the core control atom
pub const TIMING_MASTER_ID: &str = "MotionAnimationMaster";

/// Playback fields copied verbatim from the mocap
pub const COPIED_FIELDS: [&str; 6] = [
    "autoPlay",
    "loop",
    "stopTimestep",
    "loopbackTime",
    "playbackSpeed",
    "recordedLength",
];

/// Playback fields forced to [`RESET_VALUE`]
pub const RESET_FIELDS: [&str; 2] = ["playbackCounter", "startTimestep"];

/// Value written to [`RESET_FIELDS`]
pub const RESET_VALUE: &str = "0";

/// Overwrite the playback fields of `target` from `source`
///
/// A copied field missing from `source` keeps its current value.
pub fn apply_playback_fields(target: &mut Map<String, Value>, source: &Record) {
    for field in COPIED_FIELDS {
        match source.get(field) {
            Some(value) => {
                target.insert(field.to_string(), value.clone());
            }
            None => tracing::debug!(field, "mocap timing master lacks field, keeping current value"),
        }
    }
    for field in RESET_FIELDS {
        target.insert(field.to_string(), Value::String(RESET_VALUE.to_string()));
    }
}

/// Mocap's timing-master record
///
/// # Errors
/// - `MissingMocapTimingMaster` when the section or record is absent
/// - `MalformedMocapTimingMaster` when the section is not a record list
pub fn mocap_timing_master(mocap: &MocapDocument) -> Result<Record, MergeError> {
    mocap
        .core_control_record(TIMING_MASTER_ID)
        .map_err(|source| match source {
            DocumentError::MalformedSection { .. } => {
                MergeError::MalformedMocapTimingMaster { source }
            }
            source => MergeError::MissingMocapTimingMaster { source },
        })
}

/// Merge the mocap's playback fields into a scene core-control fragment
///
/// The fragment is only touched once both timing-master records are found.
///
/// # Errors
/// - `MissingMocapTimingMaster` if the mocap has no timing data
/// - `MalformedMocapTimingMaster` if its timing section is unreadable
/// - `Document` if the fragment has no record list
/// - `MissingTargetTimingMaster` if the fragment has no timing-master record
pub fn merge_timing_master(
    core_control: &mut AtomMut<'_>,
    mocap: &MocapDocument,
) -> Result<(), MergeError> {
    let source = mocap_timing_master(mocap)?;
    let atom_id = core_control.id().unwrap_or_default().to_string();

    let records = core_control.storables_mut()?;
    let target = locator::find_mut(records, TIMING_MASTER_ID)
        .and_then(Value::as_object_mut)
        .ok_or(MergeError::MissingTargetTimingMaster { atom_id })?;

    apply_playback_fields(target, &source);
    tracing::debug!("merged timing master playback fields");
    Ok(())
}
