//! Live-restore strategy
//!
//! Applies a mocap directly to the live person instead of splicing a scene
//! document and reloading it. Same clear-then-add order and the same
//! fatal/tolerated split as [`Splicer`](crate::Splicer):
//!
//! 1. Resolve every mandatory record (live controls, mocap controls)
//! 2. Reset classified controls, and animations that exist
//! 3. Restore controls from the mocap, and animations it carries
//! 4. Restore the timing master merged with the mocap (best-effort)
//!
//! Nothing on the host is touched until step 1 has passed.

use crate::classifier::AnimationIds;
use crate::error::{MergeError, SpliceError};
use crate::host::RecordAccess;
use crate::splicer::{SpliceReport, CORE_CONTROL_ID};
use crate::timing::{self, TIMING_MASTER_ID};
use mocap_document::{DocumentError, MocapDocument, Record, Section};

/// Restores mocap records onto a live person
#[derive(Debug, Clone, Copy)]
pub struct LiveRestorer<'a> {
    ids: &'a AnimationIds,
    person_id: &'a str,
    core_control_id: &'a str,
}

impl<'a> LiveRestorer<'a> {
    /// Create restorer for a person atom
    #[inline]
    #[must_use]
    pub fn new(ids: &'a AnimationIds, person_id: &'a str) -> Self {
        Self {
            ids,
            person_id,
            core_control_id: CORE_CONTROL_ID,
        }
    }

    /// With a different core control atom id
    #[inline]
    #[must_use]
    pub fn with_core_control_id(mut self, core_control_id: &'a str) -> Self {
        self.core_control_id = core_control_id;
        self
    }

    /// Apply `mocap` to the live person
    ///
    /// # Errors
    /// - `SpliceError::Clear` if the live person lacks a classified control
    /// - `SpliceError::Add` if the mocap lacks a classified control
    /// - `SpliceError::Host` if the host rejects a reset or restore
    pub fn restore<R: RecordAccess + ?Sized>(
        &self,
        host: &mut R,
        mocap: &MocapDocument,
    ) -> Result<SpliceReport, SpliceError> {
        let incoming = self.resolve(host, mocap)?;
        let mut report = SpliceReport::default();

        for pair in self.ids {
            host.reset(self.person_id, pair.control_id())?;
            report.removed.push(pair.control_id().to_string());
            if host.fetch(self.person_id, pair.animation_id()).is_some() {
                host.reset(self.person_id, pair.animation_id())?;
                report.removed.push(pair.animation_id().to_string());
            }
        }

        for (control, animation) in incoming {
            host.restore(self.person_id, control)?;
            report.added.extend(control.id().map(str::to_string));
            if let Some(animation) = animation {
                host.restore(self.person_id, animation)?;
                report.added.extend(animation.id().map(str::to_string));
            }
        }
        report.person_spliced = true;

        match self.restore_timing_master(host, mocap) {
            Ok(()) => report.timing_merged = true,
            Err(e) => {
                tracing::warn!(error = %e, "timing master not restored, keeping live playback settings");
                report.warnings.push(e);
            }
        }

        tracing::info!(
            person = self.person_id,
            removed = report.removed.len(),
            added = report.added.len(),
            timing_merged = report.timing_merged,
            "restored mocap onto live person"
        );
        Ok(report)
    }

    // Mocap control/animation pairs to restore, once every mandatory record is known to exist.
    fn resolve<'m, R: RecordAccess + ?Sized>(
        &self,
        host: &R,
        mocap: &'m MocapDocument,
    ) -> Result<Vec<(&'m Record, Option<&'m Record>)>, SpliceError> {
        for pair in self.ids {
            if host.fetch(self.person_id, pair.control_id()).is_none() {
                return Err(SpliceError::clear(DocumentError::record_not_found(
                    pair.control_id(),
                    Section::live_atom(self.person_id),
                )));
            }
        }

        self.ids
            .iter()
            .map(|pair| -> Result<_, SpliceError> {
                let control = mocap
                    .person_record(pair.control_id())
                    .map_err(SpliceError::add)?;
                let animation = match mocap.person().record(pair.animation_id()) {
                    Some(record) if host.fetch(self.person_id, pair.animation_id()).is_some() => {
                        Some(record)
                    }
                    Some(_) => {
                        tracing::debug!(id = pair.animation_id(), "live person has no such animation record");
                        None
                    }
                    None => {
                        tracing::debug!(id = pair.animation_id(), "no animation record in mocap");
                        None
                    }
                };
                Ok((control, animation))
            })
            .collect()
    }

    fn restore_timing_master<R: RecordAccess + ?Sized>(
        &self,
        host: &mut R,
        mocap: &MocapDocument,
    ) -> Result<(), MergeError> {
        let source = timing::mocap_timing_master(mocap)?;
        let mut master = host
            .fetch(self.core_control_id, TIMING_MASTER_ID)
            .ok_or_else(|| MergeError::MissingTargetTimingMaster {
                atom_id: self.core_control_id.to_string(),
            })?;
        timing::apply_playback_fields(master.fields_mut(), &source);
        host.restore(self.core_control_id, &master)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SceneHost;
    use mocap_document::{MemoryStore, SceneDocument};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn host() -> SceneHost<MemoryStore> {
        let scene = SceneDocument::from_value(json!({
            "atoms": [
                {"id": "CoreControl", "storables": [
                    {"id": "MotionAnimationMaster", "playbackCounter": "40", "loop": "true", "triggers": [1]}
                ]},
                {"id": "Person", "type": "Person", "storables": [
                    {"id": "control", "pos": "live"},
                    {"id": "headControl", "pos": "live"},
                    {"id": "headAnimation", "steps": [{"t": "live"}]},
                    {"id": "lHandControl", "pos": "live"},
                    {"id": "lHandAnimation", "steps": [{"t": "live"}]}
                ]}
            ]
        }))
        .unwrap();
        SceneHost::new(scene, MemoryStore::new())
    }

    fn mocap() -> MocapDocument {
        MocapDocument::from_value(json!({
            "CoreControl": {"storables": [
                {"id": "MotionAnimationMaster", "playbackCounter": "9", "loop": "false"}
            ]},
            "Person": {"storables": [
                {"id": "control", "pos": "mocap"},
                {"id": "headAnimation", "steps": [{"t": "mocap"}]},
                {"id": "headControl", "pos": "mocap"},
                {"id": "lHandControl", "pos": "mocap"}
            ]}
        }))
        .unwrap()
    }

    fn ids() -> AnimationIds {
        AnimationIds::classify(["headAnimation", "lHandAnimation"])
    }

    #[test]
    fn restores_records_in_place() {
        let mut host = host();
        let ids = ids();
        let report = LiveRestorer::new(&ids, "Person").restore(&mut host, &mocap()).unwrap();

        let person = host.scene().atom("Person").unwrap();
        assert_eq!(
            person.storables().unwrap(),
            &[
                json!({"id": "control", "pos": "live"}),
                json!({"id": "headControl", "pos": "mocap"}),
                json!({"id": "headAnimation", "steps": [{"t": "mocap"}]}),
                json!({"id": "lHandControl", "pos": "mocap"}),
                json!({"id": "lHandAnimation"}),
            ]
        );
        assert_eq!(report.added, vec!["headControl", "headAnimation", "lHandControl"]);
        assert_eq!(
            report.removed,
            vec!["headControl", "headAnimation", "lHandControl", "lHandAnimation"]
        );
        assert!(report.person_spliced);
        assert!(report.timing_merged);
    }

    #[test]
    fn restores_timing_master() {
        let mut host = host();
        let ids = ids();
        LiveRestorer::new(&ids, "Person").restore(&mut host, &mocap()).unwrap();
        let master = host.fetch("CoreControl", TIMING_MASTER_ID).unwrap();
        assert_eq!(master.get("playbackCounter"), Some(&json!("0")));
        assert_eq!(master.get("loop"), Some(&json!("false")));
        assert_eq!(master.get("triggers"), Some(&json!([1])));
    }

    #[test]
    fn missing_live_control_touches_nothing() {
        let mut host = host();
        let before = host.scene().clone();
        let ids = AnimationIds::classify(["headAnimation", "hipAnimation"]);
        let err = LiveRestorer::new(&ids, "Person")
            .restore(&mut host, &mocap())
            .unwrap_err();
        assert!(matches!(err, SpliceError::Clear { .. }));
        assert_eq!(err.missing_record_id(), Some("hipControl"));
        assert_eq!(host.scene(), &before);
    }

    #[test]
    fn missing_mocap_control_touches_nothing() {
        let mut host = host();
        let before = host.scene().clone();
        let mocap = MocapDocument::from_value(json!({
            "Person": {"storables": [{"id": "headControl"}]}
        }))
        .unwrap();
        let ids = ids();
        let err = LiveRestorer::new(&ids, "Person").restore(&mut host, &mocap).unwrap_err();
        assert!(matches!(err, SpliceError::Add { .. }));
        assert_eq!(err.missing_record_id(), Some("lHandControl"));
        assert_eq!(host.scene(), &before);
    }

    #[test]
    fn timing_failure_is_a_warning() {
        let mut host = host();
        let mocap = MocapDocument::from_value(json!({
            "Person": {"storables": [{"id": "headControl"}, {"id": "lHandControl"}]}
        }))
        .unwrap();
        let ids = ids();
        let report = LiveRestorer::new(&ids, "Person").restore(&mut host, &mocap).unwrap();
        assert!(report.person_spliced);
        assert!(!report.timing_merged);
        assert!(matches!(
            report.warnings.as_slice(),
            [MergeError::MissingMocapTimingMaster { .. }]
        ));
        let master = host.fetch("CoreControl", TIMING_MASTER_ID).unwrap();
        assert_eq!(master.get("playbackCounter"), Some(&json!("40")));
    }

    #[test]
    fn malformed_timing_section_is_a_warning() {
        let mut host = host();
        let mocap = MocapDocument::from_value(json!({
            "CoreControl": {"storables": [42]},
            "Person": {"storables": [{"id": "headControl"}, {"id": "lHandControl"}]}
        }))
        .unwrap();
        let ids = ids();
        let report = LiveRestorer::new(&ids, "Person").restore(&mut host, &mocap).unwrap();
        assert!(report.person_spliced);
        assert!(matches!(
            report.warnings.as_slice(),
            [MergeError::MalformedMocapTimingMaster { .. }]
        ));
        let master = host.fetch("CoreControl", TIMING_MASTER_ID).unwrap();
        assert_eq!(master.get("playbackCounter"), Some(&json!("40")));
    }
}
