//! Scene splicer
//!
//! Rewrites a full scene document so the person atom carries the mocap's
//! animation/control records and the core control carries the mocap's
//! playback parameters. Every other atom is left exactly as it was.
//!
//! # Workflow
//!
//! ```text
//! scene + mocap ─┬─ CoreControl atom → merge timing master (best-effort)
//!                └─ person atom      → clear classified records → append mocap records
//! ```
//!
//! The scene is taken by value. On a fatal error it is dropped, so a
//! partially spliced document can never reach the host.

use crate::classifier::AnimationIds;
use crate::error::{MergeError, SpliceError};
use crate::timing;
use mocap_document::{
    locator, AtomMut, DocumentError, MocapDocument, MocapSection, SceneDocument, Section,
    StorableSection,
};

/// Default id of the core control atom
pub const CORE_CONTROL_ID: &str = "CoreControl";

/// What a splice or live restore changed
#[derive(Debug, Default)]
pub struct SpliceReport {
    /// Whether the person atom was found and rewritten
    pub person_spliced: bool,
    /// Whether the timing master was merged
    pub timing_merged: bool,
    /// Record ids removed from the person, in removal order
    pub removed: Vec<String>,
    /// Record ids added to the person, in insertion order
    pub added: Vec<String>,
    /// Non-fatal merge failures
    pub warnings: Vec<MergeError>,
}

impl SpliceReport {
    /// Whether the operation finished without warnings
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Spliced scene and what changed
#[derive(Debug)]
pub struct SpliceOutcome {
    /// Scene to hand to the host for reload
    pub scene: SceneDocument,
    /// Change summary
    pub report: SpliceReport,
}

/// Splices one person's animation data into scene documents
#[derive(Debug, Clone, Copy)]
pub struct Splicer<'a> {
    ids: &'a AnimationIds,
    person_id: &'a str,
    core_control_id: &'a str,
}

impl<'a> Splicer<'a> {
    /// Create splicer for a person atom
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

    /// Splice `mocap` into `scene`
    ///
    /// # Errors
    /// - `SpliceError::Clear` if the scene person lacks a classified control record
    /// - `SpliceError::Add` if the mocap lacks a classified control record
    ///
    /// Timing-master failures are not errors; they land in the report.
    pub fn splice(
        &self,
        mut scene: SceneDocument,
        mocap: &MocapDocument,
    ) -> Result<SpliceOutcome, SpliceError> {
        let mut report = SpliceReport::default();

        if let Some(mut core_control) = scene.atom_mut(self.core_control_id) {
            match timing::merge_timing_master(&mut core_control, mocap) {
                Ok(()) => report.timing_merged = true,
                Err(e) => {
                    tracing::warn!(error = %e, "timing master not merged, keeping scene playback settings");
                    report.warnings.push(e);
                }
            }
        } else {
            tracing::debug!(atom = self.core_control_id, "scene has no core control atom");
        }

        if let Some(mut person) = scene.atom_mut(self.person_id) {
            report.removed = self.clear_animation_data(&mut person)?;
            report.added = self.add_animation_data(&mut person, mocap.person())?;
            report.person_spliced = true;
        } else {
            tracing::warn!(atom = self.person_id, "scene has no person atom, nothing spliced");
        }

        tracing::info!(
            person = self.person_id,
            removed = report.removed.len(),
            added = report.added.len(),
            timing_merged = report.timing_merged,
            "spliced mocap into scene"
        );
        Ok(SpliceOutcome { scene, report })
    }

    /// Remove every classified control and animation record from `person`
    ///
    /// Returns the removed ids.
    ///
    /// # Errors
    /// `SpliceError::Clear` if a control record is missing or the atom has
    /// no record list. Missing animation records are skipped.
    pub fn clear_animation_data(&self, person: &mut AtomMut<'_>) -> Result<Vec<String>, SpliceError> {
        let section = person.as_atom().section();
        let records = person.storables_mut().map_err(SpliceError::clear)?;
        let mut removed = Vec::with_capacity(self.ids.len() * 2);

        for pair in self.ids {
            locator::remove(records, pair.control_id()).ok_or_else(|| {
                SpliceError::clear(DocumentError::record_not_found(
                    pair.control_id(),
                    section.clone(),
                ))
            })?;
            removed.push(pair.control_id().to_string());

            if locator::remove(records, pair.animation_id()).is_some() {
                removed.push(pair.animation_id().to_string());
            } else {
                tracing::debug!(id = pair.animation_id(), "no animation record to clear in scene");
            }
        }
        Ok(removed)
    }

    /// Append the mocap's classified control and animation records to `person`
    ///
    /// Returns the added ids.
    ///
    /// # Errors
    /// `SpliceError::Add` if the mocap lacks a control record or the atom
    /// has no record list. Missing animation records are skipped.
    pub fn add_animation_data(
        &self,
        person: &mut AtomMut<'_>,
        source: &StorableSection,
    ) -> Result<Vec<String>, SpliceError> {
        let section = Section::Mocap(MocapSection::Person);
        let records = person.storables_mut().map_err(SpliceError::add)?;
        let mut added = Vec::with_capacity(self.ids.len() * 2);

        for pair in self.ids {
            let control = locator::require(&source.storables, pair.control_id(), &section)
                .map_err(SpliceError::add)?;
            records.push(control.clone().into_value());
            added.push(pair.control_id().to_string());

            if let Some(animation) = source.record(pair.animation_id()) {
                records.push(animation.clone().into_value());
                added.push(pair.animation_id().to_string());
            } else {
                tracing::debug!(id = pair.animation_id(), "no animation record in mocap");
            }
        }
        Ok(added)
    }
}
