//! Mocap exporter
//!
//! Assembles a minimal two-section mocap document from the live state:
//!
//! - `CoreControl`: the timing master, triggers emptied
//! - `Person`: the root `control` record first, then per classified id the
//!   animation record (only when it has steps) followed by its control
//!
//! Records are copied verbatim otherwise.

use crate::classifier::AnimationIds;
use crate::host::RecordAccess;
use crate::splicer::CORE_CONTROL_ID;
use crate::timing::TIMING_MASTER_ID;
use mocap_document::{DocumentError, MocapDocument, Record, Section, StorableSection};

/// Id of the person's root transform record
pub const ROOT_CONTROL_ID: &str = "control";

/// Builds mocap documents from live records
#[derive(Debug, Clone, Copy)]
pub struct Exporter<'a> {
    ids: &'a AnimationIds,
    person_id: &'a str,
    core_control_id: &'a str,
}

impl<'a> Exporter<'a> {
    /// Create exporter for a person atom
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

    /// Collect the live records into a mocap document
    ///
    /// # Errors
    /// `RecordNotFound` (live section) if the timing master, the root
    /// control, or any classified control record is missing. A missing
    /// animation record only drops that record.
    pub fn export<R: RecordAccess + ?Sized>(&self, host: &R) -> Result<MocapDocument, DocumentError> {
        let mut master = fetch_required(host, self.core_control_id, TIMING_MASTER_ID)?;
        master.clear_triggers();
        let core_control = StorableSection::from_records(vec![master]);

        let mut person = StorableSection::new();
        person.push(fetch_required(host, self.person_id, ROOT_CONTROL_ID)?);

        for pair in self.ids {
            let control = fetch_required(host, self.person_id, pair.control_id())?;
            match host.fetch(self.person_id, pair.animation_id()) {
                Some(animation) if animation.has_motion() => person.push(animation),
                Some(_) => {
                    tracing::debug!(id = pair.animation_id(), "no captured steps, exporting pose only");
                }
                None => tracing::debug!(id = pair.animation_id(), "no live animation record"),
            }
            person.push(control);
        }

        tracing::info!(
            person = self.person_id,
            records = person.len(),
            "exported mocap"
        );
        Ok(MocapDocument::new(core_control, person))
    }
}

fn fetch_required<R: RecordAccess + ?Sized>(
    host: &R,
    atom_id: &str,
    record_id: &str,
) -> Result<Record, DocumentError> {
    host.fetch(atom_id, record_id)
        .ok_or_else(|| DocumentError::record_not_found(record_id, Section::live_atom(atom_id)))
}
