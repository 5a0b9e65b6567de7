//! Mocap switcher
//!
//! Binds to one person atom and runs the two user-facing operations:
//!
//! # Load
//! 1. Read the mocap document through the store
//! 2. Apply it with the configured [`ApplyStrategy`]:
//!    - `scene-reload`: snapshot scene → splice → save to the hand-off
//!      path → host reload
//!    - `live-restore`: reset/restore records on the live person
//!
//! # Save
//! 1. Normalise the path extension
//! 2. Optionally rewind playback
//! 3. Export the live records and write them through the store
//!
//! The animation ids are classified once, when binding.

use crate::classifier::AnimationIds;
use crate::config::{ApplyStrategy, SwitcherConfig};
use crate::error::{HostError, SwitcherError, SwitcherResult};
use crate::exporter::Exporter;
use crate::host::{EntityDirectory, Host, RecordAccess, SceneSession};
use crate::live::LiveRestorer;
use crate::splicer::{SpliceOutcome, SpliceReport, Splicer};
use mocap_document::{DocumentStore, MocapDocument};
use std::path::{Path, PathBuf};

/// Atom type the switcher can bind to
pub const PERSON_ATOM_TYPE: &str = "Person";

/// Loads and saves mocap for one person
#[derive(Debug)]
pub struct MocapSwitcher<S: DocumentStore> {
    config: SwitcherConfig,
    ids: AnimationIds,
    store: S,
}

impl<S: DocumentStore> MocapSwitcher<S> {
    /// Bind to the configured person atom
    ///
    /// # Errors
    /// - `Config` if the configuration is invalid
    /// - `Host(AtomNotFound)` if the atom does not exist
    /// - `NotAPerson` if the atom is not of type `Person`
    pub fn bind<D: EntityDirectory + ?Sized>(
        config: SwitcherConfig,
        directory: &D,
        store: S,
    ) -> SwitcherResult<Self> {
        config.validate()?;
        let person_id = config.person_id.as_str();

        if !directory.contains_atom(person_id) {
            return Err(HostError::AtomNotFound(person_id.to_string()).into());
        }
        match directory.atom_type(person_id) {
            Some(atom_type) if atom_type == PERSON_ATOM_TYPE => {}
            other => {
                return Err(SwitcherError::NotAPerson {
                    atom_id: person_id.to_string(),
                    actual: other.unwrap_or_else(|| "untyped".to_string()),
                });
            }
        }

        let record_ids = directory.storable_ids(person_id).unwrap_or_default();
        let ids = AnimationIds::classify(&record_ids);
        tracing::info!(
            person = person_id,
            records = record_ids.len(),
            animations = ids.len(),
            strategy = %config.strategy,
            "bound mocap switcher"
        );
        Ok(Self { config, ids, store })
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SwitcherConfig {
        &self.config
    }

    /// Animation ids classified at bind time
    #[inline]
    #[must_use]
    pub fn animation_ids(&self) -> &AnimationIds {
        &self.ids
    }

    /// Document store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Scene splicer for the bound person
    #[must_use]
    pub fn splicer(&self) -> Splicer<'_> {
        Splicer::new(&self.ids, &self.config.person_id)
            .with_core_control_id(&self.config.core_control_id)
    }

    /// Live restorer for the bound person
    #[must_use]
    pub fn restorer(&self) -> LiveRestorer<'_> {
        LiveRestorer::new(&self.ids, &self.config.person_id)
            .with_core_control_id(&self.config.core_control_id)
    }

    /// Exporter for the bound person
    #[must_use]
    pub fn exporter(&self) -> Exporter<'_> {
        Exporter::new(&self.ids, &self.config.person_id)
            .with_core_control_id(&self.config.core_control_id)
    }

    /// Read a mocap document
    ///
    /// # Errors
    /// `Store` on read, syntax, or shape failure.
    pub fn load_mocap(&self, path: &Path) -> SwitcherResult<MocapDocument> {
        Ok(self.store.load_mocap(path)?)
    }

    /// Apply a mocap document with the configured strategy
    ///
    /// Nothing reaches the host when a fatal error occurs before the
    /// reload (scene-reload) or before the first record write (live-restore).
    ///
    /// # Errors
    /// `Splice` on a missing mandatory record, `Store`/`Host` on collaborator failure.
    pub fn apply_mocap<H: Host + ?Sized>(
        &self,
        host: &mut H,
        mocap: &MocapDocument,
    ) -> SwitcherResult<SpliceReport> {
        match self.config.strategy {
            ApplyStrategy::SceneReload => {
                let scene = host.current_scene()?;
                let SpliceOutcome { scene, report } = self.splicer().splice(scene, mocap)?;
                let tmp = self.config.tmp_scene_path.as_path();
                self.store.save(tmp, scene.as_value())?;
                host.reload(tmp)?;
                Ok(report)
            }
            ApplyStrategy::LiveRestore => Ok(self.restorer().restore(host, mocap)?),
        }
    }

    /// Read a mocap document and apply it
    ///
    /// # Errors
    /// As [`MocapSwitcher::load_mocap`] and [`MocapSwitcher::apply_mocap`].
    pub fn load_and_apply<H: Host + ?Sized>(
        &self,
        host: &mut H,
        path: &Path,
    ) -> SwitcherResult<SpliceReport> {
        tracing::info!(path = %path.display(), "loading mocap");
        let mocap = self.load_mocap(path)?;
        self.apply_mocap(host, &mocap)
    }

    /// Export the live person as a mocap document
    ///
    /// # Errors
    /// `Document` when a mandatory live record is missing.
    pub fn export_mocap<R: RecordAccess + ?Sized>(&self, host: &R) -> SwitcherResult<MocapDocument> {
        Ok(self.exporter().export(host)?)
    }

    /// Export the live person and write it to `path`
    ///
    /// Returns the path actually written, with the extension normalised.
    /// A failed rewind is logged and the export continues. The rewind
    /// happens first, so playback stays rewound even when the export fails.
    /// The host must rewind the same core control atom this config names.
    ///
    /// # Errors
    /// As [`MocapSwitcher::export_mocap`], or `Store` on write failure.
    pub fn save_mocap<H: RecordAccess + SceneSession + ?Sized>(
        &self,
        host: &mut H,
        path: &Path,
    ) -> SwitcherResult<PathBuf> {
        let path = self.config.normalize_save_path(path);
        if self.config.reset_playback_before_export {
            if let Err(e) = host.rewind_playback() {
                tracing::warn!(error = %e, "could not rewind playback before export");
            }
        }
        let mocap = self.export_mocap(&*host)?;
        self.store.save(&path, &mocap.to_value()?)?;
        tracing::info!(path = %path.display(), records = mocap.person().len(), "saved mocap");
        Ok(path)
    }
}
