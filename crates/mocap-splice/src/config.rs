//! Switcher configuration
//!
//! Loaded from TOML. Every key is optional; unknown keys are rejected so a
//! typo never silently falls back to a default.
//!
//! ```toml
//! person_id = "Person#2"
//! strategy = "live-restore"
//! reset_playback_before_export = false
//! ```

use crate::error::ConfigError;
use crate::splicer::CORE_CONTROL_ID;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default person atom id
pub const DEFAULT_PERSON_ID: &str = "Person";
/// Default hand-off file for the spliced scene
pub const DEFAULT_TMP_SCENE_PATH: &str = "PluginData/MocapSwitcher/tmp.json";
/// Default mocap directory
pub const DEFAULT_MOCAP_DIR: &str = "mocap";
/// Default mocap file extension
pub const DEFAULT_SAVE_EXTENSION: &str = "json";

/// How a loaded mocap reaches the live person
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplyStrategy {
    /// Splice into the scene document, save it, reload the scene
    #[default]
    SceneReload,
    /// Reset and restore records on the live person
    LiveRestore,
}

impl ApplyStrategy {
    /// Config spelling
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SceneReload => "scene-reload",
            Self::LiveRestore => "live-restore",
        }
    }
}

impl fmt::Display for ApplyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplyStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scene-reload" => Ok(Self::SceneReload),
            "live-restore" => Ok(Self::LiveRestore),
            other => Err(ConfigError::Invalid {
                key: "strategy",
                reason: format!("unknown strategy '{other}', expected scene-reload or live-restore"),
            }),
        }
    }
}

/// Switcher configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwitcherConfig {
    /// Atom id of the bound person
    pub person_id: String,
    /// Atom id of the timing controller
    pub core_control_id: String,
    /// Where the spliced scene is written before reload
    pub tmp_scene_path: PathBuf,
    /// Default directory for mocap files
    pub mocap_dir: PathBuf,
    /// Extension enforced on exported mocap files, without the dot
    pub save_extension: String,
    /// Load strategy
    pub strategy: ApplyStrategy,
    /// Rewind playback before collecting records for export
    pub reset_playback_before_export: bool,
}

impl SwitcherConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With person atom id
    #[inline]
    #[must_use]
    pub fn with_person_id(mut self, person_id: impl Into<String>) -> Self {
        self.person_id = person_id.into();
        self
    }

    /// With core control atom id
    #[inline]
    #[must_use]
    pub fn with_core_control_id(mut self, core_control_id: impl Into<String>) -> Self {
        self.core_control_id = core_control_id.into();
        self
    }

    /// With scene hand-off path
    #[inline]
    #[must_use]
    pub fn with_tmp_scene_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.tmp_scene_path = path.into();
        self
    }

    /// With mocap directory
    #[inline]
    #[must_use]
    pub fn with_mocap_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.mocap_dir = dir.into();
        self
    }

    /// With load strategy
    #[inline]
    #[must_use]
    pub fn with_strategy(mut self, strategy: ApplyStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// With or without the pre-export rewind
    #[inline]
    #[must_use]
    pub fn with_reset_playback(mut self, reset: bool) -> Self {
        self.reset_playback_before_export = reset;
        self
    }

    /// Parse and validate TOML text
    ///
    /// # Errors
    /// `Parse` on bad TOML or unknown keys, `Invalid` on bad values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    ///
    /// # Errors
    /// `Read` if the file cannot be read, otherwise as [`SwitcherConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded switcher config");
        Ok(config)
    }

    /// Encode as TOML
    ///
    /// # Errors
    /// `Serialize` if encoding fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// `Invalid` naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.person_id.is_empty() {
            return Err(invalid("person_id", "must not be empty"));
        }
        if self.core_control_id.is_empty() {
            return Err(invalid("core_control_id", "must not be empty"));
        }
        if self.tmp_scene_path.as_os_str().is_empty() {
            return Err(invalid("tmp_scene_path", "must not be empty"));
        }
        if self.save_extension.is_empty() {
            return Err(invalid("save_extension", "must not be empty"));
        }
        if self.save_extension.contains(['.', '/', '\\']) {
            return Err(invalid(
                "save_extension",
                "must be a bare extension such as 'json'",
            ));
        }
        Ok(())
    }

    /// `path` with `.<save_extension>` appended unless it already ends in it
    ///
    /// The comparison ignores ASCII case.
    #[must_use]
    pub fn normalize_save_path(&self, path: &Path) -> PathBuf {
        let has_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.save_extension));
        if has_extension {
            return path.to_path_buf();
        }
        let mut raw = path.as_os_str().to_os_string();
        raw.push(".");
        raw.push(&self.save_extension);
        PathBuf::from(raw)
    }

    /// Save path for a mocap named `name` inside [`SwitcherConfig::mocap_dir`]
    #[must_use]
    pub fn mocap_path(&self, name: &str) -> PathBuf {
        self.normalize_save_path(&self.mocap_dir.join(name))
    }
}

impl Default for SwitcherConfig {
    fn default() -> Self {
        Self {
            person_id: DEFAULT_PERSON_ID.to_string(),
            core_control_id: CORE_CONTROL_ID.to_string(),
            tmp_scene_path: PathBuf::from(DEFAULT_TMP_SCENE_PATH),
            mocap_dir: PathBuf::from(DEFAULT_MOCAP_DIR),
            save_extension: DEFAULT_SAVE_EXTENSION.to_string(),
            strategy: ApplyStrategy::default(),
            reset_playback_before_export: true,
        }
    }
}

fn invalid(key: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        reason: reason.to_string(),
    }
}
