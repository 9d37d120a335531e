//! Transition presets
//!
//! Provides TransitionPreset for loading/saving transition configurations
//! from RON files, so transitions can be tuned without recompiling.

use serde::{Serialize, Deserialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::effect::TransitionEffect;
use crate::host::Host;
use crate::settings::{SettingsError, TransitionSettings};
use crate::transition::Transition;

fn one() -> f32 {
    1.0
}

/// A serializable transition configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionPreset {
    /// Preset name (for display/debugging)
    pub name: String,
    /// Duration in seconds
    pub duration: f32,
    /// Blend effect
    #[serde(default)]
    pub effect: TransitionEffect,
    /// Resolution divisor for the outgoing scene
    #[serde(default = "one")]
    pub outgoing_down_scale: f32,
    /// Resolution divisor for the incoming scene
    #[serde(default = "one")]
    pub incoming_down_scale: f32,
    /// Re-render the outgoing scene every frame
    #[serde(default)]
    pub outgoing_animated: bool,
    /// Re-render the incoming scene every frame
    #[serde(default)]
    pub incoming_animated: bool,
    /// Composite the outgoing scene above the incoming one
    #[serde(default)]
    pub outgoing_over_incoming: bool,
}

impl TransitionPreset {
    /// Create a crossfade preset with default settings
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
            effect: TransitionEffect::default(),
            outgoing_down_scale: 1.0,
            incoming_down_scale: 1.0,
            outgoing_animated: false,
            incoming_animated: false,
            outgoing_over_incoming: false,
        }
    }

    /// Set the blend effect
    pub fn with_effect(mut self, effect: TransitionEffect) -> Self {
        self.effect = effect;
        self
    }

    /// Load a preset from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PresetLoadError> {
        let contents = fs::read_to_string(path)?;
        let preset = ron::from_str(&contents)?;
        Ok(preset)
    }

    /// Save a preset to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PresetSaveError> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        let contents = ron::ser::to_string_pretty(self, pretty)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Validate the settings part of the preset
    pub fn settings(&self) -> Result<TransitionSettings, SettingsError> {
        Ok(TransitionSettings::new()
            .with_outgoing_down_scale(self.outgoing_down_scale)?
            .with_incoming_down_scale(self.incoming_down_scale)?
            .with_outgoing_animated(self.outgoing_animated)
            .with_incoming_animated(self.incoming_animated)
            .with_outgoing_over_incoming(self.outgoing_over_incoming))
    }

    /// Build an idle transition from this preset
    pub fn to_transition<H: Host>(&self) -> Result<Transition<H>, SettingsError> {
        let settings = self.settings()?;
        log::debug!("Building transition from preset '{}'", self.name);
        Ok(Transition::new(self.duration)?
            .with_settings(settings)
            .with_effect(self.effect))
    }
}

/// Error loading a preset
#[derive(Debug)]
pub enum PresetLoadError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax)
    Parse(ron::error::SpannedError),
}

impl From<io::Error> for PresetLoadError {
    fn from(e: io::Error) -> Self {
        PresetLoadError::Io(e)
    }
}

impl From<ron::error::SpannedError> for PresetLoadError {
    fn from(e: ron::error::SpannedError) -> Self {
        PresetLoadError::Parse(e)
    }
}

impl std::fmt::Display for PresetLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PresetLoadError::Io(e) => write!(f, "IO error: {}", e),
            PresetLoadError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for PresetLoadError {}

/// Error saving a preset
#[derive(Debug)]
pub enum PresetSaveError {
    /// IO error (permission denied, disk full, etc.)
    Io(io::Error),
    /// Serialization error
    Serialize(ron::Error),
}

impl From<io::Error> for PresetSaveError {
    fn from(e: io::Error) -> Self {
        PresetSaveError::Io(e)
    }
}

impl From<ron::Error> for PresetSaveError {
    fn from(e: ron::Error) -> Self {
        PresetSaveError::Serialize(e)
    }
}

impl std::fmt::Display for PresetSaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PresetSaveError::Io(e) => write!(f, "IO error: {}", e),
            PresetSaveError::Serialize(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for PresetSaveError {}
