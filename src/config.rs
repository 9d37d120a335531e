//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`SEGUE_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;

use segue_core::{
    Host, SettingsError, Transition, TransitionEffect, TransitionPreset, TransitionSettings,
    Viewport,
};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Viewport configuration
    #[serde(default)]
    pub viewport: ViewportConfig,
    /// Default transition configuration
    #[serde(default)]
    pub transition: TransitionConfig,
    /// Director configuration
    #[serde(default)]
    pub director: DirectorConfig,
    /// Headless demo configuration
    #[serde(default)]
    pub demo: DemoConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`SEGUE_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // SEGUE_TRANSITION__DURATION=2.0 -> transition.duration = 2.0
        figment = figment.merge(Env::prefixed("SEGUE_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Viewport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// Drawable width in points
    pub width: f32,
    /// Drawable height in points
    pub height: f32,
    /// Pixels per point
    pub content_scale: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            content_scale: 1.0,
        }
    }
}

impl ViewportConfig {
    pub fn to_viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height, self.content_scale)
    }
}

/// Default transition configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionConfig {
    /// Duration in seconds
    pub duration: f32,
    /// Blend effect
    pub effect: TransitionEffect,
    /// Resolution divisor for the outgoing scene (1.0-4.0)
    pub outgoing_down_scale: f32,
    /// Resolution divisor for the incoming scene (1.0-4.0)
    pub incoming_down_scale: f32,
    /// Re-render the outgoing scene every frame
    pub outgoing_animated: bool,
    /// Re-render the incoming scene every frame
    pub incoming_animated: bool,
    /// Composite the outgoing scene above the incoming one
    pub outgoing_over_incoming: bool,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration: 1.0,
            effect: TransitionEffect::Crossfade,
            outgoing_down_scale: 1.0,
            incoming_down_scale: 1.0,
            outgoing_animated: false,
            incoming_animated: true,
            outgoing_over_incoming: false,
        }
    }
}

impl TransitionConfig {
    /// The configured transition as a named preset
    pub fn to_preset(&self) -> TransitionPreset {
        TransitionPreset {
            name: "config".to_string(),
            duration: self.duration,
            effect: self.effect,
            outgoing_down_scale: self.outgoing_down_scale,
            incoming_down_scale: self.incoming_down_scale,
            outgoing_animated: self.outgoing_animated,
            incoming_animated: self.incoming_animated,
            outgoing_over_incoming: self.outgoing_over_incoming,
        }
    }

    /// Validate into engine settings
    pub fn to_settings(&self) -> Result<TransitionSettings, SettingsError> {
        self.to_preset().settings()
    }

    /// Build an idle transition for any host
    pub fn to_transition<H: Host>(&self) -> Result<Transition<H>, SettingsError> {
        self.to_preset().to_transition()
    }
}

/// Director configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectorConfig {
    /// Clean up scenes as soon as they exit
    pub cleanup_on_exit: bool,
}

/// Headless demo configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Simulated frames per second
    pub frame_rate: f32,
    /// Number of scenes to cycle through
    pub scene_count: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            scene_count: 3,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
