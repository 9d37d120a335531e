//! Transition settings
//!
//! Behaviour flags and per-scene resolution divisors, fixed before a
//! transition starts. Range checks happen at assignment so a running
//! transition never sees an invalid value.

use bitflags::bitflags;
use serde::{Serialize, Deserialize};

bitflags! {
    /// Behaviour flags read by a running transition
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct TransitionFlags: u8 {
        /// No flags: both scenes static, incoming composited above outgoing
        const NONE = 0;
        /// Re-render the outgoing scene every frame
        const OUTGOING_ANIMATED = 1 << 0;
        /// Re-render the incoming scene every frame
        const INCOMING_ANIMATED = 1 << 1;
        /// Composite the outgoing scene above the incoming one
        const OUTGOING_OVER_INCOMING = 1 << 2;
    }
}

/// Resolution divisor for a scene's render target, in `[1.0, 4.0]`
///
/// A value above 1 renders the scene at reduced resolution.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct DownScale(f32);

impl DownScale {
    /// Smallest accepted divisor (full resolution)
    pub const MIN: f32 = 1.0;
    /// Largest accepted divisor
    pub const MAX: f32 = 4.0;
    /// Full resolution
    pub const NONE: Self = Self(1.0);

    /// Validate and wrap a divisor
    pub fn new(value: f32) -> Result<Self, SettingsError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(SettingsError::DownScaleOutOfRange(value))
        }
    }

    /// The raw divisor
    #[inline]
    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for DownScale {
    fn default() -> Self {
        Self::NONE
    }
}

impl TryFrom<f32> for DownScale {
    type Error = SettingsError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DownScale> for f32 {
    fn from(scale: DownScale) -> Self {
        scale.0
    }
}

/// Configuration of a transition, set before it starts
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransitionSettings {
    outgoing_down_scale: DownScale,
    incoming_down_scale: DownScale,
    flags: TransitionFlags,
}

impl TransitionSettings {
    /// Full resolution, both scenes static, incoming on top
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the outgoing scene's resolution divisor
    pub fn set_outgoing_down_scale(&mut self, value: f32) -> Result<(), SettingsError> {
        self.outgoing_down_scale = DownScale::new(value)?;
        Ok(())
    }

    /// Set the incoming scene's resolution divisor
    pub fn set_incoming_down_scale(&mut self, value: f32) -> Result<(), SettingsError> {
        self.incoming_down_scale = DownScale::new(value)?;
        Ok(())
    }

    /// Builder form of [`set_outgoing_down_scale`](Self::set_outgoing_down_scale)
    pub fn with_outgoing_down_scale(mut self, value: f32) -> Result<Self, SettingsError> {
        self.set_outgoing_down_scale(value)?;
        Ok(self)
    }

    /// Builder form of [`set_incoming_down_scale`](Self::set_incoming_down_scale)
    pub fn with_incoming_down_scale(mut self, value: f32) -> Result<Self, SettingsError> {
        self.set_incoming_down_scale(value)?;
        Ok(self)
    }

    /// Re-render the outgoing scene every frame
    pub fn with_outgoing_animated(mut self, animated: bool) -> Self {
        self.flags.set(TransitionFlags::OUTGOING_ANIMATED, animated);
        self
    }

    /// Re-render the incoming scene every frame
    pub fn with_incoming_animated(mut self, animated: bool) -> Self {
        self.flags.set(TransitionFlags::INCOMING_ANIMATED, animated);
        self
    }

    /// Composite the outgoing scene above the incoming one
    pub fn with_outgoing_over_incoming(mut self, over: bool) -> Self {
        self.flags.set(TransitionFlags::OUTGOING_OVER_INCOMING, over);
        self
    }

    /// Replace all flags at once
    pub fn with_flags(mut self, flags: TransitionFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn outgoing_down_scale(&self) -> DownScale {
        self.outgoing_down_scale
    }

    pub fn incoming_down_scale(&self) -> DownScale {
        self.incoming_down_scale
    }

    pub fn flags(&self) -> TransitionFlags {
        self.flags
    }

    pub fn outgoing_animated(&self) -> bool {
        self.flags.contains(TransitionFlags::OUTGOING_ANIMATED)
    }

    pub fn incoming_animated(&self) -> bool {
        self.flags.contains(TransitionFlags::INCOMING_ANIMATED)
    }

    pub fn outgoing_over_incoming(&self) -> bool {
        self.flags.contains(TransitionFlags::OUTGOING_OVER_INCOMING)
    }
}

/// Rejected transition configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingsError {
    /// Down-scale factor outside `[1.0, 4.0]`
    DownScaleOutOfRange(f32),
    /// Duration not strictly positive and finite
    InvalidDuration(f32),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::DownScaleOutOfRange(v) => write!(
                f,
                "Down-scale factor {} outside [{}, {}]",
                v,
                DownScale::MIN,
                DownScale::MAX
            ),
            SettingsError::InvalidDuration(d) => {
                write!(f, "Transition duration must be positive and finite, got {}", d)
            }
        }
    }
}

impl std::error::Error for SettingsError {}
