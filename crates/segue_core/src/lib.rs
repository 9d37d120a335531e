//! Scene transition engine for Segue
//!
//! This crate blends from a host's active scene to a new scene over a fixed
//! duration, without either scene knowing a transition is happening:
//!
//! - [`Transition`] - Idle/Running/Finished state machine driven by `tick(dt)`
//! - [`TransitionSettings`] - Down-scale factors and [`TransitionFlags`]
//! - [`TransitionEffect`] - How the two layers blend (crossfade, fade, slide)
//! - [`Scene`] - Lifecycle hooks and draw traversal a participant exposes
//! - [`Host`] - The owner of scenes and of the active-scene slot
//! - [`RenderTarget`] - Off-screen surface each participant is drawn into
//! - [`LayerStack`] - The two composited layers of a running transition
//! - [`Director`] - Reference host storing scenes in a slot map
//! - [`TransitionPreset`] - Loadable/saveable transition configuration

mod director;
mod effect;
mod host;
mod layer;
mod preset;
mod render_target;
mod scene;
mod settings;
mod transition;

pub use director::{Director, DirectorError, SceneKey, TargetFactory};
pub use effect::{SlideDirection, TransitionEffect};
pub use host::{Host, Viewport};
pub use layer::{Layer, LayerStack, QuadVertex, SceneRole};
pub use preset::{PresetLoadError, PresetSaveError, TransitionPreset};
pub use render_target::{HeadlessTarget, RenderPass, RenderTarget};
pub use scene::Scene;
pub use settings::{DownScale, SettingsError, TransitionFlags, TransitionSettings};
pub use transition::{draw_scene, TickOutcome, Transition, TransitionError, TransitionPhase};

// Re-export commonly used types from segue_math for convenience
pub use segue_math::{Color, Mat4, PixelSize, Point, Rect, Size};
