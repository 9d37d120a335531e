//! Scene contract
//!
//! A [`Scene`] is a self-contained unit of renderable content owned by the
//! host. The transition engine only ever borrows scenes, and talks to them
//! through the lifecycle hooks below.

use segue_math::{mat4, Color, Mat4};

use crate::render_target::RenderTarget;

/// A scene that can take part in a transition
///
/// The four lifecycle notifications are distinct and fire at fixed points:
///
/// | Hook | Scene | When |
/// |---|---|---|
/// | [`on_enter`](Scene::on_enter) | incoming | transition start |
/// | [`on_exit_transition_did_start`](Scene::on_exit_transition_did_start) | outgoing | transition start |
/// | [`on_enter_transition_did_finish`](Scene::on_enter_transition_did_finish) | incoming | completion |
/// | [`on_exit`](Scene::on_exit) | outgoing | completion |
///
/// Hooks default to no-ops so simple scenes only implement drawing and
/// pause state.
pub trait Scene {
    /// Name used in log output
    fn name(&self) -> &str {
        "scene"
    }

    /// The scene has been added to the scene graph
    fn on_enter(&mut self) {}

    /// The scene has left the scene graph
    fn on_exit(&mut self) {}

    /// A transition away from this scene has begun
    fn on_exit_transition_did_start(&mut self) {}

    /// A transition into this scene has finished and it is now active
    fn on_enter_transition_did_finish(&mut self) {}

    /// Release resources held by the scene
    fn cleanup(&mut self) {}

    /// Whether the scene's own update logic is suspended
    fn is_paused(&self) -> bool;

    /// Suspend or resume the scene's own update logic
    fn set_paused(&mut self, paused: bool);

    /// Color the scene's render target is cleared to before drawing
    fn background_color(&self) -> Color {
        Color::BLACK
    }

    /// Projection the scene is drawn with
    fn projection(&self) -> Mat4 {
        mat4::IDENTITY
    }

    /// Draw the full scene into an open pass on `target`
    fn visit(&mut self, target: &mut dyn RenderTarget);
}
