//! Host contract
//!
//! The host (director) owns every scene, the currently presented scene and
//! the render loop. A transition is handed the host on each call instead of
//! holding on to it.

use std::fmt::Debug;

use segue_math::{PixelSize, Point, Rect, Size};

use crate::render_target::RenderTarget;
use crate::scene::Scene;

/// Drawable bounds of the window plus its native content scale
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Drawable bounds in points
    pub rect: Rect,
    /// Pixels per point on the current display
    pub content_scale: f32,
}

impl Viewport {
    /// Viewport at the origin with the given size
    pub fn new(width: f32, height: f32, content_scale: f32) -> Self {
        Self {
            rect: Rect::from_size(Size::new(width, height)),
            content_scale,
        }
    }

    /// Size in points
    pub fn size(&self) -> Size {
        self.rect.size
    }

    /// Whole-pixel size a render target needs to cover the viewport
    pub fn target_size(&self) -> PixelSize {
        self.rect.size.ceil()
    }

    /// Center of the drawable bounds
    pub fn center(&self) -> Point {
        self.rect.center()
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0, 1.0)
    }
}

/// Owner of scenes and of the active-scene slot
pub trait Host {
    /// Handle the host uses to refer to one of its scenes
    type SceneId: Copy + Eq + Debug;
    /// Render target type the host allocates
    type Target: RenderTarget;

    /// The scene currently presented, if any
    fn active_scene(&self) -> Option<Self::SceneId>;

    /// Make `scene` the presented scene
    fn present_scene(&mut self, scene: Self::SceneId);

    /// Current drawable bounds
    fn viewport(&self) -> Viewport;

    /// Whether scenes that have exited should be cleaned up immediately
    fn cleanup_on_exit(&self) -> bool;

    /// Borrow a scene, or `None` if it no longer exists
    fn scene_mut(&mut self, scene: Self::SceneId) -> Option<&mut dyn Scene>;

    /// Allocate an off-screen target of the given size
    fn create_render_target(&mut self, size: PixelSize) -> Self::Target;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_size_rounds_up() {
        let viewport = Viewport::new(1023.5, 767.1, 2.0);
        assert_eq!(viewport.target_size(), PixelSize::new(1024, 768));
    }

    #[test]
    fn test_center() {
        let viewport = Viewport::new(800.0, 600.0, 1.0);
        assert_eq!(viewport.center(), Point::new(400.0, 300.0));
    }
}
