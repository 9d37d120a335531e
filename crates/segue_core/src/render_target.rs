//! Off-screen render targets
//!
//! A [`RenderTarget`] is a drawable surface that can be sampled back as a
//! texture. The GPU-side implementation belongs to the host; this module
//! defines the contract the transition engine needs, the scoped
//! [`RenderPass`] guard, and a CPU-side [`HeadlessTarget`].

use segue_math::{mat4, Color, Mat4, PixelSize, Point};

use crate::layer::QuadVertex;

/// Surface a scene can be drawn into and later composited as a textured quad
pub trait RenderTarget {
    /// Allocated size in pixels
    fn size(&self) -> PixelSize;

    /// Begin a pass that clears to `color` before drawing
    fn begin_with_clear(&mut self, color: Color);

    /// End the pass started by [`begin_with_clear`](Self::begin_with_clear)
    fn end(&mut self);

    /// Submit vertices to the currently open pass
    fn draw(&mut self, vertices: &[QuadVertex]);

    /// Where the target's quad is placed when composited
    fn set_position(&mut self, position: Point);

    /// Sampling scale relative to the target's logical size
    fn set_content_scale(&mut self, scale: f32);

    /// Projection used while drawing into this target
    fn set_projection(&mut self, projection: Mat4);
}

/// A render pass that is ended when dropped
///
/// The pass is ended on every exit path, including unwinding out of a
/// scene's draw traversal, so a target is never left bound.
pub struct RenderPass<'a> {
    target: &'a mut dyn RenderTarget,
}

impl<'a> RenderPass<'a> {
    /// Clear `target` to `clear` and open a pass on it
    pub fn begin(target: &'a mut dyn RenderTarget, clear: Color) -> Self {
        target.begin_with_clear(clear);
        Self { target }
    }

    /// The target being drawn into
    pub fn target(&mut self) -> &mut dyn RenderTarget {
        &mut *self.target
    }
}

impl Drop for RenderPass<'_> {
    fn drop(&mut self) {
        self.target.end();
    }
}

/// CPU-side render target that records what was done to it
///
/// Used by headless hosts and in tests: no pixels are stored, only the
/// state a GPU target would carry plus counters for the passes it saw.
#[derive(Clone, Debug)]
pub struct HeadlessTarget {
    size: PixelSize,
    position: Point,
    content_scale: f32,
    projection: Mat4,
    pass_open: bool,
    passes: u32,
    vertices_drawn: usize,
    last_clear: Option<Color>,
}

impl HeadlessTarget {
    /// Create a target of the given pixel size
    pub fn new(size: PixelSize) -> Self {
        Self {
            size,
            position: Point::ZERO,
            content_scale: 1.0,
            projection: mat4::IDENTITY,
            pass_open: false,
            passes: 0,
            vertices_drawn: 0,
            last_clear: None,
        }
    }

    /// Current quad position
    pub fn position(&self) -> Point {
        self.position
    }

    /// Current sampling scale
    pub fn content_scale(&self) -> f32 {
        self.content_scale
    }

    /// Current projection
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// Whether a pass has been begun but not yet ended
    pub fn is_pass_open(&self) -> bool {
        self.pass_open
    }

    /// Number of passes begun so far
    pub fn pass_count(&self) -> u32 {
        self.passes
    }

    /// Total vertices submitted across all passes
    pub fn vertices_drawn(&self) -> usize {
        self.vertices_drawn
    }

    /// Clear color of the most recent pass
    pub fn last_clear(&self) -> Option<Color> {
        self.last_clear
    }
}

impl RenderTarget for HeadlessTarget {
    fn size(&self) -> PixelSize {
        self.size
    }

    fn begin_with_clear(&mut self, color: Color) {
        if self.pass_open {
            log::warn!("HeadlessTarget: begin called while a pass is already open");
        }
        self.pass_open = true;
        self.passes += 1;
        self.last_clear = Some(color);
    }

    fn end(&mut self) {
        if !self.pass_open {
            log::warn!("HeadlessTarget: end called without an open pass");
        }
        self.pass_open = false;
    }

    fn draw(&mut self, vertices: &[QuadVertex]) {
        if !self.pass_open {
            log::warn!("HeadlessTarget: draw of {} vertices outside a pass ignored", vertices.len());
            return;
        }
        self.vertices_drawn += vertices.len();
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    fn set_content_scale(&mut self, scale: f32) {
        self.content_scale = scale;
    }

    fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
    }
}
