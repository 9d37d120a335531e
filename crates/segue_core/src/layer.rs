//! Compositor layers
//!
//! While a transition runs, each participant scene lives in its own
//! render target. A [`Layer`] places that target in the final frame as a
//! textured quad; the [`LayerStack`] holds both layers and yields them in
//! draw order so the host can composite them.

use bytemuck::{Pod, Zeroable};
use segue_math::{Point, Size};

use crate::render_target::RenderTarget;

/// Which participant of a transition a layer or scene belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SceneRole {
    /// The scene being transitioned away from
    Outgoing,
    /// The scene being transitioned to
    Incoming,
}

impl std::fmt::Display for SceneRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneRole::Outgoing => write!(f, "outgoing"),
            SceneRole::Incoming => write!(f, "incoming"),
        }
    }
}

/// Vertex of a composited quad, laid out for direct GPU upload
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    /// Position in viewport points
    pub position: [f32; 2],
    /// Texture coordinate into the layer's target
    pub uv: [f32; 2],
    /// Layer opacity, repeated per vertex
    pub opacity: f32,
    pub _padding: [f32; 3],
}

/// One participant's render target placed in the final frame
pub struct Layer<T> {
    target: T,
    role: SceneRole,
    z_order: i32,
    size: Size,
    center: Point,
    offset: Point,
    opacity: f32,
}

impl<T: RenderTarget> Layer<T> {
    /// Layer covering a viewport of `size` centered at `center`
    pub fn new(target: T, role: SceneRole, z_order: i32, size: Size, center: Point) -> Self {
        Self {
            target,
            role,
            z_order,
            size,
            center,
            offset: Point::ZERO,
            opacity: 1.0,
        }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn role(&self) -> SceneRole {
        self.role
    }

    /// Composite order, higher draws above lower
    pub fn z_order(&self) -> i32 {
        self.z_order
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    /// Displacement from the viewport center, in points
    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Point) {
        self.offset = offset;
    }

    /// Four corners (bottom-left, bottom-right, top-right, top-left) of the
    /// layer's quad in viewport space
    pub fn quad(&self) -> [QuadVertex; 4] {
        let c = self.center + self.offset;
        let hw = self.size.width * 0.5;
        let hh = self.size.height * 0.5;
        let vertex = |x: f32, y: f32, u: f32, v: f32| QuadVertex {
            position: [x, y],
            uv: [u, v],
            opacity: self.opacity,
            _padding: [0.0; 3],
        };

        [
            vertex(c.x - hw, c.y - hh, 0.0, 1.0),
            vertex(c.x + hw, c.y - hh, 1.0, 1.0),
            vertex(c.x + hw, c.y + hh, 1.0, 0.0),
            vertex(c.x - hw, c.y + hh, 0.0, 0.0),
        ]
    }
}

/// The two layers of a running transition
///
/// This is the composition node housing both textured quads.
pub struct LayerStack<T> {
    outgoing: Layer<T>,
    incoming: Layer<T>,
}

impl<T: RenderTarget> LayerStack<T> {
    pub fn new(outgoing: Layer<T>, incoming: Layer<T>) -> Self {
        Self { outgoing, incoming }
    }

    pub fn outgoing(&self) -> &Layer<T> {
        &self.outgoing
    }

    pub fn incoming(&self) -> &Layer<T> {
        &self.incoming
    }

    pub fn outgoing_mut(&mut self) -> &mut Layer<T> {
        &mut self.outgoing
    }

    pub fn incoming_mut(&mut self) -> &mut Layer<T> {
        &mut self.incoming
    }

    /// Layer for a role
    pub fn get(&self, role: SceneRole) -> &Layer<T> {
        match role {
            SceneRole::Outgoing => &self.outgoing,
            SceneRole::Incoming => &self.incoming,
        }
    }

    /// Mutable layer for a role
    pub fn get_mut(&mut self, role: SceneRole) -> &mut Layer<T> {
        match role {
            SceneRole::Outgoing => &mut self.outgoing,
            SceneRole::Incoming => &mut self.incoming,
        }
    }

    /// Both layers, bottom first
    pub fn draw_order(&self) -> [&Layer<T>; 2] {
        if self.outgoing.z_order > self.incoming.z_order {
            [&self.incoming, &self.outgoing]
        } else {
            [&self.outgoing, &self.incoming]
        }
    }
}
