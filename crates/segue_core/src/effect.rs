//! Blend effects
//!
//! An effect turns the transition's progress into per-layer opacity and
//! offset. Effects only shape how the two layers look: progress, lifecycle
//! timing and z-order are owned by the transition.

use serde::{Serialize, Deserialize};
use segue_math::{Point, Size};

use crate::layer::LayerStack;
use crate::render_target::RenderTarget;

/// Direction for slide effects
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlideDirection {
    /// Incoming scene enters from the right, moving left
    Left,
    /// Incoming scene enters from the left, moving right
    Right,
    /// Incoming scene enters from below, moving up
    Up,
    /// Incoming scene enters from above, moving down
    Down,
}

impl SlideDirection {
    /// Unit vector of the slide motion
    pub fn unit(self) -> Point {
        match self {
            SlideDirection::Left => Point::new(-1.0, 0.0),
            SlideDirection::Right => Point::new(1.0, 0.0),
            SlideDirection::Up => Point::new(0.0, 1.0),
            SlideDirection::Down => Point::new(0.0, -1.0),
        }
    }
}

/// How the two layers are blended over the course of a transition
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum TransitionEffect {
    /// Blend alpha from outgoing to incoming
    #[default]
    Crossfade,
    /// Fade the outgoing scene out to the background, then the incoming in
    Fade,
    /// Push the outgoing scene off screen while the incoming slides in
    Slide {
        /// Direction of the motion
        direction: SlideDirection,
    },
}

impl TransitionEffect {
    /// Opacity of (outgoing, incoming) at the given progress
    ///
    /// For Crossfade: outgoing 1.0 -> 0.0 while incoming 0.0 -> 1.0
    ///
    /// For Fade: outgoing 1.0 -> 0.0 over the first half, incoming
    /// 0.0 -> 1.0 over the second half
    ///
    /// For Slide: both always 1.0
    pub fn opacities(&self, progress: f32) -> (f32, f32) {
        let p = progress.clamp(0.0, 1.0);
        match self {
            TransitionEffect::Crossfade => (1.0 - p, p),
            TransitionEffect::Fade => {
                if p < 0.5 {
                    (1.0 - p * 2.0, 0.0)
                } else {
                    (0.0, (p - 0.5) * 2.0)
                }
            }
            TransitionEffect::Slide { .. } => (1.0, 1.0),
        }
    }

    /// Offset of (outgoing, incoming) from the viewport center at the given progress
    pub fn offsets(&self, progress: f32, extent: Size) -> (Point, Point) {
        let p = progress.clamp(0.0, 1.0);
        match self {
            TransitionEffect::Slide { direction } => {
                let d = direction.unit();
                let (w, h) = (extent.width, extent.height);
                // Incoming starts one viewport behind the motion and ends centered.
                let incoming = Point::new(-d.x * w * (1.0 - p), -d.y * h * (1.0 - p));
                let outgoing = Point::new(d.x * w * p, d.y * h * p);
                (outgoing, incoming)
            }
            _ => (Point::ZERO, Point::ZERO),
        }
    }

    /// Update both layers for the given progress
    pub fn apply<T: RenderTarget>(&self, progress: f32, extent: Size, layers: &mut LayerStack<T>) {
        let (out_alpha, in_alpha) = self.opacities(progress);
        let (out_offset, in_offset) = self.offsets(progress, extent);

        let outgoing = layers.outgoing_mut();
        outgoing.set_opacity(out_alpha);
        outgoing.set_offset(out_offset);

        let incoming = layers.incoming_mut();
        incoming.set_opacity(in_alpha);
        incoming.set_offset(in_offset);
    }
}
