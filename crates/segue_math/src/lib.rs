//! Math Library
//!
//! This crate provides the small set of math types the Segue transition
//! engine needs.
//!
//! ## Core Types
//!
//! - [`Color`] - Linear RGBA color
//! - [`Mat4`] - 4x4 column-major projection matrix
//!
//! ## Viewport Geometry
//!
//! - [`Point`] - 2D position in points
//! - [`Size`] - Fractional size in points
//! - [`PixelSize`] - Whole-pixel size of a surface
//! - [`Rect`] - Origin plus size

mod color;
pub mod geometry;
pub mod mat4;

pub use color::Color;
pub use geometry::{PixelSize, Point, Rect, Size};
pub use mat4::Mat4;
