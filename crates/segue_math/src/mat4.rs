//! 4x4 matrix utilities for scene projections
//!
//! Scenes carry a projection matrix which a transition copies onto the
//! render target it draws that scene into, so perspective and orthographic
//! scenes sample back correctly as a flat texture.

/// 4x4 matrix type (column-major)
pub type Mat4 = [[f32; 4]; 4];

/// Identity matrix
pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Orthographic projection mapping the given box to clip space
///
/// Depth is mapped to the 0..1 range used by modern graphics APIs.
pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    let rl = 1.0 / (right - left);
    let tb = 1.0 / (top - bottom);
    let fn_ = 1.0 / (far - near);

    [
        [2.0 * rl, 0.0, 0.0, 0.0],
        [0.0, 2.0 * tb, 0.0, 0.0],
        [0.0, 0.0, -fn_, 0.0],
        [-(right + left) * rl, -(top + bottom) * tb, -near * fn_, 1.0],
    ]
}

/// 2D orthographic projection covering a viewport of the given size
///
/// Origin at the bottom-left corner, one unit per point.
pub fn orthographic_2d(width: f32, height: f32) -> Mat4 {
    orthographic(0.0, width, 0.0, height, -1024.0, 1024.0)
}
