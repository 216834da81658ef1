//! Vertex types for 2D sprite batches

use bytemuck::{Pod, Zeroable};

/// Textured sprite corner
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl SpriteVertex {
    pub const fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
        }
    }
}

/// Flat-colored line vertex for debug drawing
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl LineVertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Colors for debug drawing
pub mod colors {
    pub const TRAJECTORY: [f32; 4] = [0.3, 0.8, 0.4, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 0.0];
    pub const COLLISION_FLASH: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
}
