//! CPU-side rendering data
//!
//! Turns a simulation [`Frame`](crate::sim::Frame) into sprite quads and debug
//! line strips ready for upload. GPU submission belongs to the host.

pub mod shapes;
pub mod vertex;

pub use shapes::{SpriteBatch, frame_batch, line_strip, sprite_quad};
pub use vertex::{LineVertex, SpriteVertex};
