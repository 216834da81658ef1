//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only (`TICS_PER_SECOND`)
//! - Level data is immutable and outlives the world borrowing it
//! - Stable iteration order (level order for waves, spawn order for foes)
//! - No rendering or platform dependencies

pub mod collision;
pub mod level;
pub mod sprite;
pub mod state;
pub mod trajectory;
pub mod world;

pub use collision::{CollisionMask, MASK_BITS};
pub use level::{Level, Wave};
pub use sprite::{PixelFormat, Pixmap, Sprite, Tile, TileLookup, TileSheet};
pub use state::{ActiveWave, DPad, DebugFlags, Foe, Player};
pub use trajectory::{PathSegment, Trajectory};
pub use world::{Frame, SpriteDraw, World, WorldSprites};
