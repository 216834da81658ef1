//! Wave Dodge - dodge waves of foes flying along Bezier trajectories
//!
//! Core modules:
//! - `sim`: Deterministic simulation (trajectories, collision masks, waves, world)
//! - `renderer`: CPU-side vertex generation for sprite batches and debug lines
//! - `settings`: Host configuration
//! - `error`: Load-time and sprite construction errors

pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{LevelError, SpriteError};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate
    pub const TICS_PER_SECOND: u32 = 60;
    /// Duration of one tic in milliseconds
    pub const MS_PER_TIC: f32 = 1000.0 / TICS_PER_SECOND as f32;
    /// Most tics a single frame may catch up; older pending time is dropped
    pub const MAX_CATCHUP_TICS: u32 = 10 * TICS_PER_SECOND;

    /// Sprites are drawn at this multiple of their tile size
    pub const SPRITE_SCALE: f32 = 2.0;
    /// Player movement per tic along each pressed axis
    pub const PLAYER_SPEED: f32 = 2.0;

    /// Pixels with alpha above this are solid for collision
    pub const ALPHA_THRESHOLD: u32 = 0x7f;

    /// Chords per Bezier segment when approximating arc length
    pub const SEGMENT_SAMPLES: usize = 64;
    /// Points in the debug polyline of an active wave's trajectory
    pub const TRAJECTORY_DEBUG_POINTS: usize = 100;
}
