//! Error types for level loading and sprite construction
//!
//! Both are raised synchronously by constructors. A `Level` or `Sprite` that
//! exists is always valid, so the simulation itself never fails.

use std::path::PathBuf;

use thiserror::Error;

/// Malformed level data. Every variant names the offending wave or trajectory.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("trajectory {trajectory} has no path segments")]
    EmptyTrajectory { trajectory: usize },
    #[error("wave {wave} references trajectory {trajectory}, but the level has {count}")]
    TrajectoryOutOfRange {
        wave: usize,
        trajectory: i64,
        count: usize,
    },
    #[error("wave {wave} has spawn_interval {value}, must be > 0")]
    InvalidSpawnInterval { wave: usize, value: i64 },
    #[error("wave {wave} has spawn_count {value}, must be >= 1")]
    InvalidSpawnCount { wave: usize, value: i64 },
    #[error("wave {wave} has start_tic {value}, must be >= 0")]
    InvalidStartTic { wave: usize, value: i64 },
    #[error("wave {wave} has foe_speed {value}, must be finite and >= 0")]
    InvalidFoeSpeed { wave: usize, value: f32 },
    #[error("failed to parse level: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Collision mask preconditions that do not hold for a tile.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpriteError {
    #[error("pixmap must be RGBA to build a collision mask, got {0:?}")]
    UnsupportedPixelFormat(crate::sim::PixelFormat),
    #[error("tile is {width} pixels wide, collision masks hold at most {max}")]
    TileTooWide { width: u32, max: u32 },
    #[error("mask row {row} has bits set past its {width} columns")]
    BitsOutsideWidth { row: usize, width: u32 },
    #[error("tile region {x},{y} {width}x{height} lies outside its {image_width}x{image_height} image")]
    RegionOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    },
    #[error("no tile named {0:?}")]
    UnknownTile(String),
    #[error("tile references missing image {image}")]
    MissingImage { image: usize },
}
