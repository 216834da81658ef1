//! Host settings
//!
//! Loaded from an optional JSON file next to the binary; any field missing
//! from the file keeps its default.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::DebugFlags;

/// Host configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Window ===
    pub window_width: u32,
    pub window_height: u32,

    // === Content ===
    /// Level file to play
    pub level_path: String,
    /// Tile name of the player sprite
    pub player_tile: String,
    /// Tile name shared by all foes
    pub foe_tile: String,

    // === Debug ===
    /// Trajectory drawing and collision flash
    pub debug: DebugFlags,

    // === Headless run ===
    /// Frames simulated by the native demo loop
    pub demo_frames: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: 400,
            window_height: 600,

            level_path: "assets/levels/level-0.json".to_string(),
            player_tile: "stella.png".to_string(),
            foe_tile: "mame.png".to_string(),

            debug: DebugFlags {
                draw_trajectories: true,
                flash_on_collision: true,
            },

            demo_frames: 1200,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from `path`, falling back to defaults if the file is
    /// missing or malformed
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) => {
                log::info!("Using default settings ({}: {err})", path.display());
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Ignoring malformed settings in {}: {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn window_size(&self) -> Vec2 {
        Vec2::new(self.window_width as f32, self.window_height as f32)
    }

    /// Player spawn point: the middle of the window
    pub fn player_start(&self) -> Vec2 {
        0.5 * self.window_size()
    }
}
