//! Live simulation entities
//!
//! Foes and active waves borrow from the `Level` they were spawned from, so
//! the level must outlive the world that simulates it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::level::{Level, Wave};
use super::trajectory::Trajectory;
use crate::consts::{PLAYER_SPEED, TRAJECTORY_DEBUG_POINTS};

/// Directional input, sampled once per frame by the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DPad {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl DPad {
    pub const UP: u8 = 1;
    pub const DOWN: u8 = 2;
    pub const LEFT: u8 = 4;
    pub const RIGHT: u8 = 8;

    /// Decode from `UP | DOWN | LEFT | RIGHT` bits
    pub fn from_bits(bits: u8) -> Self {
        Self {
            up: bits & Self::UP != 0,
            down: bits & Self::DOWN != 0,
            left: bits & Self::LEFT != 0,
            right: bits & Self::RIGHT != 0,
        }
    }

    pub fn bits(&self) -> u8 {
        (self.up as u8 * Self::UP)
            | (self.down as u8 * Self::DOWN)
            | (self.left as u8 * Self::LEFT)
            | (self.right as u8 * Self::RIGHT)
    }

    /// Per-tic displacement. Axes are independent; diagonals are not normalized.
    pub fn displacement(&self, speed: f32) -> Vec2 {
        let mut delta = Vec2::ZERO;
        if self.up {
            delta.y += speed;
        }
        if self.down {
            delta.y -= speed;
        }
        if self.left {
            delta.x -= speed;
        }
        if self.right {
            delta.x += speed;
        }
        delta
    }
}

/// Runtime debug visualization switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugFlags {
    /// Sample a polyline for every active wave's trajectory
    pub draw_trajectories: bool,
    /// Ask the renderer to flash the screen while the player is hit
    pub flash_on_collision: bool,
}

/// The player's ship
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub position: Vec2,
}

impl Player {
    pub fn new(position: Vec2) -> Self {
        Self { position }
    }

    /// Apply one tic of directional input
    pub fn advance(&mut self, dpad: DPad) {
        self.position += dpad.displacement(PLAYER_SPEED);
    }
}

/// An enemy moving along a trajectory
#[derive(Debug, Clone)]
pub struct Foe<'l> {
    pub speed: f32,
    pub trajectory: &'l Trajectory,
    /// Distance travelled along the trajectory
    pub trajectory_position: f32,
    pub position: Vec2,
}

impl<'l> Foe<'l> {
    /// Spawn at the start of `wave`'s trajectory. Speed and trajectory are
    /// copied, so the foe no longer depends on the wave afterwards.
    pub fn new(level: &'l Level, wave: &Wave) -> Self {
        let trajectory = level.trajectory_of(wave);
        Self {
            speed: wave.foe_speed,
            trajectory,
            trajectory_position: 0.0,
            position: trajectory.point_at(0.0),
        }
    }

    /// Move one tic along the trajectory. Returns `false` once the foe has
    /// travelled past the end and should be removed.
    pub fn advance(&mut self) -> bool {
        self.trajectory_position += self.speed;
        if self.trajectory_position > self.trajectory.length() {
            return false;
        }
        self.position = self.trajectory.point_at(self.trajectory_position);
        true
    }
}

/// A wave that is still spawning foes
#[derive(Debug, Clone)]
pub struct ActiveWave<'l> {
    pub wave: &'l Wave,
    /// Sampled trajectory for debug drawing, empty unless enabled
    pub polyline: Vec<Vec2>,
}

impl<'l> ActiveWave<'l> {
    pub fn new(level: &'l Level, wave: &'l Wave, debug: DebugFlags) -> Self {
        let polyline = if debug.draw_trajectories {
            level
                .trajectory_of(wave)
                .sample_polyline(TRAJECTORY_DEBUG_POINTS)
        } else {
            Vec::new()
        };
        Self { wave, polyline }
    }

    /// Spawn decision for `tic`: `Some(true)` spawns the last foe,
    /// `Some(false)` spawns one of the others, `None` spawns nothing.
    pub fn spawn_at(&self, tic: u32) -> Option<bool> {
        let elapsed = tic.checked_sub(self.wave.start_tic)?;
        if elapsed % self.wave.spawn_interval != 0 {
            return None;
        }
        let last = u64::from(elapsed)
            == u64::from(self.wave.spawn_interval) * u64::from(self.wave.spawn_count - 1);
        Some(last)
    }
}
