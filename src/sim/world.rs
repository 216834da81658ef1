//! Fixed timestep world simulation
//!
//! The host feeds wall-clock frame time into [`World::advance`], which turns it
//! into whole tics at `TICS_PER_SECOND`. Each tic runs, in order: wave
//! admission and spawning, foe movement, player movement. Rendering reads a
//! [`Frame`] once per frame, independent of how many tics ran.

use glam::Vec2;

use super::level::Level;
use super::sprite::{Sprite, Tile};
use super::state::{ActiveWave, DPad, DebugFlags, Foe, Player};
use crate::consts::{MAX_CATCHUP_TICS, SPRITE_SCALE, TICS_PER_SECOND};

/// Accumulator units per tic: time is stored as `ms * TICS_PER_SECOND`, so a
/// tic is exactly 1000 units and whole-second frame times split without
/// rounding drift.
const UNITS_PER_TIC: f64 = 1000.0;

/// Sprites shared by every actor of a kind
#[derive(Debug, Clone)]
pub struct WorldSprites {
    pub player: Sprite,
    pub foe: Sprite,
}

/// A tile to draw centred at a world position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteDraw<'a> {
    pub tile: &'a Tile,
    pub position: Vec2,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Default)]
pub struct Frame<'a> {
    /// Foes first, then the player on top
    pub sprites: Vec<SpriteDraw<'a>>,
    /// Player overlaps at least one foe
    pub colliding: bool,
    /// Renderer should flash the background this frame
    pub flash: bool,
    /// Active wave trajectories, when debug drawing is on
    pub trajectories: Vec<&'a [Vec2]>,
}

pub struct World<'l> {
    level: &'l Level,
    debug: DebugFlags,
    sprites: WorldSprites,
    active_waves: Vec<ActiveWave<'l>>,
    foes: Vec<Foe<'l>>,
    player: Player,
    dpad: DPad,
    /// Unconsumed frame time, in `UNITS_PER_TIC` units
    timestamp: f64,
    tic: u32,
    foes_spawned: u32,
}

impl<'l> World<'l> {
    /// Create a world and start `level` at tic 0
    pub fn new(level: &'l Level, sprites: WorldSprites, player_start: Vec2, debug: DebugFlags) -> Self {
        let mut world = Self {
            level,
            debug,
            sprites,
            active_waves: Vec::new(),
            foes: Vec::new(),
            player: Player::new(player_start),
            dpad: DPad::default(),
            timestamp: 0.0,
            tic: 0,
            foes_spawned: 0,
        };
        world.initialize_level(level);
        world
    }

    /// Reset all runtime state and start `level` from tic 0.
    ///
    /// Waves starting at tic 0 are admitted (and spawn their first foe)
    /// immediately.
    pub fn initialize_level(&mut self, level: &'l Level) {
        self.level = level;
        self.foes.clear();
        self.active_waves.clear();
        self.timestamp = 0.0;
        self.tic = 0;
        self.foes_spawned = 0;

        log::info!("Level started: {} waves", level.waves().len());
        self.advance_waves();
    }

    /// Consume `dt` milliseconds of frame time, running as many whole tics as
    /// fit. Leftover time carries over to the next call. Returns the number of
    /// tics run.
    ///
    /// Non-finite or non-positive `dt` is ignored. At most
    /// `MAX_CATCHUP_TICS` run per call; time beyond that is discarded.
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !dt.is_finite() || dt <= 0.0 {
            return 0;
        }

        self.timestamp += f64::from(dt) * f64::from(TICS_PER_SECOND);

        let mut tics = 0;
        while self.timestamp >= UNITS_PER_TIC && tics < MAX_CATCHUP_TICS {
            self.timestamp -= UNITS_PER_TIC;
            self.step();
            tics += 1;
        }
        if self.timestamp >= UNITS_PER_TIC {
            log::warn!(
                "tic {}: dropping {:.0} ms of frame time after {tics} catch-up tics",
                self.tic,
                self.timestamp / f64::from(TICS_PER_SECOND)
            );
            self.timestamp = 0.0;
        }
        tics
    }

    /// Run exactly one tic, ignoring the time accumulator
    pub fn step(&mut self) {
        self.tic += 1;
        self.advance_waves();
        self.advance_foes();
        self.advance_player();
    }

    fn advance_waves(&mut self) {
        let level = self.level;
        let tic = self.tic;

        for wave in level.waves().iter().filter(|wave| wave.start_tic == tic) {
            log::debug!("tic {tic}: wave of {} foes admitted", wave.spawn_count);
            self.active_waves
                .push(ActiveWave::new(level, wave, self.debug));
        }

        let foes = &mut self.foes;
        let spawned = &mut self.foes_spawned;
        self.active_waves.retain(|active| {
            let Some(last) = active.spawn_at(tic) else {
                return true;
            };
            foes.push(Foe::new(level, active.wave));
            *spawned += 1;
            if last {
                log::debug!("tic {tic}: wave finished spawning");
            }
            !last
        });
    }

    fn advance_foes(&mut self) {
        let tic = self.tic;
        self.foes.retain_mut(|foe| {
            let alive = foe.advance();
            if !alive {
                log::trace!("tic {tic}: foe left its trajectory");
            }
            alive
        });
    }

    fn advance_player(&mut self) {
        self.player.advance(self.dpad);
    }

    /// Set the directional input used by subsequent tics
    pub fn set_dpad(&mut self, dpad: DPad) {
        self.dpad = dpad;
    }

    /// Whether the player sprite overlaps any foe sprite right now
    pub fn is_colliding(&self) -> bool {
        self.foes.iter().any(|foe| {
            let offset = (self.player.position - foe.position) / SPRITE_SCALE;
            self.sprites.foe.collides_with(&self.sprites.player, offset)
        })
    }

    /// Snapshot of what to draw this frame
    pub fn render(&self) -> Frame<'_> {
        let colliding = self.is_colliding();

        let foe_tile = self.sprites.foe.tile();
        let mut sprites: Vec<SpriteDraw<'_>> = self
            .foes
            .iter()
            .map(|foe| SpriteDraw {
                tile: foe_tile,
                position: foe.position,
            })
            .collect();
        sprites.push(SpriteDraw {
            tile: self.sprites.player.tile(),
            position: self.player.position,
        });

        let trajectories = if self.debug.draw_trajectories {
            self.active_waves
                .iter()
                .map(|active| active.polyline.as_slice())
                .collect()
        } else {
            Vec::new()
        };

        Frame {
            sprites,
            colliding,
            flash: colliding && self.debug.flash_on_collision,
            trajectories,
        }
    }

    pub fn level(&self) -> &'l Level {
        self.level
    }

    /// Current tic (0 right after `initialize_level`)
    pub fn tic(&self) -> u32 {
        self.tic
    }

    pub fn foes(&self) -> &[Foe<'l>] {
        &self.foes
    }

    pub fn active_waves(&self) -> &[ActiveWave<'l>] {
        &self.active_waves
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn dpad(&self) -> DPad {
        self.dpad
    }

    pub fn debug(&self) -> DebugFlags {
        self.debug
    }

    /// Foes spawned since the level started
    pub fn foes_spawned(&self) -> u32 {
        self.foes_spawned
    }
}
