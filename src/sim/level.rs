//! Level data: trajectories and the waves that spawn foes along them
//!
//! A `Level` is immutable once built and can only be built through the
//! validating constructors, so the simulation never sees a zero spawn
//! interval or a dangling trajectory index.

use std::path::Path;

use serde::Deserialize;

use super::trajectory::{PathSegment, Trajectory};
use crate::error::LevelError;

/// Spawn schedule for one batch of foes
#[derive(Debug, Clone, PartialEq)]
pub struct Wave {
    /// Tic at which the first foe spawns
    pub start_tic: u32,
    /// Tics between spawns (> 0)
    pub spawn_interval: u32,
    /// Total foes spawned (>= 1)
    pub spawn_count: u32,
    /// Distance travelled per tic along the trajectory
    pub foe_speed: f32,
    /// Index into the level's trajectories
    pub trajectory: usize,
}

impl Wave {
    /// Tic of the last spawn
    pub fn last_spawn_tic(&self) -> u32 {
        self.spawn_interval
            .saturating_mul(self.spawn_count.saturating_sub(1))
            .saturating_add(self.start_tic)
    }
}

#[derive(Debug, Clone)]
pub struct Level {
    trajectories: Vec<Trajectory>,
    waves: Vec<Wave>,
}

impl Level {
    /// Assemble a level, checking every wave against the trajectory list.
    pub fn new(trajectories: Vec<Trajectory>, waves: Vec<Wave>) -> Result<Self, LevelError> {
        for (index, wave) in waves.iter().enumerate() {
            validate_wave(index, wave, trajectories.len())?;
        }
        Ok(Self {
            trajectories,
            waves,
        })
    }

    /// Parse and validate a JSON level document.
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let file: LevelFile = serde_json::from_str(json)?;

        let trajectories = file
            .trajectories
            .into_iter()
            .enumerate()
            .map(|(index, path)| {
                Trajectory::new(path).map_err(|_| LevelError::EmptyTrajectory { trajectory: index })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let waves = file
            .waves
            .into_iter()
            .enumerate()
            .map(|(index, wave)| wave.into_wave(index, trajectories.len()))
            .collect::<Result<Vec<_>, _>>()?;

        let level = Self::new(trajectories, waves)?;
        log::info!(
            "Loaded level: {} trajectories, {} waves",
            level.trajectories.len(),
            level.waves.len()
        );
        Ok(level)
    }

    /// Read and parse a level file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn trajectories(&self) -> &[Trajectory] {
        &self.trajectories
    }

    pub fn waves(&self) -> &[Wave] {
        &self.waves
    }

    /// Trajectory followed by `wave`'s foes
    pub fn trajectory_of(&self, wave: &Wave) -> &Trajectory {
        // Index checked in `Level::new`
        &self.trajectories[wave.trajectory]
    }
}

fn validate_wave(index: usize, wave: &Wave, trajectory_count: usize) -> Result<(), LevelError> {
    if wave.trajectory >= trajectory_count {
        return Err(LevelError::TrajectoryOutOfRange {
            wave: index,
            trajectory: wave.trajectory as i64,
            count: trajectory_count,
        });
    }
    if wave.spawn_interval == 0 {
        return Err(LevelError::InvalidSpawnInterval {
            wave: index,
            value: 0,
        });
    }
    if wave.spawn_count == 0 {
        return Err(LevelError::InvalidSpawnCount {
            wave: index,
            value: 0,
        });
    }
    if !wave.foe_speed.is_finite() || wave.foe_speed < 0.0 {
        return Err(LevelError::InvalidFoeSpeed {
            wave: index,
            value: wave.foe_speed,
        });
    }
    Ok(())
}

/// On-disk level layout
#[derive(Debug, Deserialize)]
struct LevelFile {
    trajectories: Vec<Vec<PathSegment>>,
    waves: Vec<WaveFile>,
}

/// Integer fields are signed so negative values get a wave-specific error
#[derive(Debug, Deserialize)]
struct WaveFile {
    start_tic: i64,
    spawn_interval: i64,
    spawn_count: i64,
    foe_speed: f32,
    trajectory: i64,
}

impl WaveFile {
    fn into_wave(self, index: usize, trajectory_count: usize) -> Result<Wave, LevelError> {
        let start_tic = u32::try_from(self.start_tic).map_err(|_| LevelError::InvalidStartTic {
            wave: index,
            value: self.start_tic,
        })?;
        let spawn_interval = u32::try_from(self.spawn_interval)
            .ok()
            .filter(|&v| v > 0)
            .ok_or(LevelError::InvalidSpawnInterval {
                wave: index,
                value: self.spawn_interval,
            })?;
        let spawn_count = u32::try_from(self.spawn_count)
            .ok()
            .filter(|&v| v > 0)
            .ok_or(LevelError::InvalidSpawnCount {
                wave: index,
                value: self.spawn_count,
            })?;
        let trajectory = usize::try_from(self.trajectory)
            .ok()
            .filter(|&t| t < trajectory_count)
            .ok_or(LevelError::TrajectoryOutOfRange {
                wave: index,
                trajectory: self.trajectory,
                count: trajectory_count,
            })?;

        Ok(Wave {
            start_tic,
            spawn_interval,
            spawn_count,
            foe_speed: self.foe_speed,
            trajectory,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: &str = r#"{
        "trajectories": [
            [[[0, 0], [32, 0], [64, 0], [96, 0]]],
            [
                [[0, 0], [0, 50], [50, 100], [100, 100]],
                [[100, 100], [150, 100], [200, 50], [200, 0]]
            ]
        ],
        "waves": [
            { "start_tic": 0, "spawn_interval": 10, "spawn_count": 3, "foe_speed": 5.0, "trajectory": 0 },
            { "start_tic": 120, "spawn_interval": 20, "spawn_count": 5, "foe_speed": 2.5, "trajectory": 1 }
        ]
    }"#;

    fn with_wave(wave: &str) -> String {
        format!(r#"{{ "trajectories": [[[[0, 0], [1, 0], [2, 0], [3, 0]]]], "waves": [{wave}] }}"#)
    }

    #[test]
    fn test_load_level_from_json() {
        let level = Level::from_json(LEVEL).unwrap();
        assert_eq!(level.trajectories().len(), 2);
        assert_eq!(level.trajectories()[1].segments().len(), 2);
        assert_eq!(level.waves().len(), 2);

        let wave = &level.waves()[1];
        assert_eq!(wave.start_tic, 120);
        assert_eq!(wave.spawn_interval, 20);
        assert_eq!(wave.spawn_count, 5);
        assert_eq!(wave.foe_speed, 2.5);
        assert_eq!(wave.last_spawn_tic(), 200);
        assert_eq!(level.trajectory_of(wave).segments().len(), 2);
        assert_eq!(level.trajectory_of(&level.waves()[0]).length(), 96.0);
    }

    #[test]
    fn test_zero_spawn_interval_rejected() {
        let json = with_wave(r#"{ "start_tic": 0, "spawn_interval": 0, "spawn_count": 1, "foe_speed": 1.0, "trajectory": 0 }"#);
        assert!(matches!(
            Level::from_json(&json),
            Err(LevelError::InvalidSpawnInterval { wave: 0, value: 0 })
        ));
    }

    #[test]
    fn test_negative_spawn_count_rejected() {
        let json = with_wave(r#"{ "start_tic": 0, "spawn_interval": 4, "spawn_count": -2, "foe_speed": 1.0, "trajectory": 0 }"#);
        assert!(matches!(
            Level::from_json(&json),
            Err(LevelError::InvalidSpawnCount { wave: 0, value: -2 })
        ));
    }

    #[test]
    fn test_negative_start_tic_rejected() {
        let json = with_wave(r#"{ "start_tic": -1, "spawn_interval": 4, "spawn_count": 1, "foe_speed": 1.0, "trajectory": 0 }"#);
        assert!(matches!(
            Level::from_json(&json),
            Err(LevelError::InvalidStartTic { wave: 0, value: -1 })
        ));
    }

    #[test]
    fn test_trajectory_index_out_of_range() {
        let json = with_wave(r#"{ "start_tic": 0, "spawn_interval": 4, "spawn_count": 1, "foe_speed": 1.0, "trajectory": 1 }"#);
        let err = Level::from_json(&json).unwrap_err();
        assert!(matches!(
            err,
            LevelError::TrajectoryOutOfRange {
                wave: 0,
                trajectory: 1,
                count: 1
            }
        ));
        assert_eq!(err.to_string(), "wave 0 references trajectory 1, but the level has 1");
    }

    #[test]
    fn test_empty_trajectory_reports_index() {
        let json = r#"{ "trajectories": [[[[0, 0], [1, 0], [2, 0], [3, 0]]], []], "waves": [] }"#;
        assert!(matches!(
            Level::from_json(json),
            Err(LevelError::EmptyTrajectory { trajectory: 1 })
        ));
    }

    #[test]
    fn test_missing_field_is_parse_error() {
        let json = with_wave(r#"{ "start_tic": 0, "spawn_count": 1, "foe_speed": 1.0, "trajectory": 0 }"#);
        assert!(matches!(Level::from_json(&json), Err(LevelError::Parse(_))));
    }

    #[test]
    fn test_level_new_validates_waves() {
        let trajectory = Trajectory::new(vec![PathSegment::new(
            glam::Vec2::ZERO,
            glam::Vec2::ZERO,
            glam::Vec2::ONE,
            glam::Vec2::ONE,
        )])
        .unwrap();
        let wave = Wave {
            start_tic: 0,
            spawn_interval: 1,
            spawn_count: 1,
            foe_speed: f32::NAN,
            trajectory: 0,
        };
        assert!(matches!(
            Level::new(vec![trajectory], vec![wave]),
            Err(LevelError::InvalidFoeSpeed { wave: 0, .. })
        ));
    }

    #[test]
    fn test_bundled_level_is_valid() {
        let level = Level::from_json(include_str!("../../assets/levels/level-0.json")).unwrap();
        assert_eq!(level.trajectories().len(), 3);
        assert!(level.waves().iter().all(|wave| wave.last_spawn_tic() < 1200));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Level::load("does/not/exist.json").unwrap_err();
        assert!(matches!(err, LevelError::Io { .. }));
    }
}
