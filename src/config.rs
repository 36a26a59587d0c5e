/// Tuning constants and level layout.
///
/// `GameConfig::default()` reproduces the shipped level exactly.  A JSON
/// file may override any subset of fields; everything it omits keeps its
/// default value.
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::Vec2;
use crate::level::LevelLayout;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config {path} is invalid at '{field}': {source}")]
    Parse {
        path: PathBuf,
        field: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("config field '{field}' is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Which enemy behaviour a level runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiMode {
    /// Keep the spawn velocity and let wall bounces turn the enemy around.
    Bounce,
    /// Patrol / chase / return state machine.
    #[default]
    Tactical,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub run_speed: f32,
    pub sprint_speed: f32,
    pub jump_speed: f32,
    pub max_jumps: u32,
    pub fire_cooldown_ms: u64,
    pub projectile_speed: f32,
    pub projectile_pool: usize,
    /// Upward speed given to the player after a stomp.
    pub stomp_bounce: f32,
    /// Velocity applied when the player is hurt (y negative = upward).
    pub knockback: Vec2,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        PlayerTuning {
            run_speed: 160.0,
            sprint_speed: 280.0,
            jump_speed: 500.0,
            max_jumps: 2,
            fire_cooldown_ms: 250,
            projectile_speed: 400.0,
            projectile_pool: 20,
            stomp_bounce: 200.0,
            knockback: Vec2::new(100.0, -200.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub mode: AiMode,
    /// Patrol speed is rolled per enemy in `patrol_speed_min..=patrol_speed_max`.
    pub patrol_speed_min: f32,
    pub patrol_speed_max: f32,
    pub chase_speed: f32,
    pub aggro_range: f32,
    /// Vertical separation below which the player can be noticed.
    pub aggro_max_dy: f32,
    pub patrol_range: f32,
    pub chase_ms: u64,
    pub rechase_ms: u64,
    /// Chase is abandoned beyond `aggro_range * leash_factor`.
    pub leash_factor: f32,
    /// A returning enemy re-engages inside `aggro_range * reengage_factor`.
    pub reengage_factor: f32,
    /// Distance from the patrol anchor at which a return counts as home.
    pub home_radius: f32,
    pub leap_min_height: f32,
    pub leap_max_dx: f32,
    pub leap_speed: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        EnemyTuning {
            mode: AiMode::Tactical,
            patrol_speed_min: 80.0,
            patrol_speed_max: 120.0,
            chase_speed: 180.0,
            aggro_range: 200.0,
            aggro_max_dy: 100.0,
            patrol_range: 150.0,
            chase_ms: 3000,
            rechase_ms: 2000,
            leash_factor: 2.0,
            reengage_factor: 0.7,
            home_radius: 50.0,
            leap_min_height: 50.0,
            leap_max_dx: 100.0,
            leap_speed: 300.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreTable {
    pub coin: u32,
    pub stomp: u32,
    pub projectile_kill: u32,
}

impl Default for ScoreTable {
    fn default() -> Self {
        ScoreTable {
            coin: 10,
            stomp: 50,
            projectile_kill: 25,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Delays {
    /// Hurt with lives left → level restart.
    pub restart_ms: u64,
    /// Win or game over → full reset.
    pub terminal_reset_ms: u64,
}

impl Default for Delays {
    fn default() -> Self {
        Delays {
            restart_ms: 1500,
            terminal_reset_ms: 3000,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub starting_lives: u32,
    /// Downward acceleration, consumed by the physics engine.
    pub gravity: f32,
    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    pub scores: ScoreTable,
    pub delays: Delays,
    pub level: LevelLayout,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            starting_lives: 3,
            gravity: 800.0,
            player: PlayerTuning::default(),
            enemy: EnemyTuning::default(),
            scores: ScoreTable::default(),
            delays: Delays::default(),
            level: LevelLayout::default(),
        }
    }
}

impl GameConfig {
    /// Read, parse and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_at(&text, path)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Self::parse_at(text, Path::new("<inline>"))
    }

    fn parse_at(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let mut de = serde_json::Deserializer::from_str(text);
        let config: GameConfig =
            serde_path_to_error::deserialize(&mut de).map_err(|err| ConfigError::Parse {
                path: path.to_path_buf(),
                field: err.path().to_string(),
                source: err.into_inner(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive: [(&'static str, f32); 15] = [
            ("enemy.aggro_range", self.enemy.aggro_range),
            ("enemy.aggro_max_dy", self.enemy.aggro_max_dy),
            ("enemy.patrol_range", self.enemy.patrol_range),
            ("enemy.patrol_speed_min", self.enemy.patrol_speed_min),
            ("enemy.chase_speed", self.enemy.chase_speed),
            ("enemy.home_radius", self.enemy.home_radius),
            ("enemy.leap_min_height", self.enemy.leap_min_height),
            ("enemy.leap_max_dx", self.enemy.leap_max_dx),
            ("enemy.leap_speed", self.enemy.leap_speed),
            ("player.run_speed", self.player.run_speed),
            ("player.sprint_speed", self.player.sprint_speed),
            ("player.jump_speed", self.player.jump_speed),
            ("player.projectile_speed", self.player.projectile_speed),
            ("level.world.x", self.level.world.x),
            ("level.world.y", self.level.world.y),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be positive, got {value}"),
                });
            }
        }
        if self.enemy.patrol_speed_max < self.enemy.patrol_speed_min {
            return Err(ConfigError::Invalid {
                field: "enemy.patrol_speed_max",
                reason: format!(
                    "{} is below patrol_speed_min {}",
                    self.enemy.patrol_speed_max, self.enemy.patrol_speed_min
                ),
            });
        }
        if self.enemy.reengage_factor > self.enemy.leash_factor {
            return Err(ConfigError::Invalid {
                field: "enemy.reengage_factor",
                reason: "must not exceed leash_factor".to_string(),
            });
        }
        if self.level.coins.count == 0 {
            return Err(ConfigError::Invalid {
                field: "level.coins.count",
                reason: "a level needs at least one coin to be winnable".to_string(),
            });
        }
        if self.player.projectile_pool == 0 {
            return Err(ConfigError::Invalid {
                field: "player.projectile_pool",
                reason: "must hold at least one projectile".to_string(),
            });
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::Invalid {
                field: "starting_lives",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
