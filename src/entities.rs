/// Entity types: pure data, no logic.
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::contacts::FrameContacts;
use crate::level::Rect;
use crate::progression::Progression;
use crate::schedule::Schedule;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// World-space vector.  Units are pixels; y grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    pub fn distance(self, other: Vec2) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Negative values face left; zero and positive face right.
    pub fn from_sign(sign: f32) -> Self {
        if sign < 0.0 {
            Facing::Left
        } else {
            Facing::Right
        }
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

/// Animation pose picked by the controls; only the renderer reads it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Pose {
    #[default]
    Idle,
    Walk,
    Sprint,
    Airborne,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub facing: Facing,
    pub active: bool,
    pub jumps_left: u32,
    /// The next shot is allowed once the clock is strictly past this.
    pub next_fire_at: u64,
    /// Cleared by the hurt knockback so the body can fall out of the world.
    pub collide_world_bounds: bool,
    pub pose: Pose,
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect {
            center: self.pos,
            size: self.size,
        }
    }
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AiState {
    Patrol,
    Chase,
    Return,
}

/// Colour hint for each AI state.  Display-only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tint {
    Normal,
    Aggressive,
    Returning,
}

impl AiState {
    pub fn tint(self) -> Tint {
        match self {
            AiState::Patrol => Tint::Normal,
            AiState::Chase => Tint::Aggressive,
            AiState::Return => Tint::Returning,
        }
    }
}

/// Per-enemy AI record, created together with the enemy.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyAi {
    pub state: AiState,
    pub patrol_speed: f32,
    pub chase_speed: f32,
    pub aggro_range: f32,
    pub patrol_range: f32,
    /// Patrol anchor: the spawn x-coordinate.
    pub origin_x: f32,
    /// +1 or -1.
    pub direction: f32,
    /// Chase deadline in clock milliseconds.
    pub alert_until: u64,
    pub last_seen: u64,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub facing: Facing,
    pub active: bool,
    pub ai: EnemyAi,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect {
            center: self.pos,
            size: self.size,
        }
    }
}

// ── Pickups & projectiles ─────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Coin {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub active: bool,
}

impl Coin {
    pub fn rect(&self) -> Rect {
        Rect {
            center: self.pos,
            size: self.size,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub active: bool,
}

impl Projectile {
    pub fn rect(&self) -> Rect {
        Rect {
            center: self.pos,
            size: self.size,
        }
    }
}

/// Fixed-capacity projectile pool.  Slots are created lazily up to
/// `capacity` and recycled once inactive; nothing is ever removed, so a
/// slot index stays a stable projectile id for the whole level.
#[derive(Clone, Debug)]
pub struct ProjectilePool {
    pub slots: Vec<Projectile>,
    pub capacity: usize,
}

impl ProjectilePool {
    pub fn new(capacity: usize) -> Self {
        ProjectilePool {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Index of a free slot, growing the pool if it is not yet full.
    /// `None` when every slot is in flight.
    pub fn acquire(&mut self, size: Vec2) -> Option<usize> {
        if let Some(i) = self.slots.iter().position(|p| !p.active) {
            return Some(i);
        }
        if self.slots.len() < self.capacity {
            self.slots.push(Projectile {
                pos: Vec2::ZERO,
                vel: Vec2::ZERO,
                size,
                active: false,
            });
            return Some(self.slots.len() - 1);
        }
        None
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|p| p.active).count()
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

/// The entire simulation state of one level instance.  Cloneable so the
/// update functions can return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub config: GameConfig,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub coins: Vec<Coin>,
    pub projectiles: ProjectilePool,
    pub platforms: Vec<Rect>,
    pub progression: Progression,
    pub schedule: Schedule,
    /// While set the physics engine must not integrate anything.
    pub paused: bool,
    /// Contact flags from the most recent physics step.
    pub last_contacts: FrameContacts,
    /// Clock in milliseconds, as last supplied to `update`.
    pub now: u64,
    /// Bumped on every restart or reset.
    pub level_instance: u32,
}

impl GameState {
    pub fn active_coins(&self) -> usize {
        self.coins.iter().filter(|c| c.active).count()
    }

    pub fn active_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.active).count()
    }

    pub fn world(&self) -> Vec2 {
        self.config.level.world
    }
}
