/// Level layout: static geometry and spawn points.
use serde::{Deserialize, Serialize};

use crate::entities::Vec2;

/// Axis-aligned rectangle described by its centre, the way the level is
/// authored (every platform is a scaled 1×1 pixel placed at its centre).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Rect {
            center: Vec2::new(cx, cy),
            size: Vec2::new(w, h),
        }
    }

    pub fn left(&self) -> f32 {
        self.center.x - self.size.x / 2.0
    }

    pub fn right(&self) -> f32 {
        self.center.x + self.size.x / 2.0
    }

    pub fn top(&self) -> f32 {
        self.center.y - self.size.y / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.center.y + self.size.y / 2.0
    }

    /// Strict overlap: rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// A horizontal row of coins dropped from `start`, one every `step_x`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoinRow {
    pub count: u32,
    pub start: Vec2,
    pub step_x: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelLayout {
    /// World bounds; the origin is the top-left corner, y grows downward.
    pub world: Vec2,
    pub platforms: Vec<Rect>,
    pub player_spawn: Vec2,
    pub player_size: Vec2,
    pub enemy_spawns: Vec<Vec2>,
    pub enemy_size: Vec2,
    pub coins: CoinRow,
    pub coin_size: Vec2,
    pub projectile_size: Vec2,
}

impl Default for LevelLayout {
    fn default() -> Self {
        LevelLayout {
            world: Vec2::new(3200.0, 600.0),
            platforms: vec![
                // Ground spans the whole world.
                Rect::new(1600.0, 568.0, 3200.0, 64.0),
                Rect::new(600.0, 400.0, 200.0, 32.0),
                Rect::new(50.0, 250.0, 200.0, 32.0),
                Rect::new(750.0, 220.0, 200.0, 32.0),
                Rect::new(1100.0, 350.0, 150.0, 32.0),
                Rect::new(1400.0, 250.0, 150.0, 32.0),
                Rect::new(1800.0, 400.0, 200.0, 32.0),
                Rect::new(2100.0, 300.0, 200.0, 32.0),
                Rect::new(2500.0, 200.0, 200.0, 32.0),
            ],
            player_spawn: Vec2::new(100.0, 450.0),
            player_size: Vec2::new(45.0, 45.0),
            enemy_spawns: vec![Vec2::new(650.0, 350.0), Vec2::new(1850.0, 350.0)],
            enemy_size: Vec2::new(32.0, 32.0),
            coins: CoinRow {
                count: 21,
                start: Vec2::new(150.0, 0.0),
                step_x: 140.0,
            },
            coin_size: Vec2::new(38.0, 34.0),
            projectile_size: Vec2::new(10.0, 10.0),
        }
    }
}

impl LevelLayout {
    /// Spawn positions of every coin in the row, left to right.
    pub fn coin_positions(&self) -> Vec<Vec2> {
        (0..self.coins.count)
            .map(|i| {
                Vec2::new(
                    self.coins.start.x + self.coins.step_x * i as f32,
                    self.coins.start.y,
                )
            })
            .collect()
    }
}
