/// Contact reports exchanged with the physics engine.
///
/// The simulation never detects collisions itself.  After every physics
/// step the engine hands back a `FrameContacts`: per-body contact flags,
/// which the next `update` reads as sensors, and the ordered list of
/// overlap events the combat handlers react to.
use crate::entities::GameState;

/// Which sides of a body touched something solid during the last step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BodyContact {
    pub touching_down: bool,
    pub touching_up: bool,
    pub blocked_left: bool,
    pub blocked_right: bool,
}

impl BodyContact {
    pub fn grounded(&self) -> bool {
        self.touching_down
    }

    pub fn against_wall(&self) -> bool {
        self.blocked_left || self.blocked_right
    }
}

/// Geometry of a player↔enemy contact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContactGeometry {
    /// The player's lower edge is on the enemy.
    pub player_touching_down: bool,
    /// The enemy's upper edge is under the player.
    pub enemy_touching_up: bool,
}

impl ContactGeometry {
    pub const STOMP: ContactGeometry = ContactGeometry {
        player_touching_down: true,
        enemy_touching_up: true,
    };

    pub const SIDE: ContactGeometry = ContactGeometry {
        player_touching_down: false,
        enemy_touching_up: false,
    };

    pub fn is_stomp(&self) -> bool {
        self.player_touching_down && self.enemy_touching_up
    }
}

/// A pairwise overlap reported by the engine.  Entities are addressed by
/// their index in the corresponding `GameState` collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Overlap {
    PlayerCoin { coin: usize },
    PlayerEnemy { enemy: usize, geometry: ContactGeometry },
    ProjectileEnemy { projectile: usize, enemy: usize },
    ProjectilePlatform { projectile: usize },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameContacts {
    pub player: BodyContact,
    /// Indexed like `GameState::enemies`.
    pub enemies: Vec<BodyContact>,
    pub overlaps: Vec<Overlap>,
}

impl FrameContacts {
    /// Contact flags for one enemy; no report means no contact.
    pub fn enemy(&self, index: usize) -> BodyContact {
        self.enemies.get(index).copied().unwrap_or_default()
    }
}

/// The physics engine as seen from the simulation: integrate one step of
/// `dt_ms` milliseconds from the velocities the simulation chose, and
/// report what touched what.
pub trait CollisionOracle {
    fn advance(&mut self, state: &GameState, dt_ms: u64) -> (GameState, FrameContacts);
}
