/// Minimal arcade physics, standing in for a real engine so the terminal
/// frontend has something to run against.
///
/// Bodies are axis-aligned boxes.  Each step applies gravity, moves along x
/// and then y, pushes bodies out of static platforms and records which
/// sides touched.  There is no broadphase and no body-vs-body separation;
/// pairwise contacts are reported as overlaps and left to the combat
/// handlers.
use crate::config::GameConfig;
use crate::contacts::{BodyContact, CollisionOracle, ContactGeometry, FrameContacts, Overlap};
use crate::entities::{GameState, Vec2};
use crate::level::Rect;

/// Longest step integrated at once; bigger frames are clamped so fast
/// bodies cannot pass through a 32px platform.
const MAX_STEP_MS: u64 = 50;

/// Bodies resting flush against a platform must not count as overlapping
/// it on the other axis; probes are shrunk by this much.
const SKIN: f32 = 0.01;

#[derive(Clone, Debug)]
pub struct ArcadeWorld {
    pub gravity: f32,
}

impl ArcadeWorld {
    pub fn new(config: &GameConfig) -> Self {
        ArcadeWorld {
            gravity: config.gravity,
        }
    }
}

/// How a moving body responds to the world.
#[derive(Clone, Copy)]
struct Motion {
    gravity: f32,
    /// Clamp to the world rectangle, reporting the edges as blocking.
    world: Option<Vec2>,
    /// Reverse horizontal velocity on a wall instead of stopping.
    bounce_x: bool,
}

impl CollisionOracle for ArcadeWorld {
    fn advance(&mut self, state: &GameState, dt_ms: u64) -> (GameState, FrameContacts) {
        if state.paused || dt_ms == 0 {
            let contacts = FrameContacts {
                overlaps: Vec::new(),
                ..state.last_contacts.clone()
            };
            return (state.clone(), contacts);
        }

        let dt = dt_ms.min(MAX_STEP_MS) as f32 / 1000.0;
        let world = state.world();
        let mut next = state.clone();
        let mut contacts = FrameContacts {
            enemies: vec![BodyContact::default(); next.enemies.len()],
            ..FrameContacts::default()
        };

        let player_motion = Motion {
            gravity: self.gravity,
            world: next.player.collide_world_bounds.then_some(world),
            bounce_x: false,
        };
        let (pos, vel, contact) =
            move_body(next.player.rect(), next.player.vel, dt, player_motion, &next.platforms);
        next.player.pos = pos;
        next.player.vel = vel;
        contacts.player = contact;

        let enemy_motion = Motion {
            gravity: self.gravity,
            world: Some(world),
            bounce_x: true,
        };
        for (i, enemy) in next.enemies.iter_mut().enumerate() {
            if !enemy.active {
                continue;
            }
            let (pos, vel, contact) =
                move_body(enemy.rect(), enemy.vel, dt, enemy_motion, &next.platforms);
            enemy.pos = pos;
            enemy.vel = vel;
            contacts.enemies[i] = contact;
        }

        let coin_motion = Motion {
            gravity: self.gravity,
            world: Some(world),
            bounce_x: false,
        };
        for coin in next.coins.iter_mut().filter(|c| c.active) {
            let (pos, vel, _) = move_body(coin.rect(), coin.vel, dt, coin_motion, &next.platforms);
            coin.pos = pos;
            coin.vel = vel;
        }

        for projectile in next.projectiles.slots.iter_mut().filter(|p| p.active) {
            projectile.pos.x += projectile.vel.x * dt;
            projectile.pos.y += projectile.vel.y * dt;
        }

        contacts.overlaps = detect_overlaps(&next);
        (next, contacts)
    }
}

fn move_body(
    rect: Rect,
    vel: Vec2,
    dt: f32,
    motion: Motion,
    platforms: &[Rect],
) -> (Vec2, Vec2, BodyContact) {
    let mut contact = BodyContact::default();
    let mut vel = Vec2::new(vel.x, vel.y + motion.gravity * dt);
    let mut body = rect;
    let half = Vec2::new(rect.size.x / 2.0, rect.size.y / 2.0);

    // ── Horizontal ───────────────────────────────────────────────────────────
    body.center.x += vel.x * dt;
    let mut hit_wall = false;
    let probe = shrink(body, Vec2::new(0.0, SKIN));
    for platform in platforms.iter().filter(|p| p.overlaps(&probe)) {
        if vel.x > 0.0 {
            body.center.x = platform.left() - half.x;
            contact.blocked_right = true;
        } else if vel.x < 0.0 {
            body.center.x = platform.right() + half.x;
            contact.blocked_left = true;
        }
        hit_wall = true;
    }
    if let Some(world) = motion.world {
        if body.left() < 0.0 {
            body.center.x = half.x;
            contact.blocked_left = true;
            hit_wall = true;
        } else if body.right() > world.x {
            body.center.x = world.x - half.x;
            contact.blocked_right = true;
            hit_wall = true;
        }
    }
    if hit_wall {
        vel.x = if motion.bounce_x { -vel.x } else { 0.0 };
    }

    // ── Vertical ─────────────────────────────────────────────────────────────
    body.center.y += vel.y * dt;
    let probe = shrink(body, Vec2::new(SKIN, 0.0));
    for platform in platforms.iter().filter(|p| p.overlaps(&probe)) {
        if vel.y > 0.0 {
            body.center.y = platform.top() - half.y;
            contact.touching_down = true;
        } else if vel.y < 0.0 {
            body.center.y = platform.bottom() + half.y;
            contact.touching_up = true;
        }
        vel.y = 0.0;
    }
    if let Some(world) = motion.world {
        if body.top() < 0.0 {
            body.center.y = half.y;
            contact.touching_up = true;
            vel.y = 0.0;
        } else if body.bottom() > world.y {
            body.center.y = world.y - half.y;
            contact.touching_down = true;
            vel.y = 0.0;
        }
    }

    (body.center, vel, contact)
}

fn shrink(rect: Rect, by: Vec2) -> Rect {
    Rect {
        center: rect.center,
        size: Vec2::new(rect.size.x - by.x, rect.size.y - by.y),
    }
}

/// Pairwise overlaps in handler order: coins, player↔enemy, then
/// projectiles against platforms and enemies.
fn detect_overlaps(state: &GameState) -> Vec<Overlap> {
    let mut overlaps = Vec::new();
    let player = state.player.rect();

    if state.player.active {
        for (coin, c) in state.coins.iter().enumerate() {
            if c.active && c.rect().overlaps(&player) {
                overlaps.push(Overlap::PlayerCoin { coin });
            }
        }
        for (enemy, e) in state.enemies.iter().enumerate() {
            if e.active && e.rect().overlaps(&player) {
                let geometry = contact_geometry(&player, &e.rect());
                overlaps.push(Overlap::PlayerEnemy { enemy, geometry });
            }
        }
    }

    for (projectile, p) in state.projectiles.slots.iter().enumerate() {
        if !p.active {
            continue;
        }
        let rect = p.rect();
        if state.platforms.iter().any(|platform| platform.overlaps(&rect)) {
            overlaps.push(Overlap::ProjectilePlatform { projectile });
            continue;
        }
        if let Some(enemy) = state
            .enemies
            .iter()
            .position(|e| e.active && e.rect().overlaps(&rect))
        {
            overlaps.push(Overlap::ProjectileEnemy { projectile, enemy });
        }
    }
    overlaps
}

/// A contact counts as landing on top when the boxes overlap less
/// vertically than horizontally and the player is the higher of the two.
pub fn contact_geometry(player: &Rect, enemy: &Rect) -> ContactGeometry {
    let overlap_x = player.right().min(enemy.right()) - player.left().max(enemy.left());
    let overlap_y = player.bottom().min(enemy.bottom()) - player.top().max(enemy.top());
    if overlap_y <= overlap_x && player.center.y < enemy.center.y {
        ContactGeometry::STOMP
    } else {
        ContactGeometry::SIDE
    }
}
