/// Per-tick simulation.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, an RNG handle) and returns a brand-new
/// `GameState`.  Side effects are limited to the injected RNG, which is
/// only consulted when a level instance is built.
use rand::Rng;
use tracing::{info, trace};

use crate::ai;
use crate::combat;
use crate::config::GameConfig;
use crate::contacts::{BodyContact, CollisionOracle, FrameContacts};
use crate::entities::{Coin, Facing, GameState, Player, Pose, ProjectilePool, Vec2};
use crate::input::InputSnapshot;
use crate::progression::{Carryover, Progression};
use crate::schedule::{DeferredAction, Schedule};

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build a level instance.  `carry` is `None` for a fresh game.
pub fn init_state(config: &GameConfig, carry: Option<Carryover>, rng: &mut impl Rng) -> GameState {
    let layout = &config.level;

    let player = Player {
        pos: layout.player_spawn,
        vel: Vec2::ZERO,
        size: layout.player_size,
        facing: Facing::Right,
        active: true,
        jumps_left: config.player.max_jumps,
        next_fire_at: 0,
        collide_world_bounds: true,
        pose: Pose::Idle,
    };

    let enemies: Vec<_> = layout
        .enemy_spawns
        .iter()
        .map(|&pos| ai::spawn_enemy(pos, layout.enemy_size, &config.enemy, rng))
        .collect();

    let coins = layout
        .coin_positions()
        .into_iter()
        .map(|pos| Coin {
            pos,
            vel: Vec2::ZERO,
            size: layout.coin_size,
            active: true,
        })
        .collect();

    let progression = match carry {
        Some(carry) => Progression::carried(carry),
        None => Progression::fresh(config.starting_lives),
    };

    GameState {
        config: config.clone(),
        player,
        last_contacts: FrameContacts {
            enemies: vec![BodyContact::default(); enemies.len()],
            ..FrameContacts::default()
        },
        enemies,
        coins,
        projectiles: ProjectilePool::new(config.player.projectile_pool),
        platforms: layout.platforms.clone(),
        progression,
        schedule: Schedule::default(),
        paused: false,
        now: 0,
        level_instance: 0,
    }
}

/// Rebuild every entity of the level.  The clock keeps running; score and
/// lives come from `carry`, or from the defaults when it is `None`.
pub fn restart_level(state: &GameState, carry: Option<Carryover>, rng: &mut impl Rng) -> GameState {
    GameState {
        now: state.now,
        level_instance: state.level_instance + 1,
        ..init_state(&state.config, carry, rng)
    }
}

// ── Player controls (pure) ───────────────────────────────────────────────────

/// Horizontal run/sprint, double jump and pose, from held and pressed keys.
pub fn apply_controls(state: &GameState, input: &InputSnapshot) -> GameState {
    let tuning = &state.config.player;
    let grounded = state.last_contacts.player.grounded();
    let speed = if input.sprint { tuning.sprint_speed } else { tuning.run_speed };

    let mut player = state.player.clone();
    if input.left {
        player.vel.x = -speed;
        player.facing = Facing::Left;
    } else if input.right {
        player.vel.x = speed;
        player.facing = Facing::Right;
    } else {
        player.vel.x = 0.0;
    }

    player.pose = if !grounded {
        Pose::Airborne
    } else if input.is_moving() && input.sprint {
        Pose::Sprint
    } else if input.is_moving() {
        Pose::Walk
    } else {
        Pose::Idle
    };

    if grounded {
        player.jumps_left = tuning.max_jumps;
    }
    if input.jump_pressed && player.jumps_left > 0 {
        player.vel.y = -tuning.jump_speed;
        player.jumps_left -= 1;
    }

    GameState {
        player,
        ..state.clone()
    }
}

/// Fire if the cooldown allows it.  The cooldown restarts even when the
/// pool is exhausted and no projectile comes out.
pub fn player_shoot(state: &GameState) -> GameState {
    if state.now <= state.player.next_fire_at {
        return state.clone();
    }
    let mut next = fire_projectile(state);
    next.player.next_fire_at = state.now + state.config.player.fire_cooldown_ms;
    next
}

/// Launch a projectile from the player's position in the facing direction.
pub fn fire_projectile(state: &GameState) -> GameState {
    let mut next = state.clone();
    let size = next.config.level.projectile_size;
    let Some(slot) = next.projectiles.acquire(size) else {
        trace!("projectile_pool_exhausted");
        return next;
    };
    let speed = next.config.player.projectile_speed;
    let projectile = &mut next.projectiles.slots[slot];
    projectile.pos = state.player.pos;
    projectile.vel = Vec2::new(speed * state.player.facing.sign(), 0.0);
    projectile.active = true;
    next
}

/// Return projectiles that left the world horizontally to the pool.
pub fn cull_projectiles(state: &GameState) -> GameState {
    let width = state.world().x;
    let mut next = state.clone();
    for projectile in next.projectiles.slots.iter_mut() {
        if projectile.active && (projectile.pos.x < 0.0 || projectile.pos.x > width) {
            projectile.active = false;
        }
    }
    next
}

// ── Per-tick entry points ────────────────────────────────────────────────────

/// Advance the clock to `now`: fire due scheduled actions, then (while play
/// is live) player controls, the enemy AI pass and projectile culling.
pub fn update(state: &GameState, now: u64, input: &InputSnapshot, rng: &mut impl Rng) -> GameState {
    let mut next = GameState {
        now,
        ..state.clone()
    };

    // A restart replaces the schedule, so later due entries are superseded.
    if let Some(action) = next.schedule.take_due(now).into_iter().next() {
        next = run_deferred(&next, action, rng);
    }

    if !next.player.active || next.paused || next.progression.is_terminal() {
        return next;
    }

    next = apply_controls(&next, input);
    if input.fire_pressed {
        next = player_shoot(&next);
    }
    next.enemies = ai::think_all(&next, now);
    cull_projectiles(&next)
}

/// React to a physics step: combat handlers for every overlap, then the
/// terminal check.  The contact flags become the next tick's sensors.
pub fn resolve_contacts(state: &GameState, contacts: &FrameContacts) -> GameState {
    let resolved = combat::resolve_overlaps(state, &contacts.overlaps);
    GameState {
        last_contacts: contacts.clone(),
        ..combat::evaluate_terminal(&resolved)
    }
}

/// One full frame: `update`, physics through `oracle`, `resolve_contacts`.
pub fn tick(
    state: &GameState,
    now: u64,
    input: &InputSnapshot,
    oracle: &mut impl CollisionOracle,
    rng: &mut impl Rng,
) -> GameState {
    let updated = update(state, now, input, rng);
    let dt_ms = now.saturating_sub(state.now);
    let (moved, contacts) = oracle.advance(&updated, dt_ms);
    resolve_contacts(&moved, &contacts)
}

fn run_deferred(state: &GameState, action: DeferredAction, rng: &mut impl Rng) -> GameState {
    match action {
        DeferredAction::RestartLevel(carry) => {
            info!(score = carry.score, lives = carry.lives, "level_restart");
            restart_level(state, Some(carry), rng)
        }
        DeferredAction::FullReset => {
            info!("full_reset");
            restart_level(state, None, rng)
        }
    }
}
