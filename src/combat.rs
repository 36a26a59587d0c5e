/// Combat and pickup handlers, run for each overlap the engine reports.
///
/// Every handler takes the current state and the indices of the two
/// entities involved and returns a new state.  An inactive participant
/// makes the handler a no-op, which is what keeps a single contact from
/// being processed twice.  Once the level is won or lost nothing but the
/// scheduled full reset may change the state.
use tracing::{debug, info};

use crate::contacts::{ContactGeometry, Overlap};
use crate::entities::{GameState, GameStatus, Vec2};
use crate::progression::Award;
use crate::schedule::DeferredAction;

/// Dispatch a frame's overlap events to the handlers, in report order.
pub fn resolve_overlaps(state: &GameState, overlaps: &[Overlap]) -> GameState {
    overlaps
        .iter()
        .fold(state.clone(), |acc, overlap| match *overlap {
            Overlap::PlayerCoin { coin } => collect_coin(&acc, coin),
            Overlap::PlayerEnemy { enemy, geometry } => hit_enemy(&acc, enemy, geometry),
            Overlap::ProjectileEnemy { projectile, enemy } => {
                projectile_hit_enemy(&acc, projectile, enemy)
            }
            Overlap::ProjectilePlatform { projectile } => projectile_hit_platform(&acc, projectile),
        })
}

pub fn collect_coin(state: &GameState, coin: usize) -> GameState {
    if state.progression.is_terminal()
        || !state.player.active
        || !state.coins.get(coin).is_some_and(|c| c.active)
    {
        return state.clone();
    }
    let mut next = state.clone();
    next.coins[coin].active = false;
    let score = next.progression.award(Award::Coin, &next.config.scores);
    debug!(coin, score, remaining = next.active_coins(), "coin_collected");
    evaluate_terminal(&next)
}

/// Player ran into an enemy: a stomp kills the enemy, anything else hurts
/// the player.
pub fn hit_enemy(state: &GameState, enemy: usize, geometry: ContactGeometry) -> GameState {
    if state.progression.is_terminal()
        || !state.player.active
        || !state.enemies.get(enemy).is_some_and(|e| e.active)
    {
        return state.clone();
    }
    let mut next = state.clone();

    if geometry.is_stomp() {
        next.enemies[enemy].active = false;
        next.enemies[enemy].vel = Vec2::ZERO;
        let score = next.progression.award(Award::Stomp, &next.config.scores);
        next.player.vel.y = -next.config.player.stomp_bounce;
        info!(enemy, score, "enemy_stomped");
        return next;
    }

    next.player.active = false;
    next.player.vel = next.config.player.knockback;
    next.player.collide_world_bounds = false;
    next.paused = true;
    let lives = next.progression.lose_life();
    info!(enemy, lives, "player_hurt");

    if lives > 0 {
        let due = next.now + next.config.delays.restart_ms;
        let carry = next.progression.carryover();
        next.schedule.push(due, DeferredAction::RestartLevel(carry));
    } else {
        next.progression.mark_lost();
        next.schedule.clear();
        let due = next.now + next.config.delays.terminal_reset_ms;
        next.schedule.push(due, DeferredAction::FullReset);
        info!(score = next.progression.score(), "game_over");
    }
    next
}

pub fn projectile_hit_enemy(state: &GameState, projectile: usize, enemy: usize) -> GameState {
    let projectile_live = state.projectiles.slots.get(projectile).is_some_and(|p| p.active);
    let enemy_live = state.enemies.get(enemy).is_some_and(|e| e.active);
    if state.progression.is_terminal() || !projectile_live || !enemy_live {
        return state.clone();
    }
    let mut next = state.clone();
    next.projectiles.slots[projectile].active = false;
    next.enemies[enemy].active = false;
    next.enemies[enemy].vel = Vec2::ZERO;
    let score = next.progression.award(Award::ProjectileKill, &next.config.scores);
    info!(enemy, projectile, score, "enemy_shot");
    next
}

pub fn projectile_hit_platform(state: &GameState, projectile: usize) -> GameState {
    if !state.projectiles.slots.get(projectile).is_some_and(|p| p.active) {
        return state.clone();
    }
    let mut next = state.clone();
    next.projectiles.slots[projectile].active = false;
    next
}

/// Declare a win once every coin is gone.  Losing is decided by the hurt
/// handler, so this only ever moves `Playing` to `Won`.
pub fn evaluate_terminal(state: &GameState) -> GameState {
    if state.progression.status() != GameStatus::Playing || state.active_coins() > 0 {
        return state.clone();
    }
    let mut next = state.clone();
    next.progression.mark_won();
    next.paused = true;
    next.schedule.clear();
    let due = next.now + next.config.delays.terminal_reset_ms;
    next.schedule.push(due, DeferredAction::FullReset);
    info!(score = next.progression.score(), "level_won");
    next
}
