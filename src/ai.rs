/// Enemy AI: a patrol / chase / return state machine run once per tick for
/// every active enemy.
///
/// The controller only ever writes the enemy's velocity, facing and AI
/// record.  Positions are moved by the physics engine, and the wall and
/// ground flags it reads come from the previous physics step.
use rand::Rng;
use tracing::debug;

use crate::config::{AiMode, EnemyTuning};
use crate::contacts::BodyContact;
use crate::entities::{AiState, Enemy, EnemyAi, Facing, GameState, Vec2};

/// Build an enemy together with its AI record.  Patrol speed and initial
/// heading are rolled from `rng`.
pub fn spawn_enemy(pos: Vec2, size: Vec2, tuning: &EnemyTuning, rng: &mut impl Rng) -> Enemy {
    let patrol_speed = rng.gen_range(tuning.patrol_speed_min..=tuning.patrol_speed_max);
    let direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    Enemy {
        pos,
        vel: Vec2::new(patrol_speed * direction, 0.0),
        size,
        facing: Facing::from_sign(direction),
        active: true,
        ai: EnemyAi {
            state: AiState::Patrol,
            patrol_speed,
            chase_speed: tuning.chase_speed,
            aggro_range: tuning.aggro_range,
            patrol_range: tuning.patrol_range,
            origin_x: pos.x,
            direction,
            alert_until: 0,
            last_seen: 0,
        },
    }
}

/// Run the controller for every enemy, reading each one's contact flags
/// from the last physics step.
pub fn think_all(state: &GameState, now: u64) -> Vec<Enemy> {
    let tuning = &state.config.enemy;
    state
        .enemies
        .iter()
        .enumerate()
        .map(|(i, enemy)| {
            let next = think(enemy, state.player.pos, state.last_contacts.enemy(i), now, tuning);
            if next.ai.state != enemy.ai.state {
                debug!(enemy = i, from = ?enemy.ai.state, to = ?next.ai.state, now, "ai_transition");
            }
            next
        })
        .collect()
}

/// One controller step for one enemy.  Inactive enemies come back unchanged.
pub fn think(
    enemy: &Enemy,
    player: Vec2,
    sensors: BodyContact,
    now: u64,
    tuning: &EnemyTuning,
) -> Enemy {
    if !enemy.active {
        return enemy.clone();
    }
    match tuning.mode {
        // The engine's wall bounce does all the work.
        AiMode::Bounce => enemy.clone(),
        AiMode::Tactical => tactical(enemy, player, sensors, now, tuning),
    }
}

fn tactical(
    enemy: &Enemy,
    player: Vec2,
    sensors: BodyContact,
    now: u64,
    tuning: &EnemyTuning,
) -> Enemy {
    let mut next = enemy.clone();
    let ai = &enemy.ai;
    let distance = enemy.pos.distance(player);
    let toward_player = if player.x > enemy.pos.x { 1.0 } else { -1.0 };

    match ai.state {
        AiState::Patrol => {
            let noticed = distance < ai.aggro_range && (enemy.pos.y - player.y).abs() < tuning.aggro_max_dy;
            if noticed {
                // Velocity is left alone on the tick the enemy spots the player.
                next.ai.state = AiState::Chase;
                next.ai.alert_until = now + tuning.chase_ms;
            } else {
                if (enemy.pos.x - ai.origin_x).abs() > ai.patrol_range {
                    next.ai.direction = if enemy.pos.x > ai.origin_x { -1.0 } else { 1.0 };
                } else if sensors.against_wall() {
                    next.ai.direction = -ai.direction;
                }
                next.vel.x = ai.patrol_speed * next.ai.direction;
                next.facing = Facing::from_sign(next.ai.direction);
            }
        }
        AiState::Chase => {
            next.vel.x = ai.chase_speed * toward_player;
            next.facing = Facing::from_sign(toward_player);
            next.ai.last_seen = now;

            if distance > ai.aggro_range * tuning.leash_factor || now > ai.alert_until {
                next.ai.state = AiState::Return;
            }

            let player_above = player.y < enemy.pos.y - tuning.leap_min_height;
            let close = (player.x - enemy.pos.x).abs() < tuning.leap_max_dx;
            if player_above && close && sensors.grounded() {
                next.vel.y = -tuning.leap_speed;
            }
        }
        AiState::Return => {
            let home = if enemy.pos.x > ai.origin_x { -1.0 } else { 1.0 };
            next.vel.x = ai.patrol_speed * home;
            next.facing = Facing::from_sign(home);

            if (enemy.pos.x - ai.origin_x).abs() < tuning.home_radius {
                next.ai.state = AiState::Patrol;
            }
            // Checked after arrival so a close player wins.
            if distance < ai.aggro_range * tuning.reengage_factor {
                next.ai.state = AiState::Chase;
                next.ai.alert_until = now + tuning.rechase_ms;
            }
        }
    }

    if sensors.against_wall() {
        next.ai.direction = -next.ai.direction;
    }
    next
}
