use coin_platformer::ai::*;
use coin_platformer::compute::init_state;
use coin_platformer::config::{AiMode, EnemyTuning, GameConfig};
use coin_platformer::contacts::BodyContact;
use coin_platformer::entities::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn tuning() -> EnemyTuning {
    EnemyTuning::default()
}

/// Enemy parked on its patrol anchor at (650, 350), heading right.
fn enemy_at(x: f32, y: f32) -> Enemy {
    Enemy {
        pos: Vec2::new(x, y),
        vel: Vec2::ZERO,
        size: Vec2::new(32.0, 32.0),
        facing: Facing::Right,
        active: true,
        ai: EnemyAi {
            state: AiState::Patrol,
            patrol_speed: 100.0,
            chase_speed: 180.0,
            aggro_range: 200.0,
            patrol_range: 150.0,
            origin_x: 650.0,
            direction: 1.0,
            alert_until: 0,
            last_seen: 0,
        },
    }
}

fn in_state(mut enemy: Enemy, state: AiState, alert_until: u64) -> Enemy {
    enemy.ai.state = state;
    enemy.ai.alert_until = alert_until;
    enemy
}

fn no_contact() -> BodyContact {
    BodyContact::default()
}

fn grounded() -> BodyContact {
    BodyContact {
        touching_down: true,
        ..BodyContact::default()
    }
}

fn wall_right() -> BodyContact {
    BodyContact {
        blocked_right: true,
        ..BodyContact::default()
    }
}

// ── spawn_enemy ───────────────────────────────────────────────────────────────

#[test]
fn spawn_creates_ai_record_up_front() {
    let mut rng = seeded_rng();
    for _ in 0..20 {
        let e = spawn_enemy(Vec2::new(650.0, 350.0), Vec2::new(32.0, 32.0), &tuning(), &mut rng);
        assert!(e.active);
        assert_eq!(e.ai.state, AiState::Patrol);
        assert_eq!(e.ai.origin_x, 650.0);
        assert!((80.0..=120.0).contains(&e.ai.patrol_speed));
        assert!(e.ai.direction == 1.0 || e.ai.direction == -1.0);
        assert_eq!(e.vel.x, e.ai.patrol_speed * e.ai.direction);
        assert_eq!(e.ai.aggro_range, 200.0);
    }
}

// ── patrol ────────────────────────────────────────────────────────────────────

#[test]
fn patrol_spots_player_and_starts_chase() {
    let e = enemy_at(650.0, 350.0);
    let next = think(&e, Vec2::new(750.0, 350.0), no_contact(), 10_000, &tuning());
    assert_eq!(next.ai.state, AiState::Chase);
    assert_eq!(next.ai.alert_until, 13_000);
    assert_eq!(next.ai.state.tint(), Tint::Aggressive);
    // Velocity is untouched on the tick of the transition.
    assert_eq!(next.vel, Vec2::ZERO);
}

#[test]
fn patrol_ignores_player_too_far_below() {
    // Distance ≈158 is inside aggro range, but |Δy| = 120 is not < 100.
    let e = enemy_at(650.0, 350.0);
    let next = think(&e, Vec2::new(750.0, 470.0), no_contact(), 0, &tuning());
    assert_eq!(next.ai.state, AiState::Patrol);
    assert_eq!(next.vel.x, 100.0);
}

#[test]
fn patrol_ignores_player_outside_aggro_range() {
    let e = enemy_at(650.0, 350.0);
    let next = think(&e, Vec2::new(850.0, 350.0), no_contact(), 0, &tuning());
    assert_eq!(next.ai.state, AiState::Patrol);
}

#[test]
fn patrol_turns_back_past_patrol_range() {
    let e = enemy_at(810.0, 350.0); // 160 from origin, range is 150
    let next = think(&e, Vec2::new(2000.0, 350.0), no_contact(), 0, &tuning());
    assert_eq!(next.ai.direction, -1.0);
    assert_eq!(next.vel.x, -100.0);
    assert_eq!(next.facing, Facing::Left);
}

#[test]
fn patrol_heads_back_from_left_of_origin() {
    let mut e = enemy_at(480.0, 350.0);
    e.ai.direction = -1.0;
    let next = think(&e, Vec2::new(2000.0, 350.0), no_contact(), 0, &tuning());
    assert_eq!(next.ai.direction, 1.0);
    assert_eq!(next.vel.x, 100.0);
}

#[test]
fn patrol_wall_reverses_velocity() {
    let e = enemy_at(650.0, 350.0);
    let next = think(&e, Vec2::new(2000.0, 350.0), wall_right(), 0, &tuning());
    assert_eq!(next.vel.x, -100.0);
    // The patrol branch and the trailing wall check each flip the heading.
    assert_eq!(next.ai.direction, 1.0);
}

// ── chase ─────────────────────────────────────────────────────────────────────

#[test]
fn chase_runs_toward_player() {
    let e = in_state(enemy_at(650.0, 350.0), AiState::Chase, 20_000);
    let next = think(&e, Vec2::new(600.0, 350.0), no_contact(), 15_000, &tuning());
    assert_eq!(next.ai.state, AiState::Chase);
    assert_eq!(next.vel.x, -180.0);
    assert_eq!(next.facing, Facing::Left);
    assert_eq!(next.ai.last_seen, 15_000);
}

#[test]
fn chase_gives_up_beyond_twice_aggro_range() {
    let e = in_state(enemy_at(650.0, 350.0), AiState::Chase, 20_000);
    let next = think(&e, Vec2::new(1060.0, 350.0), no_contact(), 15_000, &tuning());
    assert_eq!(next.ai.state, AiState::Return);
    assert_eq!(next.ai.state.tint(), Tint::Returning);
}

#[test]
fn chase_keeps_going_inside_twice_aggro_range() {
    let e = in_state(enemy_at(650.0, 350.0), AiState::Chase, 20_000);
    let next = think(&e, Vec2::new(1040.0, 350.0), no_contact(), 15_000, &tuning());
    assert_eq!(next.ai.state, AiState::Chase);
}

#[test]
fn chase_deadline_is_strict() {
    let e = in_state(enemy_at(650.0, 350.0), AiState::Chase, 13_000);
    let player = Vec2::new(700.0, 350.0);
    let at_deadline = think(&e, player, no_contact(), 13_000, &tuning());
    assert_eq!(at_deadline.ai.state, AiState::Chase);
    let past_deadline = think(&e, player, no_contact(), 13_001, &tuning());
    assert_eq!(past_deadline.ai.state, AiState::Return);
}

#[test]
fn chase_leaps_at_player_above() {
    let e = in_state(enemy_at(650.0, 350.0), AiState::Chase, 20_000);
    let player = Vec2::new(680.0, 280.0); // 70 above, 30 across
    let next = think(&e, player, grounded(), 15_000, &tuning());
    assert_eq!(next.vel.y, -300.0);
}

#[test]
fn chase_cannot_leap_while_airborne() {
    let e = in_state(enemy_at(650.0, 350.0), AiState::Chase, 20_000);
    let player = Vec2::new(680.0, 280.0);
    let next = think(&e, player, no_contact(), 15_000, &tuning());
    assert_eq!(next.vel.y, 0.0);
}

#[test]
fn chase_does_not_leap_at_distant_player() {
    let e = in_state(enemy_at(650.0, 350.0), AiState::Chase, 20_000);
    let player = Vec2::new(780.0, 280.0); // 130 across
    let next = think(&e, player, grounded(), 15_000, &tuning());
    assert_eq!(next.vel.y, 0.0);
}

// ── return ────────────────────────────────────────────────────────────────────

#[test]
fn return_walks_home_at_patrol_speed() {
    let e = in_state(enemy_at(800.0, 350.0), AiState::Return, 0);
    let next = think(&e, Vec2::new(2000.0, 350.0), no_contact(), 20_000, &tuning());
    assert_eq!(next.ai.state, AiState::Return);
    assert_eq!(next.vel.x, -100.0);
    assert_eq!(next.facing, Facing::Left);
}

#[test]
fn return_settles_into_patrol_near_anchor() {
    let e = in_state(enemy_at(690.0, 350.0), AiState::Return, 0);
    let next = think(&e, Vec2::new(2000.0, 350.0), no_contact(), 20_000, &tuning());
    assert_eq!(next.ai.state, AiState::Patrol);
    assert_eq!(next.ai.state.tint(), Tint::Normal);
}

#[test]
fn return_reengages_inside_reduced_range() {
    let e = in_state(enemy_at(800.0, 350.0), AiState::Return, 0);
    let next = think(&e, Vec2::new(930.0, 350.0), no_contact(), 20_000, &tuning());
    assert_eq!(next.ai.state, AiState::Chase);
    assert_eq!(next.ai.alert_until, 22_000);
}

#[test]
fn return_keeps_returning_inside_hysteresis_band() {
    // 170 away: inside aggro range (200) but outside 0.7 × 200 = 140.
    let e = in_state(enemy_at(800.0, 350.0), AiState::Return, 0);
    let next = think(&e, Vec2::new(970.0, 350.0), no_contact(), 20_000, &tuning());
    assert_eq!(next.ai.state, AiState::Return);
}

#[test]
fn return_reengage_wins_over_arrival() {
    let e = in_state(enemy_at(660.0, 350.0), AiState::Return, 0);
    let next = think(&e, Vec2::new(700.0, 350.0), no_contact(), 1_000, &tuning());
    assert_eq!(next.ai.state, AiState::Chase);
    assert_eq!(next.ai.alert_until, 3_000);
}

// ── common rules ──────────────────────────────────────────────────────────────

#[test]
fn wall_contact_flips_direction_in_every_state() {
    for state in [AiState::Chase, AiState::Return] {
        let e = in_state(enemy_at(800.0, 350.0), state, 50_000);
        let next = think(&e, Vec2::new(900.0, 350.0), wall_right(), 1_000, &tuning());
        assert_eq!(next.ai.direction, -1.0, "state={state:?}");
    }
}

#[test]
fn inactive_enemy_is_left_alone() {
    let mut e = enemy_at(650.0, 350.0);
    e.active = false;
    let next = think(&e, Vec2::new(660.0, 350.0), wall_right(), 1_000, &tuning());
    assert_eq!(next.ai, e.ai);
    assert_eq!(next.vel, e.vel);
}

#[test]
fn bounce_mode_keeps_spawn_velocity() {
    let mut e = enemy_at(650.0, 350.0);
    e.vel = Vec2::new(-100.0, 0.0);
    let bounce = EnemyTuning {
        mode: AiMode::Bounce,
        ..tuning()
    };
    let next = think(&e, Vec2::new(660.0, 350.0), wall_right(), 1_000, &bounce);
    assert_eq!(next.vel, Vec2::new(-100.0, 0.0));
    assert_eq!(next.ai.state, AiState::Patrol);
}

#[test]
fn every_state_yields_a_defined_state_and_finite_velocity() {
    let players = [
        Vec2::new(650.0, 350.0),
        Vec2::new(700.0, 200.0),
        Vec2::new(900.0, 350.0),
        Vec2::new(100.0, 500.0),
        Vec2::new(3000.0, 0.0),
    ];
    for state in [AiState::Patrol, AiState::Chase, AiState::Return] {
        for player in players {
            for contact in [no_contact(), grounded(), wall_right()] {
                let e = in_state(enemy_at(720.0, 350.0), state, 5_000);
                let next = think(&e, player, contact, 4_000, &tuning());
                assert!(matches!(
                    next.ai.state,
                    AiState::Patrol | AiState::Chase | AiState::Return
                ));
                assert!(next.vel.x.is_finite() && next.vel.y.is_finite());
                assert!(next.ai.direction == 1.0 || next.ai.direction == -1.0);
            }
        }
    }
}

// ── think_all ─────────────────────────────────────────────────────────────────

#[test]
fn think_all_reads_each_enemys_own_contacts() {
    let mut s = init_state(&GameConfig::default(), None, &mut seeded_rng());
    s.player.pos = Vec2::new(100.0, 500.0); // far from both enemies
    for e in s.enemies.iter_mut() {
        e.pos.x = e.ai.origin_x;
        e.ai.direction = 1.0;
    }
    s.last_contacts.enemies[1] = wall_right();

    let enemies = think_all(&s, 1_000);
    assert!(enemies[0].vel.x > 0.0);
    assert!(enemies[1].vel.x < 0.0);
}

#[test]
fn think_all_skips_defeated_enemies() {
    let mut s = init_state(&GameConfig::default(), None, &mut seeded_rng());
    s.enemies[0].active = false;
    s.player.pos = s.enemies[0].pos;
    let enemies = think_all(&s, 1_000);
    assert_eq!(enemies[0].ai, s.enemies[0].ai);
    assert!(!enemies[0].active);
}
