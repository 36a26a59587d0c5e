use std::path::Path;

use coin_platformer::config::*;

#[test]
fn defaults_match_shipped_level() {
    let c = GameConfig::default();
    assert_eq!(c.starting_lives, 3);
    assert_eq!(c.gravity, 800.0);
    assert_eq!(c.player.max_jumps, 2);
    assert_eq!(c.player.fire_cooldown_ms, 250);
    assert_eq!(c.enemy.mode, AiMode::Tactical);
    assert_eq!(c.enemy.aggro_range, 200.0);
    assert_eq!(c.scores.stomp, 50);
    assert_eq!(c.delays.restart_ms, 1500);
    assert_eq!(c.level.coins.count, 21);
    assert_eq!(c.level.platforms.len(), 9);
    assert!(c.validate().is_ok());
}

#[test]
fn partial_file_keeps_remaining_defaults() {
    let c = GameConfig::parse(r#"{ "starting_lives": 5, "enemy": { "chase_speed": 220 } }"#)
        .expect("valid config");
    assert_eq!(c.starting_lives, 5);
    assert_eq!(c.enemy.chase_speed, 220.0);
    assert_eq!(c.enemy.aggro_range, 200.0);
    assert_eq!(c.player, PlayerTuning::default());
    assert_eq!(c.level.coins.count, 21);
}

#[test]
fn empty_object_is_the_default() {
    let c = GameConfig::parse("{}").expect("valid config");
    assert_eq!(c, GameConfig::default());
}

#[test]
fn bounce_mode_parses() {
    let c = GameConfig::parse(r#"{ "enemy": { "mode": "bounce" } }"#).expect("valid config");
    assert_eq!(c.enemy.mode, AiMode::Bounce);
}

#[test]
fn type_error_reports_field_path() {
    let err = GameConfig::parse(r#"{ "enemy": { "aggro_range": "far" } }"#).unwrap_err();
    match err {
        ConfigError::Parse { field, path, .. } => {
            assert_eq!(field, "enemy.aggro_range");
            assert_eq!(path, Path::new("<inline>"));
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn unknown_mode_is_rejected() {
    let err = GameConfig::parse(r#"{ "enemy": { "mode": "berserk" } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { ref field, .. } if field == "enemy.mode"));
}

#[test]
fn non_positive_aggro_range_is_invalid() {
    let err = GameConfig::parse(r#"{ "enemy": { "aggro_range": 0 } }"#).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Invalid {
            field: "enemy.aggro_range",
            ..
        }
    ));
}

#[test]
fn inverted_patrol_speed_range_is_invalid() {
    let err = GameConfig::parse(r#"{ "enemy": { "patrol_speed_min": 150 } }"#).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Invalid {
            field: "enemy.patrol_speed_max",
            ..
        }
    ));
}

#[test]
fn hysteresis_band_must_not_invert() {
    let mut c = GameConfig::default();
    c.enemy.reengage_factor = 2.5;
    assert!(matches!(
        c.validate(),
        Err(ConfigError::Invalid {
            field: "enemy.reengage_factor",
            ..
        })
    ));
}

#[test]
fn level_without_coins_is_invalid() {
    let mut c = GameConfig::default();
    c.level.coins.count = 0;
    assert!(matches!(
        c.validate(),
        Err(ConfigError::Invalid {
            field: "level.coins.count",
            ..
        })
    ));
}

#[test]
fn zero_lives_or_pool_is_invalid() {
    let mut c = GameConfig::default();
    c.starting_lives = 0;
    assert!(c.validate().is_err());

    let mut c = GameConfig::default();
    c.player.projectile_pool = 0;
    assert!(c.validate().is_err());
}

#[test]
fn missing_file_is_a_read_error() {
    let err = GameConfig::load(Path::new("/nonexistent/coin_platformer.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(err.to_string().contains("/nonexistent/coin_platformer.json"));
}

#[test]
fn load_reads_file_from_disk() {
    let path = std::env::temp_dir().join(format!("coin_platformer_{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "delays": { "restart_ms": 900 } }"#).expect("write temp config");
    let c = GameConfig::load(&path);
    let _ = std::fs::remove_file(&path);
    let c = c.expect("valid config");
    assert_eq!(c.delays.restart_ms, 900);
    assert_eq!(c.delays.terminal_reset_ms, 3000);
}

#[test]
fn serialized_config_reads_back() {
    let mut c = GameConfig::default();
    c.enemy.mode = AiMode::Bounce;
    c.scores.coin = 15;
    let text = serde_json::to_string(&c).expect("serialize");
    assert_eq!(GameConfig::parse(&text).expect("valid config"), c);
}

#[test]
fn negative_chase_speed_is_invalid() {
    let err = GameConfig::parse(r#"{ "enemy": { "chase_speed": -180 } }"#).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Invalid {
            field: "enemy.chase_speed",
            ..
        }
    ));
}

#[test]
fn movement_and_leap_tuning_must_be_positive() {
    let mut c = GameConfig::default();
    c.player.projectile_speed = 0.0;
    assert!(matches!(
        c.validate(),
        Err(ConfigError::Invalid {
            field: "player.projectile_speed",
            ..
        })
    ));

    let mut c = GameConfig::default();
    c.enemy.leap_speed = -300.0;
    assert!(matches!(
        c.validate(),
        Err(ConfigError::Invalid {
            field: "enemy.leap_speed",
            ..
        })
    ));

    let mut c = GameConfig::default();
    c.player.jump_speed = f32::NAN;
    assert!(c.validate().is_err());
}
