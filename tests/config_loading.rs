use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use minesweeper_kb::config::GameConfig;
use minesweeper_kb::core::cell::Cell;
use minesweeper_kb::game::agent::{play_game, Outcome, SafeFirst};
use minesweeper_kb::knowledge::{InferenceError, InferenceLimits};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn unique_temp_file(name: &str) -> PathBuf {
    let base = std::env::temp_dir().join("minesweeper_kb_tests");
    let _ = fs::create_dir_all(&base);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    base.join(format!("{name}-{}-{nanos}.json", std::process::id()))
}

const THREE_BY_THREE: &str = r#"{
    "height": 3,
    "width": 3,
    "mines": [{"row": 0, "col": 0}, {"row": 2, "col": 2}],
    "seed": 42
}"#;

#[test]
fn parses_minimal_config_with_defaults() {
    let cfg = GameConfig::from_json(THREE_BY_THREE).unwrap();
    assert_eq!(cfg.seed, Some(42));
    assert_eq!(cfg.limits, None);
    assert_eq!(cfg.limits(), InferenceLimits::for_board(&cfg.board()));

    let field = cfg.mine_field().unwrap();
    assert_eq!(field.mine_count(), 2);
    assert!(field.is_mine(Cell::new(2, 2)));
}

#[test]
fn explicit_limits_override_board_defaults() {
    let cfg = GameConfig::from_json(
        r#"{"height": 2, "width": 2, "mines": [],
            "limits": {"max_passes": 7, "max_statements": 9}}"#,
    )
    .unwrap();
    assert_eq!(
        cfg.limits(),
        InferenceLimits {
            max_passes: 7,
            max_statements: 9,
        }
    );
}

#[test]
fn invalid_configs_are_rejected() {
    let dup = GameConfig::from_json(
        r#"{"height": 2, "width": 2, "mines": [{"row": 0, "col": 0}, {"row": 0, "col": 0}]}"#,
    )
    .unwrap();
    assert!(matches!(
        dup.mine_field(),
        Err(InferenceError::InvalidConfig { .. })
    ));

    let empty = GameConfig::from_json(r#"{"height": 0, "width": 4, "mines": []}"#).unwrap();
    assert!(empty.mine_field().is_err());

    let outside =
        GameConfig::from_json(r#"{"height": 2, "width": 2, "mines": [{"row": 2, "col": 0}]}"#)
            .unwrap();
    assert!(matches!(
        outside.mine_field(),
        Err(InferenceError::OutOfBounds { .. })
    ));

    assert!(GameConfig::from_json("{\"height\": 2}").is_err());
}

#[test]
fn loads_from_disk_and_plays() {
    let path = unique_temp_file("three_by_three");
    fs::write(&path, THREE_BY_THREE).unwrap();

    let cfg = GameConfig::load(&path).unwrap();
    let field = cfg.mine_field().unwrap();
    let mut rng = StdRng::seed_from_u64(cfg.seed.unwrap());
    let report = play_game(&field, &SafeFirst, &mut rng, cfg.limits()).unwrap();
    assert!(matches!(report.outcome, Outcome::Won | Outcome::Lost { .. }));

    let _ = fs::remove_file(&path);
}

#[test]
fn missing_file_is_a_config_error() {
    let path = unique_temp_file("missing");
    assert!(matches!(
        GameConfig::load(&path),
        Err(InferenceError::InvalidConfig { .. })
    ));
}
