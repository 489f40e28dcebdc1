//! Integration tests for composer-host: configuration, scenario files and
//! replay against a real engine.

use std::sync::Arc;

use composer_core::{Canvas, LayoutEngine, LayoutMode, SlotGeometry};
use composer_host::application::session::{load_scenario, parse_scenario, SessionRunner};
use composer_host::infrastructure::storage::config::{parse_config, ConfigError};

const MEETING: &str = r#"
[[step]]
op = "register"
id = 1

[[step]]
op = "register"
id = 2

[[step]]
op = "register"
id = 3

[[step]]
op = "mode"
mode = "grid6"

[[step]]
op = "register"
id = 4

[[step]]
op = "floor"
id = 3

[[step]]
op = "mode"
mode = "single"

[[step]]
op = "insert"
id = 2

[[step]]
op = "mode"
mode = "unbounded"

[[step]]
op = "insert"
id = 1
"#;

fn run_meeting() -> SessionRunner {
    let engine = Arc::new(LayoutEngine::new(1280, 720));
    let mut runner = SessionRunner::new(engine);
    let summary = runner.run(&parse_scenario(MEETING).expect("valid scenario"));
    assert_eq!(summary.rejected, 0);
    assert_eq!(summary.applied, 10);
    runner
}

#[test]
fn test_meeting_scenario_final_layout() {
    let runner = run_meeting();
    let snapshot = runner.engine().snapshot();

    assert_eq!(snapshot.mode, LayoutMode::Unbounded);
    assert_eq!(snapshot.canvas, Canvas::new(1280, 720));
    assert_eq!(snapshot.slots.len(), 2);
    assert_eq!(snapshot.occupant_at(0), Some(3));
    assert_eq!(snapshot.occupant_at(1), Some(1));
    assert_eq!(snapshot.users, vec![1, 2, 3, 4]);
    assert_eq!(snapshot.unplaced(), vec![2, 4]);
}

#[test]
fn test_meeting_scenario_sinks_track_final_geometry() {
    let runner = run_meeting();

    assert_eq!(
        runner.sink(3).unwrap().last_geometry(),
        Some(SlotGeometry::new(640, 720, 0, 0))
    );
    assert_eq!(
        runner.sink(1).unwrap().last_geometry(),
        Some(SlotGeometry::new(640, 720, 0, 640))
    );
    assert!(!runner.sink(2).unwrap().is_visible());
    assert!(!runner.sink(4).unwrap().is_visible());
}

#[test]
fn test_snapshot_serializes_to_json() {
    let runner = run_meeting();
    let json = serde_json::to_value(runner.engine().snapshot()).expect("serializable");

    assert_eq!(json["mode"], "unbounded");
    assert_eq!(json["canvas"]["width"], 1280);
    assert_eq!(json["slots"][0]["occupant"], 3);
    assert_eq!(json["slots"][1]["geometry"]["left"], 640);
    assert_eq!(json["users"].as_array().map(Vec::len), Some(4));
}

#[test]
fn test_config_initial_mode_builds_grid6_engine() {
    let config = parse_config(
        r#"
[engine]
canvas_width = 1920
canvas_height = 1080
initial_mode = "grid6"
"#,
    )
    .expect("valid config");

    let engine = LayoutEngine::from_config(&config.engine.to_engine_config());

    assert_eq!(engine.get_mode(), LayoutMode::Grid6);
    assert_eq!(engine.slot_count(), 6);
    // Grid geometry is cut from the configured canvas, then the canvas resets.
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.slots[0].geometry, SlotGeometry::new(1280, 720, 0, 0));
    assert_eq!(snapshot.canvas, Canvas::new(1280, 720));
}

#[test]
fn test_grid6_session_places_late_joiner_in_first_free_slot() {
    let config = parse_config("[engine]\ninitial_mode = \"grid6\"\n").unwrap();
    let engine = Arc::new(LayoutEngine::from_config(&config.engine.to_engine_config()));
    let mut runner = SessionRunner::new(engine);

    let scenario = parse_scenario(
        r#"
[[step]]
op = "register"
id = 10

[[step]]
op = "register"
id = 11

[[step]]
op = "unregister"
id = 10

[[step]]
op = "register"
id = 12
"#,
    )
    .unwrap();
    runner.run(&scenario);

    assert_eq!(runner.engine().placement_of(12), Some(0));
    assert_eq!(
        runner.sink(12).unwrap().last_geometry(),
        Some(SlotGeometry::new(852, 480, 0, 0))
    );
    assert_eq!(
        runner.sink(11).unwrap().last_geometry(),
        Some(SlotGeometry::new(426, 240, 480, 0))
    );
}

#[test]
fn test_load_scenario_from_temp_file() {
    let dir = std::env::temp_dir().join(format!("composer_scenario_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("session.toml");
    std::fs::write(&path, MEETING).unwrap();

    let scenario = load_scenario(&path).expect("readable scenario");

    assert_eq!(scenario.steps.len(), 10);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_load_scenario_missing_file_is_io_error() {
    let path = std::path::Path::new("/nonexistent/composer/session.toml");
    assert!(matches!(load_scenario(path), Err(ConfigError::Io { .. })));
}
