//! Config file and state store, exercised together the way the binary uses them

use std::fs;

use focusblocks::config::Config;
use focusblocks::core::SimpleRng;
use focusblocks::engine::{Command, Outcome, Session, TaskDraft};
use focusblocks::store::{Store, StoreError};

#[test]
fn missing_config_is_created_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("focusblocks").join("config.toml");

    let config = Config::load_or_create(&path).unwrap();
    assert_eq!(config, Config::default());
    assert!(path.exists());

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("tick_ms"));
    assert!(written.contains("[weights]"));
}

#[test]
fn edited_config_is_read_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let state = dir.path().join("data").join("state.json");

    let mut config = Config::default();
    config.tick_ms = 250;
    config.seed = Some(42);
    config.state_path = Some(state.clone());
    config.weights.urgency = 2.5;
    config.save_to(&path).unwrap();

    let loaded = Config::load_or_create(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.state_path(), state);
    assert_eq!(loaded.log_path(), dir.path().join("data").join("focusblocks.log"));
}

#[test]
fn broken_config_reports_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "tick_ms = \"soon\"").unwrap();
    assert!(Config::load_from(&path).is_err());
}

#[test]
fn session_survives_a_restart_of_the_program() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        garbage_rows: 0,
        state_path: Some(dir.path().join("state.json")),
        ..Config::default()
    };
    let store = Store::new(config.state_path());

    let mut session = Session::new(
        config.session_config(),
        store.load(config.weights).unwrap(),
        SimpleRng::new(8),
    );
    session.apply(Command::AddTask(TaskDraft::new("book dentist"))).unwrap();
    session.apply(Command::AddTask(TaskDraft::new("renew passport"))).unwrap();
    let granted = match session.apply(Command::ToggleTask(1)).unwrap() {
        Outcome::Rewarded { granted, .. } => granted.len() as u32,
        other => panic!("{other:?}"),
    };
    store.save(session.profile()).unwrap();

    let profile = store.load(config.weights).unwrap();
    assert_eq!(&profile, session.profile());
    assert_eq!(profile.inventory.total(), granted);

    let mut resumed = Session::new(config.session_config(), profile, SimpleRng::new(9));
    assert_eq!(resumed.recommended().map(|t| t.title.as_str()), Some("renew passport"));
    match resumed.apply(Command::AddTask(TaskDraft::new("call mum"))).unwrap() {
        Outcome::TaskAdded(id) => assert_eq!(id, 3),
        other => panic!("{other:?}"),
    }
}

#[test]
fn state_from_a_newer_build_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, r#"{"version": 999, "tasks": []}"#).unwrap();

    let err = Store::new(&path).load(Default::default()).unwrap_err();
    assert!(matches!(err, StoreError::UnsupportedVersion { found: 999 }));
}
