//! Live-reload integration tests against real filesystem events.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use statewatch::orchestrator::{self, RunOptions};
use statewatch::Shutdown;

mod common;

fn options(config_path: std::path::PathBuf) -> RunOptions {
    RunOptions {
        config_path: Some(config_path),
        env: HashMap::new(),
        print_config: false,
    }
}

#[tokio::test]
async fn invalid_edit_keeps_the_previous_snapshot_live() {
    let dir = tempfile::tempdir().unwrap();
    let doc = common::write_doc(dir.path(), "p.json", r#"{"a": 1}"#);
    let config = common::test_config(27874, 100, vec![common::spec("persona", &doc, true)]);
    let config_path = common::write_config(dir.path(), &config);

    let shutdown = Arc::new(Shutdown::new());
    let handle = tokio::spawn(orchestrator::try_run_with(
        options(config_path),
        shutdown.clone(),
    ));

    let base = "http://127.0.0.1:27874";
    common::wait_for_generation(base, 1, Duration::from_secs(5)).await;
    // Let the watch subscription settle before editing.
    tokio::time::sleep(Duration::from_millis(300)).await;
    let (_, state) = common::get_json(&format!("{base}/state")).await;
    let first_checksum = state["documents"]["persona"]["checksum"]
        .as_str()
        .unwrap()
        .to_string();

    // Invalid edit: the reload must be rejected, generation and checksum
    // unchanged, readiness untouched.
    std::fs::write(&doc, "{ not valid json").unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;

    let (status, ready) = common::get_json(&format!("{base}/ready")).await;
    assert_eq!(status, 200);
    assert_eq!(ready["ready"], true);
    assert_eq!(ready["generation"], 1);

    let (_, state) = common::get_json(&format!("{base}/state")).await;
    assert_eq!(state["generation"], 1);
    assert_eq!(state["documents"]["persona"]["status"], "valid");
    assert_eq!(
        state["documents"]["persona"]["checksum"].as_str().unwrap(),
        first_checksum
    );

    // A valid edit recovers: new generation, new checksum.
    std::fs::write(&doc, r#"{"a": 2}"#).unwrap();
    let ready = common::wait_for_generation(base, 2, Duration::from_secs(5)).await;
    assert_eq!(ready["ready"], true);

    let (_, state) = common::get_json(&format!("{base}/state")).await;
    assert_eq!(state["generation"], 2);
    assert_eq!(state["documents"]["persona"]["status"], "valid");
    assert_ne!(
        state["documents"]["persona"]["checksum"].as_str().unwrap(),
        first_checksum
    );

    shutdown.trigger();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn rapid_successive_edits_produce_exactly_one_reload() {
    let dir = tempfile::tempdir().unwrap();
    let doc = common::write_doc(dir.path(), "p.json", r#"{"edit": 0}"#);
    let config = common::test_config(27875, 500, vec![common::spec("persona", &doc, true)]);
    let config_path = common::write_config(dir.path(), &config);

    let shutdown = Arc::new(Shutdown::new());
    let handle = tokio::spawn(orchestrator::try_run_with(
        options(config_path),
        shutdown.clone(),
    ));

    let base = "http://127.0.0.1:27875";
    common::wait_for_generation(base, 1, Duration::from_secs(5)).await;
    // Let the watch subscription settle before editing.
    tokio::time::sleep(Duration::from_millis(300)).await;

    for i in 1..=5 {
        std::fs::write(&doc, format!(r#"{{"edit": {i}}}"#)).unwrap();
    }
    tokio::time::sleep(Duration::from_secs(2)).await;

    // All five edits fell inside one debounce window: one reload, not five.
    let (_, ready) = common::get_json(&format!("{base}/ready")).await;
    assert_eq!(ready["generation"], 2);

    shutdown.trigger();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn watch_outage_surfaces_staleness_and_heals_on_recovery() {
    let dir = tempfile::tempdir().unwrap();
    let persona = common::write_doc(dir.path(), "persona.json", r#"{"a": 1}"#);
    // The optional document lives under a directory that does not exist
    // yet, so the watch subscription cannot be established.
    let notes_path = dir.path().join("later").join("notes.json");
    let mut config = common::test_config(
        27877,
        100,
        vec![
            common::spec("persona", &persona, true),
            common::spec("notes", &notes_path, false),
        ],
    );
    config.watchdog.resubscribe_attempts = 2;
    config.watchdog.resubscribe_backoff_ms = 50;
    let config_path = common::write_config(dir.path(), &config);

    let shutdown = Arc::new(Shutdown::new());
    let handle = tokio::spawn(orchestrator::try_run_with(
        options(config_path),
        shutdown.clone(),
    ));

    let base = "http://127.0.0.1:27877";
    common::wait_for_generation(base, 1, Duration::from_secs(5)).await;

    // The retry budget drains: the snapshot is flagged stale while
    // readiness holds for the last valid state.
    let ready = common::wait_for_stale(base, true, Duration::from_secs(5)).await;
    assert_eq!(ready["ready"], true);
    assert_eq!(ready["generation"], 1);

    // Provisioning the directory lets the subscription heal; the flag
    // clears and readiness is untouched throughout.
    std::fs::create_dir_all(notes_path.parent().unwrap()).unwrap();
    let ready = common::wait_for_stale(base, false, Duration::from_secs(10)).await;
    assert_eq!(ready["ready"], true);

    shutdown.trigger();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn optional_document_appearing_later_is_picked_up() {
    let dir = tempfile::tempdir().unwrap();
    let persona = common::write_doc(dir.path(), "persona.json", r#"{"a": 1}"#);
    let notes_path = dir.path().join("notes.json");
    let config = common::test_config(
        27876,
        100,
        vec![
            common::spec("persona", &persona, true),
            common::spec("notes", &notes_path, false),
        ],
    );
    let config_path = common::write_config(dir.path(), &config);

    let shutdown = Arc::new(Shutdown::new());
    let handle = tokio::spawn(orchestrator::try_run_with(
        options(config_path),
        shutdown.clone(),
    ));

    let base = "http://127.0.0.1:27876";
    let ready = common::wait_for_generation(base, 1, Duration::from_secs(5)).await;
    assert_eq!(ready["ready"], true);
    // Let the watch subscription settle before provisioning the document.
    tokio::time::sleep(Duration::from_millis(300)).await;

    let (_, state) = common::get_json(&format!("{base}/state")).await;
    assert_eq!(state["documents"]["notes"]["status"], "missing");
    assert_eq!(state["documents"]["persona"]["status"], "valid");

    // The optional document is provisioned after startup.
    common::write_doc(dir.path(), "notes.json", r#"{"entries": []}"#);
    common::wait_for_generation(base, 2, Duration::from_secs(5)).await;

    let (_, state) = common::get_json(&format!("{base}/state")).await;
    assert_eq!(state["documents"]["notes"]["status"], "valid");

    shutdown.trigger();
    handle.await.unwrap().unwrap();
}
