//! Shared utilities for integration testing.

use std::path::{Path, PathBuf};
use std::time::Duration;

use statewatch::config::{DocumentSpec, OrchestratorConfig};

/// Write a state document into the fixture directory.
pub fn write_doc(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Build a document spec pointing into the fixture directory.
pub fn spec(name: &str, path: &Path, required: bool) -> DocumentSpec {
    DocumentSpec {
        name: name.to_string(),
        path: path.to_path_buf(),
        required,
    }
}

/// Test configuration with a short debounce and drain grace.
pub fn test_config(port: u16, debounce_ms: u64, documents: Vec<DocumentSpec>) -> OrchestratorConfig {
    let mut config = OrchestratorConfig::default();
    config.server.bind_address = format!("127.0.0.1:{port}");
    config.watchdog.debounce_ms = debounce_ms;
    config.shutdown.grace_secs = 2;
    config.documents = documents;
    config
}

/// Serialize a configuration into a TOML override file on disk.
#[allow(dead_code)]
pub fn write_config(dir: &Path, config: &OrchestratorConfig) -> PathBuf {
    let path = dir.join("statewatch.toml");
    std::fs::write(&path, toml::to_string(config).unwrap()).unwrap();
    path
}

/// GET a JSON body, returning (status, body).
#[allow(dead_code)]
pub async fn get_json(url: &str) -> (u16, serde_json::Value) {
    let response = reqwest::get(url).await.expect("API unreachable");
    let status = response.status().as_u16();
    let body = response.json().await.expect("non-JSON body");
    (status, body)
}

/// Poll /ready until the stale flag matches `want`, returning the body.
#[allow(dead_code)]
pub async fn wait_for_stale(base: &str, want: bool, timeout: Duration) -> serde_json::Value {
    let client = reqwest::Client::new();
    let deadline = std::time::Instant::now() + timeout;
    loop {
        if let Ok(response) = client.get(format!("{base}/ready")).send().await {
            if let Ok(body) = response.json::<serde_json::Value>().await {
                if body["stale"].as_bool() == Some(want) {
                    return body;
                }
            }
        }
        assert!(
            std::time::Instant::now() < deadline,
            "timed out waiting for stale = {want}"
        );
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

/// Poll /ready until the generation reaches `want`, returning the body.
#[allow(dead_code)]
pub async fn wait_for_generation(base: &str, want: u64, timeout: Duration) -> serde_json::Value {
    let client = reqwest::Client::new();
    let deadline = std::time::Instant::now() + timeout;
    loop {
        if let Ok(response) = client.get(format!("{base}/ready")).send().await {
            if let Ok(body) = response.json::<serde_json::Value>().await {
                if body["generation"].as_u64().unwrap_or(0) >= want {
                    return body;
                }
            }
        }
        assert!(
            std::time::Instant::now() < deadline,
            "timed out waiting for generation {want}"
        );
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}
