// Headless remote frame bootstrap from an options file.
// Run with: cargo test --test frame_bootstrap_test

use pushsync::commands::frame::{self, HeadlessHost};
use pushsync::{FileStore, Store};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

fn write_options(dir: &TempDir, options: serde_json::Value) -> std::path::PathBuf {
    let path = dir.path().join("options.json");
    std::fs::write(&path, serde_json::to_string(&options).unwrap()).unwrap();
    path
}

#[tokio::test]
async fn test_iframe_bootstrap_persists_app_config() {
    let dir = TempDir::new().unwrap();
    let options = write_options(
        &dir,
        json!({
            "appId": "3beb3078-e0f1-4629-af17-fde833b9f716",
            "subdomainName": "mysite",
            "origin": "https://example.com",
            "siteName": "My Site",
        }),
    );
    let store = Arc::new(FileStore::open(dir.path().join("state.json")));
    let host = HeadlessHost {
        opener: false,
        parent: true,
    };

    frame::run_file(&options, host, store.clone(), false)
        .await
        .unwrap();

    let app_config = store.app_config().unwrap().unwrap();
    assert_eq!(app_config.app_id, "3beb3078-e0f1-4629-af17-fde833b9f716");
    assert_eq!(app_config.subdomain.as_deref(), Some("mysite"));
    assert!(!store.is_push_enabled().unwrap());
}

#[tokio::test]
async fn test_direct_open_is_refused() {
    let dir = TempDir::new().unwrap();
    let options = write_options(
        &dir,
        json!({
            "appId": "3beb3078-e0f1-4629-af17-fde833b9f716",
            "subdomainName": "mysite",
            "origin": "https://example.com",
            "siteName": "My Site",
        }),
    );
    let store = Arc::new(FileStore::open(dir.path().join("state.json")));

    let err = frame::run_file(&options, HeadlessHost::default(), store.clone(), true)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("refused"));
    assert!(store.app_config().unwrap().is_none());
}

#[tokio::test]
async fn test_invalid_origin_is_rejected() {
    let dir = TempDir::new().unwrap();
    let options = write_options(
        &dir,
        json!({
            "appId": "3beb3078-e0f1-4629-af17-fde833b9f716",
            "subdomainName": "mysite",
            "origin": "not a url",
            "siteName": "My Site",
        }),
    );
    let store = Arc::new(FileStore::open(dir.path().join("state.json")));
    let host = HeadlessHost {
        opener: true,
        parent: false,
    };

    assert!(frame::run_file(&options, host, store, false).await.is_err());
}
