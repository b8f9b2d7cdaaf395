//! Integration tests for the full rotation flow.

#![allow(unsafe_code)] // For env var manipulation in tests

use keywheel::prelude::*;
use keywheel::stores::RemoteSettings;
use serial_test::serial;
use std::env;
use tempfile::TempDir;

fn three_key_wheel(dir: &TempDir) -> KeyWheel {
    KeyWheel::builder()
        .with_cursor_dir(dir.path())
        .with_entries([
            ("SERVICE_KEY_A", "alpha"),
            ("SERVICE_KEY_B", "beta"),
            ("SERVICE_KEY_C", "gamma"),
            ("UNRELATED", "ignored"),
        ])
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_memory_backend_cycles_in_order() {
    let dir = TempDir::new().unwrap();
    let wheel = three_key_wheel(&dir);
    let request = NextKeyRequest::new("SERVICE_KEY").with_storage(StorageBackend::Memory);

    let expected = [
        ("alpha", 1),
        ("beta", 2),
        ("gamma", 0),
        ("alpha", 1),
        ("beta", 2),
    ];
    for (key, index) in expected {
        let rotation = wheel.next_key(&request).await;
        assert_eq!(rotation.key, key);
        assert_eq!(rotation.index, index);
    }
}

#[tokio::test]
async fn test_disk_backend_cycles_and_persists() {
    let dir = TempDir::new().unwrap();
    let request = NextKeyRequest::new("SERVICE_KEY").with_storage(StorageBackend::Disk);

    let wheel = three_key_wheel(&dir);
    assert_eq!(wheel.next_key(&request).await.key, "alpha");
    assert_eq!(wheel.next_key(&request).await.key, "beta");

    // A fresh wheel over the same cursor directory continues the cycle.
    let reopened = three_key_wheel(&dir);
    let rotation = reopened.next_key(&request).await;
    assert_eq!(rotation.key, "gamma");
    assert_eq!(rotation.index, 0);
}

#[tokio::test]
async fn test_single_candidate_fast_path_touches_no_store() {
    let dir = TempDir::new().unwrap();
    let wheel = KeyWheel::builder()
        .with_cursor_dir(dir.path())
        .with_entries([("SERVICE_KEY_ONLY", "solo")])
        .build()
        .unwrap();
    let request = NextKeyRequest::new("SERVICE_KEY").with_storage(StorageBackend::Disk);

    for _ in 0..3 {
        let rotation = wheel.next_key(&request).await;
        assert_eq!(rotation.key, "solo");
        assert_eq!(rotation.index, 0);
        assert!(rotation.message.contains("rotation not required"));
    }

    // No cursor record was ever written.
    assert!(!dir.path().join("envCache_SERVICE_KEY.json").exists());
}

#[tokio::test]
async fn test_zero_candidates_reports_failure() {
    let dir = TempDir::new().unwrap();
    let wheel = KeyWheel::builder()
        .with_cursor_dir(dir.path())
        .with_entries([("UNRELATED", "value")])
        .build()
        .unwrap();

    let rotation = wheel
        .next_key(&NextKeyRequest::new("SERVICE_KEY").with_storage(StorageBackend::Memory))
        .await;
    assert_eq!(rotation.key, "");
    assert_eq!(rotation.index, 0);
    assert!(rotation.message.starts_with("Error:"));
    assert!(rotation.message.contains("No environment variables found"));
}

#[tokio::test]
async fn test_distinct_prefixes_have_independent_cursors() {
    let dir = TempDir::new().unwrap();
    let wheel = KeyWheel::builder()
        .with_cursor_dir(dir.path())
        .with_entries([
            ("FIRST_A", "f1"),
            ("FIRST_B", "f2"),
            ("SECOND_A", "s1"),
            ("SECOND_B", "s2"),
        ])
        .build()
        .unwrap();

    let first = NextKeyRequest::new("FIRST").with_storage(StorageBackend::Memory);
    let second = NextKeyRequest::new("SECOND").with_storage(StorageBackend::Memory);

    assert_eq!(wheel.next_key(&first).await.key, "f1");
    assert_eq!(wheel.next_key(&first).await.key, "f2");
    // Advancing FIRST never perturbed SECOND.
    assert_eq!(wheel.next_key(&second).await.key, "s1");
}

#[tokio::test]
async fn test_corrupt_cursor_file_restarts_at_zero() {
    let dir = TempDir::new().unwrap();
    let wheel = three_key_wheel(&dir);
    let request = NextKeyRequest::new("SERVICE_KEY").with_storage(StorageBackend::Disk);

    wheel.next_key(&request).await;
    wheel.next_key(&request).await;

    std::fs::write(dir.path().join("envCache_SERVICE_KEY.json"), b"{garbage").unwrap();

    // Behaves as a fresh start, without surfacing an error.
    let rotation = wheel.next_key(&request).await;
    assert_eq!(rotation.key, "alpha");
    assert_eq!(rotation.index, 1);
}

#[tokio::test]
async fn test_deleted_cursor_file_restarts_at_zero() {
    let dir = TempDir::new().unwrap();
    let wheel = three_key_wheel(&dir);
    let request = NextKeyRequest::new("SERVICE_KEY").with_storage(StorageBackend::Disk);

    wheel.next_key(&request).await;
    std::fs::remove_file(dir.path().join("envCache_SERVICE_KEY.json")).unwrap();

    let rotation = wheel.next_key(&request).await;
    assert_eq!(rotation.key, "alpha");
    assert_eq!(rotation.index, 1);
}

#[tokio::test]
#[serial]
async fn test_database_backend_without_credentials_fails_cleanly() {
    for key in ["DB_USERNAME", "DB_PASSWORD"] {
        unsafe {
            env::remove_var(key);
        }
    }

    let dir = TempDir::new().unwrap();
    let wheel = three_key_wheel(&dir);
    let rotation = wheel
        .next_key(&NextKeyRequest::new("SERVICE_KEY").with_storage(StorageBackend::Database))
        .await;

    assert_eq!(rotation.key, "");
    assert_eq!(rotation.index, 0);
    assert!(rotation.message.contains("Missing database credentials"));
}

#[tokio::test(start_paused = true)]
async fn test_database_backend_connection_failure_reports_error() {
    let dir = TempDir::new().unwrap();
    let wheel = KeyWheel::builder()
        .with_cursor_dir(dir.path())
        .with_entries([("SERVICE_KEY_A", "alpha"), ("SERVICE_KEY_B", "beta")])
        .with_remote_settings(RemoteSettings {
            username: "svc".to_string(),
            password: "hunter2".to_string(),
            database: "keywheel".to_string(),
            // Unusable host: every connection attempt fails, exhausting
            // the retry budget without hanging.
            cluster: "not a valid host".to_string(),
        })
        .build()
        .unwrap();

    let rotation = wheel.next_key(&NextKeyRequest::new("SERVICE_KEY")).await;
    assert_eq!(rotation.key, "");
    assert_eq!(rotation.index, 0);
    assert!(
        rotation
            .message
            .contains("Failed to connect to database after 5 attempts"),
        "unexpected message: {}",
        rotation.message
    );
}

#[tokio::test]
#[serial]
async fn test_single_candidate_skips_credential_check() {
    // The fast path never reaches the backend, so Database storage with no
    // credentials still succeeds for a one-key prefix.
    for key in ["DB_USERNAME", "DB_PASSWORD"] {
        unsafe {
            env::remove_var(key);
        }
    }

    let dir = TempDir::new().unwrap();
    let wheel = KeyWheel::builder()
        .with_cursor_dir(dir.path())
        .with_entries([("SERVICE_KEY_ONLY", "solo")])
        .build()
        .unwrap();

    let rotation = wheel.next_key(&NextKeyRequest::new("SERVICE_KEY")).await;
    assert_eq!(rotation.key, "solo");
    assert_eq!(rotation.index, 0);
}

#[tokio::test]
#[serial]
async fn test_ambient_environment_resolution() {
    unsafe {
        env::set_var("KEYWHEEL_TEST_KEY_1", "first");
        env::set_var("KEYWHEEL_TEST_KEY_2", "second");
    }

    let dir = TempDir::new().unwrap();
    let wheel = KeyWheel::builder()
        .with_cursor_dir(dir.path())
        .build()
        .unwrap();
    let request = NextKeyRequest::new("KEYWHEEL_TEST_KEY").with_storage(StorageBackend::Memory);

    let first = wheel.next_key(&request).await;
    let second = wheel.next_key(&request).await;
    // env::vars enumeration order is not specified, so assert the cycle
    // rather than which key comes first.
    assert_ne!(first.key, second.key);
    assert!(["first", "second"].contains(&first.key.as_str()));
    assert!(["first", "second"].contains(&second.key.as_str()));

    unsafe {
        env::remove_var("KEYWHEEL_TEST_KEY_1");
        env::remove_var("KEYWHEEL_TEST_KEY_2");
    }
}
