//! Staging diagnostics reach the configured log file

use std::path::{Path, PathBuf};

use matforge::logging::{init_with_config, is_initialized, LogLevel, LoggingConfig};
use matforge::{stage, DeviceStatus, HostRuntime, Mat2D, MatForgeError, StageOptions};
use once_cell::sync::Lazy;
use serial_test::serial;
use tempfile::TempDir;

/// One subscriber per test binary, so every test shares one file
static LOG_DIR: Lazy<TempDir> = Lazy::new(|| tempfile::tempdir().expect("temp dir"));

/// Install file logging once; `None` when `RUST_LOG` would override the level
fn log_file() -> Option<PathBuf> {
    if std::env::var("RUST_LOG").is_ok() {
        return None;
    }
    let path = LOG_DIR.path().join("staging.log");
    let config = LoggingConfig::new()
        .with_level(LogLevel::Info)
        .with_log_file(path.clone());
    init_with_config(&config).expect("subscriber installs in a fresh test binary");
    assert!(is_initialized());
    Some(path)
}

/// JSON events whose message equals `message`
fn events_with_message(path: &Path, message: &str) -> Vec<serde_json::Value> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .filter(|event| event["fields"]["message"] == message)
        .collect()
}

#[test]
#[serial]
fn test_successful_staging_is_reported() {
    let Some(path) = log_file() else { return };

    let host = Mat2D::from_slice(&[1.0, 2.0], 1, 2).unwrap();
    let mut runtime = HostRuntime::new();
    let device = stage(&mut runtime, &host, &StageOptions::new().with_label("bias")).unwrap();
    device.release(&mut runtime).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("Allocating memory for bias on device: no error"));
    assert!(contents.contains("Copying bias to device: no error"));
}

#[test]
#[serial]
fn test_failed_allocation_is_reported_before_error() {
    let Some(path) = log_file() else { return };

    let host = Mat2D::zeros(32, 32).unwrap();
    let mut runtime = HostRuntime::with_capacity(256);
    let err = stage(&mut runtime, &host, &StageOptions::new().with_label("oversized")).unwrap_err();
    assert!(matches!(err, MatForgeError::AllocationFailed { .. }));

    let events = events_with_message(&path, "Allocating memory for oversized on device: out of memory");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["level"], "ERROR");
    assert_eq!(events[0]["fields"]["label"], "oversized");
    assert_eq!(events[0]["fields"]["code"], 2);
}

#[test]
#[serial]
fn test_failed_copy_is_reported_before_error() {
    let Some(path) = log_file() else { return };

    let host = Mat2D::from_slice(&[1.0, 2.0, 3.0], 3, 1).unwrap();
    let mut runtime = HostRuntime::new();
    runtime.inject_copy_failure(DeviceStatus::InvalidValue);
    let err = stage(&mut runtime, &host, &StageOptions::new().with_label("column")).unwrap_err();
    assert!(matches!(err, MatForgeError::TransferFailed { .. }));

    let allocated = events_with_message(&path, "Allocating memory for column on device: no error");
    assert_eq!(allocated.len(), 1);
    assert_eq!(allocated[0]["level"], "INFO");

    let copied = events_with_message(&path, "Copying column to device: invalid argument");
    assert_eq!(copied.len(), 1);
    assert_eq!(copied[0]["level"], "ERROR");
    assert_eq!(copied[0]["fields"]["label"], "column");
}
