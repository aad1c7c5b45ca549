//! Integration tests for loading and saving engine configuration.

use lullaby_core::{ConfigError, EngineConfig};
use tempfile::TempDir;

#[test]
fn test_save_and_load_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = EngineConfig::default();
    config.set("lookback.wake_window_days", "10").unwrap();
    config.set("overdue.toddler_minutes", "45.5").unwrap();
    config.set("display.utc_offset", "+09:00").unwrap();
    config.save_to(&path).unwrap();

    let loaded = EngineConfig::load_from(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.lookback.wake_window_days, 10);
    assert_eq!(loaded.overdue.toddler_minutes, 45.5);
    assert_eq!(loaded.offset().unwrap().local_minus_utc(), 9 * 3600);
}

#[test]
fn test_saved_file_is_sectioned_toml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    EngineConfig::default().save_to(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("[lookback]"));
    assert!(content.contains("[overdue]"));
    assert!(content.contains("utc_offset = \"+00:00\""));
}

#[test]
fn test_load_rejects_invalid_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[lookback]\nbedtime_days = -3\n").unwrap();

    let err = EngineConfig::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "lookback.bedtime_days"));
}

#[test]
fn test_load_reports_parse_errors() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[lookback\n").unwrap();

    assert!(matches!(
        EngineConfig::load_from(&path),
        Err(ConfigError::ParseFailed(_))
    ));
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.toml");
    assert!(matches!(
        EngineConfig::load_from(&missing),
        Err(ConfigError::LoadFailed { .. })
    ));
}
