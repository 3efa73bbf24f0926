use std::fs;
use std::path::Path;
use std::time::Duration;

use monitor_app::config::{ConfigError, MonitorConfig, DEFAULT_CONFIG_FILE};
use monitor_core::{NoticeRetention, TranscribeModel};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn defaults_match_the_local_server() {
    let config = MonitorConfig::default();
    assert_eq!(config.server, "http://127.0.0.1:5000");
    assert_eq!(config.poll_interval_ms, 1000);
    assert_eq!(config.split_method, "duration");
    assert_eq!(config.split_value, 60);
    assert_eq!(config.transcribe_model, TranscribeModel::Whisper);
    assert_eq!(config.notice_retention, NoticeRetention::Transient);
    assert!(!config.log_to_file);
}

#[test]
fn partial_file_keeps_other_defaults() {
    let text = r#"(
        server: "http://gpu-box:5000",
        poll_interval_ms: 250,
        notice_retention: retained,
        transcribe_model: gemini,
    )"#;
    let config = MonitorConfig::parse(text, Path::new("inline.ron")).unwrap();

    assert_eq!(
        config,
        MonitorConfig {
            server: "http://gpu-box:5000".to_string(),
            poll_interval_ms: 250,
            notice_retention: NoticeRetention::Retained,
            transcribe_model: TranscribeModel::Gemini,
            ..MonitorConfig::default()
        }
    );
    assert_eq!(config.monitor_settings().cadence, Duration::from_millis(250));
    assert_eq!(config.api_settings().base_url, "http://gpu-box:5000");
}

#[test]
fn missing_default_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let loaded = MonitorConfig::load(None, dir.path()).unwrap();
    assert_eq!(loaded.config, MonitorConfig::default());
    assert_eq!(loaded.source, None);
}

#[test]
fn default_file_in_dir_is_picked_up() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "(split_value: 120)").unwrap();

    let loaded = MonitorConfig::load(None, dir.path()).unwrap();
    assert_eq!(loaded.config.split_value, 120);
    assert_eq!(loaded.source, Some(dir.path().join(DEFAULT_CONFIG_FILE)));
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.ron");

    let err = MonitorConfig::load(Some(&path), dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn malformed_file_reports_its_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.ron");
    fs::write(&path, "(server: 5000").unwrap();

    let err = MonitorConfig::load(Some(&path), dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("broken.ron"));
}
