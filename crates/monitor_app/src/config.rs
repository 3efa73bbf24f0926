use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use monitor_core::{NoticeRetention, TranscribeModel, DEFAULT_SPLIT_METHOD, DEFAULT_SPLIT_VALUE};
use monitor_engine::{ApiSettings, MonitorSettings};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "transcribe-monitor.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Result of [`MonitorConfig::load`]. `source` is the file that was read, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub config: MonitorConfig,
    pub source: Option<PathBuf>,
}

/// Settings file contents. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub server: String,
    pub poll_interval_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_result_bytes: u64,
    pub notice_retention: NoticeRetention,
    pub log_to_file: bool,
    pub base_path: String,
    pub transcribe_model: TranscribeModel,
    pub split_method: String,
    pub split_value: u32,
    pub transcribe_prompt: String,
    pub summarize_prompt: String,
    pub categorize_prompt: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        let api = ApiSettings::default();
        Self {
            server: api.base_url,
            poll_interval_ms: 1000,
            connect_timeout_ms: api.connect_timeout.as_millis() as u64,
            request_timeout_ms: api.request_timeout.as_millis() as u64,
            max_result_bytes: api.max_result_bytes,
            notice_retention: NoticeRetention::default(),
            log_to_file: false,
            base_path: String::new(),
            transcribe_model: TranscribeModel::default(),
            split_method: DEFAULT_SPLIT_METHOD.to_string(),
            split_value: DEFAULT_SPLIT_VALUE,
            transcribe_prompt: String::new(),
            summarize_prompt: String::new(),
            categorize_prompt: String::new(),
        }
    }
}

impl MonitorConfig {
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        ron::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `explicit` if given, which must exist. Otherwise tries
    /// [`DEFAULT_CONFIG_FILE`] in `dir` and falls back to defaults when absent.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<LoadedConfig, ConfigError> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => (dir.join(DEFAULT_CONFIG_FILE), false),
        };

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
                return Ok(LoadedConfig {
                    config: Self::default(),
                    source: None,
                });
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        let config = Self::parse(&text, &path)?;
        Ok(LoadedConfig {
            config,
            source: Some(path),
        })
    }

    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.server.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            max_result_bytes: self.max_result_bytes,
        }
    }

    pub fn monitor_settings(&self) -> MonitorSettings {
        MonitorSettings {
            cadence: Duration::from_millis(self.poll_interval_ms),
            retention: self.notice_retention,
        }
    }
}
