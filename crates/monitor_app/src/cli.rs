use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use monitor_core::{FileBlob, JobForm, NoticeRetention, TranscribeModel};

use crate::config::MonitorConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelArg {
    /// Local Whisper transcription
    Whisper,
    /// Gemini transcription
    Gemini,
}

impl From<ModelArg> for TranscribeModel {
    fn from(model: ModelArg) -> Self {
        match model {
            ModelArg::Whisper => TranscribeModel::Whisper,
            ModelArg::Gemini => TranscribeModel::Gemini,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "transcribe-monitor")]
#[command(about = "Submit a transcription job and follow it until the result is ready", long_about = None)]
pub struct Args {
    /// RON settings file (default: ./transcribe-monitor.ron if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Base URL of the transcription server
    #[arg(long)]
    pub server: Option<String>,

    /// Media URL to transcribe (takes precedence over --file)
    #[arg(long)]
    pub url: Option<String>,

    /// Local media file to upload
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Output base path on the server
    #[arg(long)]
    pub base_path: Option<String>,

    /// Enable the server's Ueda mode
    #[arg(long)]
    pub ueda_mode: bool,

    #[arg(long)]
    pub transcribe_prompt: Option<String>,

    #[arg(long)]
    pub summarize_prompt: Option<String>,

    #[arg(long)]
    pub categorize_prompt: Option<String>,

    /// How the media is split before transcription (e.g. "duration")
    #[arg(long)]
    pub split_method: Option<String>,

    /// Split size for the chosen method
    #[arg(long)]
    pub split_value: Option<u32>,

    /// Transcription model
    #[arg(long, value_enum)]
    pub model: Option<ModelArg>,

    /// Also write the retrieved result to this file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Polling interval in milliseconds
    #[arg(long)]
    pub poll_ms: Option<u64>,

    /// Write diagnostics to ./transcribe-monitor.log
    #[arg(long)]
    pub log_file: bool,

    /// Keep local notices in the log when the server transcript is resynced
    #[arg(long)]
    pub keep_notices: bool,
}

impl Args {
    /// Overlays the flags that were given on top of `config`.
    pub fn apply_to(&self, mut config: MonitorConfig) -> MonitorConfig {
        if let Some(server) = &self.server {
            config.server = server.clone();
        }
        if let Some(base_path) = &self.base_path {
            config.base_path = base_path.clone();
        }
        if let Some(prompt) = &self.transcribe_prompt {
            config.transcribe_prompt = prompt.clone();
        }
        if let Some(prompt) = &self.summarize_prompt {
            config.summarize_prompt = prompt.clone();
        }
        if let Some(prompt) = &self.categorize_prompt {
            config.categorize_prompt = prompt.clone();
        }
        if let Some(method) = &self.split_method {
            config.split_method = method.clone();
        }
        if let Some(value) = self.split_value {
            config.split_value = value;
        }
        if let Some(model) = self.model {
            config.transcribe_model = model.into();
        }
        if let Some(poll_ms) = self.poll_ms {
            config.poll_interval_ms = poll_ms;
        }
        if self.log_file {
            config.log_to_file = true;
        }
        if self.keep_notices {
            config.notice_retention = NoticeRetention::Retained;
        }
        config
    }

    fn has_url(&self) -> bool {
        self.url.as_deref().is_some_and(|url| !url.trim().is_empty())
    }

    /// Reads `--file` unless a URL was given, which would win anyway.
    pub fn read_input_file(&self) -> io::Result<Option<FileBlob>> {
        match &self.file {
            Some(path) if !self.has_url() => read_blob(path).map(Some),
            _ => Ok(None),
        }
    }

    pub fn job_form(&self, config: &MonitorConfig, input_file: Option<FileBlob>) -> JobForm {
        JobForm {
            input_file,
            input_url: self.url.clone().unwrap_or_default(),
            base_path: config.base_path.clone(),
            ueda_mode: self.ueda_mode,
            transcribe_prompt: config.transcribe_prompt.clone(),
            summarize_prompt: config.summarize_prompt.clone(),
            categorize_prompt: config.categorize_prompt.clone(),
            split_method: config.split_method.clone(),
            split_value: config.split_value,
            transcribe_model: config.transcribe_model,
        }
    }
}

fn read_blob(path: &Path) -> io::Result<FileBlob> {
    let bytes = fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(FileBlob::new(file_name, bytes))
}
