use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_SPLIT_METHOD: &str = "duration";
pub const DEFAULT_SPLIT_VALUE: u32 = 60;

/// An uploaded media file: the original file name and its contents.
#[derive(Clone, PartialEq, Eq)]
pub struct FileBlob {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl FileBlob {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

// Media files are large; keep them out of debug output.
impl fmt::Debug for FileBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileBlob")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(FileBlob),
    Url(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscribeModel {
    #[default]
    Whisper,
    Gemini,
}

impl TranscribeModel {
    pub fn as_str(self) -> &'static str {
        match self {
            TranscribeModel::Whisper => "whisper",
            TranscribeModel::Gemini => "gemini",
        }
    }
}

impl fmt::Display for TranscribeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("specify an input file or a URL")]
    MissingSource,
}

/// Raw form contents as entered by the user; not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobForm {
    pub input_file: Option<FileBlob>,
    pub input_url: String,
    pub base_path: String,
    pub ueda_mode: bool,
    pub transcribe_prompt: String,
    pub summarize_prompt: String,
    pub categorize_prompt: String,
    pub split_method: String,
    pub split_value: u32,
    pub transcribe_model: TranscribeModel,
}

impl Default for JobForm {
    fn default() -> Self {
        Self {
            input_file: None,
            input_url: String::new(),
            base_path: String::new(),
            ueda_mode: false,
            transcribe_prompt: String::new(),
            summarize_prompt: String::new(),
            categorize_prompt: String::new(),
            split_method: DEFAULT_SPLIT_METHOD.to_string(),
            split_value: DEFAULT_SPLIT_VALUE,
            transcribe_model: TranscribeModel::default(),
        }
    }
}

impl JobForm {
    /// Freeze the form into submission parameters.
    ///
    /// A non-blank URL takes precedence over a selected file; the file is
    /// dropped in that case so the payload never carries both.
    pub fn validate(self) -> Result<JobParameters, ValidationError> {
        let url = self.input_url.trim();
        let source = if !url.is_empty() {
            InputSource::Url(url.to_string())
        } else if let Some(file) = self.input_file {
            InputSource::File(file)
        } else {
            return Err(ValidationError::MissingSource);
        };

        Ok(JobParameters {
            source,
            base_path: self.base_path.trim().to_string(),
            ueda_mode: self.ueda_mode,
            transcribe_prompt: self.transcribe_prompt,
            summarize_prompt: self.summarize_prompt,
            categorize_prompt: self.categorize_prompt,
            split_method: self.split_method,
            split_value: self.split_value,
            transcribe_model: self.transcribe_model,
        })
    }
}

/// Immutable snapshot of a job submission. Only produced by [`JobForm::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobParameters {
    source: InputSource,
    base_path: String,
    ueda_mode: bool,
    transcribe_prompt: String,
    summarize_prompt: String,
    categorize_prompt: String,
    split_method: String,
    split_value: u32,
    transcribe_model: TranscribeModel,
}

impl JobParameters {
    pub fn source(&self) -> &InputSource {
        &self.source
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn ueda_mode(&self) -> bool {
        self.ueda_mode
    }

    pub fn transcribe_model(&self) -> TranscribeModel {
        self.transcribe_model
    }

    /// Every form field except the input source, in wire order.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("base_path", self.base_path.clone()),
            ("ueda_mode", self.ueda_mode.to_string()),
            ("transcribe_prompt", self.transcribe_prompt.clone()),
            ("summarize_prompt", self.summarize_prompt.clone()),
            ("categorize_prompt", self.categorize_prompt.clone()),
            ("split_method", self.split_method.clone()),
            ("split_value", self.split_value.to_string()),
            ("transcribe_model", self.transcribe_model.as_str().to_string()),
        ]
    }
}
