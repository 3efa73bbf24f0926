use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Typed view of the result document the pipeline writes. Presentation only:
/// retrieval never depends on this parsing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResultDocument {
    #[serde(default)]
    pub proofread_transcription: Option<String>,
    #[serde(default)]
    pub summary: Option<serde_json::Value>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl ResultDocument {
    pub fn parse(artifact: &str) -> Option<Self> {
        serde_json::from_str(artifact).ok()
    }
}

/// Pretty-prints the artifact when it is JSON, otherwise returns it verbatim.
pub fn pretty_artifact(artifact: &str) -> String {
    serde_json::from_str::<serde_json::Value>(artifact)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_else(|_| artifact.to_string())
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Atomically write the artifact to `target`: temp file in the same
/// directory, synced, then renamed over any existing file.
pub fn write_artifact(target: &Path, artifact: &str) -> Result<PathBuf, PersistError> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    ensure_output_dir(&dir)?;

    let mut tmp = NamedTempFile::new_in(&dir)?;
    tmp.write_all(pretty_artifact(artifact).as_bytes())?;
    tmp.write_all(b"\n")?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;

    tmp.persist(target).map_err(|e| PersistError::Io(e.error))?;
    Ok(target.to_path_buf())
}
