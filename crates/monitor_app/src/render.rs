//! Terminal rendering of monitor state.
//!
//! The presenter is redrawn on every state change but only prints what is
//! new: a status line when progress or status text changes, and log lines past
//! the common prefix with what was printed before.

use std::io::{self, Write};

use monitor_core::{MonitorView, Severity};
use monitor_engine::{pretty_artifact, Presenter, ResultDocument};
use serde_json::Value;

pub struct TerminalPresenter<W: Write> {
    out: W,
    shown_lines: Vec<String>,
    last_status: Option<(String, String)>,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            shown_lines: Vec::new(),
            last_status: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render_status(&mut self, view: &MonitorView) {
        if !view.progress_visible {
            return;
        }
        let status = (view.status_text.clone(), view.progress_label.clone());
        if self.last_status.as_ref() == Some(&status) {
            return;
        }
        let _ = writeln!(self.out, "{} {}", status.0, status.1);
        self.last_status = Some(status);
    }

    fn render_log(&mut self, view: &MonitorView) {
        let lines: Vec<String> = view.log_text.lines().map(str::to_owned).collect();
        let common = self
            .shown_lines
            .iter()
            .zip(&lines)
            .take_while(|(shown, line)| shown == line)
            .count();
        for line in &lines[common..] {
            let _ = writeln!(self.out, "  {line}");
        }
        self.shown_lines = lines;
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn render(&mut self, view: &MonitorView) {
        self.render_status(view);
        self.render_log(view);
        let _ = self.out.flush();
    }

    fn notify(&mut self, severity: Severity, message: &str) {
        let label = match severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        let _ = writeln!(self.out, "{label}: {message}");
        let _ = self.out.flush();
    }
}

/// Prints a retrieved artifact. A result document with a transcription or a
/// summary is shown section by section; anything else is printed as is,
/// pretty-printed when it is JSON.
pub fn print_result<W: Write>(out: &mut W, artifact: &str) -> io::Result<()> {
    let document = ResultDocument::parse(artifact)
        .filter(|doc| doc.proofread_transcription.is_some() || doc.summary.is_some());
    let Some(document) = document else {
        return writeln!(out, "{}", pretty_artifact(artifact));
    };

    if let Some(transcription) = &document.proofread_transcription {
        writeln!(out, "== Transcription ==")?;
        writeln!(out, "{}", transcription.trim_end())?;
    }
    if let Some(summary) = &document.summary {
        writeln!(out, "== Summary ==")?;
        writeln!(out, "{}", section_text(summary))?;
    }
    if let Some(metadata) = &document.metadata {
        writeln!(out, "== Metadata ==")?;
        writeln!(out, "{}", section_text(metadata))?;
    }
    Ok(())
}

fn section_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.trim_end().to_string(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}
