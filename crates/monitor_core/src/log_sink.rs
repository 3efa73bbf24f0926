use serde::{Deserialize, Serialize};

/// What a resync does with notices that were produced locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeRetention {
    /// Resync replaces everything; local notices live until the next resync.
    #[default]
    Transient,
    /// Local notices are kept and rendered after the server transcript.
    Retained,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOrigin {
    Server,
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub origin: LineOrigin,
    pub text: String,
}

/// The transcript shown to the user.
///
/// Two writers share it: [`LogSink::resync`] with the server's full history,
/// and [`LogSink::append`] with locally generated notices. Whichever call
/// arrives last wins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogSink {
    retention: NoticeRetention,
    lines: Vec<LogLine>,
}

impl LogSink {
    pub fn new(retention: NoticeRetention) -> Self {
        Self {
            retention,
            lines: Vec::new(),
        }
    }

    pub fn retention(&self) -> NoticeRetention {
        self.retention
    }

    pub fn append(&mut self, notice: impl Into<String>) {
        self.lines.push(LogLine {
            origin: LineOrigin::Local,
            text: notice.into(),
        });
    }

    pub fn resync(&mut self, transcript: &[String]) {
        let server = transcript.iter().map(|text| LogLine {
            origin: LineOrigin::Server,
            text: text.clone(),
        });
        match self.retention {
            NoticeRetention::Transient => {
                self.lines = server.collect();
            }
            NoticeRetention::Retained => {
                let mut lines: Vec<LogLine> = server.collect();
                lines.extend(
                    self.lines
                        .drain(..)
                        .filter(|line| line.origin == LineOrigin::Local),
                );
                self.lines = lines;
            }
        }
    }

    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Every line terminated by a newline, in display order. An empty sink
    /// renders as `""`, not a lone newline.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.text);
            out.push('\n');
        }
        out
    }
}
