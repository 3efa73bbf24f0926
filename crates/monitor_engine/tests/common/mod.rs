#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use monitor_core::{JobParameters, MonitorView, ProgressSnapshot, Severity};
use monitor_engine::{ApiError, FailureKind, JobApi, Monitor, Presenter, StartReply};

/// In-memory job server. Each endpoint answers with whatever was last set.
pub struct ScriptedApi {
    start: Mutex<Result<StartReply, ApiError>>,
    progress: Mutex<Result<ProgressSnapshot, ApiError>>,
    logs: Mutex<Result<Vec<String>, ApiError>>,
    result: Mutex<Result<String, ApiError>>,
    calls: Mutex<HashMap<&'static str, usize>>,
    submitted: Mutex<Vec<JobParameters>>,
}

impl Default for ScriptedApi {
    fn default() -> Self {
        Self {
            start: Mutex::new(Ok(StartReply::Started)),
            progress: Mutex::new(Ok(running(0))),
            logs: Mutex::new(Ok(Vec::new())),
            result: Mutex::new(Err(ApiError::new(FailureKind::HttpStatus(404), "404 Not Found"))),
            calls: Mutex::new(HashMap::new()),
            submitted: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedApi {
    pub fn set_start(&self, reply: Result<StartReply, ApiError>) {
        *self.start.lock().unwrap() = reply;
    }

    pub fn set_progress(&self, reply: Result<ProgressSnapshot, ApiError>) {
        *self.progress.lock().unwrap() = reply;
    }

    pub fn set_logs(&self, lines: &[&str]) {
        *self.logs.lock().unwrap() = Ok(lines.iter().map(|line| line.to_string()).collect());
    }

    pub fn fail_logs(&self, err: ApiError) {
        *self.logs.lock().unwrap() = Err(err);
    }

    pub fn set_result(&self, reply: Result<String, ApiError>) {
        *self.result.lock().unwrap() = reply;
    }

    pub fn calls(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(endpoint)
            .copied()
            .unwrap_or(0)
    }

    pub fn submitted(&self) -> Vec<JobParameters> {
        self.submitted.lock().unwrap().clone()
    }

    fn record(&self, endpoint: &'static str) {
        *self.calls.lock().unwrap().entry(endpoint).or_insert(0) += 1;
    }
}

#[async_trait::async_trait]
impl JobApi for ScriptedApi {
    async fn start(&self, params: &JobParameters) -> Result<StartReply, ApiError> {
        self.record("start");
        self.submitted.lock().unwrap().push(params.clone());
        self.start.lock().unwrap().clone()
    }

    async fn progress(&self) -> Result<ProgressSnapshot, ApiError> {
        self.record("progress");
        self.progress.lock().unwrap().clone()
    }

    async fn logs(&self) -> Result<Vec<String>, ApiError> {
        self.record("logs");
        self.logs.lock().unwrap().clone()
    }

    async fn result(&self) -> Result<String, ApiError> {
        self.record("result");
        self.result.lock().unwrap().clone()
    }
}

pub fn running(percentage: u8) -> ProgressSnapshot {
    ProgressSnapshot {
        percentage,
        running: Some(true),
    }
}

pub fn finished() -> ProgressSnapshot {
    ProgressSnapshot {
        percentage: 100,
        running: Some(false),
    }
}

pub fn timeout_error() -> ApiError {
    ApiError::new(FailureKind::Timeout, "operation timed out")
}

#[derive(Default)]
pub struct RecordingPresenter {
    pub views: Vec<MonitorView>,
    pub notifications: Vec<(Severity, String)>,
}

impl RecordingPresenter {
    pub fn last_view(&self) -> &MonitorView {
        self.views.last().expect("at least one render")
    }
}

impl Presenter for RecordingPresenter {
    fn render(&mut self, view: &MonitorView) {
        self.views.push(view.clone());
    }

    fn notify(&mut self, severity: Severity, message: &str) {
        self.notifications.push((severity, message.to_string()));
    }
}

/// Applies exactly `count` engine events, failing the test if they do not arrive.
pub async fn pump(monitor: &mut Monitor, presenter: &mut RecordingPresenter, count: usize) {
    for _ in 0..count {
        let stepped = tokio::time::timeout(Duration::from_secs(5), monitor.step(presenter))
            .await
            .expect("engine event within timeout");
        assert!(stepped, "event stream ended");
    }
}

/// Lets spawned tasks run without waiting on any particular event.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
