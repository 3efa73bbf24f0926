use crate::view_model::MonitorView;
use crate::{LogSink, NoticeRetention, ProgressSnapshot, ValidationError};

/// Where the client is in the submit → poll → retrieve lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No polling session has been started, or the last submission failed.
    #[default]
    Idle,
    /// A polling session is live and the job is believed to be running.
    Polling,
    /// Completion was observed; the single result fetch is in flight.
    Retrieving,
    /// The result fetch finished, successfully or not.
    Finished,
}

/// Completion detector state of the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionState {
    Running,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultState {
    #[default]
    NotRequested,
    Pending,
    Retrieved(String),
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MonitorState {
    phase: SessionPhase,
    submission_in_flight: bool,
    sessions_started: u64,
    done_transitions: u32,
    inconclusive_checks: u32,
    log: LogSink,
    progress: Option<ProgressSnapshot>,
    progress_visible: bool,
    validation_error: Option<ValidationError>,
    submission_error: Option<String>,
    result: ResultState,
    dirty: bool,
}

impl MonitorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(retention: NoticeRetention) -> Self {
        Self {
            log: LogSink::new(retention),
            ..Self::default()
        }
    }

    pub fn view(&self) -> MonitorView {
        MonitorView::from_state(self)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn completion_state(&self) -> Option<CompletionState> {
        match self.phase {
            SessionPhase::Idle => None,
            SessionPhase::Polling => Some(CompletionState::Running),
            SessionPhase::Retrieving | SessionPhase::Finished => Some(CompletionState::Done),
        }
    }

    /// True while something is still expected from the engine.
    pub fn is_active(&self) -> bool {
        self.submission_in_flight
            || matches!(
                self.phase,
                SessionPhase::Polling | SessionPhase::Retrieving
            )
    }

    pub fn log(&self) -> &LogSink {
        &self.log
    }

    pub fn result(&self) -> &ResultState {
        &self.result
    }

    pub fn progress(&self) -> Option<ProgressSnapshot> {
        self.progress
    }

    pub fn sessions_started(&self) -> u64 {
        self.sessions_started
    }

    /// DONE transitions observed in the current session.
    pub fn done_transitions(&self) -> u32 {
        self.done_transitions
    }

    pub fn inconclusive_checks(&self) -> u32 {
        self.inconclusive_checks
    }

    pub(crate) fn progress_visible(&self) -> bool {
        self.progress_visible
    }

    pub(crate) fn validation_error(&self) -> Option<&ValidationError> {
        self.validation_error.as_ref()
    }

    pub(crate) fn submission_error(&self) -> Option<&str> {
        self.submission_error.as_deref()
    }

    pub(crate) fn submission_in_flight(&self) -> bool {
        self.submission_in_flight
    }

    /// Returns whether anything changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn reject_input(&mut self, err: ValidationError) {
        self.validation_error = Some(err);
        self.mark_dirty();
    }

    pub(crate) fn begin_submission(&mut self) {
        self.validation_error = None;
        self.submission_error = None;
        self.submission_in_flight = true;
        self.mark_dirty();
    }

    pub(crate) fn fail_submission(&mut self, reason: String) {
        self.submission_in_flight = false;
        self.log.append(format!("[ERROR] {reason}"));
        self.submission_error = Some(reason);
        self.mark_dirty();
    }

    pub(crate) fn accept_submission(&mut self) {
        self.submission_in_flight = false;
        self.log.append("[INFO] Processing started");
        self.progress_visible = true;
        self.mark_dirty();
    }

    pub(crate) fn start_session(&mut self) {
        self.phase = SessionPhase::Polling;
        self.sessions_started += 1;
        self.done_transitions = 0;
        self.inconclusive_checks = 0;
        self.progress = None;
        self.result = ResultState::NotRequested;
        self.mark_dirty();
    }

    pub(crate) fn apply_progress(&mut self, snapshot: ProgressSnapshot) {
        if self.progress != Some(snapshot) {
            self.progress = Some(snapshot);
            self.mark_dirty();
        }
    }

    pub(crate) fn resync_log(&mut self, transcript: &[String]) {
        let before = self.log.lines().to_vec();
        self.log.resync(transcript);
        if self.log.lines() != before.as_slice() {
            self.mark_dirty();
        }
    }

    pub(crate) fn mark_done(&mut self) {
        self.phase = SessionPhase::Retrieving;
        self.done_transitions += 1;
        self.result = ResultState::Pending;
        self.log.append("[INFO] Processing finished. Fetching result...");
        self.mark_dirty();
    }

    pub(crate) fn record_inconclusive_check(&mut self) {
        self.inconclusive_checks += 1;
    }

    pub(crate) fn store_result(&mut self, artifact: String) {
        self.phase = SessionPhase::Finished;
        self.result = ResultState::Retrieved(artifact);
        self.log.append("[INFO] Result retrieved");
        self.mark_dirty();
    }

    pub(crate) fn result_unavailable(&mut self, detail: String) {
        self.phase = SessionPhase::Finished;
        self.log
            .append(format!("[WARNING] Failed to fetch result: {detail}"));
        self.result = ResultState::Unavailable(detail);
        self.mark_dirty();
    }
}
