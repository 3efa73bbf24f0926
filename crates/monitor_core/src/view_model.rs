use crate::{MonitorState, ResultState, RunStatus, SessionPhase};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MonitorView {
    pub phase: SessionPhase,
    pub submitting: bool,
    pub progress_visible: bool,
    pub progress_percent: u8,
    /// e.g. "45%".
    pub progress_label: String,
    pub status_text: String,
    pub log_text: String,
    pub result: Option<String>,
    pub result_error: Option<String>,
    pub validation_error: Option<String>,
    pub submission_error: Option<String>,
    pub inconclusive_checks: u32,
    pub dirty: bool,
}

impl MonitorView {
    pub(crate) fn from_state(state: &MonitorState) -> Self {
        let snapshot = state.progress().unwrap_or_default();
        let status_text = match (state.phase(), state.progress()) {
            (SessionPhase::Idle, _) => "Idle",
            (_, None) => "Waiting for status",
            (_, Some(snapshot)) => match snapshot.status() {
                RunStatus::InProgress => "Processing...",
                RunStatus::Finished => "Done",
                RunStatus::Unknown => "Waiting for status",
            },
        };
        let (result, result_error) = match state.result() {
            ResultState::Retrieved(text) => (Some(text.clone()), None),
            ResultState::Unavailable(detail) => (None, Some(detail.clone())),
            ResultState::NotRequested | ResultState::Pending => (None, None),
        };

        Self {
            phase: state.phase(),
            submitting: state.submission_in_flight(),
            progress_visible: state.progress_visible(),
            progress_percent: snapshot.percentage,
            progress_label: format!("{}%", snapshot.percentage),
            status_text: status_text.to_string(),
            log_text: state.log().render(),
            result,
            result_error,
            validation_error: state.validation_error().map(ToString::to_string),
            submission_error: state.submission_error().map(ToOwned::to_owned),
            inconclusive_checks: state.inconclusive_checks(),
            dirty: state.is_dirty(),
        }
    }
}
