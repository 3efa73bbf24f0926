#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User pressed Start with the current form contents.
    SubmitClicked(crate::JobForm),
    /// `/start` answered, or the request failed.
    StartAcknowledged(StartAck),
    /// Progress sample for the current tick.
    ProgressSampled(crate::ProgressSnapshot),
    /// Full server log history for the current tick.
    LogsSampled(Vec<String>),
    /// Completion-check sample for the current tick.
    CompletionChecked(crate::ProgressSnapshot),
    /// Completion-check request failed; inconclusive, not a completion.
    CompletionCheckFailed(String),
    /// Outcome of the single `/result` retrieval.
    ResultFetched(Result<String, String>),
}

/// How the server answered a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartAck {
    /// `{"status": "started"}`.
    Started,
    /// Any other JSON payload, rendered compactly.
    Rejected(String),
    /// Transport or decoding failure.
    Failed(String),
}
