use crate::JobParameters;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send the validated parameters to `/start`.
    SubmitJob(JobParameters),
    StartPolling,
    StopPolling,
    /// One-shot `/result` retrieval after completion.
    FetchResult,
    /// Transient user notification (toast).
    Notify { severity: Severity, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}
