//! Monitor core: pure job-monitoring state machine and view-model helpers.
mod effect;
mod log_sink;
mod msg;
mod params;
mod progress;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, Severity};
pub use log_sink::{LineOrigin, LogLine, LogSink, NoticeRetention};
pub use msg::{Msg, StartAck};
pub use params::{
    FileBlob, InputSource, JobForm, JobParameters, TranscribeModel, ValidationError,
    DEFAULT_SPLIT_METHOD, DEFAULT_SPLIT_VALUE,
};
pub use progress::{ProgressSnapshot, RunStatus};
pub use state::{CompletionState, MonitorState, ResultState, SessionPhase};
pub use update::update;
pub use view_model::MonitorView;
