//! Monitor engine: HTTP polling pipeline and effect execution.
mod api;
mod artifact;
mod clock;
mod engine;
mod monitor;
mod scheduler;
mod types;

pub use api::{ApiSettings, JobApi, ReqwestJobApi, StartReply};
pub use artifact::{ensure_output_dir, pretty_artifact, write_artifact, PersistError, ResultDocument};
pub use clock::{Clock, ManualClock, Ticker, TokioClock};
pub use engine::EngineHandle;
pub use monitor::{Monitor, MonitorSettings, NullPresenter, Presenter};
pub use scheduler::PollingScheduler;
pub use types::{ApiError, EngineEvent, FailureKind, Sample, SessionId};
