use std::sync::Arc;
use std::time::Duration;

use monitor_core::{
    update, Effect, InputSource, MonitorState, MonitorView, Msg, NoticeRetention, Severity,
    StartAck,
};
use monitor_logging::{monitor_debug, monitor_error, monitor_info, monitor_warn, with_poll_tick};

use crate::{Clock, EngineEvent, EngineHandle, JobApi, Sample, StartReply};

/// Receives state changes and notifications for display.
pub trait Presenter {
    fn render(&mut self, view: &MonitorView);

    fn notify(&mut self, severity: Severity, message: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn render(&mut self, _view: &MonitorView) {}

    fn notify(&mut self, _severity: Severity, _message: &str) {}
}

#[derive(Debug, Clone, Copy)]
pub struct MonitorSettings {
    pub cadence: Duration,
    pub retention: NoticeRetention,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            cadence: Duration::from_secs(1),
            retention: NoticeRetention::default(),
        }
    }
}

/// Drives the core state machine: runs its effects on the engine and feeds
/// engine events back in as messages.
pub struct Monitor {
    state: MonitorState,
    engine: EngineHandle,
}

impl Monitor {
    pub fn new(api: Arc<dyn JobApi>, clock: Arc<dyn Clock>, settings: MonitorSettings) -> Self {
        Self {
            state: MonitorState::with_retention(settings.retention),
            engine: EngineHandle::new(api, clock, settings.cadence),
        }
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn engine(&self) -> &EngineHandle {
        &self.engine
    }

    pub fn dispatch(&mut self, msg: Msg, presenter: &mut dyn Presenter) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let view = state.view();
        if state.consume_dirty() {
            presenter.render(&view);
        }
        self.state = state;

        for effect in effects {
            self.run_effect(effect, presenter);
        }
    }

    fn run_effect(&mut self, effect: Effect, presenter: &mut dyn Presenter) {
        match effect {
            Effect::SubmitJob(params) => {
                match params.source() {
                    InputSource::Url(url) => monitor_info!("SubmitJob url={}", url),
                    InputSource::File(blob) => monitor_info!(
                        "SubmitJob file={} bytes={}",
                        blob.file_name,
                        blob.bytes.len()
                    ),
                }
                self.engine.submit(params);
            }
            Effect::StartPolling => {
                if !self.engine.start_polling() {
                    monitor_debug!("StartPolling ignored: session already live");
                }
            }
            Effect::StopPolling => {
                self.engine.stop_polling();
            }
            Effect::FetchResult => {
                monitor_info!("FetchResult");
                self.engine.fetch_result();
            }
            Effect::Notify { severity, message } => {
                match severity {
                    Severity::Info => monitor_info!("notify: {}", message),
                    Severity::Warning => monitor_warn!("notify: {}", message),
                    Severity::Error => monitor_error!("notify: {}", message),
                }
                presenter.notify(severity, &message);
            }
        }
    }

    /// Maps an engine event to a message, applying the failure policy:
    /// progress and log failures are dropped, completion-check failures are not.
    pub fn translate(&self, event: EngineEvent) -> Option<Msg> {
        match event {
            EngineEvent::StartFinished(Ok(StartReply::Started)) => {
                Some(Msg::StartAcknowledged(StartAck::Started))
            }
            EngineEvent::StartFinished(Ok(StartReply::Other(raw))) => {
                monitor_warn!("start rejected: {}", raw);
                Some(Msg::StartAcknowledged(StartAck::Rejected(raw)))
            }
            EngineEvent::StartFinished(Err(err)) => {
                monitor_error!("start request failed: {}", err);
                Some(Msg::StartAcknowledged(StartAck::Failed(err.to_string())))
            }
            EngineEvent::Sampled {
                session,
                tick,
                sample,
            } => {
                if self.engine.last_session() != Some(session) {
                    monitor_debug!("dropping tick {} sample from old session {}", tick, session);
                    return None;
                }
                with_poll_tick(tick, || match sample {
                    Sample::Progress(Ok(snapshot)) => Some(Msg::ProgressSampled(snapshot)),
                    Sample::Progress(Err(err)) => {
                        monitor_debug!("progress sample failed: {}", err);
                        None
                    }
                    Sample::Logs(Ok(lines)) => Some(Msg::LogsSampled(lines)),
                    Sample::Logs(Err(err)) => {
                        monitor_debug!("log sample failed: {}", err);
                        None
                    }
                    Sample::Completion(Ok(snapshot)) => {
                        if snapshot.running.is_none() {
                            monitor_warn!("completion check had no running flag");
                        }
                        Some(Msg::CompletionChecked(snapshot))
                    }
                    Sample::Completion(Err(err)) => {
                        monitor_warn!("completion check failed: {}", err);
                        Some(Msg::CompletionCheckFailed(err.to_string()))
                    }
                })
            }
            EngineEvent::ResultFetched(Ok(artifact)) => {
                monitor_info!("result retrieved ({} bytes)", artifact.len());
                Some(Msg::ResultFetched(Ok(artifact)))
            }
            EngineEvent::ResultFetched(Err(err)) => {
                monitor_warn!("result unavailable: {}", err);
                Some(Msg::ResultFetched(Err(err.to_string())))
            }
        }
    }

    /// Waits for one engine event and applies it. Returns `false` if the
    /// event stream ended.
    pub async fn step(&mut self, presenter: &mut dyn Presenter) -> bool {
        match self.engine.next_event().await {
            Some(event) => {
                if let Some(msg) = self.translate(event) {
                    self.dispatch(msg, presenter);
                }
                true
            }
            None => false,
        }
    }

    /// Processes events until nothing more is expected from the engine: the
    /// result was retrieved or found unavailable, or the submission failed.
    pub async fn run_until_finished(&mut self, presenter: &mut dyn Presenter) -> &MonitorState {
        while self.state.is_active() {
            if !self.step(presenter).await {
                break;
            }
        }
        &self.state
    }
}
