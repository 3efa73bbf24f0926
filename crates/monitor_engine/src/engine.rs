use std::sync::Arc;
use std::time::Duration;

use monitor_core::JobParameters;
use tokio::sync::mpsc;

use crate::{Clock, EngineEvent, JobApi, PollingScheduler, SessionId};

/// Runs requests against the job API and reports their outcomes as events.
///
/// All work is spawned onto the current tokio runtime; results come back in
/// arrival order through [`EngineHandle::next_event`].
pub struct EngineHandle {
    api: Arc<dyn JobApi>,
    scheduler: PollingScheduler,
    event_tx: mpsc::UnboundedSender<EngineEvent>,
    event_rx: mpsc::UnboundedReceiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(api: Arc<dyn JobApi>, clock: Arc<dyn Clock>, cadence: Duration) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let scheduler = PollingScheduler::new(api.clone(), clock, cadence, event_tx.clone());
        Self {
            api,
            scheduler,
            event_tx,
            event_rx,
        }
    }

    pub fn submit(&self, params: JobParameters) {
        let api = self.api.clone();
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = api.start(&params).await;
            let _ = event_tx.send(EngineEvent::StartFinished(result));
        });
    }

    pub fn start_polling(&mut self) -> bool {
        self.scheduler.start()
    }

    pub fn stop_polling(&mut self) -> bool {
        self.scheduler.stop()
    }

    pub fn fetch_result(&self) {
        let api = self.api.clone();
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = api.result().await;
            let _ = event_tx.send(EngineEvent::ResultFetched(result));
        });
    }

    pub fn is_polling(&self) -> bool {
        self.scheduler.is_live()
    }

    pub fn last_session(&self) -> Option<SessionId> {
        self.scheduler.last_session()
    }

    pub async fn next_event(&mut self) -> Option<EngineEvent> {
        self.event_rx.recv().await
    }
}
