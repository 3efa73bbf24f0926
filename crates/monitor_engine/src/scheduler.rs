use std::sync::Arc;
use std::time::Duration;

use monitor_logging::{monitor_debug, monitor_info, monitor_trace, monitor_warn, with_poll_tick};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{Clock, EngineEvent, JobApi, Sample, SessionId, Ticker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SampleKind {
    Progress,
    Logs,
    Completion,
}

/// Issue order within one tick.
const TICK_ORDER: [SampleKind; 3] = [SampleKind::Progress, SampleKind::Logs, SampleKind::Completion];

struct LiveSession {
    id: SessionId,
    token: CancellationToken,
    _task: JoinHandle<()>,
}

/// Owns the single recurring polling activity.
///
/// `start` and `stop` are idempotent and decided by the liveness of the
/// current session alone; neither makes a network call.
pub struct PollingScheduler {
    api: Arc<dyn JobApi>,
    clock: Arc<dyn Clock>,
    cadence: Duration,
    events: mpsc::UnboundedSender<EngineEvent>,
    last_session: Option<SessionId>,
    live: Option<LiveSession>,
}

impl PollingScheduler {
    pub fn new(
        api: Arc<dyn JobApi>,
        clock: Arc<dyn Clock>,
        cadence: Duration,
        events: mpsc::UnboundedSender<EngineEvent>,
    ) -> Self {
        Self {
            api,
            clock,
            cadence,
            events,
            last_session: None,
            live: None,
        }
    }

    /// Starts a session unless one is live. Returns whether a new one started.
    pub fn start(&mut self) -> bool {
        if self.live.is_some() {
            return false;
        }

        let id = self.last_session.map_or(1, |prev| prev + 1);
        let token = CancellationToken::new();
        let ticker = self.clock.ticker(self.cadence);
        let task = tokio::spawn(run_session(
            id,
            ticker,
            token.clone(),
            self.api.clone(),
            self.events.clone(),
        ));

        monitor_info!("poll session {} started, cadence {:?}", id, self.cadence);
        self.last_session = Some(id);
        self.live = Some(LiveSession {
            id,
            token,
            _task: task,
        });
        true
    }

    /// Cancels the live session, if any. Returns whether one was stopped.
    pub fn stop(&mut self) -> bool {
        match self.live.take() {
            Some(session) => {
                session.token.cancel();
                monitor_info!("poll session {} stopped", session.id);
                true
            }
            None => false,
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    pub fn live_session(&self) -> Option<SessionId> {
        self.live.as_ref().map(|session| session.id)
    }

    /// The most recently started session, live or stopped.
    pub fn last_session(&self) -> Option<SessionId> {
        self.last_session
    }
}

impl Drop for PollingScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_session(
    session: SessionId,
    mut ticker: Box<dyn Ticker>,
    token: CancellationToken,
    api: Arc<dyn JobApi>,
    events: mpsc::UnboundedSender<EngineEvent>,
) {
    let mut tick: u64 = 0;
    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            alive = ticker.tick() => {
                if !alive {
                    monitor_warn!("clock closed; poll session {} ends", session);
                    break;
                }
            }
        }

        tick += 1;
        with_poll_tick(tick, || monitor_trace!("poll session {} issuing samples", session));
        for kind in TICK_ORDER {
            tokio::spawn(take_sample(
                kind,
                session,
                tick,
                api.clone(),
                token.clone(),
                events.clone(),
            ));
        }
    }
    monitor_debug!("poll session {} ended after {} ticks", session, tick);
}

async fn take_sample(
    kind: SampleKind,
    session: SessionId,
    tick: u64,
    api: Arc<dyn JobApi>,
    token: CancellationToken,
    events: mpsc::UnboundedSender<EngineEvent>,
) {
    // Stopped between scheduling and issuing: the request is never sent.
    if token.is_cancelled() {
        with_poll_tick(tick, || monitor_trace!("{:?} sample skipped: session stopped", kind));
        return;
    }

    let sample = match kind {
        SampleKind::Progress => Sample::Progress(api.progress().await),
        SampleKind::Logs => Sample::Logs(api.logs().await),
        SampleKind::Completion => Sample::Completion(api.progress().await),
    };
    let _ = events.send(EngineEvent::Sampled {
        session,
        tick,
        sample,
    });
}
