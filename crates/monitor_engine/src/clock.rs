use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{Instant, Interval, MissedTickBehavior};

/// A recurring timer owned by one polling session.
#[async_trait::async_trait]
pub trait Ticker: Send {
    /// Waits for the next tick. Returns `false` once the source can no longer tick.
    async fn tick(&mut self) -> bool;
}

/// Source of tickers, injected so tests can drive polling without real time.
pub trait Clock: Send + Sync {
    fn ticker(&self, cadence: Duration) -> Box<dyn Ticker>;
}

/// Wall-clock ticks from the tokio timer. Must be used inside a runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn ticker(&self, cadence: Duration) -> Box<dyn Ticker> {
        let cadence = cadence.max(Duration::from_millis(1));
        // First tick one cadence after start, like a plain interval timer.
        let mut interval = tokio::time::interval_at(Instant::now() + cadence, cadence);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Box::new(IntervalTicker { interval })
    }
}

struct IntervalTicker {
    interval: Interval,
}

#[async_trait::async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) -> bool {
        self.interval.tick().await;
        true
    }
}

/// Test clock: every [`ManualClock::advance`] delivers one tick to each live ticker.
#[derive(Debug, Clone)]
pub struct ManualClock {
    tx: broadcast::Sender<()>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(64);
        Self { tx }
    }

    /// Fires one tick; returns how many tickers received it.
    pub fn advance(&self) -> usize {
        self.tx.send(()).unwrap_or(0)
    }

    /// Number of tickers currently subscribed, i.e. live recurring activities.
    pub fn live_tickers(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Clock for ManualClock {
    fn ticker(&self, _cadence: Duration) -> Box<dyn Ticker> {
        Box::new(ManualTicker {
            rx: self.tx.subscribe(),
        })
    }
}

struct ManualTicker {
    rx: broadcast::Receiver<()>,
}

#[async_trait::async_trait]
impl Ticker for ManualTicker {
    async fn tick(&mut self) -> bool {
        match self.rx.recv().await {
            Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => true,
            Err(broadcast::error::RecvError::Closed) => false,
        }
    }
}
