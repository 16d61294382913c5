//! Periodic tick source.
//!
//! A ticker sends one event per period on a channel while it is active. It
//! does not try to catch up after the runtime falls behind; late ticks are
//! simply delayed.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Sends `event` every `period` while started.
#[derive(Debug)]
pub struct Ticker<E> {
    period: Duration,
    tx: UnboundedSender<E>,
    event: E,
    handle: Option<JoinHandle<()>>,
}

impl<E: Clone + Send + 'static> Ticker<E> {
    /// Create a stopped ticker.
    #[must_use]
    pub const fn new(period: Duration, tx: UnboundedSender<E>, event: E) -> Self {
        Self {
            period,
            tx,
            event,
            handle: None,
        }
    }

    /// Create a stopped ticker with a one-second period.
    #[must_use]
    pub const fn every_second(tx: UnboundedSender<E>, event: E) -> Self {
        Self::new(Duration::from_secs(1), tx, event)
    }

    /// Start ticking. The first event arrives one full period from now.
    ///
    /// Must be called from within a tokio runtime. Does nothing if already
    /// active.
    pub fn start(&mut self) {
        if self.is_active() {
            return;
        }

        let period = self.period;
        let tx = self.tx.clone();
        let event = self.event.clone();

        self.handle = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(event.clone()).is_err() {
                    break;
                }
            }
        }));
    }

    /// Stop ticking.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Whether the tick task is alive.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl<E> Drop for Ticker<E> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
