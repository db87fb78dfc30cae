//! Polling controller.
//!
//! Drives a [`FetchController`] on a fixed wall-clock period. Ticks fire on
//! schedule whether or not the previous attempt has settled; the fetch
//! layer's sequence arbitration decides which result wins. The timer is an
//! exclusively owned resource whose lifetime is bounded by the controller:
//! a dropped controller can never keep firing network calls.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use proxwatch_api::ApiError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, trace};

use crate::fetch::{FetchController, FetchState};

/// Exclusive owner of an armed timer task. Released on disarm and
/// unconditionally on drop.
struct TimerSlot(Option<JoinHandle<()>>);

impl TimerSlot {
    fn disarm(&mut self) {
        if let Some(handle) = self.0.take() {
            handle.abort();
            trace!("poll timer disarmed");
        }
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        self.disarm();
    }
}

/// Periodic fetch driver for a single tracked resource.
pub struct PollController<K, T> {
    fetch: Arc<FetchController<K, T>>,
    period: Mutex<Duration>,
    timer: Mutex<TimerSlot>,
}

impl<K, T> PollController<K, T>
where
    K: Clone + PartialEq + Send + 'static,
    T: Send + Sync + 'static,
{
    /// Create a controller: one immediate fetch, then one fetch per
    /// `period` tick. A zero period disables automatic polling; manual
    /// [`PollController::refetch`] remains available.
    pub fn new<P, F>(key: K, period: Duration, producer: P) -> Self
    where
        P: Fn(K) -> F + Send + Sync + 'static,
        F: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let fetch = Arc::new(FetchController::new(key, producer));
        let controller = Self {
            fetch,
            period: Mutex::new(period),
            timer: Mutex::new(TimerSlot(None)),
        };
        controller.arm();
        controller
    }

    /// Current snapshot; never blocks.
    pub fn state(&self) -> FetchState<T>
    where
        T: Clone,
    {
        self.fetch.state()
    }

    /// Receiver notified on every state transition.
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.fetch.subscribe()
    }

    pub fn key(&self) -> K {
        self.fetch.key()
    }

    pub fn period(&self) -> Duration {
        *self.period.lock().expect("period lock poisoned")
    }

    /// Time of the last successful settle, or `None` if no attempt for the
    /// current key has succeeded yet. Errors and discarded stale results
    /// never advance it.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.fetch.last_updated()
    }

    /// Out-of-band fetch; does not disturb the tick schedule.
    pub fn refetch(&self) {
        self.fetch.refetch();
    }

    /// Change the polling period. No-op when unchanged; otherwise the
    /// timer is disarmed, one immediate fetch is issued, and the timer is
    /// re-armed on the new period (zero leaves it stopped).
    pub fn set_period(&self, period: Duration) {
        {
            let mut current = self.period.lock().expect("period lock poisoned");
            if *current == period {
                return;
            }
            *current = period;
        }
        self.fetch.refetch();
        self.arm();
    }

    /// Switch to a different dependency key. Delegates to the fetch layer
    /// (state reset + immediate fetch) and restarts the tick schedule.
    pub fn set_key(&self, key: K) {
        if self.fetch.set_key(key) {
            self.arm();
        }
    }

    fn arm(&self) {
        let period = self.period();
        let mut slot = self.timer.lock().expect("timer lock poisoned");
        slot.disarm();

        if period.is_zero() {
            debug!("automatic polling disabled");
            return;
        }

        debug!(period_ms = period.as_millis() as u64, "poll timer armed");
        let weak = Arc::downgrade(&self.fetch);
        slot.0 = Some(tokio::spawn(async move {
            let mut ticker = interval(period);
            // Ticks stay on the wall-clock grid even when a fetch runs
            // longer than the period.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately; the initial fetch is
            // already in flight.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match weak.upgrade() {
                    Some(fetch) => fetch.refetch(),
                    None => break,
                }
            }
        }));
    }
}
