//! Resource fetch controller.
//!
//! Tracks `{data, loading, error}` for one logical remote resource keyed by
//! a dependency key. Consumers read snapshots with [`FetchController::state`]
//! or await transitions through [`FetchController::subscribe`]; every fetch
//! is triggered explicitly (construction, [`FetchController::refetch`], or a
//! key change) and settles through a single arbitration point so overlapping
//! attempts cannot write out of order.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use proxwatch_api::ApiError;
use tokio::sync::watch;
use tracing::debug;

/// Boxed fetch attempt future.
pub type FetchFuture<T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send>>;

/// Boxed producer of one fetch attempt for a given key.
pub type Producer<K, T> = Arc<dyn Fn(K) -> FetchFuture<T> + Send + Sync>;

/// Observable state of a tracked resource.
///
/// While `loading` is true, `data` and `error` hold the previous settled
/// values; stale-but-present data is deliberately retained so a consumer
/// can keep rendering it during a refresh.
#[derive(Debug, Clone)]
pub struct FetchState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<ApiError>,
}

impl<T> FetchState<T> {
    fn initial() -> Self {
        Self {
            data: None,
            loading: true,
            error: None,
        }
    }

    /// True once the current attempt has reached a final outcome.
    pub fn is_settled(&self) -> bool {
        !self.loading
    }

    /// True only before the first-ever settle for the current key.
    pub fn is_first_load(&self) -> bool {
        self.loading && self.data.is_none()
    }
}

struct Inner<T> {
    state_tx: watch::Sender<FetchState<T>>,
    /// Sequence number handed to the most recently initiated attempt.
    issued: AtomicU64,
    /// Highest sequence number that settled or was invalidated. Attempts
    /// at or below this lost the race and must not write state.
    settled: Mutex<u64>,
    last_success: Mutex<Option<DateTime<Utc>>>,
}

impl<T> Inner<T> {
    fn settle(&self, seq: u64, outcome: Result<T, ApiError>) {
        let mut settled = self.settled.lock().expect("settle lock poisoned");
        if seq <= *settled {
            debug!(seq, latest = *settled, "discarding stale fetch attempt");
            return;
        }
        *settled = seq;

        match outcome {
            Ok(data) => {
                *self
                    .last_success
                    .lock()
                    .expect("last_success lock poisoned") = Some(Utc::now());
                self.state_tx.send_modify(|state| {
                    state.data = Some(data);
                    state.loading = false;
                    state.error = None;
                });
            }
            Err(error) => {
                debug!(seq, %error, "fetch attempt failed");
                // previous data is retained alongside the error
                self.state_tx.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(error);
                });
            }
        }
    }

    /// Mark every in-flight attempt as lost and reset to the initial state.
    fn invalidate(&self) {
        let mut settled = self.settled.lock().expect("settle lock poisoned");
        *settled = self.issued.load(Ordering::SeqCst);
        *self
            .last_success
            .lock()
            .expect("last_success lock poisoned") = None;
        self.state_tx.send_replace(FetchState::initial());
    }
}

/// Asynchronous fetch controller for a single logical resource.
///
/// Dropping the controller is the teardown path: attempts in flight hold
/// only a weak reference to its state and their results are discarded
/// unobservably once it is gone.
pub struct FetchController<K, T> {
    inner: Arc<Inner<T>>,
    key: Mutex<K>,
    producer: Producer<K, T>,
}

impl<K, T> FetchController<K, T>
where
    K: Clone + PartialEq + Send + 'static,
    T: Send + Sync + 'static,
{
    /// Create a controller and issue the initial fetch for `key`.
    ///
    /// Must be called within a tokio runtime; attempts run as spawned
    /// tasks.
    pub fn new<P, F>(key: K, producer: P) -> Self
    where
        P: Fn(K) -> F + Send + Sync + 'static,
        F: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let producer: Producer<K, T> =
            Arc::new(move |key| -> FetchFuture<T> { Box::pin(producer(key)) });
        let (state_tx, _) = watch::channel(FetchState::initial());
        let controller = Self {
            inner: Arc::new(Inner {
                state_tx,
                issued: AtomicU64::new(0),
                settled: Mutex::new(0),
                last_success: Mutex::new(None),
            }),
            key: Mutex::new(key),
            producer,
        };
        controller.refetch();
        controller
    }

    /// Current snapshot; never blocks.
    pub fn state(&self) -> FetchState<T>
    where
        T: Clone,
    {
        self.inner.state_tx.borrow().clone()
    }

    /// Receiver notified on every state transition.
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.inner.state_tx.subscribe()
    }

    /// The dependency key currently tracked.
    pub fn key(&self) -> K {
        self.key.lock().expect("key lock poisoned").clone()
    }

    /// Time of the last successful settle for the current key, if any.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        *self
            .inner
            .last_success
            .lock()
            .expect("last_success lock poisoned")
    }

    /// Trigger a new fetch attempt. Non-blocking; completion is observed
    /// via the next state transition.
    ///
    /// Overlapping attempts are arbitrated by sequence number: only the
    /// latest-initiated attempt may write state, so a slow stale response
    /// can never clobber a newer one.
    pub fn refetch(&self) {
        let seq = self.inner.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.state_tx.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });

        let attempt = (self.producer)(self.key());
        let weak = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            // Run the attempt as its own task so one that dies without
            // producing a result still settles as a transport error.
            let outcome = match tokio::spawn(attempt).await {
                Ok(result) => result,
                Err(join_error) => Err(ApiError::Transport(format!(
                    "fetch attempt did not settle: {join_error}"
                ))),
            };
            match weak.upgrade() {
                Some(inner) => inner.settle(seq, outcome),
                None => debug!(seq, "controller dropped in flight; result discarded"),
            }
        });
    }

    /// Switch the controller to a different dependency key.
    ///
    /// No-op when the key is unchanged. Otherwise all in-flight attempts
    /// are invalidated, state resets synchronously to
    /// `{data: None, loading: true, error: None}`, and a fresh attempt is
    /// issued. Returns whether the key actually changed.
    pub fn set_key(&self, new_key: K) -> bool {
        {
            let mut key = self.key.lock().expect("key lock poisoned");
            if *key == new_key {
                return false;
            }
            *key = new_key;
        }
        self.inner.invalidate();
        self.refetch();
        true
    }
}
