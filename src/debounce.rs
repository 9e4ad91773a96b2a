//! Trailing-edge debouncing.
//!
//! A [`Debouncer`] owns a single pending slot: every [`Debouncer::call`]
//! cancels whatever is scheduled and schedules the callback again after the
//! delay, so only the last call of a burst runs, with that call's arguments.
//! Create one debouncer per logical listener; two call sites sharing an
//! instance cancel each other.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

pub const DEFAULT_DELAY: Duration = Duration::from_millis(200);

type Callback<T> = Arc<dyn Fn(T) + Send + Sync>;

pub struct Debouncer<T> {
    delay: Duration,
    callback: Callback<T>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(callback: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self::with_delay(callback, DEFAULT_DELAY)
    }

    pub fn with_delay(callback: impl Fn(T) + Send + Sync + 'static, delay: Duration) -> Self {
        Self {
            delay,
            callback: Arc::new(callback),
            pending: Mutex::new(None),
        }
    }

    /// Schedules `callback(args)` after the delay, dropping any earlier
    /// scheduled call. Outside a tokio runtime the callback runs inline.
    pub fn call(&self, args: T) {
        let mut pending = self.pending.lock();

        if let Some(previous) = pending.take() {
            previous.abort();
        }

        let Ok(handle) = Handle::try_current() else {
            drop(pending);
            debug!("No async runtime, running debounced callback inline");
            (self.callback)(args);
            return;
        };

        let callback = Arc::clone(&self.callback);
        let delay = self.delay;

        *pending = Some(handle.spawn(async move {
            tokio::time::sleep(delay).await;
            callback(args);
        }));
    }

    /// Whether a scheduled call has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}
