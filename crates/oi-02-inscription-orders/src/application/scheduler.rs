//! # Poll Scheduler
//!
//! Drives one order to a terminal state by repeatedly fetching its remote
//! snapshot.
//!
//! ## Loop
//!
//! 1. Fetch (the first fetch is immediate) and await it to completion.
//!    Fetches never overlap.
//! 2. If cancellation was signalled meanwhile, discard the result and stop.
//! 3. Apply the snapshot through the state machine and hand the new order
//!    to `on_update`, in fetch order.
//! 4. Stop on a terminal state. Otherwise sleep `interval_for(order)`,
//!    waking early only to observe cancellation.
//!
//! Fetch failures are transient: they are logged and the next fetch is
//! scheduled at the current phase's interval, without limit. Consistency
//! errors from the state machine end the loop.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::{
    apply, InscriptionOrder, IntervalPolicy, OrderError, OrderId, RemoteError,
    RemoteOrderSnapshot,
};

// =============================================================================
// CANCELLATION
// =============================================================================

/// Owner side of a cancellation pair.
///
/// Dropping every handle does not cancel; only [`cancel`](Self::cancel)
/// does.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

/// Observer side of a cancellation pair. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

/// Create a linked handle and signal.
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelSignal { rx })
}

impl CancelHandle {
    /// Signal cancellation to every linked signal.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Another signal linked to this handle.
    pub fn signal(&self) -> CancelSignal {
        CancelSignal {
            rx: self.tx.subscribe(),
        }
    }
}

impl CancelSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    /// Whether cancellation has been signalled.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once cancellation is signalled. Pending forever if every
    /// handle was dropped without cancelling.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

// =============================================================================
// SCHEDULER
// =============================================================================

/// How a poll loop ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollOutcome {
    /// The order reached `Completed` or `Failed`.
    Settled(InscriptionOrder),
    /// The caller cancelled first.
    Cancelled {
        /// Last order delivered to `on_update`, if any.
        last: Option<InscriptionOrder>,
    },
}

/// Adaptive poll loop.
#[derive(Clone, Copy, Debug, Default)]
pub struct PollScheduler {
    policy: IntervalPolicy,
}

impl PollScheduler {
    /// Create a scheduler with `policy`.
    pub fn new(policy: IntervalPolicy) -> Self {
        Self { policy }
    }

    /// Interval policy in use.
    pub fn policy(&self) -> &IntervalPolicy {
        &self.policy
    }

    /// Poll `order_id` until it settles or `cancel` fires.
    ///
    /// `initial` is the order as known before polling (e.g. from the
    /// submission response); it seeds the state machine and the interval.
    ///
    /// # Errors
    /// * `OrderError::OrderIdMismatch` - a snapshot for another order
    /// * `OrderError::StaleSnapshot` - an impossible backwards move
    pub async fn schedule<F, Fut, U>(
        &self,
        order_id: &OrderId,
        initial: Option<InscriptionOrder>,
        mut fetch: F,
        mut on_update: U,
        mut cancel: CancelSignal,
    ) -> Result<PollOutcome, OrderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<RemoteOrderSnapshot, RemoteError>>,
        U: FnMut(&InscriptionOrder),
    {
        let mut current = initial;
        if let Some(order) = current.as_ref().filter(|o| o.is_terminal()) {
            return Ok(PollOutcome::Settled(order.clone()));
        }

        let mut failures: u64 = 0;
        loop {
            if cancel.is_cancelled() {
                return Ok(PollOutcome::Cancelled { last: current });
            }

            let result = fetch().await;
            if cancel.is_cancelled() {
                debug!("[oi-02] Order {} cancelled during fetch; result discarded", order_id);
                return Ok(PollOutcome::Cancelled { last: current });
            }

            match result {
                Ok(snapshot) => {
                    if snapshot.id != *order_id {
                        return Err(OrderError::OrderIdMismatch {
                            expected: order_id.clone(),
                            actual: snapshot.id,
                        });
                    }
                    let order = apply(current.as_ref(), snapshot)?;
                    debug!("[oi-02] Order {} is {}", order_id, order.state());
                    on_update(&order);

                    if order.is_terminal() {
                        info!("[oi-02] Order {} settled as {}", order_id, order.state());
                        return Ok(PollOutcome::Settled(order));
                    }
                    current = Some(order);
                }
                Err(e) => {
                    failures += 1;
                    warn!(
                        "[oi-02] Fetch for order {} failed ({} so far): {}",
                        order_id, failures, e
                    );
                }
            }

            let delay = self.policy.interval_for(current.as_ref());
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = cancel.cancelled() => {
                    debug!("[oi-02] Order {} cancelled while waiting", order_id);
                    return Ok(PollOutcome::Cancelled { last: current });
                }
            }
        }
    }
}

// =============================================================================
// ORDER WATCH
// =============================================================================

/// A spawned poll loop whose updates are published as whole values.
///
/// Every update replaces the published `Arc<InscriptionOrder>`; readers
/// never see a partially updated order.
///
/// Dropping the watch aborts the poll loop at its next suspension point.
#[derive(Debug)]
pub struct OrderWatch {
    rx: watch::Receiver<Option<Arc<InscriptionOrder>>>,
    task: JoinHandle<Result<PollOutcome, OrderError>>,
}

impl OrderWatch {
    /// Spawn `scheduler` for `order_id` on the current tokio runtime.
    pub fn spawn<F, Fut>(
        scheduler: PollScheduler,
        order_id: OrderId,
        initial: Option<InscriptionOrder>,
        fetch: F,
        cancel: CancelSignal,
    ) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<RemoteOrderSnapshot, RemoteError>> + Send + 'static,
    {
        let (tx, rx) = watch::channel(initial.clone().map(Arc::new));
        let task = tokio::spawn(async move {
            scheduler
                .schedule(
                    &order_id,
                    initial,
                    fetch,
                    |order| {
                        tx.send_replace(Some(Arc::new(order.clone())));
                    },
                    cancel,
                )
                .await
        });
        Self { rx, task }
    }

    /// Latest published order.
    pub fn current(&self) -> Option<Arc<InscriptionOrder>> {
        self.rx.borrow().clone()
    }

    /// A receiver for observing updates.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<InscriptionOrder>>> {
        self.rx.clone()
    }

    /// Wait for the poll loop to end.
    pub async fn finished(mut self) -> Result<PollOutcome, OrderError> {
        (&mut self.task)
            .await
            .map_err(|e| OrderError::PollerStopped(e.to_string()))?
    }
}

impl Drop for OrderWatch {
    fn drop(&mut self) {
        self.task.abort();
    }
}
