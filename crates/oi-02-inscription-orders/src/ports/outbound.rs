//! # Outbound Ports (Driven Ports / SPI)
//!
//! The remote collaborators an order depends on, plus in-memory doubles
//! for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{OrderId, OrderSubmission, RecommendedFees, RemoteError, RemoteOrderSnapshot};

/// Remote inscription service.
#[async_trait]
pub trait InscriptionServiceClient: Send + Sync {
    /// Place an order. Returns the service's first snapshot of it.
    async fn create_order(
        &self,
        submission: &OrderSubmission,
    ) -> Result<RemoteOrderSnapshot, RemoteError>;

    /// Fetch the current snapshot of an order.
    async fn fetch_order(&self, id: &OrderId) -> Result<RemoteOrderSnapshot, RemoteError>;
}

/// External fee-rate estimates.
#[async_trait]
pub trait FeeRateSource: Send + Sync {
    /// Current recommended fee rates.
    async fn recommended_fees(&self) -> Result<RecommendedFees, RemoteError>;
}

// =============================================================================
// TEST DOUBLES
// =============================================================================

/// Inscription service that plays back a script of fetch results.
///
/// `create_order` answers with the configured snapshot. Each
/// `fetch_order` pops the next scripted result; once the script runs out
/// the last successful snapshot is repeated.
#[derive(Debug, Default)]
pub struct ScriptedInscriptionService {
    created: Option<RemoteOrderSnapshot>,
    script: Mutex<VecDeque<Result<RemoteOrderSnapshot, RemoteError>>>,
    last: Mutex<Option<RemoteOrderSnapshot>>,
    submissions: Mutex<Vec<OrderSubmission>>,
    fetches: AtomicUsize,
}

impl ScriptedInscriptionService {
    /// Create a service whose `create_order` returns `created`.
    pub fn new(created: RemoteOrderSnapshot) -> Self {
        Self {
            created: Some(created),
            ..Default::default()
        }
    }

    /// Queue a successful fetch.
    pub fn then_return(self, snapshot: RemoteOrderSnapshot) -> Self {
        self.script.lock().push_back(Ok(snapshot));
        self
    }

    /// Queue a failed fetch.
    pub fn then_fail(self, error: RemoteError) -> Self {
        self.script.lock().push_back(Err(error));
        self
    }

    /// Submissions received so far.
    pub fn submissions(&self) -> Vec<OrderSubmission> {
        self.submissions.lock().clone()
    }

    /// Number of `fetch_order` calls so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InscriptionServiceClient for ScriptedInscriptionService {
    async fn create_order(
        &self,
        submission: &OrderSubmission,
    ) -> Result<RemoteOrderSnapshot, RemoteError> {
        self.submissions.lock().push(submission.clone());
        self.created
            .clone()
            .ok_or_else(|| RemoteError::Status {
                status: 503,
                body: "no scripted order".to_string(),
            })
    }

    async fn fetch_order(&self, id: &OrderId) -> Result<RemoteOrderSnapshot, RemoteError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().pop_front();
        match next {
            Some(Ok(snapshot)) => {
                *self.last.lock() = Some(snapshot.clone());
                Ok(snapshot)
            }
            Some(Err(e)) => Err(e),
            None => self.last.lock().clone().ok_or_else(|| RemoteError::Status {
                status: 404,
                body: format!("order {id} not found"),
            }),
        }
    }
}

/// Fee source returning fixed estimates, or failing when none are set.
#[derive(Debug, Clone, Default)]
pub struct StaticFeeSource {
    /// Estimates to return; `None` fails every lookup.
    pub fees: Option<RecommendedFees>,
}

impl StaticFeeSource {
    /// Source whose every estimate is `rate`.
    pub fn uniform(rate: i64) -> Self {
        Self {
            fees: Some(RecommendedFees {
                fastest: rate,
                half_hour: rate,
                hour: rate,
                economy: rate,
                minimum: rate,
            }),
        }
    }

    /// Source that always fails.
    pub fn unavailable() -> Self {
        Self { fees: None }
    }
}

#[async_trait]
impl FeeRateSource for StaticFeeSource {
    async fn recommended_fees(&self) -> Result<RecommendedFees, RemoteError> {
        self.fees
            .ok_or_else(|| RemoteError::Transport("Mock failure".to_string()))
    }
}
