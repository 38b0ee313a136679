//! Fixed-interval fetching of the summary document.
//!
//! Every tick (and every manual refresh) spawns an independent fetch. Fetches
//! are never cancelled, so responses can land out of order; whichever lands
//! last is what gets shown.

use crate::error::Result;
use crate::services::summary::DashboardView;
use crate::services::units::CashUnit;
use crate::sources::SummarySource;
use crate::types::SummaryDocument;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Result of one fetch.
#[derive(Debug)]
pub struct FetchOutcome {
    /// Monotonic id assigned when the fetch was requested.
    pub request_id: u64,
    pub result: Result<SummaryDocument>,
}

/// Spawns fetches and delivers their outcomes over a channel.
#[derive(Clone)]
pub struct Poller {
    source: Arc<SummarySource>,
    next_id: Arc<AtomicU64>,
    tx: mpsc::UnboundedSender<FetchOutcome>,
}

impl Poller {
    /// Create a poller and the receiver its outcomes arrive on.
    pub fn new(source: Arc<SummarySource>) -> (Self, mpsc::UnboundedReceiver<FetchOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let poller = Self {
            source,
            next_id: Arc::new(AtomicU64::new(0)),
            tx,
        };
        (poller, rx)
    }

    /// Spawn one fetch and return its request id.
    pub fn trigger(&self) -> u64 {
        let request_id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let source = self.source.clone();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let result = source.fetch().await;
            // Receiver gone means the UI has shut down.
            let _ = tx.send(FetchOutcome { request_id, result });
        });

        request_id
    }

    /// Trigger a fetch on every tick of `interval`, starting immediately.
    pub fn start(&self, interval: Duration) -> JoinHandle<()> {
        let poller = self.clone();
        info!(
            "Polling {} every {}s",
            poller.source.describe(),
            interval.as_secs()
        );

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if poller.tx.is_closed() {
                    break;
                }
                let id = poller.trigger();
                debug!("Scheduled fetch #{}", id);
            }
        })
    }
}

/// What the dashboard currently shows, plus fetch bookkeeping.
#[derive(Debug, Clone)]
pub struct PollState {
    cash_unit: CashUnit,
    view: Option<DashboardView>,
    last_applied_id: u64,
    last_error: Option<String>,
    successes: u64,
    failures: u64,
}

impl PollState {
    pub fn new(cash_unit: CashUnit) -> Self {
        Self {
            cash_unit,
            view: None,
            last_applied_id: 0,
            last_error: None,
            successes: 0,
            failures: 0,
        }
    }

    /// Apply a fetch outcome. Returns true when the view was replaced.
    ///
    /// Failures are logged and leave the current view untouched.
    pub fn apply(&mut self, outcome: FetchOutcome) -> bool {
        match outcome.result {
            Ok(doc) => {
                if outcome.request_id < self.last_applied_id {
                    debug!(
                        "Fetch #{} resolved after newer #{}; showing it anyway",
                        outcome.request_id, self.last_applied_id
                    );
                }
                self.view = Some(DashboardView::from_document(&doc, self.cash_unit));
                self.last_applied_id = outcome.request_id;
                self.last_error = None;
                self.successes += 1;
                true
            }
            Err(e) => {
                if e.is_transient() {
                    warn!("Error loading summary (fetch #{}): {}", outcome.request_id, e);
                } else {
                    error!(
                        "Error loading summary (fetch #{}), retrying will not help: {}",
                        outcome.request_id, e
                    );
                }
                self.last_error = Some(e.to_string());
                self.failures += 1;
                false
            }
        }
    }

    pub fn view(&self) -> Option<&DashboardView> {
        self.view.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_applied_id(&self) -> u64 {
        self.last_applied_id
    }

    pub fn successes(&self) -> u64 {
        self.successes
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }
}

/// Fetch once and build the view.
pub async fn fetch_view(source: &SummarySource, cash_unit: CashUnit) -> Result<DashboardView> {
    let doc = source.fetch().await?;
    Ok(DashboardView::from_document(&doc, cash_unit))
}
