//! Sync outcomes and observer plumbing.
//!
//! Kind-level failures (fetch, commit) are the only events the pipeline
//! surfaces; per-record rejections stay internal. Callers get both a
//! returned outcome per kind and, for push-style consumers, an observer
//! callback.

use tracing::{info, warn};

use crate::mirror_store::StoreError;
use crate::remote::{ResourceKind, TransportError};

/// Terminal failure of one kind's sync.
#[derive(Debug)]
pub enum SyncFailure {
    /// The remote fetch failed; the store was not touched for this kind.
    Fetch(TransportError),
    /// The commit failed; staged inserts for this kind were discarded.
    Commit(StoreError),
}

/// Outcome of syncing one kind.
#[derive(Debug)]
pub struct SyncOutcome {
    pub kind: ResourceKind,
    /// Records returned by the remote.
    pub fetched: usize,
    /// Records accepted and durably committed.
    pub inserted: usize,
    /// Records dropped by per-record validation (never an error).
    pub skipped: usize,
    pub failure: Option<SyncFailure>,
}

impl SyncOutcome {
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }
}

/// Observer notified about kind-level sync events.
pub trait SyncObserver: Send + Sync {
    fn on_fetch_failed(&self, _kind: ResourceKind, _error: &TransportError) {}

    fn on_commit_failed(&self, _kind: ResourceKind, _error: &StoreError) {}

    fn on_kind_synced(&self, _outcome: &SyncOutcome) {}
}

/// Observer that reports through the tracing log. Default wiring for the
/// CLI, where nothing programmatic consumes the events.
pub struct LoggingObserver;

impl SyncObserver for LoggingObserver {
    fn on_fetch_failed(&self, kind: ResourceKind, error: &TransportError) {
        warn!("Fetch of {} failed: {}", kind, error);
    }

    fn on_commit_failed(&self, kind: ResourceKind, error: &StoreError) {
        warn!("Commit of {} failed: {}", kind, error);
    }

    fn on_kind_synced(&self, outcome: &SyncOutcome) {
        info!(
            "Synced {}: {} fetched, {} inserted, {} skipped",
            outcome.kind, outcome.fetched, outcome.inserted, outcome.skipped
        );
    }
}
