//! Sync orchestration: fetch → map → stage → commit, one kind at a time.
//!
//! A full sync processes users, then albums, then photos, committing once
//! per kind. Per-record rejections never abort a batch; fetch and commit
//! failures end only the affected kind and are reported to the observer.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::events::{LoggingObserver, SyncFailure, SyncObserver, SyncOutcome};
use super::mapper::{EntityMapper, MapError, MapperSettings};
use crate::mirror_store::MirrorStore;
use crate::remote::{RemoteFetcher, ResourceKind};

/// Drives the sync pipeline against an injected fetcher and store.
///
/// Stateless across invocations beyond what the store persists; a crash
/// between two kinds leaves a consistent, resumable mirror because re-running
/// skips everything already present.
pub struct SyncCoordinator {
    fetcher: Arc<dyn RemoteFetcher>,
    store: Arc<dyn MirrorStore>,
    observer: Arc<dyn SyncObserver>,
    settings: MapperSettings,
}

impl SyncCoordinator {
    pub fn new(fetcher: Arc<dyn RemoteFetcher>, store: Arc<dyn MirrorStore>) -> Self {
        Self {
            fetcher,
            store,
            observer: Arc::new(LoggingObserver),
            settings: MapperSettings::default(),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn SyncObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_mapper_settings(mut self, settings: MapperSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sync all kinds in dependency order. A later kind is not started
    /// before the earlier kind's commit has completed, and a failed kind
    /// does not abort the remaining ones.
    pub async fn sync_all(&self) -> Vec<SyncOutcome> {
        let mut outcomes = Vec::with_capacity(3);
        for kind in ResourceKind::in_sync_order() {
            outcomes.push(self.sync_kind(kind).await);
        }
        outcomes
    }

    /// Sync one kind. Callers sequencing partial syncs themselves are
    /// responsible for respecting the dependency order.
    pub async fn sync_kind(&self, kind: ResourceKind) -> SyncOutcome {
        info!("Syncing {}...", kind);

        let records = match self.fetcher.fetch(kind).await {
            Ok(records) => records,
            Err(error) => {
                self.observer.on_fetch_failed(kind, &error);
                return SyncOutcome {
                    kind,
                    fetched: 0,
                    inserted: 0,
                    skipped: 0,
                    failure: Some(SyncFailure::Fetch(error)),
                };
            }
        };

        let fetched = records.len();
        let mut skipped = 0;
        let mapper = EntityMapper::new(self.store.as_ref(), self.settings);

        for record in &records {
            match mapper.map(kind, record) {
                Ok(entity) => {
                    if let Err(error) = self.store.insert(entity) {
                        skipped += 1;
                        debug!("{} record not staged: {}", kind, error);
                    }
                }
                Err(MapError::Rejected(reason)) => {
                    skipped += 1;
                    debug!("{} record rejected: {}", kind, reason);
                }
                Err(MapError::Store(error)) => {
                    skipped += 1;
                    warn!("{} record skipped, store lookup failed: {}", kind, error);
                }
            }
        }

        match self.store.commit() {
            Ok(inserted) => {
                let outcome = SyncOutcome {
                    kind,
                    fetched,
                    inserted,
                    skipped,
                    failure: None,
                };
                self.observer.on_kind_synced(&outcome);
                outcome
            }
            Err(error) => {
                self.observer.on_commit_failed(kind, &error);
                SyncOutcome {
                    kind,
                    fetched,
                    inserted: 0,
                    skipped,
                    failure: Some(SyncFailure::Commit(error)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mirror_store::MemoryMirrorStore;
    use crate::remote::{RawRecord, TransportError};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;

    enum Scripted {
        Records(Vec<RawRecord>),
        Failure,
    }

    struct ScriptedFetcher {
        responses: HashMap<ResourceKind, Scripted>,
    }

    #[async_trait]
    impl RemoteFetcher for ScriptedFetcher {
        async fn fetch(&self, kind: ResourceKind) -> Result<Vec<RawRecord>, TransportError> {
            match self.responses.get(&kind) {
                Some(Scripted::Records(records)) => Ok(records.clone()),
                Some(Scripted::Failure) => Err(TransportError::Connect {
                    kind,
                    message: "scripted failure".to_string(),
                }),
                None => Ok(Vec::new()),
            }
        }
    }

    fn user_record(id: i64) -> RawRecord {
        RawRecord::from_value(json!({
            "id": id,
            "name": format!("User {}", id),
            "email": format!("user{}@example.org", id),
            "company": { "catchPhrase": "Synergistic zero-defect throughput" }
        }))
        .unwrap()
    }

    fn coordinator(responses: HashMap<ResourceKind, Scripted>) -> (SyncCoordinator, Arc<MemoryMirrorStore>) {
        let store = Arc::new(MemoryMirrorStore::new());
        let coordinator = SyncCoordinator::new(
            Arc::new(ScriptedFetcher { responses }),
            store.clone(),
        );
        (coordinator, store)
    }

    #[tokio::test]
    async fn test_album_before_user_rejected_then_accepted_on_retry() {
        let mut responses = HashMap::new();
        responses.insert(
            ResourceKind::Albums,
            Scripted::Records(vec![RawRecord::from_value(
                json!({ "id": 1, "userId": 5, "title": "Trip" }),
            )
            .unwrap()]),
        );
        responses.insert(ResourceKind::Users, Scripted::Records(vec![user_record(5)]));
        let (coordinator, store) = coordinator(responses);

        // Out-of-order partial sync: the album cannot resolve its owner
        let outcome = coordinator.sync_kind(ResourceKind::Albums).await;
        assert!(outcome.succeeded());
        assert_eq!(outcome.inserted, 0);
        assert_eq!(outcome.skipped, 1);
        assert!(!store.has_albums().unwrap());

        // After the user arrives, a re-run creates the album
        coordinator.sync_kind(ResourceKind::Users).await;
        let outcome = coordinator.sync_kind(ResourceKind::Albums).await;
        assert_eq!(outcome.inserted, 1);
        assert_eq!(store.albums_for_user(5).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_leaves_store_untouched() {
        let mut responses = HashMap::new();
        responses.insert(ResourceKind::Users, Scripted::Failure);
        let (coordinator, store) = coordinator(responses);

        let outcome = coordinator.sync_kind(ResourceKind::Users).await;
        assert!(matches!(outcome.failure, Some(SyncFailure::Fetch(_))));
        assert_eq!(store.counts().unwrap().users, 0);
    }

    #[tokio::test]
    async fn test_sync_all_continues_past_failed_kind() {
        let mut responses = HashMap::new();
        responses.insert(ResourceKind::Users, Scripted::Failure);
        responses.insert(ResourceKind::Albums, Scripted::Records(Vec::new()));
        let (coordinator, _store) = coordinator(responses);

        let outcomes = coordinator.sync_all().await;
        assert_eq!(outcomes.len(), 3);
        assert!(!outcomes[0].succeeded());
        assert!(outcomes[1].succeeded());
        assert!(outcomes[2].succeeded());
    }
}
