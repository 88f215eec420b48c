//! Common test infrastructure
//!
//! Fixtures for driving the sync pipeline end-to-end: a scripted remote
//! fetcher, raw-record builders shaped like the real API payloads, an
//! observer that records failure notifications, and a throwaway SQLite
//! store. Tests should only import from this module.

// Not every test binary uses every fixture
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use tempfile::TempDir;

use album_mirror::mirror_store::{SqliteMirrorStore, StoreError};
use album_mirror::remote::{RawRecord, RemoteFetcher, ResourceKind, TransportError};
use album_mirror::sync::{SyncObserver, SyncOutcome};

// =============================================================================
// Scripted fetcher
// =============================================================================

/// Scripted response for one kind.
pub enum Scripted {
    Records(Vec<RawRecord>),
    TransportFailure,
}

/// Fetcher returning pre-scripted responses. Kinds with no script yield an
/// empty collection; scripts can be replaced between syncs.
#[derive(Default)]
pub struct ScriptedFetcher {
    responses: Mutex<HashMap<ResourceKind, Scripted>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, kind: ResourceKind, response: Scripted) {
        self.responses.lock().unwrap().insert(kind, response);
    }
}

#[async_trait]
impl RemoteFetcher for ScriptedFetcher {
    async fn fetch(&self, kind: ResourceKind) -> Result<Vec<RawRecord>, TransportError> {
        match self.responses.lock().unwrap().get(&kind) {
            Some(Scripted::Records(records)) => Ok(records.clone()),
            Some(Scripted::TransportFailure) => Err(TransportError::Connect {
                kind,
                message: "scripted transport failure".to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }
}

// =============================================================================
// Recording observer
// =============================================================================

/// Observer that records which kinds reported which events.
#[derive(Default)]
pub struct RecordingObserver {
    pub fetch_failures: Mutex<Vec<ResourceKind>>,
    pub commit_failures: Mutex<Vec<ResourceKind>>,
    pub completed: Mutex<Vec<ResourceKind>>,
}

impl SyncObserver for RecordingObserver {
    fn on_fetch_failed(&self, kind: ResourceKind, _error: &TransportError) {
        self.fetch_failures.lock().unwrap().push(kind);
    }

    fn on_commit_failed(&self, kind: ResourceKind, _error: &StoreError) {
        self.commit_failures.lock().unwrap().push(kind);
    }

    fn on_kind_synced(&self, outcome: &SyncOutcome) {
        self.completed.lock().unwrap().push(outcome.kind);
    }
}

// =============================================================================
// Record builders
// =============================================================================

pub fn user_record(id: i64) -> RawRecord {
    RawRecord::from_value(json!({
        "id": id,
        "name": format!("User {}", id),
        "username": format!("user{}", id),
        "email": format!("user{}@example.org", id),
        "company": {
            "name": "Romaguera-Crona",
            "catchPhrase": "Multi-layered client-server neural-net",
            "bs": "harness real-time e-markets"
        }
    }))
    .unwrap()
}

pub fn user_record_without_company(id: i64) -> RawRecord {
    RawRecord::from_value(json!({
        "id": id,
        "name": format!("User {}", id),
        "email": format!("user{}@example.org", id)
    }))
    .unwrap()
}

pub fn album_record(id: i64, user_id: i64) -> RawRecord {
    RawRecord::from_value(json!({
        "id": id,
        "userId": user_id,
        "title": format!("Album {}", id)
    }))
    .unwrap()
}

pub fn photo_record(id: i64, album_id: i64) -> RawRecord {
    RawRecord::from_value(json!({
        "id": id,
        "albumId": album_id,
        "title": format!("Photo {}", id),
        "url": format!("https://via.placeholder.com/600/{:06x}", id),
        "thumbnailUrl": format!("https://via.placeholder.com/150/{:06x}", id)
    }))
    .unwrap()
}

// =============================================================================
// Store fixture
// =============================================================================

/// A SQLite mirror store in a temp directory. Keep the TempDir alive for
/// the duration of the test.
pub fn temp_store() -> (TempDir, Arc<SqliteMirrorStore>) {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(SqliteMirrorStore::new(dir.path().join("mirror.db")).unwrap());
    (dir, store)
}
