//! Album Mirror Library
//!
//! Mirrors a remote users → albums → photos resource tree into a local
//! SQLite cache, for use behind an offline-capable list/detail UI. This
//! library exposes the internal modules for testing and potential reuse;
//! the `album-mirror` binary wires them into a one-shot sync CLI.

pub mod config;
pub mod mirror_store;
pub mod remote;
pub mod sync;

// Re-export commonly used types for convenience
pub use mirror_store::{MemoryMirrorStore, MirrorStore, SqliteMirrorStore, StoreError};
pub use remote::{JsonApiClient, RawRecord, RemoteFetcher, ResourceKind, TransportError};
pub use sync::{SyncCoordinator, SyncFailure, SyncObserver, SyncOutcome};
