//! Remote resource access.
//!
//! The mirror is filled from a remote API exposing three flat collections
//! (users, albums, photos), each an ordered JSON array of records. This
//! module defines the fetch contract the sync pipeline depends on and the
//! reqwest-backed implementation of it.

mod client;
mod models;

pub use client::JsonApiClient;
pub use models::{RawRecord, ResourceKind, TransportError};

use async_trait::async_trait;

/// Default remote API for the mirrored collections.
pub const DEFAULT_REMOTE_BASE_URL: &str = "http://jsonplaceholder.typicode.com";

/// Trait for fetching one resource collection from the remote source.
///
/// Implementations must be safe to call once per kind per sync invocation;
/// concurrent calls for different kinds are independent. Record order within
/// a collection carries no meaning for the sync pipeline.
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    /// Fetch all raw records of the given kind.
    async fn fetch(&self, kind: ResourceKind) -> Result<Vec<RawRecord>, TransportError>;
}
