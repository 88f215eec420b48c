//! MirrorStore trait definition.
//!
//! This trait abstracts the local persistent store so the sync pipeline can
//! run against either the SQLite-backed `SqliteMirrorStore` or the
//! in-memory `MemoryMirrorStore`.

use thiserror::Error;

use super::models::{Album, Entity, Photo, User};
use crate::remote::ResourceKind;

/// Errors surfaced by mirror store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A staged entity references a parent that is neither persisted nor
    /// staged. Such entities are never accepted into the store.
    #[error("{kind} {id} references missing {parent_kind} {parent_id}")]
    Validation {
        kind: ResourceKind,
        id: i64,
        parent_kind: ResourceKind,
        parent_id: i64,
    },

    /// The underlying database failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Row counts per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorCounts {
    pub users: usize,
    pub albums: usize,
    pub photos: usize,
}

/// Trait for mirror storage backends.
///
/// Writes follow a stage-then-commit protocol: `insert` stages an entity,
/// `commit` persists every staged entity in one atomic transaction. Point
/// lookups (`exists`, `get_*`) serve the ingestion pipeline and see staged
/// entities as well as committed rows — duplicate detection within one
/// batch depends on that. The listing operations serve the list/detail
/// screens and read committed rows only.
///
/// The sync pipeline uses only `exists`, the point lookups, `insert` and
/// `commit`; it never updates or deletes through this interface.
pub trait MirrorStore: Send + Sync {
    // =========================================================================
    // Point Lookups (staged or committed)
    // =========================================================================

    /// Check whether an entity of the given kind exists with this id.
    fn exists(&self, kind: ResourceKind, id: i64) -> Result<bool, StoreError>;

    /// Get a user by id.
    fn get_user(&self, id: i64) -> Result<Option<User>, StoreError>;

    /// Get an album by id.
    fn get_album(&self, id: i64) -> Result<Option<Album>, StoreError>;

    /// Get a photo by id.
    fn get_photo(&self, id: i64) -> Result<Option<Photo>, StoreError>;

    // =========================================================================
    // Write Operations
    // =========================================================================

    /// Stage an entity for persistence. Fails with `Validation` if a
    /// required relationship target (album→user, photo→album) is absent.
    /// Callers are expected to check `exists` first; staging an id that is
    /// already present surfaces as a `Database` failure at commit time.
    fn insert(&self, entity: Entity) -> Result<(), StoreError>;

    /// Durably persist all staged inserts since the last commit in one
    /// transaction, returning how many rows were written. On failure
    /// nothing is persisted and the staging buffer is discarded — no
    /// pending-record queue survives a failed commit.
    fn commit(&self) -> Result<usize, StoreError>;

    // =========================================================================
    // Listing Operations (committed rows only)
    // =========================================================================

    /// All users, ordered by id.
    fn users(&self) -> Result<Vec<User>, StoreError>;

    /// All albums owned by the given user, ordered by id.
    fn albums_for_user(&self, user_id: i64) -> Result<Vec<Album>, StoreError>;

    /// All photos in the given album, ordered by id.
    fn photos_for_album(&self, album_id: i64) -> Result<Vec<Photo>, StoreError>;

    /// Row counts per kind.
    fn counts(&self) -> Result<MirrorCounts, StoreError>;

    fn has_users(&self) -> Result<bool, StoreError> {
        Ok(self.counts()?.users > 0)
    }

    fn has_albums(&self) -> Result<bool, StoreError> {
        Ok(self.counts()?.albums > 0)
    }

    fn has_photos(&self) -> Result<bool, StoreError> {
        Ok(self.counts()?.photos > 0)
    }
}
