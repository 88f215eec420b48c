//! Raw record validation and conversion into mirrored entities.
//!
//! One record in, one entity or one rejection out. Rejections are
//! per-record; the surrounding batch always continues. The mapper consults
//! the store for duplicate detection and parent resolution, which is why
//! albums must be mapped only after their users are visible in the store.

use thiserror::Error;

use crate::mirror_store::{Album, Entity, MirrorStore, Photo, StoreError, User};
use crate::remote::{RawRecord, ResourceKind};

/// Why a raw record was not turned into an entity.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RejectReason {
    /// The `id` field is absent or not a positive integer.
    #[error("record has no usable id")]
    MissingIdentifier,

    /// An entity with this id is already present; re-syncs skip it silently.
    #[error("{kind} {id} is already present")]
    DuplicateIdentifier { kind: ResourceKind, id: i64 },

    /// The user record carries no company object at all.
    #[error("user {id} has no company object")]
    MissingCompany { id: i64 },

    /// A required field is absent.
    #[error("required field '{field}' is absent")]
    MissingField { field: &'static str },

    /// The referenced parent is not in the store.
    #[error("{kind} {id} references unknown {parent_kind} {parent_id}")]
    UnresolvedParent {
        kind: ResourceKind,
        id: i64,
        parent_kind: ResourceKind,
        parent_id: i64,
    },
}

/// Mapping failure: either a per-record rejection (skipped silently by the
/// coordinator) or a store lookup failure (infrastructure, logged).
#[derive(Debug, Error)]
pub enum MapError {
    #[error(transparent)]
    Rejected(#[from] RejectReason),

    #[error("store lookup failed: {0}")]
    Store(#[from] StoreError),
}

/// Knobs for mapping policy.
#[derive(Clone, Copy, Debug)]
pub struct MapperSettings {
    /// Reject user records whose company object is entirely absent. On by
    /// default to match the upstream data contract; turn off to accept such
    /// users with an empty catch phrase.
    pub require_company: bool,
}

impl Default for MapperSettings {
    fn default() -> Self {
        Self {
            require_company: true,
        }
    }
}

/// Converts one raw record into a validated entity for a given kind.
pub struct EntityMapper<'a> {
    store: &'a dyn MirrorStore,
    settings: MapperSettings,
}

impl<'a> EntityMapper<'a> {
    pub fn new(store: &'a dyn MirrorStore, settings: MapperSettings) -> Self {
        Self { store, settings }
    }

    /// Map a raw record of the given kind.
    pub fn map(&self, kind: ResourceKind, record: &RawRecord) -> Result<Entity, MapError> {
        let id = match record.integer("id") {
            Some(id) if id > 0 => id,
            _ => return Err(RejectReason::MissingIdentifier.into()),
        };

        if self.store.exists(kind, id)? {
            return Err(RejectReason::DuplicateIdentifier { kind, id }.into());
        }

        match kind {
            ResourceKind::Users => self.map_user(id, record),
            ResourceKind::Albums => self.map_album(id, record),
            ResourceKind::Photos => self.map_photo(id, record),
        }
    }

    fn map_user(&self, id: i64, record: &RawRecord) -> Result<Entity, MapError> {
        let name = record.string("name").map(str::to_string);
        let email = record.string("email").map(str::to_string);

        let company_catch_phrase = match record.nested("company") {
            Some(company) => company.string("catchPhrase").map(str::to_string),
            None if self.settings.require_company => {
                return Err(RejectReason::MissingCompany { id }.into());
            }
            None => None,
        };

        Ok(Entity::User(User {
            id,
            name,
            email,
            company_catch_phrase,
        }))
    }

    fn map_album(&self, id: i64, record: &RawRecord) -> Result<Entity, MapError> {
        let user_id = record
            .integer("userId")
            .ok_or(RejectReason::MissingField { field: "userId" })?;

        if self.store.get_user(user_id)?.is_none() {
            return Err(RejectReason::UnresolvedParent {
                kind: ResourceKind::Albums,
                id,
                parent_kind: ResourceKind::Users,
                parent_id: user_id,
            }
            .into());
        }

        let title = record.string("title").map(str::to_string);

        Ok(Entity::Album(Album { id, title, user_id }))
    }

    fn map_photo(&self, id: i64, record: &RawRecord) -> Result<Entity, MapError> {
        // Field checks come before parent resolution for photos.
        let album_id = record
            .integer("albumId")
            .ok_or(RejectReason::MissingField { field: "albumId" })?;
        let title = record
            .string("title")
            .ok_or(RejectReason::MissingField { field: "title" })?
            .to_string();
        let image_url = record
            .string("url")
            .ok_or(RejectReason::MissingField { field: "url" })?
            .to_string();
        let thumbnail_url = record
            .string("thumbnailUrl")
            .ok_or(RejectReason::MissingField {
                field: "thumbnailUrl",
            })?
            .to_string();

        if self.store.get_album(album_id)?.is_none() {
            return Err(RejectReason::UnresolvedParent {
                kind: ResourceKind::Photos,
                id,
                parent_kind: ResourceKind::Albums,
                parent_id: album_id,
            }
            .into());
        }

        Ok(Entity::Photo(Photo {
            id,
            title,
            image_url,
            thumbnail_url,
            album_id,
        }))
    }
}
