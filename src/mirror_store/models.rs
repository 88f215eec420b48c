//! Mirrored entity models.
//!
//! Identifiers are assigned by the remote source and are positive integers,
//! unique within their kind. They are never generated locally.

use serde::{Deserialize, Serialize};

use crate::remote::ResourceKind;

// =============================================================================
// Core Entities
// =============================================================================

/// User entity. Everything beyond the identifier is optional; the catch
/// phrase comes from the nested "company" object of the remote record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub company_catch_phrase: Option<String>,
}

/// Album entity, owned by a user. An album whose owner cannot be resolved
/// is never stored.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Album {
    pub id: i64,
    pub title: Option<String>,
    pub user_id: i64,
}

/// Photo entity, owned by an album. All fields are required.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Photo {
    pub id: i64,
    pub title: String,
    pub image_url: String,
    pub thumbnail_url: String,
    pub album_id: i64,
}

// =============================================================================
// Kind-erased wrapper
// =============================================================================

/// A mirrored entity of any kind, as staged for persistence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entity {
    User(User),
    Album(Album),
    Photo(Photo),
}

impl Entity {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Entity::User(_) => ResourceKind::Users,
            Entity::Album(_) => ResourceKind::Albums,
            Entity::Photo(_) => ResourceKind::Photos,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Entity::User(user) => user.id,
            Entity::Album(album) => album.id,
            Entity::Photo(photo) => photo.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_and_id() {
        let user = Entity::User(User {
            id: 1,
            name: None,
            email: None,
            company_catch_phrase: None,
        });
        assert_eq!(user.kind(), ResourceKind::Users);
        assert_eq!(user.id(), 1);

        let album = Entity::Album(Album {
            id: 10,
            title: Some("Trip".to_string()),
            user_id: 1,
        });
        assert_eq!(album.kind(), ResourceKind::Albums);
        assert_eq!(album.id(), 10);

        let photo = Entity::Photo(Photo {
            id: 100,
            title: "accusamus beatae".to_string(),
            image_url: "https://via.placeholder.com/600/92c952".to_string(),
            thumbnail_url: "https://via.placeholder.com/150/92c952".to_string(),
            album_id: 10,
        });
        assert_eq!(photo.kind(), ResourceKind::Photos);
        assert_eq!(photo.id(), 100);
    }
}
