//! In-memory mirror store implementation.
//!
//! Same stage-then-commit semantics as the SQLite store, backed by plain
//! maps. Useful for tests and for callers that do not need durability.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use super::models::{Album, Entity, Photo, User};
use super::trait_def::{MirrorCounts, MirrorStore, StoreError};
use crate::remote::ResourceKind;

#[derive(Default)]
struct MemoryInner {
    users: BTreeMap<i64, User>,
    albums: BTreeMap<i64, Album>,
    photos: BTreeMap<i64, Photo>,
    staged: Vec<Entity>,
}

impl MemoryInner {
    fn exists(&self, kind: ResourceKind, id: i64) -> bool {
        if self.staged.iter().any(|e| e.kind() == kind && e.id() == id) {
            return true;
        }
        match kind {
            ResourceKind::Users => self.users.contains_key(&id),
            ResourceKind::Albums => self.albums.contains_key(&id),
            ResourceKind::Photos => self.photos.contains_key(&id),
        }
    }
}

/// Mirror store holding everything in process memory.
#[derive(Clone, Default)]
pub struct MemoryMirrorStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryMirrorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MirrorStore for MemoryMirrorStore {
    fn exists(&self, kind: ResourceKind, id: i64) -> Result<bool, StoreError> {
        Ok(self.inner.lock().unwrap().exists(kind, id))
    }

    fn get_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        let inner = self.inner.lock().unwrap();
        for entity in &inner.staged {
            if let Entity::User(user) = entity {
                if user.id == id {
                    return Ok(Some(user.clone()));
                }
            }
        }
        Ok(inner.users.get(&id).cloned())
    }

    fn get_album(&self, id: i64) -> Result<Option<Album>, StoreError> {
        let inner = self.inner.lock().unwrap();
        for entity in &inner.staged {
            if let Entity::Album(album) = entity {
                if album.id == id {
                    return Ok(Some(album.clone()));
                }
            }
        }
        Ok(inner.albums.get(&id).cloned())
    }

    fn get_photo(&self, id: i64) -> Result<Option<Photo>, StoreError> {
        let inner = self.inner.lock().unwrap();
        for entity in &inner.staged {
            if let Entity::Photo(photo) = entity {
                if photo.id == id {
                    return Ok(Some(photo.clone()));
                }
            }
        }
        Ok(inner.photos.get(&id).cloned())
    }

    fn insert(&self, entity: Entity) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        match &entity {
            Entity::User(_) => {}
            Entity::Album(album) => {
                if !inner.exists(ResourceKind::Users, album.user_id) {
                    return Err(StoreError::Validation {
                        kind: ResourceKind::Albums,
                        id: album.id,
                        parent_kind: ResourceKind::Users,
                        parent_id: album.user_id,
                    });
                }
            }
            Entity::Photo(photo) => {
                if !inner.exists(ResourceKind::Albums, photo.album_id) {
                    return Err(StoreError::Validation {
                        kind: ResourceKind::Photos,
                        id: photo.id,
                        parent_kind: ResourceKind::Albums,
                        parent_id: photo.album_id,
                    });
                }
            }
        }
        inner.staged.push(entity);
        Ok(())
    }

    fn commit(&self) -> Result<usize, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let staged = std::mem::take(&mut inner.staged);
        let count = staged.len();
        for entity in staged {
            match entity {
                Entity::User(user) => {
                    inner.users.insert(user.id, user);
                }
                Entity::Album(album) => {
                    inner.albums.insert(album.id, album);
                }
                Entity::Photo(photo) => {
                    inner.photos.insert(photo.id, photo);
                }
            }
        }
        Ok(count)
    }

    fn users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.inner.lock().unwrap().users.values().cloned().collect())
    }

    fn albums_for_user(&self, user_id: i64) -> Result<Vec<Album>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .albums
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    fn photos_for_album(&self, album_id: i64) -> Result<Vec<Photo>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .photos
            .values()
            .filter(|p| p.album_id == album_id)
            .cloned()
            .collect())
    }

    fn counts(&self) -> Result<MirrorCounts, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(MirrorCounts {
            users: inner.users.len(),
            albums: inner.albums.len(),
            photos: inner.photos.len(),
        })
    }
}
