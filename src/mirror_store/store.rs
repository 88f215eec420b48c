//! SQLite-backed mirror store implementation.
//!
//! Writes go through an in-memory staging buffer: `insert` validates and
//! stages, `commit` writes the whole buffer inside a single transaction.
//! A failed commit leaves the database untouched and the buffer empty.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use tracing::{debug, info};

use super::models::{Album, Entity, Photo, User};
use super::schema::{MIRROR_SCHEMA_SQL, MIRROR_SCHEMA_VERSION};
use super::trait_def::{MirrorCounts, MirrorStore, StoreError};
use crate::remote::ResourceKind;

struct StoreInner {
    conn: Connection,
    staged: Vec<Entity>,
}

/// SQLite-backed mirror store.
#[derive(Clone)]
pub struct SqliteMirrorStore {
    inner: Arc<Mutex<StoreInner>>,
}

fn table(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Users => "users",
        ResourceKind::Albums => "albums",
        ResourceKind::Photos => "photos",
    }
}

fn staged_contains(staged: &[Entity], kind: ResourceKind, id: i64) -> bool {
    staged.iter().any(|e| e.kind() == kind && e.id() == id)
}

fn row_exists(conn: &Connection, kind: ResourceKind, id: i64) -> Result<bool, StoreError> {
    let sql = format!("SELECT 1 FROM {} WHERE id = ?1", table(kind));
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt.exists(params![id])?)
}

fn exists_inner(inner: &StoreInner, kind: ResourceKind, id: i64) -> Result<bool, StoreError> {
    if staged_contains(&inner.staged, kind, id) {
        return Ok(true);
    }
    row_exists(&inner.conn, kind, id)
}

impl SqliteMirrorStore {
    /// Open (or create) the mirror database at the given path.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open_with_flags(
            db_path.as_ref(),
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("Failed to open mirror database")?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        conn.execute_batch(MIRROR_SCHEMA_SQL)
            .context("Failed to create mirror schema")?;
        let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
        if db_version == 0 {
            conn.pragma_update(None, "user_version", MIRROR_SCHEMA_VERSION)?;
        }

        let user_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))
            .unwrap_or(0);
        let album_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM albums", [], |r| r.get(0))
            .unwrap_or(0);
        let photo_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM photos", [], |r| r.get(0))
            .unwrap_or(0);

        info!(
            "Opened mirror: {} users, {} albums, {} photos",
            user_count, album_count, photo_count
        );

        Ok(SqliteMirrorStore {
            inner: Arc::new(Mutex::new(StoreInner {
                conn,
                staged: Vec::new(),
            })),
        })
    }

    // =========================================================================
    // Row Parsers
    // =========================================================================

    fn parse_user_row(row: &rusqlite::Row) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            company_catch_phrase: row.get(3)?,
        })
    }

    fn parse_album_row(row: &rusqlite::Row) -> rusqlite::Result<Album> {
        Ok(Album {
            id: row.get(0)?,
            title: row.get(1)?,
            user_id: row.get(2)?,
        })
    }

    fn parse_photo_row(row: &rusqlite::Row) -> rusqlite::Result<Photo> {
        Ok(Photo {
            id: row.get(0)?,
            title: row.get(1)?,
            image_url: row.get(2)?,
            thumbnail_url: row.get(3)?,
            album_id: row.get(4)?,
        })
    }
}

impl MirrorStore for SqliteMirrorStore {
    fn exists(&self, kind: ResourceKind, id: i64) -> Result<bool, StoreError> {
        let inner = self.inner.lock().unwrap();
        exists_inner(&inner, kind, id)
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

        let mut stmt = inner.conn.prepare_cached(
            "SELECT id, name, email, company_catch_phrase FROM users WHERE id = ?1",
        )?;
        match stmt.query_row(params![id], Self::parse_user_row) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
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

        let mut stmt = inner
            .conn
            .prepare_cached("SELECT id, title, user_id FROM albums WHERE id = ?1")?;
        match stmt.query_row(params![id], Self::parse_album_row) {
            Ok(album) => Ok(Some(album)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
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

        let mut stmt = inner.conn.prepare_cached(
            "SELECT id, title, image_url, thumbnail_url, album_id FROM photos WHERE id = ?1",
        )?;
        match stmt.query_row(params![id], Self::parse_photo_row) {
            Ok(photo) => Ok(Some(photo)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn insert(&self, entity: Entity) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();

        // Relationship targets must be present, persisted or staged.
        match &entity {
            Entity::User(_) => {}
            Entity::Album(album) => {
                if !exists_inner(&inner, ResourceKind::Users, album.user_id)? {
                    return Err(StoreError::Validation {
                        kind: ResourceKind::Albums,
                        id: album.id,
                        parent_kind: ResourceKind::Users,
                        parent_id: album.user_id,
                    });
                }
            }
            Entity::Photo(photo) => {
                if !exists_inner(&inner, ResourceKind::Albums, photo.album_id)? {
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
        // Taken up front: a failed commit must not leave a retryable queue.
        let staged = std::mem::take(&mut inner.staged);
        if staged.is_empty() {
            return Ok(0);
        }

        let StoreInner { conn, .. } = &mut *inner;
        let tx = conn.transaction()?;
        for entity in &staged {
            match entity {
                Entity::User(user) => {
                    tx.execute(
                        "INSERT INTO users (id, name, email, company_catch_phrase)
                         VALUES (?1, ?2, ?3, ?4)",
                        params![user.id, user.name, user.email, user.company_catch_phrase],
                    )?;
                }
                Entity::Album(album) => {
                    tx.execute(
                        "INSERT INTO albums (id, title, user_id) VALUES (?1, ?2, ?3)",
                        params![album.id, album.title, album.user_id],
                    )?;
                }
                Entity::Photo(photo) => {
                    tx.execute(
                        "INSERT INTO photos (id, title, image_url, thumbnail_url, album_id)
                         VALUES (?1, ?2, ?3, ?4, ?5)",
                        params![
                            photo.id,
                            photo.title,
                            photo.image_url,
                            photo.thumbnail_url,
                            photo.album_id
                        ],
                    )?;
                }
            }
        }
        tx.commit()?;

        debug!("Committed {} staged entities", staged.len());
        Ok(staged.len())
    }

    fn users(&self) -> Result<Vec<User>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut stmt = inner.conn.prepare_cached(
            "SELECT id, name, email, company_catch_phrase FROM users ORDER BY id",
        )?;
        let users = stmt
            .query_map([], Self::parse_user_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    fn albums_for_user(&self, user_id: i64) -> Result<Vec<Album>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut stmt = inner
            .conn
            .prepare_cached("SELECT id, title, user_id FROM albums WHERE user_id = ?1 ORDER BY id")?;
        let albums = stmt
            .query_map(params![user_id], Self::parse_album_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(albums)
    }

    fn photos_for_album(&self, album_id: i64) -> Result<Vec<Photo>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut stmt = inner.conn.prepare_cached(
            "SELECT id, title, image_url, thumbnail_url, album_id
             FROM photos WHERE album_id = ?1 ORDER BY id",
        )?;
        let photos = stmt
            .query_map(params![album_id], Self::parse_photo_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(photos)
    }

    fn counts(&self) -> Result<MirrorCounts, StoreError> {
        let inner = self.inner.lock().unwrap();
        let count = |sql: &str| -> Result<usize, StoreError> {
            let n: i64 = inner.conn.query_row(sql, [], |r| r.get(0))?;
            Ok(n as usize)
        };
        Ok(MirrorCounts {
            users: count("SELECT COUNT(*) FROM users")?,
            albums: count("SELECT COUNT(*) FROM albums")?,
            photos: count("SELECT COUNT(*) FROM photos")?,
        })
    }
}
