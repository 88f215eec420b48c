//! Database schema for the mirror store.
//!
//! Three tables keyed by the remote-assigned integer identifier, with a
//! foreign key from albums to users and from photos to albums. The sync
//! pipeline validates relationships before staging; the FK clauses keep the
//! database honest if rows are ever written through another path.

/// SQL schema for the mirror database.
pub const MIRROR_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    name TEXT,
    email TEXT,
    company_catch_phrase TEXT
);

CREATE TABLE IF NOT EXISTS albums (
    id INTEGER PRIMARY KEY,
    title TEXT,
    user_id INTEGER NOT NULL,
    FOREIGN KEY (user_id) REFERENCES users(id)
);

CREATE TABLE IF NOT EXISTS photos (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    image_url TEXT NOT NULL,
    thumbnail_url TEXT NOT NULL,
    album_id INTEGER NOT NULL,
    FOREIGN KEY (album_id) REFERENCES albums(id)
);

-- Indexes for the list/detail screens
CREATE INDEX IF NOT EXISTS idx_albums_user ON albums(user_id);
CREATE INDEX IF NOT EXISTS idx_photos_album ON photos(album_id);
"#;

/// Current schema version, stamped into PRAGMA user_version.
pub const MIRROR_SCHEMA_VERSION: i32 = 1;
