//! Local persistent mirror of the remote resource tree.
//!
//! Three collections keyed by remote-assigned integer identifiers, with
//! albums referencing users and photos referencing albums. The store only
//! ever grows through the sync pipeline's stage-then-commit protocol;
//! nothing here updates or deletes.

mod memory_store;
mod models;
mod schema;
mod store;
mod trait_def;

pub use memory_store::MemoryMirrorStore;
pub use models::{Album, Entity, Photo, User};
pub use schema::{MIRROR_SCHEMA_SQL, MIRROR_SCHEMA_VERSION};
pub use store::SqliteMirrorStore;
pub use trait_def::{MirrorCounts, MirrorStore, StoreError};
