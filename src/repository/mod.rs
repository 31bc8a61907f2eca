//! Snapshot persistence gateway.
//!
//! Services never touch storage directly: they load whole documents through
//! [`SnapshotReader`], mutate them in memory and hand a [`Changeset`] back to
//! [`SnapshotWriter::commit`]. Backends must apply a changeset atomically and
//! be read-after-write consistent within the process.

use std::sync::Arc;

use crate::db::{DbConnection, DbPool};
use crate::domain::snapshot::{Changeset, GlobalDocument, UserDocument};
use crate::domain::types::Username;

pub mod errors;
pub mod json_file;
pub mod locks;
pub mod snapshot;

pub use errors::{RepositoryError, RepositoryResult};
pub use json_file::JsonFileRepository;
pub use locks::ScopeLocks;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers. Clones share one set of locks.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
    locks: Arc<ScopeLocks>,
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            locks: Arc::new(ScopeLocks::default()),
        }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only access to persisted documents.
pub trait SnapshotReader {
    /// Accounts and categories; the seeded default when nothing was saved yet.
    fn load_global(&self) -> RepositoryResult<GlobalDocument>;
    /// One owner's document; empty when nothing was saved yet.
    fn load_user(&self, owner: &Username) -> RepositoryResult<UserDocument>;
    /// Every owner that has a persisted user document.
    fn list_owners(&self) -> RepositoryResult<Vec<Username>>;
}

/// Write access to persisted documents.
pub trait SnapshotWriter {
    /// Persist every document in `changeset` as one atomic unit.
    fn commit(&self, changeset: Changeset) -> RepositoryResult<()>;

    /// Locks callers must hold across a load/mutate/commit cycle.
    fn locks(&self) -> &ScopeLocks;

    fn save_global(&self, document: GlobalDocument) -> RepositoryResult<()> {
        self.commit(Changeset::global(document))
    }

    fn save_user(&self, owner: Username, document: UserDocument) -> RepositoryResult<()> {
        self.commit(Changeset::user(owner, document))
    }
}

/// Object-safe umbrella used to share one backend between request handlers.
pub trait SnapshotStore: SnapshotReader + SnapshotWriter + Send + Sync {}

impl<T> SnapshotStore for T where T: SnapshotReader + SnapshotWriter + Send + Sync {}
