//! The five stores: identity, categories, entries, story and materials.
//!
//! Every mutating operation is one locked load/mutate/commit cycle against
//! the repository. Functions return the new state so callers can re-render
//! without subscribing to changes.

use std::sync::PoisonError;

use crate::domain::snapshot::UserDocument;
use crate::domain::types::Username;
use crate::repository::{RepositoryResult, SnapshotReader, SnapshotWriter};

pub mod categories;
pub mod entries;
pub mod errors;
pub mod identity;
pub mod materials;
pub mod password;
pub mod story;

pub use errors::{ServiceError, ServiceResult};

/// Logs repository failures before handing them to the caller unchanged.
trait LogStorageError<T> {
    fn logged(self, action: &str) -> ServiceResult<T>;
}

impl<T> LogStorageError<T> for RepositoryResult<T> {
    fn logged(self, action: &str) -> ServiceResult<T> {
        self.map_err(|e| {
            log::error!("Failed to {action}: {e}");
            ServiceError::Io(e)
        })
    }
}

/// Finds the owner whose document contains the record picked by `locate` and
/// runs `f` on that document while holding the owner's lock. `likely_owner`
/// is searched first so the common case loads a single document.
fn with_located_record<R, T>(
    repo: &R,
    likely_owner: Option<&Username>,
    locate: impl Fn(&UserDocument) -> Option<usize>,
    f: impl FnOnce(Username, UserDocument, usize) -> ServiceResult<T>,
) -> ServiceResult<T>
where
    R: SnapshotReader + SnapshotWriter + ?Sized,
{
    let locks = repo.locks();
    let _shared = locks.shared();

    let others = repo.list_owners().logged("list owners")?;
    let candidates = likely_owner
        .cloned()
        .into_iter()
        .chain(others.into_iter().filter(|o| Some(o) != likely_owner));

    for owner in candidates {
        let lock = locks.owner(&owner);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let document = repo.load_user(&owner).logged("load user document")?;
        if let Some(index) = locate(&document) {
            return f(owner, document, index);
        }
    }

    Err(ServiceError::NotFound)
}
