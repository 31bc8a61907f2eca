//! Prompt library entries.
//!
//! Entries live in their owner's document. Updates and deletes address an
//! entry by id alone, so they search every owner's document for it.

use chrono::Utc;

use crate::domain::entry::{Entry, EntryFilter, EntryPatch};
use crate::domain::snapshot::GlobalDocument;
use crate::domain::types::{EntryId, Username};
use crate::forms::entries::CreateEntryFormPayload;
use crate::repository::{SnapshotReader, SnapshotWriter};

use super::{LogStorageError, ServiceError, ServiceResult, with_located_record};

fn ensure_category(global: &GlobalDocument, category: &str) -> ServiceResult<()> {
    if global.categories.contains(category) {
        Ok(())
    } else {
        Err(ServiceError::InvalidArgument(format!(
            "unknown category: {category}"
        )))
    }
}

pub fn list_entries<R>(owner: &Username, repo: &R) -> ServiceResult<Vec<Entry>>
where
    R: SnapshotReader + ?Sized,
{
    let document = repo.load_user(owner).logged("load entries")?;
    Ok(document.entries)
}

pub fn get_entry<R>(owner: &Username, id: EntryId, repo: &R) -> ServiceResult<Entry>
where
    R: SnapshotReader + ?Sized,
{
    let document = repo.load_user(owner).logged("load entries")?;
    document
        .entries
        .into_iter()
        .find(|e| e.id == id)
        .ok_or(ServiceError::NotFound)
}

pub fn create_entry<R>(
    owner: &Username,
    payload: CreateEntryFormPayload,
    repo: &R,
) -> ServiceResult<Entry>
where
    R: SnapshotReader + SnapshotWriter + ?Sized,
{
    repo.locks().with_owner(owner, || {
        let global = repo.load_global().logged("load categories")?;
        ensure_category(&global, &payload.category)?;

        let mut document = repo.load_user(owner).logged("load entries")?;
        let entry = payload
            .into_new_entry(owner.clone())
            .into_entry(Utc::now().naive_utc());
        document.entries.push(entry.clone());

        repo.save_user(owner.clone(), document)
            .logged("save entries")?;
        log::info!("Created entry {} for {owner}", entry.id);
        Ok(entry)
    })
}

/// Applies `patch` to the entry with `id`, wherever it lives. A patch carrying
/// an owner other than the stored one is rejected.
pub fn update_entry<R>(id: EntryId, patch: EntryPatch, repo: &R) -> ServiceResult<Entry>
where
    R: SnapshotReader + SnapshotWriter + ?Sized,
{
    let likely_owner = patch.owner.clone();
    with_located_record(
        repo,
        likely_owner.as_ref(),
        |document| document.entry_position(id),
        |owner, mut document, index| {
            if let Some(category) = &patch.category {
                let global = repo.load_global().logged("load categories")?;
                ensure_category(&global, category)?;
            }

            document.entries[index].apply(patch, Utc::now().naive_utc())?;
            let entry = document.entries[index].clone();

            repo.save_user(owner, document).logged("save entries")?;
            Ok(entry)
        },
    )
}

/// Removes the entry with `id`. When `expected_owner` is given it must match.
pub fn delete_entry<R>(
    id: EntryId,
    expected_owner: Option<&Username>,
    repo: &R,
) -> ServiceResult<Entry>
where
    R: SnapshotReader + SnapshotWriter + ?Sized,
{
    with_located_record(
        repo,
        expected_owner,
        |document| document.entry_position(id),
        |owner, mut document, index| {
            if expected_owner.is_some_and(|expected| expected != &owner) {
                return Err(ServiceError::OwnerMismatch);
            }

            let entry = document.entries.remove(index);
            repo.save_user(owner, document).logged("save entries")?;
            Ok(entry)
        },
    )
}

/// Entries of `owner` that pass `filter`, in insertion order.
pub fn search_entries<R>(
    owner: &Username,
    filter: &EntryFilter,
    repo: &R,
) -> ServiceResult<Vec<Entry>>
where
    R: SnapshotReader + ?Sized,
{
    let document = repo.load_user(owner).logged("load entries")?;
    Ok(document
        .entries
        .into_iter()
        .filter(|e| filter.matches(e))
        .collect())
}
