//! Shared category registry.
//!
//! Renaming or removing a category rewrites every owner's entries that refer
//! to it. The registry and all affected user documents are committed as one
//! changeset while the global lock is held exclusively, so no writer can slip
//! an entry with the old name in between.

use chrono::Utc;

use crate::domain::entry::reassign_category;
use crate::domain::snapshot::{Changeset, GlobalDocument};
use crate::domain::types::CategoryName;
use crate::dto::categories::CategoryChangeDto;
use crate::forms::categories::{AddCategoryFormPayload, RenameCategoryFormPayload};
use crate::repository::{SnapshotReader, SnapshotWriter};

use super::{LogStorageError, ServiceError, ServiceResult};

pub fn list_categories<R>(repo: &R) -> ServiceResult<Vec<CategoryName>>
where
    R: SnapshotReader + SnapshotWriter + ?Sized,
{
    let _lock = repo.locks().shared();
    let global = repo.load_global().logged("load categories")?;
    Ok(global.categories.names().to_vec())
}

pub fn add_category<R>(
    payload: AddCategoryFormPayload,
    repo: &R,
) -> ServiceResult<Vec<CategoryName>>
where
    R: SnapshotReader + SnapshotWriter + ?Sized,
{
    let _lock = repo.locks().exclusive();

    let mut global = repo.load_global().logged("load categories")?;
    global.categories.add(payload.name)?;
    let names = global.categories.names().to_vec();

    repo.save_global(global).logged("save categories")?;
    Ok(names)
}

pub fn rename_category<R>(
    payload: RenameCategoryFormPayload,
    repo: &R,
) -> ServiceResult<CategoryChangeDto>
where
    R: SnapshotReader + SnapshotWriter + ?Sized,
{
    let _lock = repo.locks().exclusive();

    let mut global = repo.load_global().logged("load categories")?;
    if !global.categories.contains(&payload.old_name) {
        return Err(ServiceError::NotFound);
    }
    let new_name = payload.new_name.ok_or_else(|| {
        ServiceError::InvalidArgument("new category name cannot be empty".to_string())
    })?;
    if !global
        .categories
        .rename(&payload.old_name, new_name.clone())?
    {
        return Ok(CategoryChangeDto::new(&global, 0));
    }

    let change = CategoryChangeDto::new(&global, 0);
    let reassigned = commit_with_reassignment(repo, global, &payload.old_name, &new_name)?;
    log::info!(
        "Renamed category {} to {new_name}, {reassigned} entries updated",
        payload.old_name
    );
    Ok(CategoryChangeDto {
        reassigned,
        ..change
    })
}

pub fn remove_category<R>(name: &str, repo: &R) -> ServiceResult<CategoryChangeDto>
where
    R: SnapshotReader + SnapshotWriter + ?Sized,
{
    let _lock = repo.locks().exclusive();

    let mut global = repo.load_global().logged("load categories")?;
    let target = global.categories.remove(name)?;

    let change = CategoryChangeDto::new(&global, 0);
    let reassigned = commit_with_reassignment(repo, global, name, &target)?;
    log::info!("Removed category {name}, {reassigned} entries moved to {target}");
    Ok(CategoryChangeDto {
        reassigned,
        ..change
    })
}

/// Persists `global` together with every user document whose entries referenced
/// `from`. Caller must hold the exclusive global lock.
fn commit_with_reassignment<R>(
    repo: &R,
    global: GlobalDocument,
    from: &str,
    to: &CategoryName,
) -> ServiceResult<usize>
where
    R: SnapshotReader + SnapshotWriter + ?Sized,
{
    let now = Utc::now().naive_utc();
    let mut changeset = Changeset::global(global);
    let mut reassigned = 0;

    for owner in repo.list_owners().logged("list owners")? {
        let mut document = repo.load_user(&owner).logged("load user document")?;
        let changed = reassign_category(&mut document.entries, from, to, now);
        if changed > 0 {
            reassigned += changed;
            changeset = changeset.with_user(owner, document);
        }
    }

    repo.commit(changeset).logged("commit category change")?;
    Ok(reassigned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::ALL_CATEGORIES;
    use crate::domain::entry::{Entry, EntryFilter, NewEntry};
    use crate::domain::snapshot::UserDocument;
    use crate::domain::types::{ImageData, PromptText, TagSet, Username};
    use crate::repository::test::TestRepository;

    fn entry(owner: &str, category: &str) -> Entry {
        NewEntry {
            owner: Username::new(owner).unwrap(),
            category: CategoryName::new(category).unwrap(),
            prompt_text: PromptText::new("prompt").unwrap(),
            image: ImageData::new("img").unwrap(),
            tags: TagSet::default(),
            done: false,
        }
        .into_entry(Utc::now().naive_utc())
    }

    fn document(entries: Vec<Entry>) -> UserDocument {
        UserDocument {
            entries,
            ..UserDocument::default()
        }
    }

    fn rename(old: &str, new: &str) -> RenameCategoryFormPayload {
        RenameCategoryFormPayload {
            old_name: old.to_string(),
            new_name: CategoryName::new(new).ok(),
        }
    }

    fn categories_of(repo: &TestRepository, owner: &str) -> Vec<String> {
        repo.load_user(&Username::new(owner).unwrap())
            .unwrap()
            .entries
            .iter()
            .map(|e| e.category.to_string())
            .collect()
    }

    #[test]
    fn seeded_registry_is_listed() {
        let repo = TestRepository::new();
        let names = list_categories(&repo).unwrap();
        assert_eq!(names.len(), 5);
        assert_eq!(names[0], "MidJourney");
    }

    #[test]
    fn add_rejects_duplicates() {
        let repo = TestRepository::new();
        let payload = AddCategoryFormPayload {
            name: CategoryName::new("Sora").unwrap(),
        };
        assert!(matches!(
            add_category(payload, &repo),
            Err(ServiceError::DuplicateCategory)
        ));

        let payload = AddCategoryFormPayload {
            name: CategoryName::new("Runway").unwrap(),
        };
        let names = add_category(payload, &repo).unwrap();
        assert_eq!(names.last().unwrap(), &"Runway");
    }

    #[test]
    fn rename_cascades_across_owners_in_one_commit() {
        let repo = TestRepository::new()
            .with_user("ann", document(vec![entry("ann", "MidJourney"), entry("ann", "Sora")]))
            .with_user("bob", document(vec![entry("bob", "MidJourney")]));

        let change = rename_category(rename("MidJourney", "MJ"), &repo).unwrap();

        assert_eq!(change.reassigned, 2);
        assert_eq!(change.categories[0], "MJ");
        assert_eq!(categories_of(&repo, "ann"), ["MJ", "Sora"]);
        assert_eq!(categories_of(&repo, "bob"), ["MJ"]);
        assert_eq!(repo.commits(), 1);
    }

    #[test]
    fn rename_to_same_name_writes_nothing() {
        let repo = TestRepository::new().with_user("ann", document(vec![entry("ann", "Sora")]));

        let change = rename_category(rename("Sora", "Sora"), &repo).unwrap();
        assert_eq!(change.reassigned, 0);
        assert_eq!(repo.commits(), 0);
    }

    #[test]
    fn rename_to_existing_name_is_rejected() {
        let repo = TestRepository::new();
        assert!(matches!(
            rename_category(rename("Sora", "VEO3"), &repo),
            Err(ServiceError::DuplicateCategory)
        ));
        assert!(matches!(
            rename_category(rename("Nope", "New"), &repo),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn unknown_source_wins_over_blank_target() {
        let repo = TestRepository::new();
        let blank = RenameCategoryFormPayload {
            old_name: "Nope".into(),
            new_name: None,
        };
        assert!(matches!(
            rename_category(blank, &repo),
            Err(ServiceError::NotFound)
        ));

        let blank = RenameCategoryFormPayload {
            old_name: "Sora".into(),
            new_name: None,
        };
        assert!(matches!(
            rename_category(blank, &repo),
            Err(ServiceError::InvalidArgument(_))
        ));
        assert_eq!(repo.commits(), 0);
    }

    #[test]
    fn all_is_reserved_for_search() {
        let repo = TestRepository::new()
            .with_user("ann", document(vec![entry("ann", "Sora"), entry("ann", "VEO3")]));
        let payload = AddCategoryFormPayload {
            name: CategoryName::new(ALL_CATEGORIES).unwrap(),
        };
        assert!(matches!(
            add_category(payload, &repo),
            Err(ServiceError::InvalidArgument(_))
        ));
        assert!(matches!(
            rename_category(rename("Sora", ALL_CATEGORIES), &repo),
            Err(ServiceError::InvalidArgument(_))
        ));
        assert!(!list_categories(&repo).unwrap().iter().any(|c| c == &ALL_CATEGORIES));

        let ann = repo.load_user(&Username::new("ann").unwrap()).unwrap();
        let filter = EntryFilter::new(Some(ALL_CATEGORIES), None);
        assert_eq!(ann.entries.iter().filter(|e| filter.matches(e)).count(), 2);
        assert_eq!(repo.commits(), 0);
    }

    #[test]
    fn remove_moves_entries_to_fallback() {
        let repo = TestRepository::new().with_user("ann", document(vec![entry("ann", "VEO3")]));

        let change = remove_category("VEO3", &repo).unwrap();
        assert_eq!(change.reassigned, 1);
        assert!(!change.categories.iter().any(|c| c == &"VEO3"));
        assert_eq!(categories_of(&repo, "ann"), ["Other"]);
    }

    #[test]
    fn removing_other_falls_back_to_first_category() {
        let repo = TestRepository::new().with_user("ann", document(vec![entry("ann", "Other")]));

        remove_category("Other", &repo).unwrap();
        assert_eq!(categories_of(&repo, "ann"), ["MidJourney"]);
    }

    #[test]
    fn last_category_cannot_be_removed() {
        let repo = TestRepository::new();
        for name in ["MidJourney", "Sora", "Leonardo AI", "VEO3"] {
            remove_category(name, &repo).unwrap();
        }
        assert!(matches!(
            remove_category("Other", &repo),
            Err(ServiceError::LastCategory)
        ));
        assert_eq!(list_categories(&repo).unwrap().len(), 1);
    }

    #[test]
    fn failed_cascade_leaves_everything_unchanged() {
        let repo = TestRepository::new().with_user("ann", document(vec![entry("ann", "Sora")]));
        repo.fail_commits(true);

        assert!(matches!(
            rename_category(rename("Sora", "Sora 2"), &repo),
            Err(ServiceError::Io(_))
        ));
        assert!(list_categories(&repo).unwrap().iter().any(|c| c == &"Sora"));
        assert_eq!(categories_of(&repo, "ann"), ["Sora"]);
    }
}
