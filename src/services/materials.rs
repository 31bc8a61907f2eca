//! Reference materials: bookmarked links and videos.

use chrono::Utc;

use crate::domain::material::Material;
use crate::domain::types::{MaterialId, Username};
use crate::forms::materials::CreateMaterialFormPayload;
use crate::repository::{SnapshotReader, SnapshotWriter};

use super::{LogStorageError, ServiceError, ServiceResult, with_located_record};

pub fn list_materials<R>(owner: &Username, repo: &R) -> ServiceResult<Vec<Material>>
where
    R: SnapshotReader + ?Sized,
{
    let document = repo.load_user(owner).logged("load materials")?;
    Ok(document.materials)
}

pub fn create_material<R>(
    owner: &Username,
    payload: CreateMaterialFormPayload,
    repo: &R,
) -> ServiceResult<Material>
where
    R: SnapshotReader + SnapshotWriter + ?Sized,
{
    repo.locks().with_owner(owner, || {
        let mut document = repo.load_user(owner).logged("load materials")?;
        let material = payload
            .into_new_material(owner.clone())
            .into_material(Utc::now().naive_utc());
        document.materials.push(material.clone());

        repo.save_user(owner.clone(), document)
            .logged("save materials")?;
        Ok(material)
    })
}

/// Removes the material with `id`. When `expected_owner` is given it must match.
pub fn delete_material<R>(
    id: MaterialId,
    expected_owner: Option<&Username>,
    repo: &R,
) -> ServiceResult<Material>
where
    R: SnapshotReader + SnapshotWriter + ?Sized,
{
    with_located_record(
        repo,
        expected_owner,
        |document| document.material_position(id),
        |owner, mut document, index| {
            if expected_owner.is_some_and(|expected| expected != &owner) {
                return Err(ServiceError::OwnerMismatch);
            }

            let material = document.materials.remove(index);
            repo.save_user(owner, document)
                .logged("save materials")?;
            Ok(material)
        },
    )
}

/// Case-insensitive match on title, type or tags. A blank term returns everything.
pub fn search_materials<R>(
    owner: &Username,
    term: &str,
    repo: &R,
) -> ServiceResult<Vec<Material>>
where
    R: SnapshotReader + ?Sized,
{
    let document = repo.load_user(owner).logged("load materials")?;
    Ok(document
        .materials
        .into_iter()
        .filter(|m| m.matches(term))
        .collect())
}
