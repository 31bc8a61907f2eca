use actix_identity::Identity;
use actix_web::{HttpResponse, delete, get, patch, post, web};

use crate::domain::entry::{EntryFilter, EntryPatch};
use crate::domain::types::EntryId;
use crate::forms::entries::{
    CreateEntryForm, CreateEntryFormPayload, SearchEntriesQuery, UpdateEntryForm,
};
use crate::repository::SnapshotStore;
use crate::routes::session_user;
use crate::services::ServiceError;
use crate::services::entries::{
    create_entry as create_entry_service, delete_entry as delete_entry_service,
    get_entry as get_entry_service, list_entries as list_entries_service,
    search_entries as search_entries_service, update_entry as update_entry_service,
};

#[get("/entries")]
pub async fn list_entries(
    identity: Identity,
    repo: web::Data<dyn SnapshotStore>,
) -> Result<HttpResponse, ServiceError> {
    let owner = session_user(&identity)?;
    let entries = list_entries_service(&owner, repo.get_ref())?;
    Ok(HttpResponse::Ok().json(entries))
}

#[get("/entries/search")]
pub async fn search_entries(
    identity: Identity,
    repo: web::Data<dyn SnapshotStore>,
    web::Query(query): web::Query<SearchEntriesQuery>,
) -> Result<HttpResponse, ServiceError> {
    let owner = session_user(&identity)?;
    let filter = EntryFilter::from(query);
    let entries = search_entries_service(&owner, &filter, repo.get_ref())?;
    Ok(HttpResponse::Ok().json(entries))
}

#[post("/entries")]
pub async fn create_entry(
    identity: Identity,
    repo: web::Data<dyn SnapshotStore>,
    web::Json(form): web::Json<CreateEntryForm>,
) -> Result<HttpResponse, ServiceError> {
    let owner = session_user(&identity)?;
    let payload = CreateEntryFormPayload::try_from(form)?;
    let entry = create_entry_service(&owner, payload, repo.get_ref())?;
    Ok(HttpResponse::Created().json(entry))
}

#[get("/entries/{id}")]
pub async fn get_entry(
    identity: Identity,
    id: web::Path<String>,
    repo: web::Data<dyn SnapshotStore>,
) -> Result<HttpResponse, ServiceError> {
    let owner = session_user(&identity)?;
    let id = EntryId::parse(&id)?;
    let entry = get_entry_service(&owner, id, repo.get_ref())?;
    Ok(HttpResponse::Ok().json(entry))
}

#[patch("/entries/{id}")]
pub async fn update_entry(
    identity: Identity,
    id: web::Path<String>,
    repo: web::Data<dyn SnapshotStore>,
    web::Json(form): web::Json<UpdateEntryForm>,
) -> Result<HttpResponse, ServiceError> {
    let owner = session_user(&identity)?;
    let id = EntryId::parse(&id)?;
    let patch = EntryPatch {
        owner: Some(owner),
        ..EntryPatch::try_from(form)?
    };
    let entry = update_entry_service(id, patch, repo.get_ref())?;
    Ok(HttpResponse::Ok().json(entry))
}

#[delete("/entries/{id}")]
pub async fn delete_entry(
    identity: Identity,
    id: web::Path<String>,
    repo: web::Data<dyn SnapshotStore>,
) -> Result<HttpResponse, ServiceError> {
    let owner = session_user(&identity)?;
    let id = EntryId::parse(&id)?;
    delete_entry_service(id, Some(&owner), repo.get_ref())?;
    Ok(HttpResponse::NoContent().finish())
}
