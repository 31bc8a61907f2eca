use actix_identity::Identity;
use actix_web::{HttpResponse, delete, get, post, web};

use crate::domain::types::MaterialId;
use crate::forms::materials::{
    CreateMaterialForm, CreateMaterialFormPayload, SearchMaterialsQuery,
};
use crate::repository::SnapshotStore;
use crate::routes::session_user;
use crate::services::ServiceError;
use crate::services::materials::{
    create_material as create_material_service, delete_material as delete_material_service,
    list_materials as list_materials_service, search_materials as search_materials_service,
};

#[get("/materials")]
pub async fn list_materials(
    identity: Identity,
    repo: web::Data<dyn SnapshotStore>,
) -> Result<HttpResponse, ServiceError> {
    let owner = session_user(&identity)?;
    let materials = list_materials_service(&owner, repo.get_ref())?;
    Ok(HttpResponse::Ok().json(materials))
}

#[get("/materials/search")]
pub async fn search_materials(
    identity: Identity,
    repo: web::Data<dyn SnapshotStore>,
    web::Query(query): web::Query<SearchMaterialsQuery>,
) -> Result<HttpResponse, ServiceError> {
    let owner = session_user(&identity)?;
    let materials = search_materials_service(&owner, &query.q, repo.get_ref())?;
    Ok(HttpResponse::Ok().json(materials))
}

#[post("/materials")]
pub async fn create_material(
    identity: Identity,
    repo: web::Data<dyn SnapshotStore>,
    web::Json(form): web::Json<CreateMaterialForm>,
) -> Result<HttpResponse, ServiceError> {
    let owner = session_user(&identity)?;
    let payload = CreateMaterialFormPayload::try_from(form)?;
    let material = create_material_service(&owner, payload, repo.get_ref())?;
    Ok(HttpResponse::Created().json(material))
}

#[delete("/materials/{id}")]
pub async fn delete_material(
    identity: Identity,
    id: web::Path<String>,
    repo: web::Data<dyn SnapshotStore>,
) -> Result<HttpResponse, ServiceError> {
    let owner = session_user(&identity)?;
    let id = MaterialId::parse(&id)?;
    delete_material_service(id, Some(&owner), repo.get_ref())?;
    Ok(HttpResponse::NoContent().finish())
}
