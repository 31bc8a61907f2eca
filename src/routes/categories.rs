use actix_identity::Identity;
use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::forms::categories::{
    AddCategoryForm, AddCategoryFormPayload, RenameCategoryForm, RenameCategoryFormPayload,
};
use crate::repository::SnapshotStore;
use crate::routes::session_user;
use crate::services::ServiceError;
use crate::services::categories::{
    add_category as add_category_service, list_categories as list_categories_service,
    remove_category as remove_category_service, rename_category as rename_category_service,
};

#[get("/categories")]
pub async fn list_categories(
    identity: Identity,
    repo: web::Data<dyn SnapshotStore>,
) -> Result<HttpResponse, ServiceError> {
    session_user(&identity)?;
    let categories = list_categories_service(repo.get_ref())?;
    Ok(HttpResponse::Ok().json(categories))
}

#[post("/categories")]
pub async fn add_category(
    identity: Identity,
    repo: web::Data<dyn SnapshotStore>,
    web::Json(form): web::Json<AddCategoryForm>,
) -> Result<HttpResponse, ServiceError> {
    session_user(&identity)?;
    let payload = AddCategoryFormPayload::try_from(form)?;
    let categories = add_category_service(payload, repo.get_ref())?;
    Ok(HttpResponse::Created().json(categories))
}

#[put("/categories/{name}")]
pub async fn rename_category(
    identity: Identity,
    name: web::Path<String>,
    repo: web::Data<dyn SnapshotStore>,
    web::Json(mut form): web::Json<RenameCategoryForm>,
) -> Result<HttpResponse, ServiceError> {
    session_user(&identity)?;
    form.old_name = name.into_inner();
    let payload = RenameCategoryFormPayload::try_from(form)?;
    let change = rename_category_service(payload, repo.get_ref())?;
    Ok(HttpResponse::Ok().json(change))
}

#[delete("/categories/{name}")]
pub async fn remove_category(
    identity: Identity,
    name: web::Path<String>,
    repo: web::Data<dyn SnapshotStore>,
) -> Result<HttpResponse, ServiceError> {
    session_user(&identity)?;
    let change = remove_category_service(&name, repo.get_ref())?;
    Ok(HttpResponse::Ok().json(change))
}
