use actix_identity::Identity;
use actix_web::{HttpResponse, delete, get, patch, post, put, web};

use crate::domain::story::{Scene, ScenePatch};
use crate::domain::types::EntryId;
use crate::forms::story::{
    MoveSceneForm, SceneDoneForm, SceneForm, StoryMetaForm, StoryMetaFormPayload,
    UpdateSceneForm,
};
use crate::repository::SnapshotStore;
use crate::routes::session_user;
use crate::services::ServiceError;
use crate::services::story::{
    add_scene as add_scene_service, add_scene_from_entry as add_scene_from_entry_service,
    delete_scene as delete_scene_service, get_story as get_story_service,
    move_scene as move_scene_service, set_scene_done as set_scene_done_service,
    set_story_meta as set_story_meta_service, story_timeline as story_timeline_service,
    update_scene as update_scene_service,
};

#[get("/story")]
pub async fn get_story(
    identity: Identity,
    repo: web::Data<dyn SnapshotStore>,
) -> Result<HttpResponse, ServiceError> {
    let owner = session_user(&identity)?;
    let story = get_story_service(&owner, repo.get_ref())?;
    Ok(HttpResponse::Ok().json(story))
}

#[get("/story/timeline")]
pub async fn story_timeline(
    identity: Identity,
    repo: web::Data<dyn SnapshotStore>,
) -> Result<HttpResponse, ServiceError> {
    let owner = session_user(&identity)?;
    let timeline = story_timeline_service(&owner, repo.get_ref())?;
    Ok(HttpResponse::Ok().json(timeline))
}

#[put("/story/meta")]
pub async fn set_story_meta(
    identity: Identity,
    repo: web::Data<dyn SnapshotStore>,
    web::Json(form): web::Json<StoryMetaForm>,
) -> Result<HttpResponse, ServiceError> {
    let owner = session_user(&identity)?;
    let payload = StoryMetaFormPayload::try_from(form)?;
    let story = set_story_meta_service(&owner, payload, repo.get_ref())?;
    Ok(HttpResponse::Ok().json(story))
}

#[post("/story/scenes")]
pub async fn add_scene(
    identity: Identity,
    repo: web::Data<dyn SnapshotStore>,
    web::Json(form): web::Json<SceneForm>,
) -> Result<HttpResponse, ServiceError> {
    let owner = session_user(&identity)?;
    let scene = Scene::try_from(form)?;
    let story = add_scene_service(&owner, scene, repo.get_ref())?;
    Ok(HttpResponse::Created().json(story))
}

#[post("/story/scenes/from-entry/{id}")]
pub async fn add_scene_from_entry(
    identity: Identity,
    id: web::Path<String>,
    repo: web::Data<dyn SnapshotStore>,
) -> Result<HttpResponse, ServiceError> {
    let owner = session_user(&identity)?;
    let entry_id = EntryId::parse(&id)?;
    let story = add_scene_from_entry_service(&owner, entry_id, repo.get_ref())?;
    Ok(HttpResponse::Created().json(story))
}

#[patch("/story/scenes/{index}")]
pub async fn update_scene(
    identity: Identity,
    index: web::Path<usize>,
    repo: web::Data<dyn SnapshotStore>,
    web::Json(form): web::Json<UpdateSceneForm>,
) -> Result<HttpResponse, ServiceError> {
    let owner = session_user(&identity)?;
    let patch = ScenePatch::try_from(form)?;
    let story = update_scene_service(&owner, index.into_inner(), patch, repo.get_ref())?;
    Ok(HttpResponse::Ok().json(story))
}

#[delete("/story/scenes/{index}")]
pub async fn delete_scene(
    identity: Identity,
    index: web::Path<usize>,
    repo: web::Data<dyn SnapshotStore>,
) -> Result<HttpResponse, ServiceError> {
    let owner = session_user(&identity)?;
    let story = delete_scene_service(&owner, index.into_inner(), repo.get_ref())?;
    Ok(HttpResponse::Ok().json(story))
}

#[put("/story/scenes/{index}/done")]
pub async fn set_scene_done(
    identity: Identity,
    index: web::Path<usize>,
    repo: web::Data<dyn SnapshotStore>,
    web::Json(form): web::Json<SceneDoneForm>,
) -> Result<HttpResponse, ServiceError> {
    let owner = session_user(&identity)?;
    let story = set_scene_done_service(&owner, index.into_inner(), form.done, repo.get_ref())?;
    Ok(HttpResponse::Ok().json(story))
}

#[post("/story/scenes/{index}/move")]
pub async fn move_scene(
    identity: Identity,
    index: web::Path<usize>,
    repo: web::Data<dyn SnapshotStore>,
    web::Json(form): web::Json<MoveSceneForm>,
) -> Result<HttpResponse, ServiceError> {
    let owner = session_user(&identity)?;
    let story = move_scene_service(&owner, index.into_inner(), form.to, repo.get_ref())?;
    Ok(HttpResponse::Ok().json(story))
}
