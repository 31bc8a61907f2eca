use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, get, post, web};

use crate::forms::auth::{CredentialsForm, CredentialsFormPayload};
use crate::repository::SnapshotStore;
use crate::routes::session_user;
use crate::services::ServiceError;
use crate::services::identity::{authenticate, profile, register as register_service};

fn start_session(req: &HttpRequest, username: &str) -> Result<(), ServiceError> {
    Identity::login(&req.extensions(), username.to_string()).map_err(|e| {
        log::error!("Failed to attach identity to session: {e}");
        ServiceError::Internal
    })?;
    Ok(())
}

/// Password hashing is CPU bound, so it runs on the blocking pool.
async fn blocking<T, F>(f: F) -> Result<T, ServiceError>
where
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    web::block(f).await.map_err(|e| {
        log::error!("Blocking task failed: {e}");
        ServiceError::Internal
    })?
}

#[post("/auth/register")]
pub async fn register(
    req: HttpRequest,
    repo: web::Data<dyn SnapshotStore>,
    web::Json(form): web::Json<CredentialsForm>,
) -> Result<HttpResponse, ServiceError> {
    let payload = CredentialsFormPayload::try_from(form)?;
    let profile = blocking(move || register_service(payload, repo.get_ref())).await?;

    start_session(&req, &profile.username)?;
    Ok(HttpResponse::Created().json(profile))
}

#[post("/auth/login")]
pub async fn login(
    req: HttpRequest,
    repo: web::Data<dyn SnapshotStore>,
    web::Json(form): web::Json<CredentialsForm>,
) -> Result<HttpResponse, ServiceError> {
    let payload = CredentialsFormPayload::try_from(form)?;
    let profile = blocking(move || authenticate(payload, repo.get_ref())).await?;

    start_session(&req, &profile.username)?;
    Ok(HttpResponse::Ok().json(profile))
}

#[post("/auth/logout")]
pub async fn logout(identity: Identity) -> HttpResponse {
    identity.logout();
    HttpResponse::NoContent().finish()
}

#[get("/auth/me")]
pub async fn me(
    identity: Identity,
    repo: web::Data<dyn SnapshotStore>,
) -> Result<HttpResponse, ServiceError> {
    let username = session_user(&identity)?;
    match profile(&username, repo.get_ref()) {
        Ok(user) => Ok(HttpResponse::Ok().json(user)),
        Err(ServiceError::NotFound) => {
            identity.logout();
            Err(ServiceError::InvalidCredentials)
        }
        Err(e) => Err(e),
    }
}
