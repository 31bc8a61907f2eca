//! JSON HTTP surface.
//!
//! Handlers convert request bodies into payloads, call the matching service
//! and serialize its result. Failures become [`ServiceError`] responses with
//! a `{"error": "..."}` body.

use actix_identity::Identity;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

use crate::domain::types::Username;
use crate::services::ServiceError;

pub mod auth;
pub mod categories;
pub mod entries;
pub mod materials;
pub mod story;

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::MissingField(_)
            | ServiceError::InvalidArgument(_)
            | ServiceError::LastCategory => StatusCode::BAD_REQUEST,
            ServiceError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ServiceError::OwnerMismatch => StatusCode::FORBIDDEN,
            ServiceError::NotFound | ServiceError::IndexOutOfRange(_) => StatusCode::NOT_FOUND,
            ServiceError::DuplicateUser | ServiceError::DuplicateCategory => StatusCode::CONFLICT,
            ServiceError::Io(_) | ServiceError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // storage details stay in the log
        let message = if status.is_server_error() {
            ServiceError::Internal.to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(status).json(json!({ "error": message }))
    }
}

/// Username stored in the session by a successful login.
pub fn session_user(identity: &Identity) -> Result<Username, ServiceError> {
    let id = identity.id().map_err(|e| {
        log::error!("Failed to read session identity: {e}");
        ServiceError::Internal
    })?;
    Username::new(id).map_err(|e| {
        log::error!("Session carries an invalid username: {e}");
        ServiceError::Internal
    })
}
