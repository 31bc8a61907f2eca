//! Account registry: registration and credential checks.

use chrono::Utc;

use crate::domain::types::Username;
use crate::domain::user::{User, UserProfile};
use crate::forms::auth::CredentialsFormPayload;
use crate::repository::{SnapshotReader, SnapshotWriter};
use crate::services::password::{hash_password, verify_password};

use super::{LogStorageError, ServiceError, ServiceResult};

/// Creates a new account. Usernames are unique and case-sensitive.
pub fn register<R>(payload: CredentialsFormPayload, repo: &R) -> ServiceResult<UserProfile>
where
    R: SnapshotReader + SnapshotWriter + ?Sized,
{
    // Hashing is slow; keep it outside the exclusive section.
    let credential = hash_password(&payload.password).map_err(|e| {
        log::error!("Failed to hash password: {e}");
        ServiceError::Internal
    })?;

    let _lock = repo.locks().exclusive();

    let mut global = repo.load_global().logged("load accounts")?;
    if global.find_user(&payload.username).is_some() {
        return Err(ServiceError::DuplicateUser);
    }
    let user = User {
        username: payload.username,
        credential,
        created_at: Utc::now().naive_utc(),
    };
    let registered = UserProfile::from(&user);
    global.add_user(user)?;

    repo.save_global(global).logged("save accounts")?;
    log::info!("Registered user {}", registered.username);
    Ok(registered)
}

/// Verifies credentials. Unknown users and wrong passwords are indistinguishable.
pub fn authenticate<R>(payload: CredentialsFormPayload, repo: &R) -> ServiceResult<UserProfile>
where
    R: SnapshotReader + ?Sized,
{
    let global = repo.load_global().logged("load accounts")?;
    let user = global
        .find_user(&payload.username)
        .ok_or(ServiceError::InvalidCredentials)?;

    match verify_password(&payload.password, &user.credential) {
        Ok(true) => Ok(UserProfile::from(user)),
        Ok(false) => Err(ServiceError::InvalidCredentials),
        Err(e) => {
            log::error!("Stored credential for {} is unreadable: {e}", user.username);
            Err(ServiceError::InvalidCredentials)
        }
    }
}

/// Public view of an existing account.
pub fn profile<R>(username: &Username, repo: &R) -> ServiceResult<UserProfile>
where
    R: SnapshotReader + ?Sized,
{
    let global = repo.load_global().logged("load accounts")?;
    global
        .find_user(username)
        .map(UserProfile::from)
        .ok_or(ServiceError::NotFound)
}
