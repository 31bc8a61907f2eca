use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{PasswordHash, Username};

/// Registered account. Never mutated after signup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: Username,
    pub credential: PasswordHash,
    pub created_at: NaiveDateTime,
}

/// Public projection of [`User`] without the credential.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: Username,
    pub created_at: NaiveDateTime,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            created_at: user.created_at,
        }
    }
}
