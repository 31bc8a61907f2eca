use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{TypeConstraintError, Username};

/// Username and password, shared by registration and login.
#[derive(Deserialize, Validate)]
pub struct CredentialsForm {
    #[serde(default)]
    #[validate(length(max = 64))]
    pub username: String,
    #[serde(default)]
    #[validate(length(max = 256))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CredentialsFormPayload {
    pub username: Username,
    /// Plaintext; only ever handed to the hasher.
    pub password: String,
}

#[derive(Debug, Error)]
pub enum CredentialsFormError {
    #[error("Credentials form validation failed: {0}")]
    Validation(String),
    #[error("Credentials form contains invalid data: {0}")]
    TypeConstraint(#[from] TypeConstraintError),
}

impl From<ValidationErrors> for CredentialsFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl TryFrom<CredentialsForm> for CredentialsFormPayload {
    type Error = CredentialsFormError;

    fn try_from(value: CredentialsForm) -> Result<Self, Self::Error> {
        value.validate()?;
        let username = Username::new(value.username)?;
        if value.password.is_empty() {
            return Err(TypeConstraintError::EmptyString("password").into());
        }
        Ok(Self {
            username,
            password: value.password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(username: &str, password: &str) -> CredentialsForm {
        CredentialsForm {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn username_is_trimmed_password_is_not() {
        let payload = CredentialsFormPayload::try_from(form("  ann ", " secret ")).unwrap();
        assert_eq!(payload.username, "ann");
        assert_eq!(payload.password, " secret ");
    }

    #[test]
    fn blank_fields_are_missing() {
        assert!(matches!(
            CredentialsFormPayload::try_from(form("  ", "pw")),
            Err(CredentialsFormError::TypeConstraint(
                TypeConstraintError::EmptyString("username")
            ))
        ));
        assert!(matches!(
            CredentialsFormPayload::try_from(form("ann", "")),
            Err(CredentialsFormError::TypeConstraint(
                TypeConstraintError::EmptyString("password")
            ))
        ));
    }

    #[test]
    fn overlong_username_fails_validation() {
        let result = CredentialsFormPayload::try_from(form(&"a".repeat(65), "pw"));
        assert!(matches!(result, Err(CredentialsFormError::Validation(_))));
    }
}
