//! Error conversion glue between the domain, form and service layers.
//!
//! The domain layer must not depend on service error types, so the mapping
//! onto [`ServiceError`] lives here.

use crate::domain::errors::DomainError;
use crate::domain::types::TypeConstraintError;
use crate::forms::auth::CredentialsFormError;
use crate::forms::categories::CategoryFormError;
use crate::forms::entries::EntryFormError;
use crate::forms::materials::MaterialFormError;
use crate::forms::story::StoryFormError;
use crate::services::errors::ServiceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        match val {
            TypeConstraintError::EmptyString(field) => ServiceError::MissingField(field),
            other => ServiceError::InvalidArgument(other.to_string()),
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(val: DomainError) -> Self {
        match val {
            DomainError::DuplicateCategory(_) => ServiceError::DuplicateCategory,
            e @ DomainError::ReservedCategory(_) => ServiceError::InvalidArgument(e.to_string()),
            DomainError::CategoryNotFound(_) => ServiceError::NotFound,
            DomainError::LastCategory => ServiceError::LastCategory,
            DomainError::DuplicateUser(_) => ServiceError::DuplicateUser,
            DomainError::SceneIndexOutOfRange { index, .. } => ServiceError::IndexOutOfRange(index),
            DomainError::OwnerMismatch => ServiceError::OwnerMismatch,
        }
    }
}

impl From<CredentialsFormError> for ServiceError {
    fn from(val: CredentialsFormError) -> Self {
        match val {
            CredentialsFormError::Validation(message) => ServiceError::InvalidArgument(message),
            CredentialsFormError::TypeConstraint(e) => e.into(),
        }
    }
}

impl From<CategoryFormError> for ServiceError {
    fn from(val: CategoryFormError) -> Self {
        match val {
            CategoryFormError::Validation(message) => ServiceError::InvalidArgument(message),
            CategoryFormError::TypeConstraint(e) => e.into(),
        }
    }
}

impl From<EntryFormError> for ServiceError {
    fn from(val: EntryFormError) -> Self {
        match val {
            EntryFormError::Validation(message) => ServiceError::InvalidArgument(message),
            EntryFormError::TypeConstraint(e) => e.into(),
        }
    }
}

impl From<StoryFormError> for ServiceError {
    fn from(val: StoryFormError) -> Self {
        match val {
            StoryFormError::Validation(message) => ServiceError::InvalidArgument(message),
            StoryFormError::TypeConstraint(e) => e.into(),
        }
    }
}

impl From<MaterialFormError> for ServiceError {
    fn from(val: MaterialFormError) -> Self {
        match val {
            MaterialFormError::Validation(message) => ServiceError::InvalidArgument(message),
            MaterialFormError::TypeConstraint(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_strings_become_missing_fields() {
        let err: ServiceError = TypeConstraintError::EmptyString("image").into();
        assert!(matches!(err, ServiceError::MissingField("image")));

        let err: ServiceError = TypeConstraintError::InvalidId("entry_id").into();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
    }

    #[test]
    fn domain_errors_map_onto_service_errors() {
        let err: ServiceError = DomainError::SceneIndexOutOfRange { index: 4, len: 2 }.into();
        assert!(matches!(err, ServiceError::IndexOutOfRange(4)));

        let err: ServiceError = DomainError::CategoryNotFound("Q".into()).into();
        assert!(matches!(err, ServiceError::NotFound));
    }

    #[test]
    fn reserved_category_is_an_invalid_argument() {
        let err: ServiceError = DomainError::ReservedCategory("All".into()).into();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
    }
}
