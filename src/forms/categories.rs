use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{CategoryName, TypeConstraintError};

#[derive(Deserialize, Validate)]
pub struct AddCategoryForm {
    #[serde(default)]
    #[validate(length(max = 64))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddCategoryFormPayload {
    pub name: CategoryName,
}

/// Rename request. The current name comes from the request path.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RenameCategoryForm {
    #[serde(default)]
    pub old_name: String,
    #[serde(default)]
    #[validate(length(max = 64))]
    pub new_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenameCategoryFormPayload {
    pub old_name: String,
    /// `None` when the submitted name was blank. Rejected once the old name
    /// is known to exist.
    pub new_name: Option<CategoryName>,
}

#[derive(Debug, Error)]
pub enum CategoryFormError {
    #[error("Category form validation failed: {0}")]
    Validation(String),
    #[error("Category form contains invalid data: {0}")]
    TypeConstraint(#[from] TypeConstraintError),
}

impl From<ValidationErrors> for CategoryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl TryFrom<AddCategoryForm> for AddCategoryFormPayload {
    type Error = CategoryFormError;

    fn try_from(value: AddCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: CategoryName::new(value.name)?,
        })
    }
}

impl TryFrom<RenameCategoryForm> for RenameCategoryFormPayload {
    type Error = CategoryFormError;

    fn try_from(value: RenameCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            old_name: value.old_name.trim().to_string(),
            new_name: CategoryName::new(value.new_name).ok(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_category_trims_name() {
        let form = AddCategoryForm {
            name: "  Runway  ".into(),
        };
        let payload = AddCategoryFormPayload::try_from(form).unwrap();
        assert_eq!(payload.name, "Runway");
    }

    #[test]
    fn add_category_requires_name() {
        let form = AddCategoryForm { name: " ".into() };
        assert!(matches!(
            AddCategoryFormPayload::try_from(form),
            Err(CategoryFormError::TypeConstraint(
                TypeConstraintError::EmptyString("category")
            ))
        ));
    }

    #[test]
    fn rename_keeps_blank_new_name_as_absent() {
        let form = RenameCategoryForm {
            old_name: " Sora ".into(),
            new_name: "   ".into(),
        };
        let payload = RenameCategoryFormPayload::try_from(form).unwrap();
        assert_eq!(payload.old_name, "Sora");
        assert_eq!(payload.new_name, None);
    }
}
