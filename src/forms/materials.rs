use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::material::NewMaterial;
use crate::domain::types::{
    MaterialKind, MaterialTitle, MaterialUrl, TagSet, TypeConstraintError, Username,
};

#[derive(Deserialize, Validate, Default)]
pub struct CreateMaterialForm {
    #[serde(default)]
    #[validate(length(max = 500))]
    pub title: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    #[validate(length(max = 2048))]
    pub url: String,
    #[serde(default)]
    #[validate(length(max = 64))]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateMaterialFormPayload {
    pub title: MaterialTitle,
    pub kind: MaterialKind,
    pub url: MaterialUrl,
    pub tags: TagSet,
}

impl CreateMaterialFormPayload {
    pub fn into_new_material(self, owner: Username) -> NewMaterial {
        NewMaterial {
            owner,
            title: self.title,
            kind: self.kind,
            url: self.url,
            tags: self.tags,
        }
    }
}

#[derive(Debug, Error)]
pub enum MaterialFormError {
    #[error("Material form validation failed: {0}")]
    Validation(String),
    #[error("Material form contains invalid data: {0}")]
    TypeConstraint(#[from] TypeConstraintError),
}

impl From<ValidationErrors> for MaterialFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl TryFrom<CreateMaterialForm> for CreateMaterialFormPayload {
    type Error = MaterialFormError;

    fn try_from(value: CreateMaterialForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            title: MaterialTitle::new(value.title)?,
            url: MaterialUrl::new(value.url)?,
            kind: MaterialKind::from_input(value.kind.as_deref()),
            tags: TagSet::from_raw(value.tags),
        })
    }
}

#[derive(Deserialize, Default)]
pub struct SearchMaterialsQuery {
    #[serde(default)]
    pub q: String,
}
