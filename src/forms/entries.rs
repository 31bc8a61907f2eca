use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::entry::{EntryFilter, EntryPatch, NewEntry};
use crate::domain::types::{
    CategoryName, ImageData, PromptText, TagSet, TypeConstraintError, Username,
};
use crate::forms::supplied;

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryForm {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    #[validate(length(max = 10000))]
    pub prompt_text: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    #[validate(length(max = 64))]
    pub tags: Vec<String>,
    #[serde(default)]
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateEntryFormPayload {
    pub category: CategoryName,
    pub prompt_text: PromptText,
    pub image: ImageData,
    pub tags: TagSet,
    pub done: bool,
}

impl CreateEntryFormPayload {
    pub fn into_new_entry(self, owner: Username) -> NewEntry {
        NewEntry {
            owner,
            category: self.category,
            prompt_text: self.prompt_text,
            image: self.image,
            tags: self.tags,
            done: self.done,
        }
    }
}

/// Partial update. Absent or blank text fields keep the stored value;
/// an explicit empty tag list clears the tags.
#[derive(Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntryForm {
    pub category: Option<String>,
    #[validate(length(max = 10000))]
    pub prompt_text: Option<String>,
    pub image: Option<String>,
    #[validate(length(max = 64))]
    pub tags: Option<Vec<String>>,
    pub done: Option<bool>,
}

#[derive(Debug, Error)]
pub enum EntryFormError {
    #[error("Entry form validation failed: {0}")]
    Validation(String),
    #[error("Entry form contains invalid data: {0}")]
    TypeConstraint(#[from] TypeConstraintError),
}

impl From<ValidationErrors> for EntryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl TryFrom<CreateEntryForm> for CreateEntryFormPayload {
    type Error = EntryFormError;

    fn try_from(value: CreateEntryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            image: ImageData::new(value.image)?,
            prompt_text: PromptText::new(value.prompt_text)?,
            category: CategoryName::new(value.category)?,
            tags: TagSet::from_raw(value.tags),
            done: value.done,
        })
    }
}

impl TryFrom<UpdateEntryForm> for EntryPatch {
    type Error = EntryFormError;

    fn try_from(value: UpdateEntryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            owner: None,
            category: supplied(value.category).map(CategoryName::new).transpose()?,
            prompt_text: supplied(value.prompt_text)
                .map(PromptText::new)
                .transpose()?,
            image: supplied(value.image).map(ImageData::new).transpose()?,
            tags: value.tags.map(TagSet::from_raw),
            done: value.done,
        })
    }
}

/// Query string of the entry search endpoint.
#[derive(Deserialize, Default)]
pub struct SearchEntriesQuery {
    pub category: Option<String>,
    pub q: Option<String>,
}

impl From<SearchEntriesQuery> for EntryFilter {
    fn from(value: SearchEntriesQuery) -> Self {
        EntryFilter::new(value.category.as_deref(), value.q.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_form() -> CreateEntryForm {
        CreateEntryForm {
            category: "MidJourney".into(),
            prompt_text: "neon city".into(),
            image: "data:image/png;base64,AAAA".into(),
            tags: vec!["#Night".into(), "night".into(), " ".into()],
            done: false,
        }
    }

    #[test]
    fn create_normalizes_tags() {
        let payload = CreateEntryFormPayload::try_from(create_form()).unwrap();
        assert_eq!(payload.tags, ["night"][..]);
        assert_eq!(payload.category, "MidJourney");
    }

    #[test]
    fn create_reports_missing_image_first() {
        let form = CreateEntryForm {
            image: String::new(),
            prompt_text: String::new(),
            ..create_form()
        };
        assert!(matches!(
            CreateEntryFormPayload::try_from(form),
            Err(EntryFormError::TypeConstraint(
                TypeConstraintError::EmptyString("image")
            ))
        ));
    }

    #[test]
    fn blank_update_fields_are_no_ops() {
        let form = UpdateEntryForm {
            prompt_text: Some("  ".into()),
            category: Some(String::new()),
            tags: Some(Vec::new()),
            ..UpdateEntryForm::default()
        };
        let patch = EntryPatch::try_from(form).unwrap();
        assert_eq!(patch.prompt_text, None);
        assert_eq!(patch.category, None);
        assert_eq!(patch.tags, Some(TagSet::default()));
    }

    #[test]
    fn search_query_maps_all_to_no_category() {
        let query = SearchEntriesQuery {
            category: Some("All".into()),
            q: Some("cat".into()),
        };
        assert_eq!(EntryFilter::from(query), EntryFilter::new(None, Some("cat")));
    }
}
