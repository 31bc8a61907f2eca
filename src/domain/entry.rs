use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::category::ALL_CATEGORIES;
use crate::domain::errors::DomainError;
use crate::domain::types::{CategoryName, EntryId, ImageData, PromptText, TagSet, Username};

/// A saved prompt together with the image it produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: EntryId,
    pub owner: Username,
    pub category: CategoryName,
    pub prompt_text: PromptText,
    pub image: ImageData,
    pub tags: TagSet,
    pub done: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data required to insert a new [`Entry`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub owner: Username,
    pub category: CategoryName,
    pub prompt_text: PromptText,
    pub image: ImageData,
    pub tags: TagSet,
    pub done: bool,
}

impl NewEntry {
    /// Assigns a fresh id and timestamps.
    pub fn into_entry(self, now: NaiveDateTime) -> Entry {
        Entry {
            id: EntryId::generate(),
            owner: self.owner,
            category: self.category,
            prompt_text: self.prompt_text,
            image: self.image,
            tags: self.tags,
            done: self.done,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryPatch {
    /// Expected owner; a mismatch rejects the whole patch.
    pub owner: Option<Username>,
    pub category: Option<CategoryName>,
    pub prompt_text: Option<PromptText>,
    pub image: Option<ImageData>,
    pub tags: Option<TagSet>,
    pub done: Option<bool>,
}

impl Entry {
    /// Applies `patch` in place. Nothing is modified when the owner check fails.
    pub fn apply(&mut self, patch: EntryPatch, now: NaiveDateTime) -> Result<(), DomainError> {
        if let Some(owner) = &patch.owner
            && owner != &self.owner
        {
            return Err(DomainError::OwnerMismatch);
        }

        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(prompt_text) = patch.prompt_text {
            self.prompt_text = prompt_text;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(done) = patch.done {
            self.done = done;
        }
        self.updated_at = now;
        Ok(())
    }
}

/// Category and free-text filter applied to one owner's entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryFilter {
    category: Option<String>,
    term: Option<String>,
}

impl EntryFilter {
    /// Blank values and the [`ALL_CATEGORIES`] sentinel disable the matching filter.
    pub fn new(category: Option<&str>, term: Option<&str>) -> Self {
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
            .map(str::to_string);
        let term = term
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase);
        Self { category, term }
    }

    pub fn matches(&self, entry: &Entry) -> bool {
        if let Some(category) = &self.category
            && entry.category.as_str() != category
        {
            return false;
        }
        match &self.term {
            Some(term) => {
                entry.prompt_text.to_lowercase().contains(term.as_str())
                    || entry.tags.any_contains(term)
            }
            None => true,
        }
    }
}

/// Moves every entry in `from` to `to`. Returns the number of rewritten entries.
pub fn reassign_category(
    entries: &mut [Entry],
    from: &str,
    to: &CategoryName,
    now: NaiveDateTime,
) -> usize {
    let mut changed = 0;
    for entry in entries.iter_mut().filter(|e| e.category.as_str() == from) {
        entry.category = to.clone();
        entry.updated_at = now;
        changed += 1;
    }
    changed
}
