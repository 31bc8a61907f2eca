use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{MaterialId, MaterialKind, MaterialTitle, MaterialUrl, TagSet, Username};

/// A bookmarked reference: an article, a tutorial video, a gallery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: MaterialId,
    pub owner: Username,
    pub title: MaterialTitle,
    #[serde(rename = "type")]
    pub kind: MaterialKind,
    pub url: MaterialUrl,
    pub tags: TagSet,
    pub created_at: NaiveDateTime,
    /// Equal to `created_at`; materials are replaced, never edited.
    #[serde(default)]
    pub updated_at: NaiveDateTime,
}

/// Data required to insert a new [`Material`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewMaterial {
    pub owner: Username,
    pub title: MaterialTitle,
    pub kind: MaterialKind,
    pub url: MaterialUrl,
    pub tags: TagSet,
}

impl NewMaterial {
    pub fn into_material(self, now: NaiveDateTime) -> Material {
        Material {
            id: MaterialId::generate(),
            owner: self.owner,
            title: self.title,
            kind: self.kind,
            url: self.url,
            tags: self.tags,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Material {
    /// Case-insensitive substring match on title, kind or any tag.
    /// A blank term matches everything.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.title.to_lowercase().contains(&term)
            || self.kind.as_str().contains(&term)
            || self.tags.any_contains(&term)
    }
}
