use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::types::CategoryName;

/// Categories every fresh installation starts with.
pub const DEFAULT_CATEGORIES: [&str; 5] = ["MidJourney", "Sora", "Leonardo AI", "VEO3", "Other"];

/// Target of the delete cascade.
pub const FALLBACK_CATEGORY: &str = "Other";

/// Search sentinel meaning "do not filter by category".
pub const ALL_CATEGORIES: &str = "All";

/// Process-wide ordered category list shared by every user.
///
/// Invariant: never empty. Position is the display order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "Vec<CategoryName>", into = "Vec<CategoryName>")]
pub struct CategoryRegistry(Vec<CategoryName>);

/// Restores the invariants on persisted data: duplicates are dropped and an
/// empty list falls back to the defaults.
impl From<Vec<CategoryName>> for CategoryRegistry {
    fn from(names: Vec<CategoryName>) -> Self {
        let mut unique: Vec<CategoryName> = Vec::with_capacity(names.len());
        for name in names {
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        if unique.is_empty() {
            Self::default()
        } else {
            Self(unique)
        }
    }
}

impl From<CategoryRegistry> for Vec<CategoryName> {
    fn from(registry: CategoryRegistry) -> Self {
        registry.0
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self(
            DEFAULT_CATEGORIES
                .iter()
                .filter_map(|name| CategoryName::new(*name).ok())
                .collect(),
        )
    }
}

impl CategoryRegistry {
    /// Current categories in display order.
    pub fn names(&self) -> &[CategoryName] {
        &self.0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|c| c.as_str() == name)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|c| c.as_str() == name)
    }

    fn check_not_reserved(name: &CategoryName) -> Result<(), DomainError> {
        if name.as_str() == ALL_CATEGORIES {
            return Err(DomainError::ReservedCategory(name.as_str().to_string()));
        }
        Ok(())
    }

    /// Appends `name` at the end.
    pub fn add(&mut self, name: CategoryName) -> Result<(), DomainError> {
        Self::check_not_reserved(&name)?;
        if self.contains(&name) {
            return Err(DomainError::DuplicateCategory(name.into_inner()));
        }
        self.0.push(name);
        Ok(())
    }

    /// Renames `old` in place. Returns `false` when `old == new` and nothing
    /// changed, so callers can skip the entry cascade.
    pub fn rename(&mut self, old: &str, new: CategoryName) -> Result<bool, DomainError> {
        let index = self
            .position(old)
            .ok_or_else(|| DomainError::CategoryNotFound(old.to_string()))?;
        if new.as_str() == old {
            return Ok(false);
        }
        Self::check_not_reserved(&new)?;
        if self.contains(&new) {
            return Err(DomainError::DuplicateCategory(new.into_inner()));
        }
        self.0[index] = new;
        Ok(true)
    }

    /// Removes `name` and returns the category that orphaned entries should be
    /// moved to: [`FALLBACK_CATEGORY`] while it exists, otherwise the first
    /// remaining category.
    pub fn remove(&mut self, name: &str) -> Result<CategoryName, DomainError> {
        let index = self
            .position(name)
            .ok_or_else(|| DomainError::CategoryNotFound(name.to_string()))?;
        if self.0.len() == 1 {
            return Err(DomainError::LastCategory);
        }
        self.0.remove(index);

        let target = self
            .0
            .iter()
            .find(|c| c.as_str() == FALLBACK_CATEGORY)
            .unwrap_or(&self.0[0]);
        Ok(target.clone())
    }
}
