//! Persisted aggregates and the unit of persistence.
//!
//! State is split into one global document (accounts and the shared category
//! registry) and one document per owner (entries, story, materials). Each is
//! loaded and saved as a whole.

use serde::{Deserialize, Serialize};

use crate::domain::category::CategoryRegistry;
use crate::domain::entry::Entry;
use crate::domain::errors::DomainError;
use crate::domain::material::Material;
use crate::domain::story::StoryDocument;
use crate::domain::types::{EntryId, MaterialId, Username};
use crate::domain::user::User;

const GLOBAL_SCOPE_KEY: &str = "global";
const USER_SCOPE_PREFIX: &str = "user:";

/// Address of a persisted document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Global,
    User(Username),
}

impl Scope {
    /// Stable storage key, e.g. `global` or `user:ann`.
    pub fn key(&self) -> String {
        match self {
            Self::Global => GLOBAL_SCOPE_KEY.to_string(),
            Self::User(owner) => format!("{USER_SCOPE_PREFIX}{owner}"),
        }
    }

    /// Inverse of [`Self::key`]. Unknown keys yield `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        if key == GLOBAL_SCOPE_KEY {
            return Some(Self::Global);
        }
        key.strip_prefix(USER_SCOPE_PREFIX)
            .and_then(|owner| Username::new(owner).ok())
            .map(Self::User)
    }
}

/// Accounts plus the shared category registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GlobalDocument {
    pub users: Vec<User>,
    pub categories: CategoryRegistry,
}

impl GlobalDocument {
    /// Exact, case-sensitive lookup.
    pub fn find_user(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username.as_str() == username)
    }

    pub fn add_user(&mut self, user: User) -> Result<(), DomainError> {
        if self.find_user(&user.username).is_some() {
            return Err(DomainError::DuplicateUser(user.username.into_inner()));
        }
        self.users.push(user);
        Ok(())
    }
}

/// Everything owned by a single user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UserDocument {
    pub entries: Vec<Entry>,
    /// Created on first access.
    pub story: Option<StoryDocument>,
    pub materials: Vec<Material>,
}

impl UserDocument {
    pub fn entry_position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    pub fn material_position(&self, id: MaterialId) -> Option<usize> {
        self.materials.iter().position(|m| m.id == id)
    }

    /// The story document, or the default one if it was never created.
    pub fn story(&self) -> StoryDocument {
        self.story.clone().unwrap_or_default()
    }
}

/// Documents to be persisted together, atomically.
#[derive(Debug, Clone, Default)]
pub struct Changeset {
    pub global: Option<GlobalDocument>,
    pub users: Vec<(Username, UserDocument)>,
}

impl Changeset {
    pub fn global(document: GlobalDocument) -> Self {
        Self {
            global: Some(document),
            users: Vec::new(),
        }
    }

    pub fn user(owner: Username, document: UserDocument) -> Self {
        Self {
            global: None,
            users: vec![(owner, document)],
        }
    }

    pub fn with_user(mut self, owner: Username, document: UserDocument) -> Self {
        self.users.push((owner, document));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_none() && self.users.is_empty()
    }
}
