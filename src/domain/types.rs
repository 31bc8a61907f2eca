//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs should carry these wrappers instead of raw primitives so that
//! identifiers, text values and numeric constraints are enforced at the
//! boundary.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// A numeric value required to be positive was zero/negative or invalid.
    #[error("{0} must be greater than zero")]
    NonPositiveNumber(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// An identifier could not be parsed.
    #[error("{0} is not a valid identifier")]
    InvalidId(&'static str),
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(trimmed)
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                trim_and_require_non_empty(value, $field).map(Self)
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }

        impl PartialEq<$name> for &str {
            fn eq(&self, other: &$name) -> bool {
                *self == other.as_str()
            }
        }
    };
}

/// Macro to generate opaque UUID-backed identifiers.
macro_rules! uuid_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a fresh random identifier.
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            /// Parses an identifier from its textual form.
            pub fn parse(value: &str) -> Result<Self, TypeConstraintError> {
                Uuid::parse_str(value.trim())
                    .map(Self)
                    .map_err(|_| TypeConstraintError::InvalidId($field))
            }

            /// Returns the underlying UUID.
            pub const fn get(self) -> Uuid {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = TypeConstraintError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::parse(value)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }
    };
}

uuid_newtype!(EntryId, "Unique identifier for a prompt entry.", "entry_id");
uuid_newtype!(
    MaterialId,
    "Unique identifier for a material bookmark.",
    "material_id"
);

non_empty_string_newtype!(
    Username,
    "Account name. Case-sensitive and unique across the registry.",
    "username"
);
non_empty_string_newtype!(
    CategoryName,
    "Category name enforcing non-empty values.",
    "category"
);
non_empty_string_newtype!(
    PromptText,
    "Prompt text enforcing non-empty values.",
    "prompt text"
);
non_empty_string_newtype!(
    ImageData,
    "Opaque image payload, usually a data URI. Never decoded.",
    "image"
);
non_empty_string_newtype!(
    MaterialTitle,
    "Material title enforcing non-empty values.",
    "title"
);
non_empty_string_newtype!(MaterialUrl, "Material link target.", "url");
non_empty_string_newtype!(ThemeColor, "Story theme color.", "theme color");

/// Theme color assigned to freshly created story documents.
pub const DEFAULT_THEME_COLOR: &str = "#5a5ce6";

impl Default for ThemeColor {
    fn default() -> Self {
        Self(DEFAULT_THEME_COLOR.to_string())
    }
}

/// Argon2 PHC string. Deliberately not `Display`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wraps an already computed PHC string.
    pub fn from_phc(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Lowercase tag without a leading `#`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Tag(String);

impl Tag {
    /// Normalizes `value`: trims, strips leading `#` characters and lowercases.
    pub fn new<S: AsRef<str>>(value: S) -> Result<Self, TypeConstraintError> {
        let normalized = value
            .as_ref()
            .trim()
            .trim_start_matches('#')
            .trim()
            .to_lowercase();
        if normalized.is_empty() {
            Err(TypeConstraintError::EmptyString("tag"))
        } else {
            Ok(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq<&str> for Tag {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Ordered set of tags. Duplicates and blank inputs are dropped.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct TagSet(Vec<Tag>);

impl TagSet {
    /// Builds a set from raw user input, skipping values that normalize to nothing.
    pub fn from_raw<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tags: Vec<Tag> = Vec::new();
        for tag in values.into_iter().filter_map(|v| Tag::new(v).ok()) {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        Self(tags)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when any tag contains `needle`, which must already be lowercase.
    pub fn any_contains(&self, needle: &str) -> bool {
        self.0.iter().any(|t| t.0.contains(needle))
    }
}

impl PartialEq<[&str]> for TagSet {
    fn eq(&self, other: &[&str]) -> bool {
        self.0.len() == other.len() && self.0.iter().zip(other).all(|(a, b)| a == b)
    }
}

/// Positive scene duration in whole seconds.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct DurationSeconds(u32);

impl DurationSeconds {
    pub fn new(value: u32) -> Result<Self, TypeConstraintError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NonPositiveNumber("duration"))
        }
    }

    /// Interprets a numeric value, truncating fractions. Anything that does not
    /// yield a positive whole number is treated as "no duration".
    pub fn from_number(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 1.0 || value > f64::from(u32::MAX) {
            return None;
        }
        Self::new(value.trunc() as u32).ok()
    }

    /// Lenient parse of user-supplied text such as `"12"` or `" 7.5 "`.
    pub fn parse_lenient(value: &str) -> Option<Self> {
        value.trim().parse::<f64>().ok().and_then(Self::from_number)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Display for DurationSeconds {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Kind of a bookmarked material.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    #[default]
    Link,
    Video,
}

impl MaterialKind {
    /// String representation used in persistence and search.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Link => "link",
            Self::Video => "video",
        }
    }

    /// Maps free-form input onto a kind; unknown or missing values become [`Self::Link`].
    pub fn from_input(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("video") => Self::Video,
            _ => Self::Link,
        }
    }
}

impl Display for MaterialKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
