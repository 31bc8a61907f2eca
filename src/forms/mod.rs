//! Request bodies and their validated payloads.
//!
//! Every form deserializes from loose JSON and converts into a payload built
//! from domain types via `TryFrom`. Required text fields default to empty
//! strings so that an absent key and a blank value fail the same way.

pub mod auth;
pub mod categories;
pub mod entries;
pub mod materials;
pub mod story;

/// Treats blank optional input as "not supplied".
fn supplied(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
