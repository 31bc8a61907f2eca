//! Core library exports for the promptbook service.
//!
//! A personal prompt library for generative-AI work: accounts, a shared
//! category registry, prompt entries, a per-user story timeline and
//! bookmarked reference materials. The `data` feature exposes the domain,
//! persistence and service layers; `server` adds the Actix-web JSON API.

pub mod db;
pub mod domain;
pub mod dto;
pub mod error_conversions;
pub mod forms;
pub mod models;
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
pub mod schema;
pub mod services;
