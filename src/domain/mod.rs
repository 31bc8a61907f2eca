//! Domain aggregates and value objects.
//!
//! Everything here is plain data plus the pure mutation rules of each
//! aggregate. Persistence and locking live in `repository`, orchestration in
//! `services`.

pub mod category;
pub mod entry;
pub mod errors;
pub mod material;
pub mod snapshot;
pub mod story;
pub mod types;
pub mod user;
