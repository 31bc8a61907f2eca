//! Response shapes that are not plain domain values.

pub mod categories;
