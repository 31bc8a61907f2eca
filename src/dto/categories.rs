use serde::Serialize;

use crate::domain::snapshot::GlobalDocument;
use crate::domain::types::CategoryName;

/// Registry state after a rename or removal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryChangeDto {
    pub categories: Vec<CategoryName>,
    /// Entries whose category was rewritten, across all owners.
    pub reassigned: usize,
}

impl CategoryChangeDto {
    pub fn new(global: &GlobalDocument, reassigned: usize) -> Self {
        Self {
            categories: global.categories.names().to_vec(),
            reassigned,
        }
    }
}
