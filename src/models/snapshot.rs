use chrono::NaiveDateTime;
use diesel::prelude::*;

/// Diesel model representing the `snapshots` table.
#[derive(Debug, Clone, Queryable)]
#[diesel(table_name = crate::schema::snapshots)]
pub struct Snapshot {
    pub scope: String,
    pub document: String,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Snapshot`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::snapshots)]
pub struct NewSnapshot {
    pub scope: String,
    pub document: String,
    pub updated_at: NaiveDateTime,
}
