use chrono::Utc;
use diesel::prelude::*;
use serde::de::DeserializeOwned;

use crate::domain::snapshot::{Changeset, GlobalDocument, Scope, UserDocument};
use crate::domain::types::Username;
use crate::models::snapshot::{NewSnapshot, Snapshot as DbSnapshot};
use crate::repository::{
    DieselRepository, RepositoryError, RepositoryResult, ScopeLocks, SnapshotReader,
    SnapshotWriter,
};

fn load_document<T>(conn: &mut SqliteConnection, scope: &Scope) -> RepositoryResult<T>
where
    T: DeserializeOwned + Default,
{
    use crate::schema::snapshots;

    let row = snapshots::table
        .filter(snapshots::scope.eq(scope.key()))
        .first::<DbSnapshot>(conn)
        .optional()?;

    match row {
        Some(row) => Ok(serde_json::from_str(&row.document)?),
        None => Ok(T::default()),
    }
}

fn changeset_rows(changeset: &Changeset) -> RepositoryResult<Vec<NewSnapshot>> {
    let now = Utc::now().naive_utc();
    let mut rows = Vec::with_capacity(changeset.users.len() + 1);

    if let Some(global) = &changeset.global {
        rows.push(NewSnapshot {
            scope: Scope::Global.key(),
            document: serde_json::to_string(global)?,
            updated_at: now,
        });
    }
    for (owner, document) in &changeset.users {
        rows.push(NewSnapshot {
            scope: Scope::User(owner.clone()).key(),
            document: serde_json::to_string(document)?,
            updated_at: now,
        });
    }
    Ok(rows)
}

impl SnapshotReader for DieselRepository {
    fn load_global(&self) -> RepositoryResult<GlobalDocument> {
        let mut conn = self.conn()?;
        load_document(&mut conn, &Scope::Global)
    }

    fn load_user(&self, owner: &Username) -> RepositoryResult<UserDocument> {
        let mut conn = self.conn()?;
        load_document(&mut conn, &Scope::User(owner.clone()))
    }

    fn list_owners(&self) -> RepositoryResult<Vec<Username>> {
        use crate::schema::snapshots;

        let mut conn = self.conn()?;

        let keys = snapshots::table
            .select(snapshots::scope)
            .order(snapshots::scope.asc())
            .load::<String>(&mut conn)?;

        Ok(keys
            .iter()
            .filter_map(|key| match Scope::from_key(key) {
                Some(Scope::User(owner)) => Some(owner),
                _ => None,
            })
            .collect())
    }
}

impl SnapshotWriter for DieselRepository {
    fn commit(&self, changeset: Changeset) -> RepositoryResult<()> {
        use crate::schema::snapshots;

        if changeset.is_empty() {
            return Ok(());
        }

        let rows = changeset_rows(&changeset)?;
        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            for row in &rows {
                diesel::insert_into(snapshots::table)
                    .values(row)
                    .on_conflict(snapshots::scope)
                    .do_update()
                    .set((
                        snapshots::document.eq(&row.document),
                        snapshots::updated_at.eq(row.updated_at),
                    ))
                    .execute(conn)?;
            }
            Ok(())
        })
    }

    fn locks(&self) -> &ScopeLocks {
        &self.locks
    }
}
