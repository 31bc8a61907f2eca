//! Single-file JSON document backend.
//!
//! The whole store lives in one file: accounts, categories and a map of
//! per-owner documents. The file is read once on open and kept in memory;
//! every commit rewrites it through a temporary file and an atomic rename, and
//! only then updates the in-memory copy.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::domain::snapshot::{Changeset, GlobalDocument, UserDocument};
use crate::domain::types::Username;
use crate::repository::{RepositoryResult, ScopeLocks, SnapshotReader, SnapshotWriter};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct StoreDocument {
    #[serde(flatten)]
    global: GlobalDocument,
    scopes: BTreeMap<Username, UserDocument>,
}

impl StoreDocument {
    fn apply(&mut self, changeset: Changeset) {
        if let Some(global) = changeset.global {
            self.global = global;
        }
        for (owner, document) in changeset.users {
            self.scopes.insert(owner, document);
        }
    }
}

#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    document: Mutex<StoreDocument>,
    locks: ScopeLocks,
}

impl JsonFileRepository {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> RepositoryResult<Self> {
        let path = path.into();
        let document = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == ErrorKind::NotFound => StoreDocument::default(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            document: Mutex::new(document),
            locks: ScopeLocks::default(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_file(&self, document: &StoreDocument) -> RepositoryResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let text = serde_json::to_string_pretty(document)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SnapshotReader for JsonFileRepository {
    fn load_global(&self) -> RepositoryResult<GlobalDocument> {
        let document = self.document.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(document.global.clone())
    }

    fn load_user(&self, owner: &Username) -> RepositoryResult<UserDocument> {
        let document = self.document.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(document.scopes.get(owner).cloned().unwrap_or_default())
    }

    fn list_owners(&self) -> RepositoryResult<Vec<Username>> {
        let document = self.document.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(document.scopes.keys().cloned().collect())
    }
}

impl SnapshotWriter for JsonFileRepository {
    fn commit(&self, changeset: Changeset) -> RepositoryResult<()> {
        if changeset.is_empty() {
            return Ok(());
        }

        let mut document = self.document.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = document.clone();
        next.apply(changeset);
        self.write_file(&next)?;
        *document = next;
        Ok(())
    }

    fn locks(&self) -> &ScopeLocks {
        &self.locks
    }
}
