// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Uploaded-file registration records.

use crate::docstore::DocStore;
use crate::error::StoreError;
use serde_json::Value;
use sfrest_core::FileRecord;
use std::sync::Arc;

/// Store of per-user file collections (`<user>.files`).
#[derive(Clone)]
pub struct FileStore {
    docs: Arc<DocStore>,
}

impl FileStore {
    pub fn new(docs: Arc<DocStore>) -> Self {
        Self { docs }
    }

    fn collection(user: &str) -> String {
        format!("{}.files", user)
    }

    /// Register a freshly uploaded file.
    pub fn register(&self, user: &str, record: &FileRecord) -> Result<(), StoreError> {
        let doc = serde_json::to_value(record)?;
        self.docs.put(&Self::collection(user), &record.fileid, &doc)
    }

    /// Resolve a file id to its record.
    pub fn resolve(&self, user: &str, fileid: &str) -> Result<Option<FileRecord>, StoreError> {
        match self.docs.get(&Self::collection(user), fileid)? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    /// All file records of one user with the server-local path stripped,
    /// ready to return to clients.
    pub fn list_public(&self, user: &str) -> Result<Vec<Value>, StoreError> {
        let mut docs = self.docs.list(&Self::collection(user))?;
        for doc in &mut docs {
            if let Value::Object(ref mut obj) = doc {
                obj.remove("filepath");
            }
        }
        Ok(docs)
    }

    /// Drop a registration. Returns the removed record so the caller can
    /// also delete the bytes on disk.
    pub fn remove(&self, user: &str, fileid: &str) -> Result<Option<FileRecord>, StoreError> {
        let record = self.resolve(user, fileid)?;
        if record.is_some() {
            self.docs.delete(&Self::collection(user), fileid)?;
        }
        Ok(record)
    }
}

#[cfg(test)]
#[path = "files_tests.rs"]
mod tests;
