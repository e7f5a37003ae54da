// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-backed JSON document store.
//!
//! One directory per collection, one JSON file per document. Writes go
//! through a temp file followed by a rename so readers never observe a
//! partially written document; read-modify-write updates are serialized by
//! a store-wide lock.

use crate::error::StoreError;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub struct DocStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl DocStore {
    /// Open (creating if needed) a document store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root, write_lock: Mutex::new(()) })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Insert or fully replace a document.
    pub fn put(&self, collection: &str, id: &str, doc: &Value) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        self.write_doc(collection, id, doc)
    }

    /// Fetch a document by id.
    pub fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let path = self.doc_path(collection, id)?;
        match fs::read(&path) {
            Ok(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Merge `fields` into an existing document. With `upsert`, a missing
    /// document is created from the fields alone. Returns whether a
    /// document was written.
    pub fn update(
        &self,
        collection: &str,
        id: &str,
        fields: &Map<String, Value>,
        upsert: bool,
    ) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock();
        let existing = self.get(collection, id)?;
        let mut doc = match existing {
            Some(doc) => doc,
            None if upsert => Value::Object(Map::new()),
            None => {
                return Err(StoreError::NotFound {
                    collection: collection.to_string(),
                    id: id.to_string(),
                })
            }
        };
        if let Value::Object(ref mut obj) = doc {
            for (k, v) in fields {
                obj.insert(k.clone(), v.clone());
            }
        }
        self.write_doc(collection, id, &doc)?;
        Ok(true)
    }

    /// Remove a document. Returns whether it existed.
    pub fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock();
        let path = self.doc_path(collection, id)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// All documents of a collection, in unspecified order.
    pub fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        let dir = self.collection_path(collection)?;
        let mut docs = Vec::new();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(docs),
            Err(e) => return Err(e.into()),
        };
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match fs::read(&path).map_err(StoreError::from).and_then(|raw| {
                serde_json::from_slice::<Value>(&raw).map_err(StoreError::from)
            }) {
                Ok(doc) => docs.push(doc),
                Err(e) => {
                    // A torn or foreign file never poisons the whole listing.
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable document");
                }
            }
        }
        Ok(docs)
    }

    /// Names of all collections whose name ends with `suffix`.
    pub fn collections_with_suffix(&self, suffix: &str) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(suffix) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn collection_path(&self, collection: &str) -> Result<PathBuf, StoreError> {
        if collection.is_empty() || collection.contains(['/', '\\']) || collection.starts_with('.')
        {
            return Err(StoreError::InvalidCollection(collection.to_string()));
        }
        Ok(self.root.join(collection))
    }

    fn doc_path(&self, collection: &str, id: &str) -> Result<PathBuf, StoreError> {
        if id.is_empty() || id.contains(['/', '\\']) || id.starts_with('.') {
            return Err(StoreError::InvalidDocId(id.to_string()));
        }
        Ok(self.collection_path(collection)?.join(format!("{}.json", id)))
    }

    fn write_doc(&self, collection: &str, id: &str, doc: &Value) -> Result<(), StoreError> {
        let path = self.doc_path(collection, id)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(doc)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "docstore_tests.rs"]
mod tests;
