// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Accounting document persistence.

use crate::docstore::DocStore;
use crate::error::StoreError;
use sfrest_core::{AccountingRecord, AppStats};
use std::sync::Arc;

/// Per-user accounting collections plus the global `appstats` document.
/// Each holds a single document upserted on every aggregation cycle.
#[derive(Clone)]
pub struct AccountingStore {
    docs: Arc<DocStore>,
}

const DOC_ID: &str = "current";

impl AccountingStore {
    pub fn new(docs: Arc<DocStore>) -> Self {
        Self { docs }
    }

    fn collection(user: &str) -> String {
        format!("{}.accounting", user)
    }

    pub fn upsert_user(&self, user: &str, record: &AccountingRecord) -> Result<(), StoreError> {
        let doc = serde_json::to_value(record)?;
        self.docs.put(&Self::collection(user), DOC_ID, &doc)
    }

    pub fn get_user(&self, user: &str) -> Result<Option<AccountingRecord>, StoreError> {
        match self.docs.get(&Self::collection(user), DOC_ID)? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    pub fn upsert_appstats(&self, stats: &AppStats) -> Result<(), StoreError> {
        let doc = serde_json::to_value(stats)?;
        self.docs.put("appstats", DOC_ID, &doc)
    }

    pub fn get_appstats(&self) -> Result<Option<AppStats>, StoreError> {
        match self.docs.get("appstats", DOC_ID)? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
#[path = "accounting_tests.rs"]
mod tests;
