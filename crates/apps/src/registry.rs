// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Application descriptor registry.

use crate::descriptor::OptionDescriptor;
use indexmap::IndexMap;
use serde_json::{json, Value};
use std::collections::HashMap;

/// Pure per-option value transformer (enum label → scheduler-native code).
/// Returning `None` or an empty string is a hard validation failure.
pub type ValueTransformer = fn(&str) -> Option<String>;

/// Everything the service knows about one application: its option catalog
/// (insertion-ordered, so the emitted argument vector is deterministic),
/// its transformers, the fixed-flag prelude, and the data-input builder.
pub struct AppDescriptor {
    pub name: &'static str,
    /// Entrypoint executed by the backends.
    pub command: String,
    /// Container image used by the orchestrator and HPC backends.
    pub image: String,
    /// Fixed arguments always emitted before the validated options.
    pub prelude: Vec<String>,
    /// Option name carrying the resolved input path (`--<flag>=<path>`).
    pub data_input_flag: &'static str,
    /// Whether the application can process file lists in one run.
    pub batch_support: bool,
    pub(crate) options: IndexMap<&'static str, OptionDescriptor>,
    pub(crate) transformers: HashMap<&'static str, ValueTransformer>,
}

impl AppDescriptor {
    pub(crate) fn new(
        name: &'static str,
        command: impl Into<String>,
        image: impl Into<String>,
        data_input_flag: &'static str,
    ) -> Self {
        Self {
            name,
            command: command.into(),
            image: image.into(),
            prelude: Vec::new(),
            data_input_flag,
            batch_support: false,
            options: IndexMap::new(),
            transformers: HashMap::new(),
        }
    }

    pub(crate) fn with_prelude(mut self, args: &[&str]) -> Self {
        self.prelude = args.iter().map(|s| s.to_string()).collect();
        self
    }

    pub(crate) fn with_batch_support(mut self) -> Self {
        self.batch_support = true;
        self
    }

    pub(crate) fn options(mut self, descriptors: Vec<OptionDescriptor>) -> Self {
        for d in descriptors {
            self.options.insert(d.name, d);
        }
        self
    }

    pub(crate) fn transformer(mut self, option: &'static str, f: ValueTransformer) -> Self {
        self.transformers.insert(option, f);
        self
    }

    pub fn option(&self, name: &str) -> Option<&OptionDescriptor> {
        self.options.get(name)
    }

    /// JSON description of the whole catalog, one entry per option.
    pub fn describe(&self) -> Value {
        let mut obj = serde_json::Map::new();
        for (name, descriptor) in &self.options {
            obj.insert(name.to_string(), descriptor.to_json());
        }
        Value::Object(obj)
    }
}

/// Registry of all supported applications, built once from configuration
/// and shared immutably.
pub struct AppRegistry {
    apps: IndexMap<&'static str, AppDescriptor>,
    /// Clamp applied to validator-derived parallelism hints.
    pub(crate) max_cores: u32,
}

impl AppRegistry {
    pub(crate) fn build(apps: Vec<AppDescriptor>, max_cores: u32) -> Self {
        let mut map = IndexMap::new();
        for app in apps {
            map.insert(app.name, app);
        }
        Self { apps: map, max_cores }
    }

    /// Registry with the standard application set.
    pub fn from_config(config: &sfrest_core::Config) -> Self {
        crate::catalog::standard(config)
    }

    pub fn get(&self, app: &str) -> Option<&AppDescriptor> {
        self.apps.get(app)
    }

    /// Names of all registered applications.
    pub fn app_names(&self) -> Vec<&'static str> {
        self.apps.keys().copied().collect()
    }

    /// `{"apps": [...]}` payload for the listing endpoint.
    pub fn app_names_json(&self) -> Value {
        json!({ "apps": self.app_names() })
    }

    /// JSON option schema for one application.
    pub fn describe(&self, app: &str) -> Option<Value> {
        self.apps.get(app).map(|a| a.describe())
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
