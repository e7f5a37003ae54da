// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Catalogs of the supported applications.

mod aegean;
mod caesar;
mod cnn_classifier;
mod cutex;
mod mrcnn;

use crate::registry::AppRegistry;
use sfrest_core::Config;

/// Build the registry with the standard application set.
pub(crate) fn standard(config: &Config) -> AppRegistry {
    AppRegistry::build(
        vec![
            caesar::descriptor(),
            mrcnn::descriptor(config),
            aegean::descriptor(),
            cutex::descriptor(),
            cnn_classifier::descriptor(),
        ],
        config.max_cores,
    )
}
