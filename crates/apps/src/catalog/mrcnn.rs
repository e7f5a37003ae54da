// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mask R-CNN source-finder catalog.
//!
//! The network weights file is fixed server-side through configuration and
//! carried in the fixed-flag prelude rather than exposed as an option.

use crate::descriptor::float;
use crate::registry::AppDescriptor;
use sfrest_core::Config;

pub(crate) fn descriptor(config: &Config) -> AppDescriptor {
    AppDescriptor::new("mrcnn", "run_mrcnn.sh", "sriggi/mrcnn-job:latest", "image")
        .with_prelude(&[
            "--runmode=detect",
            &format!("--weights={}", config.mrcnn_weights.display()),
        ])
        .options(vec![
            float(
                "scoreThr",
                "DETECTION",
                "Detected object score threshold to select as final object (default=0.7)",
            )
            .range(0.0, 1.0)
            .default_float(0.7),
            float(
                "iouThr",
                "DETECTION",
                "IOU threshold between detected and ground truth bboxes to consider the object as detected (default=0.6)",
            )
            .range(0.0, 1.0)
            .default_float(0.6),
        ])
}
