// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CNN image-classifier catalog.

use crate::descriptor::{enumeration, flag, float, int, text};
use crate::registry::AppDescriptor;

pub(crate) fn descriptor() -> AppDescriptor {
    AppDescriptor::new(
        "cnn_classifier",
        "run_classifier.sh",
        "sriggi/sclassifier-job:latest",
        "inputfile",
    )
    .with_prelude(&["--run"])
    .with_batch_support()
    .options(vec![
        enumeration(
            "model",
            "MODEL",
            "Classifier model to be used",
            &["smorphclass", "sclass-radio_3.4um-4.6um-12um-22um"],
            "smorphclass",
        ),
        int("imgsize", "PREPROCESSING", "Image resize in pixels (default=64)")
            .range(16.0, 1024.0)
            .default_int(64),
        flag("normalize_minmax", "OUTPUT", "Normalize each channel in range"),
        float("norm_min", "PREPROCESSING", "Normalization min value (default=0)")
            .range(-1.0, 0.0)
            .default_float(0.0),
        float("norm_max", "PREPROCESSING", "Normalization max value (default=1)")
            .range(1.0, 255.0)
            .default_float(1.0),
        flag("scale_to_abs_max", "PREPROCESSING", "Scale to global max across all channels"),
        flag("scale_to_max", "PREPROCESSING", "Scale to max not to min-max range"),
        flag("zscale_stretch", "PREPROCESSING", "Apply z-scale transform to each channel with given contrasts"),
        text("zscale_contrasts", "PREPROCESSING", "zscale contrasts applied to all channels, separated by commas")
            .default_str("0.25"),
        flag("clip_data", "PREPROCESSING", "Apply sigma clipping to all channels"),
        float("sigma_clip_low", "PREPROCESSING", "Lower sigma threshold used for clipping pixels below (mean-sigma_low*stddev) (default=5)")
            .default_float(5.0),
        float("sigma_clip_up", "PREPROCESSING", "Upper sigma threshold used for clipping pixels above (mean+sigma_up*stddev) (default=30)")
            .default_float(30.0),
        int("clip_chid", "PREPROCESSING", "Channel to clip data (-1=all) (default=-1)")
            .default_int(-1),
        flag("standardize", "PREPROCESSING", "Apply standardization to images"),
        text("img_means", "PREPROCESSING", "Image means (separated by commas) used in standardization (default=0)")
            .default_str("0"),
        text("img_sigmas", "PREPROCESSING", "Image sigmas (separated by commas) used in standardization (default=1)")
            .default_str("1"),
    ])
}
