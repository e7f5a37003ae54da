// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CuTEx source-finder catalog.

use crate::descriptor::{flag, float, int};
use crate::registry::AppDescriptor;

pub(crate) fn descriptor() -> AppDescriptor {
    AppDescriptor::new("cutex", "cutex_submitter.sh", "sriggi/cutex-job:latest", "inputfile")
        .with_prelude(&["--run", "--save-summaryplot", "--save-catalog-to-json"])
        .with_batch_support()
        .options(vec![
            float("seedthr", "COMPACT-SOURCES", "Detection threshold in curvature units (default=5)")
                .range(0.0, 10_000.0)
                .default_float(5.0),
            int("npixmin", "COMPACT-SOURCES", "Minimum number of pixels to form a source (default=4)")
                .range(1.0, 10_000.0)
                .default_int(4),
            float("npixpsf", "COMPACT-SOURCES", "Number of pixels per instrumental PSF (default=2.7)")
                .range(1.0, 10_000.0)
                .default_float(2.7),
            float("psflimmin", "COMPACT-SOURCES", "Lower PSF-size factor accepted in source fitting (default=0.5)")
                .range(0.0001, 100.0)
                .default_float(0.5),
            float("psflimmax", "COMPACT-SOURCES", "Upper PSF-size factor accepted in source fitting (default=2)")
                .range(0.0001, 100.0)
                .default_float(2.0),
            flag("no-logredir", "RUN", "Do not redirect logs to output file in script"),
        ])
}
