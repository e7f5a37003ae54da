// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Aegean source-finder catalog.

use crate::descriptor::{flag, float, int};
use crate::registry::AppDescriptor;

pub(crate) fn descriptor() -> AppDescriptor {
    AppDescriptor::new("aegean", "aegean_submitter.sh", "sriggi/aegean-job:latest", "inputfile")
        .with_prelude(&["--run", "--save-summaryplot", "--save-regions", "--save-catalog-to-json"])
        .with_batch_support()
        .options(vec![
            flag("save-bkgmap", "OUTPUT", "Save bkg map in output file (default=no)"),
            flag("save-rmsmap", "OUTPUT", "Save rms map in output file (default=no)"),
            int("bkgbox", "IMGBKG", "Background box size in pixels (default=100)")
                .range(5.0, 10_000.0)
                .default_int(100),
            int("bkggrid", "IMGBKG", "Background grid size in pixels (default=20)")
                .range(5.0, 1000.0)
                .default_int(20),
            float("seedthr", "COMPACT-SOURCES", "Seed threshold in flood-fill algorithm in significance units (default=5)")
                .range(0.0, 10_000.0)
                .default_float(5.0),
            float("mergethr", "COMPACT-SOURCES", "Merge threshold in flood-fill algorithm in significance units (default=2.6)")
                .range(0.0, 10_000.0)
                .default_float(2.6),
            int("fit-maxcomponents", "COMPACT-SOURCES", "Maximum number of fitted components per island (default=3)")
                .sub("FITTING")
                .range(0.0, 100.0)
                .default_int(3),
            flag("no-logredir", "RUN", "Do not redirect logs to output file in script"),
            int("ncores", "RUN", "Number of cores used (default=1)")
                .range(1.0, 100.0)
                .default_int(1),
        ])
}
