// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CAESAR source-finder catalog.
//!
//! The largest catalog by far: output selection, image read/stats/background
//! options, compact- and extended-source search, source fitting, residual
//! map computation, and run/parallelism controls. Enum-valued options are
//! exposed with symbolic labels and transformed to the numeric codes the
//! submitter script expects.

use crate::descriptor::{enumeration, flag, float, int};
use crate::registry::AppDescriptor;

pub(crate) fn descriptor() -> AppDescriptor {
    AppDescriptor::new("caesar", "SFinderSubmitter.sh", "sriggi/caesar-job:latest", "inputfile")
        .with_prelude(&["--run", "--save-summaryplot", "--save-regions"])
        .with_batch_support()
        .options(options())
        .transformer("regionwcs", transform_regionwcs)
        .transformer("bkgestimator", transform_bkgestimator)
        .transformer("blobmaskmethod", transform_blobmaskmethod)
        .transformer("res-removedsourcetype", transform_removed_source_type)
        .transformer("res-pssubtractionmethod", transform_ps_subtraction)
        .transformer("smoothfilter", transform_smoothfilter)
        .transformer("extsfinder", transform_extsfinder)
        .transformer("activecontour", transform_activecontour)
        .transformer("ac-levelset", transform_ac_levelset)
}

fn options() -> Vec<crate::descriptor::OptionDescriptor> {
    vec![
        // == OUTPUT ==
        flag("save-fits", "OUTPUT", "Save maps (if save enabled) in FITS format (default=ROOT format)"),
        flag("save-inputmap", "OUTPUT", "Save input map in output ROOT file (default=no)"),
        flag("save-bkgmap", "OUTPUT", "Save bkg map in output ROOT file (default=no)"),
        flag("save-rmsmap", "OUTPUT", "Save rms map in output ROOT file (default=no)"),
        flag("save-significancemap", "OUTPUT", "Save significance map in output ROOT file (default=no)"),
        flag("save-residualmap", "OUTPUT", "Save residual map in output ROOT file (default=no)"),
        flag("save-saliencymap", "OUTPUT", "Save saliency map in output ROOT file (default=no)"),
        flag("save-segmentedmap", "OUTPUT", "Save segmented map in output ROOT file (default=no)"),
        flag("save-regions", "OUTPUT", "Save DS9 regions (default=no)"),
        flag("convertregionstowcs", "OUTPUT", "Save DS9 regions in WCS format (default=no)").advanced(),
        enumeration(
            "regionwcs",
            "OUTPUT",
            "DS9 region WCS output format {J2000,B1950,GALACTIC} (default=J2000)",
            &["J2000", "B1950", "GALACTIC"],
            "J2000",
        )
        .advanced(),
        // == IMGREAD ==
        int("xmin", "IMGREAD", "Read sub-image of input image starting from pixel x=xmin (default=0=read full image)")
            .range(-1_000_000.0, 1_000_000.0)
            .default_int(0),
        int("xmax", "IMGREAD", "Read sub-image of input image up to pixel x=xmax (default=0=read full image)")
            .range(-1_000_000.0, 1_000_000.0)
            .default_int(0),
        int("ymin", "IMGREAD", "Read sub-image of input image starting from pixel y=ymin (default=0=read full image)")
            .range(-1_000_000.0, 1_000_000.0)
            .default_int(0),
        int("ymax", "IMGREAD", "Read sub-image of input image up to pixel y=ymax (default=0=read full image)")
            .range(-1_000_000.0, 1_000_000.0)
            .default_int(0),
        // == IMGSTATS ==
        flag("no-parallelmedian", "IMGSTATS", "Switch off parallel median algorithm (default=enabled)").advanced(),
        // == IMGBKG ==
        float("bmaj", "IMGBKG", "Beam major axis in arcsec, used when the image header has no beam info")
            .range(0.0, 3600.0)
            .default_float(10.0)
            .advanced(),
        float("bmin", "IMGBKG", "Beam minor axis in arcsec, used when the image header has no beam info")
            .range(0.0, 3600.0)
            .default_float(5.0)
            .advanced(),
        float("bpa", "IMGBKG", "Beam position angle in degrees, used when the image header has no beam info")
            .range(0.0, 180.0)
            .default_float(0.0)
            .advanced(),
        float("mappixsize", "IMGBKG", "Map pixel size in arcsec, used when the image header has no pixel-size info")
            .range(0.0, 3600.0)
            .default_float(1.0)
            .advanced(),
        flag("globalbkg", "IMGBKG", "Use global background instead of local background (default=local)"),
        enumeration(
            "bkgestimator",
            "IMGBKG",
            "Background estimator {Mean,Median,BiWeight,ClippedMedian} (default=Median)",
            &["Mean", "Median", "BiWeight", "ClippedMedian"],
            "Median",
        ),
        flag("bkgboxpix", "IMGBKG", "Interpret bkgbox size as pixels instead of number of beams (default=beams)"),
        float("bkgbox", "IMGBKG", "Background box size in number of beams or pixels (default=20 beams)")
            .range(0.01, 1000.0)
            .default_float(20.0),
        float("bkggrid", "IMGBKG", "Background grid size as fraction of the box size (default=0.2)")
            .range(0.0, 1.0)
            .default_float(0.2),
        flag("no-bkg2ndpass", "IMGBKG", "Skip the second pass of local background estimation (default=enabled)").advanced(),
        flag("bkgskipoutliers", "IMGBKG", "Exclude previously detected blobs from background estimation (default=no)").advanced(),
        int("sourcebkgboxborder", "IMGBKG", "Border in pixels around the source bounding box used for bkg estimation")
            .range(0.0, 1000.0)
            .default_int(20)
            .advanced(),
        // == COMPACT SOURCES ==
        flag("no-compactsearch", "COMPACT-SOURCES", "Disable compact source search (default=enabled)"),
        int("npixmin", "COMPACT-SOURCES", "Minimum number of pixels to form a source (default=5)")
            .range(0.0, 10_000.0)
            .default_int(5),
        float("seedthr", "COMPACT-SOURCES", "Seed threshold in flood-fill algorithm in significance units (default=5)")
            .range(0.0, 10_000.0)
            .default_float(5.0),
        float("mergethr", "COMPACT-SOURCES", "Merge threshold in flood-fill algorithm in significance units (default=2.6)")
            .range(0.0, 10_000.0)
            .default_float(2.6),
        int("compactsearchiters", "COMPACT-SOURCES", "Number of compact-source search iterations (default=1)")
            .range(0.0, 100.0)
            .default_int(1),
        float("seedthrstep", "COMPACT-SOURCES", "Seed threshold decrease step across search iterations (default=0.5)")
            .range(0.0, 10.0)
            .default_float(0.5),
        // -- selection --
        flag("selectsources", "COMPACT-SOURCES", "Apply selection cuts to detected sources (default=no)").sub("SELECTION"),
        flag("no-boundingboxcut", "COMPACT-SOURCES", "Disable the minimum bounding-box cut (default=enabled)").sub("SELECTION"),
        int("minboundingbox", "COMPACT-SOURCES", "Minimum bounding box cut in pixels (default=2)")
            .sub("SELECTION")
            .range(0.0, 1_000_000.0)
            .default_int(2),
        flag("no-circratiocut", "COMPACT-SOURCES", "Disable the circularity-ratio cut (default=enabled)")
            .sub("SELECTION")
            .advanced(),
        float("circratiothr", "COMPACT-SOURCES", "Circular ratio threshold below which sources are tagged as non-compact")
            .sub("SELECTION")
            .range(0.0, 1.0)
            .default_float(0.4)
            .advanced(),
        flag("no-elongationcut", "COMPACT-SOURCES", "Disable the elongation cut (default=enabled)")
            .sub("SELECTION")
            .advanced(),
        float("elongationthr", "COMPACT-SOURCES", "Elongation threshold above which sources are tagged as non-compact")
            .sub("SELECTION")
            .range(0.0, 1.0)
            .default_float(0.7)
            .advanced(),
        flag("ellipsearearatiocut", "COMPACT-SOURCES", "Enable the ellipse-area-ratio cut (default=no)")
            .sub("SELECTION")
            .advanced(),
        float("ellipsearearatiominthr", "COMPACT-SOURCES", "Minimum ellipse area ratio (default=0.6)")
            .sub("SELECTION")
            .range(0.0, 10.0)
            .default_float(0.6)
            .advanced(),
        float("ellipsearearatiomaxthr", "COMPACT-SOURCES", "Maximum ellipse area ratio (default=1.4)")
            .sub("SELECTION")
            .range(0.0, 10.0)
            .default_float(1.4)
            .advanced(),
        flag("maxnpixcut", "COMPACT-SOURCES", "Enable the maximum-pixel cut (default=no)").sub("SELECTION"),
        int("maxnpix", "COMPACT-SOURCES", "Maximum number of pixels above which sources are tagged as non-compact")
            .sub("SELECTION")
            .range(0.0, 10_000_000.0)
            .default_int(1000),
        flag("no-nbeamscut", "COMPACT-SOURCES", "Disable the number-of-beams cut (default=enabled)").sub("SELECTION"),
        float("nbeamsthr", "COMPACT-SOURCES", "Number-of-beams threshold above which sources are tagged as non-compact")
            .sub("SELECTION")
            .range(0.0, 1000.0)
            .default_float(3.0),
        // -- nested sources --
        flag("no-nestedsearch", "COMPACT-SOURCES", "Disable nested source search (default=enabled)").sub("NESTED-SOURCES"),
        enumeration(
            "blobmaskmethod",
            "COMPACT-SOURCES",
            "Nested blob mask method {GausLaplacian,MultiScaleLoG} (default=MultiScaleLoG)",
            &["GausLaplacian", "MultiScaleLoG"],
            "MultiScaleLoG",
        )
        .sub("NESTED-SOURCES"),
        float("nested-sourcetobeamthr", "COMPACT-SOURCES", "Source-to-beam area ratio above which nested search is done")
            .sub("NESTED-SOURCES")
            .range(0.0, 1_000_000.0)
            .default_float(5.0),
        float("nested-blobthr", "COMPACT-SOURCES", "Threshold in number of sigmas for nested blob detection")
            .sub("NESTED-SOURCES")
            .range(0.0, 100.0)
            .default_float(0.0)
            .advanced(),
        int("nested-minmotherdist", "COMPACT-SOURCES", "Minimum distance in pixels between nested and mother source centroids")
            .sub("NESTED-SOURCES")
            .range(0.0, 100.0)
            .default_int(2)
            .advanced(),
        float("nested-maxmotherpixmatch", "COMPACT-SOURCES", "Maximum fraction of nested pixels overlapping the mother source")
            .sub("NESTED-SOURCES")
            .range(0.0, 1.0)
            .default_float(0.5)
            .advanced(),
        float("nested-blobpeakzthr", "COMPACT-SOURCES", "Nested blob peak significance threshold (default=5)")
            .sub("NESTED-SOURCES")
            .range(0.0, 10_000.0)
            .default_float(5.0),
        float("nested-blobpeakzthrmerge", "COMPACT-SOURCES", "Nested blob peak significance merge threshold (default=2.5)")
            .sub("NESTED-SOURCES")
            .range(0.0, 10_000.0)
            .default_float(2.5),
        float("nested-blobminscale", "COMPACT-SOURCES", "Minimum blob filter scale in beam-width units (default=1)")
            .sub("NESTED-SOURCES")
            .range(0.0, 10_000.0)
            .default_float(1.0),
        float("nested-blobmaxscale", "COMPACT-SOURCES", "Maximum blob filter scale in beam-width units (default=3)")
            .sub("NESTED-SOURCES")
            .range(0.0, 10_000.0)
            .default_float(3.0),
        float("nested-blobscalestep", "COMPACT-SOURCES", "Blob filter scale step (default=1)")
            .sub("NESTED-SOURCES")
            .range(0.0, 10_000.0)
            .default_float(1.0),
        float("nested-blobkernfactor", "COMPACT-SOURCES", "Blob filter kernel-to-sigma factor (default=1)")
            .sub("NESTED-SOURCES")
            .range(0.0, 1000.0)
            .default_float(1.0)
            .advanced(),
        // -- fitting --
        flag("fitsources", "COMPACT-SOURCES", "Fit detected sources with a mixture of gaussians (default=no)").sub("FITTING"),
        flag("fit-usethreads", "COMPACT-SOURCES", "Enable multithreading in source fitting (default=no)")
            .sub("FITTING")
            .advanced(),
        enumeration(
            "fit-minimizer",
            "COMPACT-SOURCES",
            "Fit minimizer {Minuit,Minuit2} (default=Minuit2)",
            &["Minuit", "Minuit2"],
            "Minuit2",
        )
        .sub("FITTING")
        .advanced(),
        enumeration(
            "fit-minimizeralgo",
            "COMPACT-SOURCES",
            "Fit minimizer algorithm {migrad,simplex,minimize,scan,fumili} (default=minimize)",
            &["migrad", "simplex", "minimize", "scan", "fumili"],
            "minimize",
        )
        .sub("FITTING")
        .advanced(),
        int("fit-printlevel", "COMPACT-SOURCES", "Fit print level (default=0)")
            .sub("FITTING")
            .range(0.0, 3.0)
            .default_int(0)
            .advanced(),
        int("fit-strategy", "COMPACT-SOURCES", "Fit strategy (default=2)")
            .sub("FITTING")
            .range(0.0, 3.0)
            .default_int(2)
            .advanced(),
        int("fit-maxnbeams", "COMPACT-SOURCES", "Maximum number of beams for a fittable source (default=20)")
            .sub("FITTING")
            .range(0.0, 100_000.0)
            .default_int(20),
        int("fit-maxcomponents", "COMPACT-SOURCES", "Maximum number of gaussian components per source (default=3)")
            .sub("FITTING")
            .range(0.0, 100.0)
            .default_int(3),
        flag("fit-usenestedascomponents", "COMPACT-SOURCES", "Initialize fit components from nested sources (default=no)")
            .sub("FITTING")
            .advanced(),
        flag("fit-freebkg", "COMPACT-SOURCES", "Leave the background offset free in the fit (default=fixed)").sub("FITTING"),
        flag("fit-estimatedbkg", "COMPACT-SOURCES", "Start the background from the estimated bkg map (default=no)").sub("FITTING"),
        flag("fit-usebkgboxestimate", "COMPACT-SOURCES", "Start the background from the box-estimated bkg (default=no)").sub("FITTING"),
        float("fit-bkg", "COMPACT-SOURCES", "Fixed background offset used in the fit (default=0)")
            .sub("FITTING")
            .range(-1e6, 1e6)
            .default_float(0.0),
        float("fit-ampllimit", "COMPACT-SOURCES", "Amplitude fit limit around the peak (default=0.3)")
            .sub("FITTING")
            .range(0.0, 2.0)
            .default_float(0.3),
        flag("prefit-freeampl", "COMPACT-SOURCES", "Leave amplitude free in the pre-fit (default=fixed)")
            .sub("FITTING")
            .advanced(),
        float("fit-sigmalimit", "COMPACT-SOURCES", "Sigma fit limit around the initial estimate (default=0.3)")
            .sub("FITTING")
            .range(0.0, 2.0)
            .default_float(0.3),
        float("fit-thetalimit", "COMPACT-SOURCES", "Theta fit limit in degrees around the initial estimate (default=90)")
            .sub("FITTING")
            .range(0.0, 360.0)
            .default_float(90.0),
        flag("fit-nobkglimits", "COMPACT-SOURCES", "Fit background without limits (default=limited)").sub("FITTING"),
        flag("fit-noampllimits", "COMPACT-SOURCES", "Fit amplitude without limits (default=limited)").sub("FITTING"),
        flag("fit-nosigmalimits", "COMPACT-SOURCES", "Fit sigma without limits (default=limited)").sub("FITTING"),
        flag("fit-noposlimits", "COMPACT-SOURCES", "Fit position without limits (default=limited)").sub("FITTING"),
        int("fit-poslimit", "COMPACT-SOURCES", "Position fit limit in pixels around the centroid (default=3)")
            .sub("FITTING")
            .range(0.0, 1000.0)
            .default_int(3),
        flag("prefit-freepos", "COMPACT-SOURCES", "Leave position free in the pre-fit (default=fixed)").sub("FITTING"),
        flag("fit-nothetalimits", "COMPACT-SOURCES", "Fit theta without limits (default=limited)").sub("FITTING"),
        flag("fit-fixsigma", "COMPACT-SOURCES", "Fix sigma in the fit (default=free)").sub("FITTING").advanced(),
        flag("prefit-fixsigma", "COMPACT-SOURCES", "Fix sigma in the pre-fit (default=free)").sub("FITTING").advanced(),
        flag("fit-fixtheta", "COMPACT-SOURCES", "Fix theta in the fit (default=free)").sub("FITTING").advanced(),
        flag("prefit-fixtheta", "COMPACT-SOURCES", "Fix theta in the pre-fit (default=free)").sub("FITTING").advanced(),
        int("fit-peakminkern", "COMPACT-SOURCES", "Minimum dilation kernel size in pixels for peak finding (default=3)")
            .sub("FITTING")
            .range(0.0, 100.0)
            .default_int(3)
            .advanced(),
        int("fit-peakmaxkern", "COMPACT-SOURCES", "Maximum dilation kernel size in pixels for peak finding (default=7)")
            .sub("FITTING")
            .range(0.0, 100.0)
            .default_int(7)
            .advanced(),
        int("fit-peakmultiplicitythr", "COMPACT-SOURCES", "Multiplicity threshold across kernels to accept a peak (default=1)")
            .sub("FITTING")
            .range(-1.0, 100.0)
            .default_int(1)
            .advanced(),
        int("fit-peakshifttol", "COMPACT-SOURCES", "Peak shift tolerance in pixels across kernels (default=2)")
            .sub("FITTING")
            .range(0.0, 20.0)
            .default_int(2)
            .advanced(),
        float("fit-peakzthrmin", "COMPACT-SOURCES", "Minimum peak significance to fit a component (default=1)")
            .sub("FITTING")
            .range(0.0, 1000.0)
            .default_float(1.0),
        float("fit-fcntol", "COMPACT-SOURCES", "Fit function minimization tolerance (default=1.e-2)")
            .sub("FITTING")
            .range(0.0, 100.0)
            .default_float(1e-2)
            .advanced(),
        int("fit-maxniters", "COMPACT-SOURCES", "Maximum number of fit iterations (default=10000)")
            .sub("FITTING")
            .range(0.0, 1_000_000.0)
            .default_int(10_000)
            .advanced(),
        flag("fit-noimproveconvergence", "COMPACT-SOURCES", "Disable convergence-improvement strategies (default=enabled)")
            .sub("FITTING")
            .advanced(),
        flag("fit-noretry", "COMPACT-SOURCES", "Disable fit retries on failure (default=enabled)")
            .sub("FITTING")
            .advanced(),
        int("fit-nretries", "COMPACT-SOURCES", "Maximum number of fit retries (default=10)")
            .sub("FITTING")
            .range(0.0, 100_000.0)
            .default_int(10)
            .advanced(),
        float("fit-parboundincreasestep", "COMPACT-SOURCES", "Parameter bound increase step per retry (default=0.1)")
            .sub("FITTING")
            .range(0.0, 10.0)
            .default_float(0.1)
            .advanced(),
        flag("fit-improveerrors", "COMPACT-SOURCES", "Run the error improvement step after the fit (default=no)")
            .sub("FITTING")
            .advanced(),
        flag("fit-scaledatatomax", "COMPACT-SOURCES", "Scale fitted data to the max pixel value (default=no)")
            .sub("FITTING")
            .advanced(),
        flag("fit-nochi2cut", "COMPACT-SOURCES", "Disable the reduced-chi2 cut on fit quality (default=enabled)").sub("FITTING"),
        float("fit-chi2cut", "COMPACT-SOURCES", "Reduced-chi2 cut value (default=5)")
            .sub("FITTING")
            .range(0.0, 1000.0)
            .default_float(5.0),
        flag("fit-useellipsecuts", "COMPACT-SOURCES", "Apply ellipse cuts to fitted components (default=no)")
            .sub("FITTING")
            .advanced(),
        // == RESIDUAL MAP ==
        flag("computeresiduals", "IMGRES", "Compute the residual map after compact source removal (default=no)"),
        flag("res-removenested", "IMGRES", "Also remove nested sources when computing residuals (default=no)"),
        float("res-zthr", "IMGRES", "Significance threshold below which sources are removed (default=5)")
            .range(0.0, 10_000.0)
            .default_float(5.0),
        float("res-zhighthr", "IMGRES", "Significance threshold above which sources are always removed (default=10)")
            .range(0.0, 10_000.0)
            .default_float(10.0),
        int("dilatekernsize", "IMGRES", "Dilation kernel size in pixels used for source removal (default=9)")
            .range(1.0, 1001.0)
            .default_int(9),
        enumeration(
            "res-removedsourcetype",
            "IMGRES",
            "Type of sources removed from the residual map (default=POINT-LIKE)",
            &["ALL", "COMPACT", "POINT-LIKE", "EXTENDED"],
            "POINT-LIKE",
        ),
        enumeration(
            "res-pssubtractionmethod",
            "IMGRES",
            "Point-source subtraction method {DILATION,FITMODEL} (default=DILATION)",
            &["DILATION", "FITMODEL"],
            "DILATION",
        ),
        flag("res-bkgaroundsource", "IMGRES", "Use background around the source instead of the bkg map (default=no)"),
        // == SMOOTHING ==
        flag("no-presmoothing", "IMGSMOOTH", "Skip input-map smoothing before extended source search (default=enabled)"),
        enumeration(
            "smoothfilter",
            "IMGSMOOTH",
            "Smoothing filter {GAUSSIAN,GUIDED} (default=GUIDED)",
            &["GAUSSIAN", "GUIDED"],
            "GUIDED",
        ),
        float("guidedfilter-radius", "IMGSMOOTH", "Guided filter radius (default=12)")
            .range(0.0, 1000.0)
            .default_float(12.0),
        float("guidedfilter-eps", "IMGSMOOTH", "Guided filter regularization parameter (default=0.04)")
            .range(0.0, 1000.0)
            .default_float(0.04),
        // == EXTENDED SOURCES ==
        flag("no-extendedsearch", "EXTENDED-SOURCES", "Disable extended source search (default=enabled)"),
        enumeration(
            "extsfinder",
            "EXTENDED-SOURCES",
            "Extended source search method {WT-THRESH,SP-HIERCLUST,ACTIVE-CONTOUR,SALIENCY-THRESH} (default=SALIENCY-THRESH)",
            &["WT-THRESH", "SP-HIERCLUST", "ACTIVE-CONTOUR", "SALIENCY-THRESH"],
            "SALIENCY-THRESH",
        ),
        enumeration(
            "activecontour",
            "EXTENDED-SOURCES",
            "Active contour method {CHANVESE,LRAC} (default=CHANVESE)",
            &["CHANVESE", "LRAC"],
            "CHANVESE",
        ),
        // -- saliency --
        int("sp-size", "EXTENDED-SOURCES", "Superpixel size in pixels (default=20)")
            .sub("SALIENCY")
            .range(5.0, 10_000.0)
            .default_int(20),
        float("sp-beta", "EXTENDED-SOURCES", "Superpixel regularization parameter (default=1)")
            .sub("SALIENCY")
            .range(1e-10, 1e10)
            .default_float(1.0),
        int("sp-minarea", "EXTENDED-SOURCES", "Minimum superpixel area in pixels (default=10)")
            .sub("SALIENCY")
            .range(1.0, 10_000.0)
            .default_int(10),
        flag("saliency-nooptimalthr", "EXTENDED-SOURCES", "Use the fixed saliency threshold instead of the optimal one")
            .sub("SALIENCY"),
        float("saliency-thr", "EXTENDED-SOURCES", "Saliency threshold factor over the map median (default=2.8)")
            .sub("SALIENCY")
            .range(0.0, 10.0)
            .default_float(2.8),
        int("saliency-minreso", "EXTENDED-SOURCES", "Minimum saliency resolution in superpixel-size units (default=20)")
            .sub("SALIENCY")
            .range(1.0, 1000.0)
            .default_int(20),
        int("saliency-maxreso", "EXTENDED-SOURCES", "Maximum saliency resolution in superpixel-size units (default=60)")
            .sub("SALIENCY")
            .range(1.0, 1000.0)
            .default_int(60),
        int("saliency-resostep", "EXTENDED-SOURCES", "Saliency resolution step (default=10)")
            .sub("SALIENCY")
            .range(1.0, 100.0)
            .default_int(10),
        float("saliency-nn", "EXTENDED-SOURCES", "Fraction of nearest neighbors used in saliency computation (default=1)")
            .sub("SALIENCY")
            .range(0.0, 1.0)
            .default_float(1.0)
            .advanced(),
        flag("saliency-usebkgmap", "EXTENDED-SOURCES", "Use the bkg map in saliency computation (default=no)")
            .sub("SALIENCY")
            .advanced(),
        flag("saliency-usermsmap", "EXTENDED-SOURCES", "Use the rms map in saliency computation (default=no)")
            .sub("SALIENCY")
            .advanced(),
        flag("saliency-userobustpars", "EXTENDED-SOURCES", "Use robust statistics in saliency computation (default=no)")
            .sub("SALIENCY"),
        // -- active contour --
        int("ac-niters", "EXTENDED-SOURCES", "Maximum number of active-contour iterations (default=1000)")
            .sub("ACTIVE-CONTOUR")
            .range(1.0, 100_000.0)
            .default_int(1000),
        enumeration(
            "ac-levelset",
            "EXTENDED-SOURCES",
            "Active contour initial level set {CIRCLE,CHECKERBOARD,SALIENCY} (default=CIRCLE)",
            &["CIRCLE", "CHECKERBOARD", "SALIENCY"],
            "CIRCLE",
        )
        .sub("ACTIVE-CONTOUR"),
        float("ac-levelsetsize", "EXTENDED-SOURCES", "Initial level set size as image fraction (default=0.1)")
            .sub("ACTIVE-CONTOUR")
            .range(0.0, 1.0)
            .default_float(0.1),
        float("ac-tolerance", "EXTENDED-SOURCES", "Active contour convergence tolerance (default=0.1)")
            .sub("ACTIVE-CONTOUR")
            .range(0.0, 1.0)
            .default_float(0.1),
        int("cv-nitersinner", "EXTENDED-SOURCES", "Chan-Vese inner iterations (default=5)")
            .sub("ACTIVE-CONTOUR")
            .range(0.0, 100_000.0)
            .default_int(5)
            .advanced(),
        int("cv-nitersreinit", "EXTENDED-SOURCES", "Chan-Vese re-init iterations (default=5)")
            .sub("ACTIVE-CONTOUR")
            .range(0.0, 100_000.0)
            .default_int(5)
            .advanced(),
        float("cv-timestep", "EXTENDED-SOURCES", "Chan-Vese time step (default=0.007)")
            .sub("ACTIVE-CONTOUR")
            .range(0.0, 1000.0)
            .default_float(0.007),
        float("cv-wsize", "EXTENDED-SOURCES", "Chan-Vese window size (default=1)")
            .sub("ACTIVE-CONTOUR")
            .range(0.0, 1000.0)
            .default_float(1.0),
        float("cv-lambda1", "EXTENDED-SOURCES", "Chan-Vese lambda1 parameter (default=1)")
            .sub("ACTIVE-CONTOUR")
            .range(0.0, 100.0)
            .default_float(1.0),
        float("cv-lambda2", "EXTENDED-SOURCES", "Chan-Vese lambda2 parameter (default=2)")
            .sub("ACTIVE-CONTOUR")
            .range(0.0, 100.0)
            .default_float(2.0),
        float("cv-mu", "EXTENDED-SOURCES", "Chan-Vese mu parameter (default=0.5)")
            .sub("ACTIVE-CONTOUR")
            .range(0.0, 100.0)
            .default_float(0.5),
        float("cv-nu", "EXTENDED-SOURCES", "Chan-Vese nu parameter (default=0)")
            .sub("ACTIVE-CONTOUR")
            .range(0.0, 100.0)
            .default_float(0.0),
        float("cv-p", "EXTENDED-SOURCES", "Chan-Vese p parameter (default=1)")
            .sub("ACTIVE-CONTOUR")
            .range(0.0, 100.0)
            .default_float(1.0),
        // -- wavelet transform --
        int("wtscalemin", "EXTENDED-SOURCES", "Minimum wavelet scale used for source search (default=3)")
            .sub("WAVELET-TRANSFORM")
            .range(1.0, 10.0)
            .default_int(3),
        int("wtscalemax", "EXTENDED-SOURCES", "Maximum wavelet scale used for source search (default=6)")
            .sub("WAVELET-TRANSFORM")
            .range(1.0, 10.0)
            .default_int(6),
        // == RUN ==
        enumeration(
            "loglevel",
            "RUN",
            "Logging level value",
            &["INFO", "DEBUG", "WARN", "ERROR", "OFF"],
            "INFO",
        ),
        flag("no-logredir", "RUN", "Do not redirect logs to output file in script"),
        flag("no-mpi", "RUN", "Disable MPI run (even with 1 proc) (default=enabled)"),
        int("nproc", "RUN", "Number of MPI processors per node used (default=1)")
            .range(1.0, 1000.0)
            .default_int(1),
        int("nthreads", "RUN", "Number of threads used in OpenMP (default=-1=all available in node)")
            .range(-1.0, 1000.0)
            .default_int(1),
        int("tilesize", "RUN", "Size in pixels of tiles used to partition the input image (default=0=no tile split)")
            .range(0.0, 10_000_000.0)
            .default_int(0),
        float("tilestep", "RUN", "Tile step size as tile fraction used in tile overlap (default=1=no overlap)")
            .range(0.001, 1.0)
            .default_float(1.0),
        flag("mergeedgesources", "RUN", "Merge sources at tile edges in multitile processing (default=no)"),
        flag("no-mergesources", "RUN", "Disable source merging in each tile (default=enabled)"),
    ]
}

fn transform_regionwcs(label: &str) -> Option<String> {
    let code = match label {
        "J2000" => "0",
        "B1950" => "1",
        "GALACTIC" => "2",
        _ => return None,
    };
    Some(code.to_string())
}

fn transform_bkgestimator(label: &str) -> Option<String> {
    let code = match label {
        "Mean" => "1",
        "Median" => "2",
        "BiWeight" => "3",
        "ClippedMedian" => "4",
        _ => return None,
    };
    Some(code.to_string())
}

fn transform_blobmaskmethod(label: &str) -> Option<String> {
    let code = match label {
        "GausLaplacian" => "1",
        "MultiScaleLoG" => "2",
        _ => return None,
    };
    Some(code.to_string())
}

fn transform_removed_source_type(label: &str) -> Option<String> {
    let code = match label {
        "ALL" => "-1",
        "COMPACT" => "1",
        "POINT-LIKE" => "2",
        "EXTENDED" => "3",
        _ => return None,
    };
    Some(code.to_string())
}

fn transform_ps_subtraction(label: &str) -> Option<String> {
    let code = match label {
        "DILATION" => "1",
        "FITMODEL" => "2",
        _ => return None,
    };
    Some(code.to_string())
}

fn transform_smoothfilter(label: &str) -> Option<String> {
    let code = match label {
        "GAUSSIAN" => "1",
        "GUIDED" => "2",
        _ => return None,
    };
    Some(code.to_string())
}

fn transform_extsfinder(label: &str) -> Option<String> {
    let code = match label {
        "WT-THRESH" => "1",
        "SP-HIERCLUST" => "2",
        "ACTIVE-CONTOUR" => "3",
        "SALIENCY-THRESH" => "4",
        _ => return None,
    };
    Some(code.to_string())
}

fn transform_activecontour(label: &str) -> Option<String> {
    let code = match label {
        "CHANVESE" => "1",
        "LRAC" => "2",
        _ => return None,
    };
    Some(code.to_string())
}

fn transform_ac_levelset(label: &str) -> Option<String> {
    let code = match label {
        "CIRCLE" => "1",
        "CHECKERBOARD" => "2",
        "SALIENCY" => "3",
        _ => return None,
    };
    Some(code.to_string())
}
