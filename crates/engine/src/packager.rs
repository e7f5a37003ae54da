// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output packaging and artifact resolution.

use crate::error::EngineError;
use flate2::write::GzEncoder;
use flate2::Compression;
use sfrest_core::JobRecord;
use std::fs::File;
use std::path::PathBuf;

/// Named artifacts exposed by the download endpoints. The concrete file is
/// resolved by glob pattern under the job directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    /// The packaged `job_<id>.tar.gz` archive.
    Archive,
    /// Island catalog, JSON rendition.
    IslandCatalogJson,
    /// Island catalog, raw file.
    IslandCatalogRaw,
    /// Fitted-component catalog, JSON rendition.
    ComponentCatalogJson,
    /// Fitted-component catalog, raw file.
    ComponentCatalogRaw,
    /// Summary plot image.
    PreviewImage,
}

impl Artifact {
    fn pattern(self) -> &'static str {
        match self {
            // the archive is addressed by exact name, never globbed
            Artifact::Archive => "",
            Artifact::IslandCatalogJson => "catalog-*.json",
            Artifact::IslandCatalogRaw => "catalog-*.dat",
            Artifact::ComponentCatalogJson => "catalog_fitcomp-*.json",
            Artifact::ComponentCatalogRaw => "catalog_fitcomp-*.dat",
            Artifact::PreviewImage => "plot_*.png",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Artifact::Archive => "archive",
            Artifact::IslandCatalogJson => "island-catalog-json",
            Artifact::IslandCatalogRaw => "island-catalog",
            Artifact::ComponentCatalogJson => "component-catalog-json",
            Artifact::ComponentCatalogRaw => "component-catalog",
            Artifact::PreviewImage => "preview-image",
        }
    }
}

/// Package the job directory into `job_<id>.tar.gz` inside itself.
///
/// Idempotent: an existing archive is left untouched and returned as-is.
/// The archive is assembled next to the job directory and renamed into
/// place, so a half-written file is never picked up by a concurrent
/// download or by the archiving walk itself.
pub fn package_job(record: &JobRecord) -> Result<PathBuf, EngineError> {
    let job_dir = record.job_dir();
    if !job_dir.is_dir() {
        return Err(EngineError::MissingJobDir(job_dir));
    }

    let archive_path = job_dir.join(record.archive_name());
    if archive_path.is_file() {
        tracing::info!(job_id = %record.job_id, "output archive already present, skipping");
        return Ok(archive_path);
    }

    let staging = PathBuf::from(&record.job_top_dir)
        .join(format!("{}.partial", record.archive_name()));
    tracing::info!(job_id = %record.job_id, archive = %archive_path.display(), "packaging job output");

    let file = File::create(&staging)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.append_dir_all(format!("job_{}", record.job_id), &job_dir)?;
    builder.into_inner()?.finish()?;

    std::fs::rename(&staging, &archive_path)?;
    Ok(archive_path)
}

/// Resolve a symbolic artifact name to a concrete file under the job
/// directory. More than one glob match takes the first (sorted); no match
/// is a not-found error.
pub fn resolve_artifact(record: &JobRecord, artifact: Artifact) -> Result<PathBuf, EngineError> {
    let job_dir = record.job_dir();

    if artifact == Artifact::Archive {
        let path = job_dir.join(record.archive_name());
        return if path.is_file() {
            Ok(path)
        } else {
            Err(EngineError::ArtifactNotFound {
                job_id: record.job_id.clone(),
                artifact: artifact.name(),
            })
        };
    }

    let pattern = job_dir.join(artifact.pattern()).display().to_string();
    let mut matches: Vec<PathBuf> =
        glob::glob(&pattern)?.filter_map(Result::ok).filter(|p| p.is_file()).collect();
    matches.sort();

    match matches.into_iter().next() {
        Some(path) => Ok(path),
        None => Err(EngineError::ArtifactNotFound {
            job_id: record.job_id.clone(),
            artifact: artifact.name(),
        }),
    }
}

#[cfg(test)]
#[path = "packager_tests.rs"]
mod tests;
