// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sfrest_core::SchedulerKind;
use std::collections::HashMap;
use std::io::Read;

fn record_in(dir: &std::path::Path, job_id: &str) -> JobRecord {
    JobRecord::pending(
        job_id,
        "",
        "alice",
        "caesar",
        "2026-02-01T10:00:00+00:00",
        HashMap::new(),
        "f1",
        dir.display().to_string(),
        "",
        SchedulerKind::Local,
    )
}

fn populate_job_dir(record: &JobRecord) {
    let job_dir = record.job_dir();
    std::fs::create_dir_all(&job_dir).unwrap();
    std::fs::write(job_dir.join("catalog-caesar.json"), b"{\"islands\":[]}").unwrap();
    std::fs::write(job_dir.join("catalog-caesar.dat"), b"# islands").unwrap();
    std::fs::write(job_dir.join("catalog_fitcomp-caesar.json"), b"{\"components\":[]}").unwrap();
    std::fs::write(job_dir.join("catalog_fitcomp-caesar.dat"), b"# components").unwrap();
    std::fs::write(job_dir.join("plot_caesar.png"), b"\x89PNG").unwrap();
}

#[test]
fn packages_job_dir_into_archive() {
    let dir = tempfile::tempdir().unwrap();
    let record = record_in(dir.path(), "j1");
    populate_job_dir(&record);

    let archive = package_job(&record).unwrap();
    assert_eq!(archive, record.job_dir().join("job_j1.tar.gz"));
    assert!(archive.is_file());

    // the archive decompresses and contains the catalog under job_<id>/
    let file = std::fs::File::open(&archive).unwrap();
    let mut tar = tar::Archive::new(flate2::read::GzDecoder::new(file));
    let names: Vec<String> = tar
        .entries()
        .unwrap()
        .map(|e| e.unwrap().path().unwrap().display().to_string())
        .collect();
    assert!(names.iter().any(|n| n == "job_j1/catalog-caesar.json"));
}

#[test]
fn packaging_twice_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();
    let record = record_in(dir.path(), "j1");
    populate_job_dir(&record);

    let archive = package_job(&record).unwrap();
    let before = std::fs::metadata(&archive).unwrap().modified().unwrap();
    let bytes_before = std::fs::read(&archive).unwrap();

    let again = package_job(&record).unwrap();
    assert_eq!(archive, again);
    assert_eq!(std::fs::metadata(&archive).unwrap().modified().unwrap(), before);
    assert_eq!(std::fs::read(&archive).unwrap(), bytes_before);
}

#[test]
fn missing_job_dir_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let record = record_in(dir.path(), "ghost");
    assert!(matches!(package_job(&record), Err(EngineError::MissingJobDir(_))));
}

#[test]
fn archive_does_not_swallow_itself() {
    let dir = tempfile::tempdir().unwrap();
    let record = record_in(dir.path(), "j1");
    populate_job_dir(&record);

    let archive = package_job(&record).unwrap();
    let file = std::fs::File::open(&archive).unwrap();
    let mut tar = tar::Archive::new(flate2::read::GzDecoder::new(file));
    let names: Vec<String> = tar
        .entries()
        .unwrap()
        .map(|e| e.unwrap().path().unwrap().display().to_string())
        .collect();
    assert!(!names.iter().any(|n| n.ends_with(".tar.gz") || n.ends_with(".partial")));
}

#[test]
fn resolves_each_artifact_kind() {
    let dir = tempfile::tempdir().unwrap();
    let record = record_in(dir.path(), "j1");
    populate_job_dir(&record);
    package_job(&record).unwrap();

    let job_dir = record.job_dir();
    assert_eq!(
        resolve_artifact(&record, Artifact::IslandCatalogJson).unwrap(),
        job_dir.join("catalog-caesar.json")
    );
    assert_eq!(
        resolve_artifact(&record, Artifact::ComponentCatalogRaw).unwrap(),
        job_dir.join("catalog_fitcomp-caesar.dat")
    );
    assert_eq!(
        resolve_artifact(&record, Artifact::PreviewImage).unwrap(),
        job_dir.join("plot_caesar.png")
    );
    assert_eq!(
        resolve_artifact(&record, Artifact::Archive).unwrap(),
        job_dir.join("job_j1.tar.gz")
    );
}

#[test]
fn island_glob_does_not_match_component_catalog() {
    // catalog-*.json must not pick up catalog_fitcomp-*.json
    let dir = tempfile::tempdir().unwrap();
    let record = record_in(dir.path(), "j1");
    let job_dir = record.job_dir();
    std::fs::create_dir_all(&job_dir).unwrap();
    std::fs::write(job_dir.join("catalog_fitcomp-caesar.json"), b"{}").unwrap();

    assert!(matches!(
        resolve_artifact(&record, Artifact::IslandCatalogJson),
        Err(EngineError::ArtifactNotFound { .. })
    ));
}

#[test]
fn ambiguity_takes_the_first_sorted_match() {
    let dir = tempfile::tempdir().unwrap();
    let record = record_in(dir.path(), "j1");
    let job_dir = record.job_dir();
    std::fs::create_dir_all(&job_dir).unwrap();
    std::fs::write(job_dir.join("catalog-b.json"), b"{}").unwrap();
    std::fs::write(job_dir.join("catalog-a.json"), b"{}").unwrap();

    let resolved = resolve_artifact(&record, Artifact::IslandCatalogJson).unwrap();
    assert_eq!(resolved, job_dir.join("catalog-a.json"));
}

#[test]
fn missing_artifact_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let record = record_in(dir.path(), "j1");
    std::fs::create_dir_all(record.job_dir()).unwrap();

    let err = resolve_artifact(&record, Artifact::PreviewImage).unwrap_err();
    assert!(matches!(err, EngineError::ArtifactNotFound { artifact: "preview-image", .. }));
}

#[test]
fn preview_bytes_roundtrip_through_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let record = record_in(dir.path(), "j1");
    populate_job_dir(&record);

    let path = resolve_artifact(&record, Artifact::PreviewImage).unwrap();
    let mut bytes = Vec::new();
    std::fs::File::open(path).unwrap().read_to_end(&mut bytes).unwrap();
    assert_eq!(bytes, b"\x89PNG");
}
