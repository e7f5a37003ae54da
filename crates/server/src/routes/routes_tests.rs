// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::auth::AuthAdapter;
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use base64::Engine;
use parking_lot::Mutex;
use serde_json::{json, Value};
use sfrest_apps::AppRegistry;
use sfrest_core::{Config, FileRecord, JobRecord, JobState, SchedulerKind, SystemClock};
use sfrest_sched::{JobSpec, Scheduler, SchedulerError, StatusReport, Submission};
use sfrest_store::{AccountingStore, DocStore, FileStore, JobStore};
use std::collections::HashMap;

#[derive(Default)]
struct StubScheduler {
    cancelled: Mutex<Vec<String>>,
}

#[async_trait]
impl Scheduler for StubScheduler {
    async fn submit(&self, spec: JobSpec) -> Result<Submission, SchedulerError> {
        Ok(Submission {
            job_id: spec.job_id.clone(),
            pid: spec.job_id,
            submit_date: "2026-02-01T10:00:00+00:00".to_string(),
            state: JobState::Pending,
        })
    }

    async fn status(&self, _pid: &str) -> Result<Option<StatusReport>, SchedulerError> {
        Ok(None)
    }

    async fn cancel(&self, pid: &str) -> Result<(), SchedulerError> {
        self.cancelled.lock().push(pid.to_string());
        Ok(())
    }
}

struct Fixture {
    _dir: tempfile::TempDir,
    ctx: Arc<AppContext>,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.job_root = dir.path().join("jobs");
    config.data_root = dir.path().join("data");
    config.job_scheduler = SchedulerKind::Hpc;

    let docs = Arc::new(DocStore::open(dir.path().join("db")).unwrap());
    let jobs = JobStore::new(docs.clone());
    let files = FileStore::new(docs.clone());
    let accounting = AccountingStore::new(docs);

    let mut schedulers: HashMap<SchedulerKind, Arc<dyn Scheduler>> = HashMap::new();
    schedulers.insert(SchedulerKind::Hpc, Arc::new(StubScheduler::default()));

    let registry = AppRegistry::from_config(&config);
    let auth = AuthAdapter::from_config(&config).unwrap();

    let ctx = Arc::new(AppContext {
        registry,
        jobs,
        files,
        accounting,
        schedulers,
        auth,
        clock: SystemClock,
        config,
    });
    Fixture { _dir: dir, ctx }
}

async fn call(fixture: &Fixture, request: Request<Body>) -> (StatusCode, Value) {
    use tower::ServiceExt;

    let response = router(fixture.ctx.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn call_raw(fixture: &Fixture, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    use tower::ServiceExt;

    let response = router(fixture.ctx.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn multipart_upload(filename: &str, bytes: &[u8], tag: &str) -> Request<Body> {
    let boundary = "sfrest-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{b}\r\ncontent-disposition: form-data; name=\"file\"; filename=\"{f}\"\r\n\
             content-type: application/octet-stream\r\n\r\n",
            b = boundary,
            f = filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(
        format!(
            "\r\n--{b}\r\ncontent-disposition: form-data; name=\"tag\"\r\n\r\n{t}\r\n--{b}--\r\n",
            b = boundary,
            t = tag
        )
        .as_bytes(),
    );
    Request::builder()
        .method("POST")
        .uri("/api/v1/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}

fn register_input(fixture: &Fixture, fileid: &str) {
    let path = fixture
        .ctx
        .config
        .data_root
        .join("anonymous")
        .join(format!("{}.fits", fileid));
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, b"SIMPLE  = T").unwrap();
    fixture
        .ctx
        .files
        .register(
            "anonymous",
            &FileRecord {
                fileid: fileid.to_string(),
                filepath: path.display().to_string(),
                filename_orig: "galaxy.fits".to_string(),
                fileext: "fits".to_string(),
                filesize: 0.1,
                filedate: "2026-02-01T09:00:00+00:00".to_string(),
                tag: String::new(),
            },
        )
        .unwrap();
}

fn insert_terminal_job(fixture: &Fixture, job_id: &str, state: JobState) -> JobRecord {
    let mut record = JobRecord::pending(
        job_id,
        job_id,
        "anonymous",
        "caesar",
        "2026-02-01T10:00:00+00:00",
        std::collections::HashMap::new(),
        "f1",
        fixture.ctx.config.job_root.join("anonymous").display().to_string(),
        "",
        SchedulerKind::Hpc,
    );
    record.state = state;
    fixture.ctx.jobs.insert(&record).unwrap();
    record
}

#[tokio::test]
async fn apps_listing_and_describe() {
    let fixture = fixture();

    let (status, body) = call(&fixture, get("/api/v1/apps")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["apps"][0], "caesar");

    let (status, body) = call(&fixture, get("/api/v1/app/caesar/describe")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["seedthr"]["type"], "float");

    let (status, body) = call(&fixture, get("/api/v1/app/sextractor/describe")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["status"].as_str().unwrap().contains("Unknown app"));
}

#[tokio::test]
async fn submit_status_cancel_roundtrip() {
    let fixture = fixture();
    register_input(&fixture, "f1");

    let (status, body) = call(
        &fixture,
        post_json(
            "/api/v1/job",
            json!({
                "app": "caesar",
                "job_inputs": { "seedthr": 5.0, "mergethr": 2.6 },
                "data_inputs": "f1"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["state"], "PENDING");
    let job_id = body["job_id"].as_str().unwrap().to_string();

    let (status, body) =
        call(&fixture, get(&format!("/api/v1/job/{}/status", job_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "PENDING");
    assert_eq!(body["app"], "caesar");

    let (status, _body) =
        call(&fixture, get(&format!("/api/v1/job/{}/cancel", job_id))).await;
    assert_eq!(status, StatusCode::OK);
    let record = fixture.ctx.jobs.find_one("anonymous", &job_id).unwrap().unwrap();
    assert_eq!(record.state, JobState::Canceled);

    // cancelling again is a no-op success
    let (status, body) =
        call(&fixture, get(&format!("/api/v1/job/{}/cancel", job_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["status"].as_str().unwrap().contains("nothing to cancel"));
}

#[tokio::test]
async fn invalid_submission_is_400_with_validator_message() {
    let fixture = fixture();
    register_input(&fixture, "f1");

    let (status, body) = call(
        &fixture,
        post_json(
            "/api/v1/job",
            json!({
                "app": "caesar",
                "job_inputs": { "seedthr": "five" },
                "data_inputs": "f1"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["status"].as_str().unwrap().contains("seedthr"));
}

#[tokio::test]
async fn unknown_job_is_404() {
    let fixture = fixture();
    let (status, body) = call(&fixture, get("/api/v1/job/ghost/status")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["status"].as_str().unwrap().contains("ghost"));
}

#[tokio::test]
async fn upload_lifecycle() {
    let fixture = fixture();

    let (status, body) =
        call(&fixture, multipart_upload("ngc1316.fits", b"SIMPLE  = T", "survey")).await;
    assert_eq!(status, StatusCode::OK);
    let fileid = body["uuid"].as_str().unwrap().to_string();
    assert_eq!(body["format"], "fits");
    assert_eq!(body["tag"], "survey");

    let (status, body) = call(&fixture, get("/api/v1/fileids")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["fileid"], fileid);
    assert!(body[0].get("filepath").is_none());

    let (status, bytes) =
        call_raw(&fixture, get(&format!("/api/v1/download/{}", fileid))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"SIMPLE  = T");

    let (status, _body) = call(&fixture, get(&format!("/api/v1/delete/{}", fileid))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _body) =
        call(&fixture, get(&format!("/api/v1/download/{}", fileid))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn disallowed_extension_is_415() {
    let fixture = fixture();
    let (status, body) = call(&fixture, multipart_upload("payload.exe", b"MZ", "")).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(body["status"].as_str().unwrap().contains("not allowed"));
}

#[tokio::test]
async fn output_is_202_while_unfinished() {
    let fixture = fixture();
    insert_terminal_job(&fixture, "j1", JobState::Running);

    let (status, body) = call(&fixture, get("/api/v1/job/j1/output")).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["state"], "RUNNING");
}

#[tokio::test]
async fn preview_envelope_roundtrips_the_image_bytes() {
    let fixture = fixture();
    let record = insert_terminal_job(&fixture, "j1", JobState::Success);
    let job_dir = record.job_dir();
    std::fs::create_dir_all(&job_dir).unwrap();
    let png = b"\x89PNG\r\n\x1a\nfakeimage";
    std::fs::write(job_dir.join("plot_caesar.png"), png).unwrap();

    let (status, body) = call(&fixture, get("/api/v1/job/j1/preview")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "");
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(body["image"].as_str().unwrap())
        .unwrap();
    assert_eq!(decoded, png);
}

#[tokio::test]
async fn missing_artifact_is_404() {
    let fixture = fixture();
    let record = insert_terminal_job(&fixture, "j1", JobState::Success);
    std::fs::create_dir_all(record.job_dir()).unwrap();

    let (status, _body) = call(&fixture, get("/api/v1/job/j1/sources")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn accounting_endpoints_404_before_first_cycle() {
    let fixture = fixture();
    let (status, _body) = call(&fixture, get("/api/v1/accounting")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _body) = call(&fixture, get("/api/v1/appstats")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
