// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sfrest_core::Config;

#[tokio::test]
async fn disabled_auth_yields_anonymous() {
    let adapter = AuthAdapter::from_config(&Config::default()).unwrap();
    let user = adapter.identify(&HeaderMap::new()).await.unwrap();
    assert_eq!(user, ANONYMOUS);
}

#[tokio::test]
async fn enabled_auth_rejects_missing_bearer() {
    let mut secrets = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(
        &mut secrets,
        br#"{"web": {"client_id": "sfrest", "client_secret": "s3cr3t",
             "token_introspection_uri": "https://auth.example.org/introspect"}}"#,
    )
    .unwrap();

    let mut config = Config::default();
    config.auth_enabled = true;
    config.auth_client_secrets = Some(secrets.path().to_path_buf());

    let adapter = AuthAdapter::from_config(&config).unwrap();
    let err = adapter.identify(&HeaderMap::new()).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));
}

#[test]
fn enabled_auth_requires_a_secrets_file() {
    let mut config = Config::default();
    config.auth_enabled = true;
    assert!(AuthAdapter::from_config(&config).is_err());
}

#[test]
fn bearer_token_extraction() {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
    assert_eq!(bearer_token(&headers).as_deref(), Some("abc.def.ghi"));

    let mut basic = HeaderMap::new();
    basic.insert(AUTHORIZATION, "Basic dXNlcg==".parse().unwrap());
    assert!(bearer_token(&basic).is_none());

    let mut empty = HeaderMap::new();
    empty.insert(AUTHORIZATION, "Bearer ".parse().unwrap());
    assert!(bearer_token(&empty).is_none());
}
