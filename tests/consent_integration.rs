//! Integration tests for the consent endpoints
//!
//! Covers the full document lifecycle plus ownership checks.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use ecoplay::core::{create_router, AppState, MemoryStore, RecordNumberVerifier};

const CONSENT_BODY: &str = r#"{
    "medicalRecordNumber": "11110000",
    "consentGiven": true,
    "consentDetails": {
        "researchParticipation": true,
        "dataCollection": true,
        "dataSharing": false,
        "contactPermission": true
    }
}"#;

fn test_router() -> axum::Router {
    create_router(AppState::new(
        Arc::new(MemoryStore::new()),
        Arc::new(RecordNumberVerifier::new()),
        true,
    ))
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[tokio::test]
async fn test_submit_and_check_consent() {
    let app = test_router();

    let response = app
        .clone()
        .oneshot(request("POST", "/consent/submit", Some("11110000"), Some(CONSENT_BODY)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert!(json["document_id"].is_string());

    let response = app
        .oneshot(request("GET", "/consent/check/11110000", Some("11110000"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["exists"], true);
    assert_eq!(json["consent_given"], true);
    assert_eq!(json["consent_details"]["dataSharing"], false);
}

#[tokio::test]
async fn test_check_without_consent_on_file() {
    let app = test_router();

    let response = app
        .oneshot(request("GET", "/consent/check/99990000", Some("11110000"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["exists"], false);
}

#[tokio::test]
async fn test_list_consents_for_identity() {
    let app = test_router();

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(request("POST", "/consent/submit", Some("11110000"), Some(CONSENT_BODY)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(request("GET", "/consent/list", Some("11110000"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total"], 2);
    assert_eq!(json["consents"].as_array().unwrap().len(), 2);

    // Another identity has no consents
    let response = app
        .oneshot(request("GET", "/consent/list", Some("22220000"), None))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["total"], 0);
}

#[tokio::test]
async fn test_update_consent() {
    let app = test_router();

    let response = app
        .clone()
        .oneshot(request("POST", "/consent/submit", Some("11110000"), Some(CONSENT_BODY)))
        .await
        .unwrap();
    let document_id = body_json(response).await["document_id"]
        .as_str()
        .unwrap()
        .to_string();

    let updated = CONSENT_BODY.replace(r#""consentGiven": true"#, r#""consentGiven": false"#);
    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/consent/update/{}", document_id),
            Some("11110000"),
            Some(&updated),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(request("GET", "/consent/check/11110000", Some("11110000"), None))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["consent_given"], false);
}

#[tokio::test]
async fn test_update_by_other_identity_forbidden() {
    let app = test_router();

    let response = app
        .clone()
        .oneshot(request("POST", "/consent/submit", Some("11110000"), Some(CONSENT_BODY)))
        .await
        .unwrap();
    let document_id = body_json(response).await["document_id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .oneshot(request(
            "PUT",
            &format!("/consent/update/{}", document_id),
            Some("22220000"),
            Some(CONSENT_BODY),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_consent() {
    let app = test_router();

    let response = app
        .clone()
        .oneshot(request("POST", "/consent/submit", Some("11110000"), Some(CONSENT_BODY)))
        .await
        .unwrap();
    let document_id = body_json(response).await["document_id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/consent/delete/{}", document_id),
            Some("11110000"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(request("GET", "/consent/check/11110000", Some("11110000"), None))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["exists"], false);
}

#[tokio::test]
async fn test_delete_missing_consent_not_found() {
    let app = test_router();

    let response = app
        .oneshot(request(
            "DELETE",
            "/consent/delete/doesnotexist",
            Some("11110000"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
