//! Integration tests for the opponent matching endpoints

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use ecoplay::core::{create_router, AppState, MemoryStore, RecordNumberVerifier};

const KNOWN_PERSONALITIES: [&str; 4] = [
    "Cautious Receiver",
    "Fair Receiver",
    "Generous Receiver",
    "Unpredictable Receiver",
];

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

#[tokio::test]
async fn test_list_personalities() {
    let app = test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/match/trust-game/personalities")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let personalities = json["personalities"].as_array().unwrap();
    assert_eq!(personalities.len(), 4);
    for p in personalities {
        assert!(KNOWN_PERSONALITIES.contains(&p["name"].as_str().unwrap()));
        let range = p["return_rate_range"].as_array().unwrap();
        assert_eq!(range.len(), 2);
    }
}

#[tokio::test]
async fn test_match_draws_known_personality() {
    let app = test_router();

    let request = Request::builder()
        .method("POST")
        .uri("/match/trust-game")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"game_type": "trust-game"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    assert!(KNOWN_PERSONALITIES.contains(&json["matched_personality"].as_str().unwrap()));
    assert_eq!(json["user_id"], "12345678");
    assert!(json["match_id"].is_string());
    assert!(json["description"].is_string());
}

#[tokio::test]
async fn test_match_unknown_game_type_rejected() {
    let app = test_router();

    let request = Request::builder()
        .method("POST")
        .uri("/match/trust-game")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"game_type": "poker"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_match_history_records_matches() {
    let app = test_router();

    for _ in 0..2 {
        let request = Request::builder()
            .method("POST")
            .uri("/match/trust-game")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"game_type": "trust-game"}"#))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri("/match/history")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["match_history"].as_array().unwrap().len(), 2);
}
