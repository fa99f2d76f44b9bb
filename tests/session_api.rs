// tests/session_api.rs
// Session inspection, stage catalog and health endpoints


use axum::http::StatusCode;
use serde_json::json;

use test_helpers::{StubLlm, create_test_app, delete, get_json, post_chat};

#[tokio::test]
async fn test_session_snapshot_after_turns() {
    let app = create_test_app(StubLlm::replying("ok"));

    post_chat(&app, json!({ "message": "thanks", "moodLevel": 3.0, "sessionId": "snap" })).await;
    post_chat(&app, json!({ "message": "you're so cute", "moodLevel": 3.3, "sessionId": "snap" })).await;

    let (status, session) = get_json(&app, "/api/sessions/snap").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["sessionId"], "snap");
    assert_eq!(session["turns"], 2);
    assert_eq!(session["recentScores"], json!([1.0, 2.0]));
    assert!(session["lastMoodLevel"].as_f64().unwrap() > 3.3);
    assert!(session["updatedAt"].is_string());
}

#[tokio::test]
async fn test_unknown_session_is_404() {
    let app = create_test_app(StubLlm::replying("ok"));

    let (status, body) = get_json(&app, "/api/sessions/nobody").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_delete_session() {
    let app = create_test_app(StubLlm::replying("ok"));
    post_chat(&app, json!({ "message": "hi", "sessionId": "bye" })).await;

    assert_eq!(delete(&app, "/api/sessions/bye").await, StatusCode::NO_CONTENT);
    assert_eq!(delete(&app, "/api/sessions/bye").await, StatusCode::NOT_FOUND);

    let (status, _) = get_json(&app, "/api/sessions/bye").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_moods_catalog_is_ordered() {
    let app = create_test_app(StubLlm::replying("ok"));

    let (status, body) = get_json(&app, "/api/moods").await;

    assert_eq!(status, StatusCode::OK);
    let moods = body.as_array().unwrap();
    assert_eq!(moods.len(), 10);
    assert_eq!(moods[0]["label"], "angry");
    assert_eq!(moods[0]["emoji"], "😠");
    assert_eq!(moods[2]["label"], "tsundere");
    assert_eq!(moods[9]["label"], "affectionate");
    for (i, mood) in moods.iter().enumerate() {
        assert_eq!(mood["level"], i);
        assert!(!mood["description"].as_str().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_health() {
    let app = create_test_app(StubLlm::replying("ok"));

    for uri in ["/health", "/api/health"] {
        let (status, body) = get_json(&app, uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}
