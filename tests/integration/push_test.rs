//! Integration tests for the public push API.

mod helpers;

use std::time::Duration;

use axum::body::Body;
use axum::http::StatusCode;
use serde_json::json;

use torchi_core::traits::NotificationStore;
use torchi_entity::notification::NotificationStatus;

const FORM: &str = "application/x-www-form-urlencoded";

#[tokio::test]
async fn test_push_reaches_every_device() {
    let app = helpers::TestApp::new();
    let (user, _) = app.login();
    app.create_endpoint(user, "deploy-bot", "tok00000001").await;
    app.add_devices(user, 2).await;

    let response = app
        .request_raw("POST", "/api/push/tok00000001", "text/plain", "hello")
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["sent"], 2);

    let calls = app.transport.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].1.title, "deploy-bot");
    assert_eq!(calls[0].1.body, "hello");

    let id = calls[0].1.notification_id.expect("notification id");
    let stored = app
        .backend
        .notifications
        .find_by_id(id)
        .await
        .expect("lookup")
        .expect("stored");
    assert_eq!(stored.status, NotificationStatus::Sent);
    assert_eq!(stored.body, "hello");
}

#[tokio::test]
async fn test_push_empty_body_rejected() {
    let app = helpers::TestApp::new();
    let response = app
        .request_raw("POST", "/api/push/tok00000001", "text/plain", "")
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_push_unknown_token_sends_nothing() {
    let app = helpers::TestApp::new();
    let response = app
        .request_raw("POST", "/api/push/doesnotexist", "text/plain", "hello")
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["sent"], 0);
    assert_eq!(app.transport.call_count(), 0);
}

#[tokio::test]
async fn test_push_partial_failure_reports_sent_count() {
    let app = helpers::TestApp::new();
    let (user, _) = app.login();
    app.create_endpoint(user, "deploy-bot", "tok00000001").await;
    app.add_devices(user, 3).await;
    app.transport.fail_on(2);

    let response = app
        .request_raw("POST", "/api/push/tok00000001", "text/plain", "hello")
        .await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.body["error"], "DELIVERY_FAILED");
    assert_eq!(response.body["sent"], 1);
    assert_eq!(app.transport.call_count(), 2);

    let id = app.transport.calls()[0]
        .1
        .notification_id
        .expect("notification id");
    let stored = app
        .backend
        .notifications
        .find_by_id(id)
        .await
        .expect("lookup")
        .expect("stored");
    assert_eq!(stored.status, NotificationStatus::Failed);
}

#[tokio::test]
async fn test_ask_returns_reaction() {
    let app = helpers::TestApp::new();
    let (user, _) = app.login();
    app.create_endpoint(user, "deploy-bot", "tok00000001").await;
    app.add_devices(user, 1).await;
    let mut delivered = app.transport.observe();

    let router = app.router.clone();
    let ask = tokio::spawn(async move {
        helpers::send(
            router,
            "POST",
            "/api/push/tok00000001/ask",
            FORM,
            Body::from("msg=deploy%3F&actions=yes%2C%20no&timeout=5"),
            None,
        )
        .await
    });

    let id = delivered.recv().await.expect("delivery observed");
    let react = app
        .request(
            "POST",
            &format!("/api/react/{id}"),
            Some(json!({ "reaction": "yes" })),
            None,
        )
        .await;
    assert_eq!(react.status, StatusCode::OK);
    assert_eq!(react.body["delivered"], true);

    let response = ask.await.expect("ask task");
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text, "yes");

    let calls = app.transport.calls();
    assert_eq!(calls[0].1.actions, vec!["yes", "no"]);
    assert!(app.state.orchestrator.correlator().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_ask_times_out_and_late_reaction_is_kept() {
    let app = helpers::TestApp::new();
    let (user, _) = app.login();
    app.create_endpoint(user, "deploy-bot", "tok00000001").await;
    app.add_devices(user, 1).await;

    let response = app
        .request_raw(
            "POST",
            "/api/push/tok00000001/ask",
            FORM,
            "msg=ping%3F&actions=yes,no&timeout=5",
        )
        .await;
    assert_eq!(response.status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(response.body["status"], "timeout");

    tokio::time::sleep(Duration::from_secs(1)).await;
    let id = app.transport.calls()[0]
        .1
        .notification_id
        .expect("notification id");
    let react = app
        .request(
            "POST",
            &format!("/api/react/{id}"),
            Some(json!({ "reaction": "no" })),
            None,
        )
        .await;
    assert_eq!(react.status, StatusCode::OK);
    assert_eq!(react.body["delivered"], false);

    let stored = app
        .backend
        .notifications
        .find_by_id(id)
        .await
        .expect("lookup")
        .expect("stored");
    assert_eq!(stored.reaction.as_deref(), Some("no"));
    assert!(app.state.orchestrator.correlator().is_empty());
}

#[tokio::test]
async fn test_ask_unknown_token_is_not_found() {
    let app = helpers::TestApp::new();
    let response = app
        .request_raw("POST", "/api/push/doesnotexist/ask", FORM, "msg=hi")
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ask_empty_message_rejected() {
    let app = helpers::TestApp::new();
    let (user, _) = app.login();
    app.create_endpoint(user, "deploy-bot", "tok00000001").await;
    app.add_devices(user, 1).await;

    for body in ["timeout=1", "msg=&actions=yes"] {
        let response = app
            .request_raw("POST", "/api/push/tok00000001/ask", FORM, body)
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["error"], "VALIDATION_ERROR");
    }
    assert_eq!(app.transport.call_count(), 0);
    assert!(app.state.orchestrator.correlator().is_empty());
}

#[tokio::test]
async fn test_react_unknown_notification_is_not_found() {
    let app = helpers::TestApp::new();
    let response = app
        .request(
            "POST",
            &format!("/api/react/{}", uuid::Uuid::now_v7()),
            Some(json!({ "reaction": "yes" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_demo_push_uses_given_device() {
    let app = helpers::TestApp::new();
    let response = app
        .request(
            "POST",
            "/api/push-demo",
            Some(json!({
                "endpoint": "https://push.example.com/demo",
                "p256dh": "BPublicKey",
                "auth": "authsecret",
                "message": "hi there"
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let calls = app.transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0.endpoint, "https://push.example.com/demo");
    assert_eq!(calls[0].1.title, "Demo");
    assert!(calls[0].1.notification_id.is_none());
}

#[tokio::test]
async fn test_demo_push_empty_message_rejected() {
    let app = helpers::TestApp::new();
    let response = app
        .request(
            "POST",
            "/api/push-demo",
            Some(json!({
                "endpoint": "https://push.example.com/demo",
                "p256dh": "BPublicKey",
                "auth": "authsecret"
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
    assert_eq!(app.transport.call_count(), 0);
}

#[tokio::test]
async fn test_health() {
    let app = helpers::TestApp::new();
    let response = app.request("GET", "/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["backend"], "memory");
}
