//! Integration tests for endpoint and subscription management.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_create_list_and_delete_endpoint() {
    let app = helpers::TestApp::new();
    let (_, jwt) = app.login();

    let created = app
        .request(
            "POST",
            "/endpoints",
            Some(json!({ "service_name": "  nightly backup  " })),
            Some(&jwt),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["name"], "nightly backup");
    assert_eq!(created.body["muted"], false);
    let token = created.body["token"].as_str().expect("token").to_string();
    assert_eq!(token.len(), 11);

    let list = app.request("GET", "/endpoints", None, Some(&jwt)).await;
    assert_eq!(list.body.as_array().map(Vec::len), Some(1));

    let deleted = app
        .request("DELETE", &format!("/endpoints/{token}"), None, Some(&jwt))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let deleted = app
        .request("DELETE", &format!("/endpoints/{token}"), None, Some(&jwt))
        .await;
    assert_eq!(deleted.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_endpoint_rejects_blank_name() {
    let app = helpers::TestApp::new();
    let (_, jwt) = app.login();
    let response = app
        .request(
            "POST",
            "/endpoints",
            Some(json!({ "service_name": "" })),
            Some(&jwt),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.get("details").is_some());
}

#[tokio::test]
async fn test_endpoint_of_another_user_is_not_found() {
    let app = helpers::TestApp::new();
    let (owner, _) = app.login();
    let (_, other_jwt) = app.login();
    app.create_endpoint(owner, "cron", "tok00000001").await;

    let response = app
        .request("PUT", "/endpoints/tok00000001/mute", None, Some(&other_jwt))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request("DELETE", "/endpoints/tok00000001", None, Some(&other_jwt))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_muted_endpoint_records_without_delivery() {
    let app = helpers::TestApp::new();
    let (user, jwt) = app.login();
    app.create_endpoint(user, "cron", "tok00000001").await;
    app.add_devices(user, 2).await;

    let muted = app
        .request("PUT", "/endpoints/tok00000001/mute", None, Some(&jwt))
        .await;
    assert_eq!(muted.status, StatusCode::OK);
    assert_eq!(muted.body["muted"], true);

    let response = app
        .request_raw("POST", "/api/push/tok00000001", "text/plain", "quiet")
        .await;
    assert_eq!(response.body["sent"], 0);
    assert_eq!(app.transport.call_count(), 0);

    let history = app.request("GET", "/notifications", None, Some(&jwt)).await;
    assert_eq!(history.body["items"][0]["status"], "mute");

    let unmuted = app
        .request("PUT", "/endpoints/tok00000001/unmute", None, Some(&jwt))
        .await;
    assert_eq!(unmuted.body["muted"], false);

    let response = app
        .request_raw("POST", "/api/push/tok00000001", "text/plain", "loud")
        .await;
    assert_eq!(response.body["sent"], 2);
}

#[tokio::test]
async fn test_subscribe_then_push_then_unsubscribe() {
    let app = helpers::TestApp::new();
    let (user, jwt) = app.login();
    app.create_endpoint(user, "cron", "tok00000001").await;

    let subscription = json!({
        "endpoint": "https://push.example.com/browser-1",
        "keys": { "p256dh": "BPublicKey", "auth": "authsecret" }
    });
    let response = app
        .request("POST", "/subscriptions", Some(subscription.clone()), Some(&jwt))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["endpoint"], "https://push.example.com/browser-1");

    let response = app
        .request("POST", "/subscriptions", Some(subscription.clone()), Some(&jwt))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let list = app.request("GET", "/subscriptions", None, Some(&jwt)).await;
    assert_eq!(list.body.as_array().map(Vec::len), Some(1));

    let response = app
        .request_raw("POST", "/api/push/tok00000001", "text/plain", "hello")
        .await;
    assert_eq!(response.body["sent"], 1);

    let response = app
        .request(
            "POST",
            "/subscriptions/unsubscribe",
            Some(subscription),
            Some(&jwt),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["removed"], true);

    let response = app
        .request_raw("POST", "/api/push/tok00000001", "text/plain", "hello")
        .await;
    assert_eq!(response.body["sent"], 0);
}

#[tokio::test]
async fn test_subscription_requires_keys() {
    let app = helpers::TestApp::new();
    let (_, jwt) = app.login();
    let response = app
        .request(
            "POST",
            "/subscriptions",
            Some(json!({
                "endpoint": "https://push.example.com/browser-1",
                "keys": { "p256dh": "", "auth": "authsecret" }
            })),
            Some(&jwt),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
