//! Integration tests for notification history.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

async fn push(app: &helpers::TestApp, token: &str, body: &str) {
    let response = app
        .request_raw("POST", &format!("/api/push/{token}"), "text/plain", body)
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_history_requires_login() {
    let app = helpers::TestApp::new();
    let response = app.request("GET", "/notifications", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHENTICATED");

    let response = app
        .request("GET", "/notifications", None, Some("not-a-jwt"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cursor_pages_are_newest_first_and_disjoint() {
    let app = helpers::TestApp::new();
    let (user, jwt) = app.login();
    app.create_endpoint(user, "cron", "tok00000001").await;
    for i in 0..5 {
        push(&app, "tok00000001", &format!("run {i}")).await;
    }

    let first = app
        .request("GET", "/notifications?limit=3", None, Some(&jwt))
        .await;
    assert_eq!(first.status, StatusCode::OK);
    let items = first.body["items"].as_array().expect("items");
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["body"], "run 4");
    assert_eq!(first.body["has_more"], true);

    let cursor = first.body["next_cursor"].as_str().expect("cursor");
    let second = app
        .request(
            "GET",
            &format!("/notifications?limit=3&cursor={cursor}"),
            None,
            Some(&jwt),
        )
        .await;
    let items = second.body["items"].as_array().expect("items");
    let bodies: Vec<&str> = items.iter().filter_map(|n| n["body"].as_str()).collect();
    assert_eq!(bodies, vec!["run 1", "run 0"]);
    assert_eq!(second.body["has_more"], false);

    let again = app
        .request(
            "GET",
            &format!("/notifications?limit=3&cursor={cursor}"),
            None,
            Some(&jwt),
        )
        .await;
    assert_eq!(again.body, second.body);
}

#[tokio::test]
async fn test_cursor_ignores_rows_inserted_between_pages() {
    let app = helpers::TestApp::new();
    let (user, jwt) = app.login();
    app.create_endpoint(user, "cron", "tok00000001").await;
    for i in 0..4 {
        push(&app, "tok00000001", &format!("old {i}")).await;
    }

    let first = app
        .request("GET", "/notifications?limit=2", None, Some(&jwt))
        .await;
    let cursor = first.body["next_cursor"].as_str().expect("cursor").to_string();
    let cursor_id: uuid::Uuid = cursor.parse().expect("uuid cursor");

    push(&app, "tok00000001", "new 0").await;
    push(&app, "tok00000001", "new 1").await;

    let second = app
        .request(
            "GET",
            &format!("/notifications?limit=2&cursor={cursor}"),
            None,
            Some(&jwt),
        )
        .await;
    assert_eq!(second.status, StatusCode::OK);
    let items = second.body["items"].as_array().expect("items");
    let bodies: Vec<&str> = items.iter().filter_map(|n| n["body"].as_str()).collect();
    assert_eq!(bodies, vec!["old 1", "old 0"]);
    for item in items {
        let id: uuid::Uuid = item["id"].as_str().expect("id").parse().expect("uuid");
        assert!(id < cursor_id, "page after the cursor holds {id}");
    }

    let fresh = app
        .request("GET", "/notifications?limit=2", None, Some(&jwt))
        .await;
    let items = fresh.body["items"].as_array().expect("items");
    let bodies: Vec<&str> = items.iter().filter_map(|n| n["body"].as_str()).collect();
    assert_eq!(bodies, vec!["new 1", "new 0"]);
}

#[tokio::test]
async fn test_history_is_scoped_to_caller() {
    let app = helpers::TestApp::new();
    let (owner, _) = app.login();
    let (_, other_jwt) = app.login();
    app.create_endpoint(owner, "cron", "tok00000001").await;
    push(&app, "tok00000001", "private").await;

    let response = app
        .request("GET", "/notifications", None, Some(&other_jwt))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["items"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_search_and_endpoint_filter() {
    let app = helpers::TestApp::new();
    let (user, jwt) = app.login();
    let cron = app.create_endpoint(user, "cron", "tok00000001").await;
    app.create_endpoint(user, "ci", "tok00000002").await;
    push(&app, "tok00000001", "Backup finished").await;
    push(&app, "tok00000002", "Build finished").await;
    push(&app, "tok00000002", "Build started").await;

    let response = app
        .request("GET", "/notifications?q=FINISHED", None, Some(&jwt))
        .await;
    assert_eq!(response.body["items"].as_array().map(Vec::len), Some(2));

    let response = app
        .request(
            "GET",
            &format!("/notifications?endpoint_id={}", cron.id),
            None,
            Some(&jwt),
        )
        .await;
    let items = response.body["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["endpoint_name"], "cron");
}

#[tokio::test]
async fn test_read_until_and_delete() {
    let app = helpers::TestApp::new();
    let (user, jwt) = app.login();
    app.create_endpoint(user, "cron", "tok00000001").await;
    for i in 0..3 {
        push(&app, "tok00000001", &format!("run {i}")).await;
    }

    let list = app.request("GET", "/notifications", None, Some(&jwt)).await;
    let items = list.body["items"].as_array().expect("items").clone();
    let middle = items[1]["id"].as_str().expect("id").to_string();

    let response = app
        .request(
            "POST",
            "/notifications/read-until",
            Some(json!({ "last_id": middle })),
            Some(&jwt),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["updated"], 2);

    let response = app
        .request(
            "DELETE",
            &format!("/notifications/{middle}"),
            None,
            Some(&jwt),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(
            "DELETE",
            &format!("/notifications/{middle}"),
            None,
            Some(&jwt),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let list = app.request("GET", "/notifications", None, Some(&jwt)).await;
    let items = list.body["items"].as_array().expect("items");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["is_read"], false);
    assert_eq!(items[1]["is_read"], true);
}
