//! End-to-end tests against a served instance with an in-memory store.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use wedding_wishes::security::rate_limit::{ManualClock, RateLimiter};
use wedding_wishes::store::Database;
use wishes_sdk::WishesClient;

mod common;

fn unlimited() -> wedding_wishes::AppConfig {
    let mut config = common::memory_config();
    config.rate_limit.enabled = false;
    config
}

#[tokio::test]
async fn test_health() {
    let app = common::spawn_app(common::memory_config()).await;
    let client = WishesClient::new(&app.url());

    let health = client.health().await.unwrap();
    assert_eq!(health.message, "wedding run normally OK");
}

#[tokio::test]
async fn test_wish_validation_rejects_bad_input() {
    let app = common::spawn_app(unlimited()).await;
    let client = WishesClient::new(&app.url());

    let cases = [
        (None, Some("hello")),
        (Some("Al"), Some("hello")),
        (Some("Alice"), None),
        (Some("Alice"), Some("")),
    ];
    for (name, message) in cases {
        let err = client.send_wish(name, message).await.unwrap_err();
        let failure = err.api().unwrap();
        assert_eq!(failure.status, StatusCode::BAD_REQUEST);
        assert_eq!(failure.message, "bad input user");
    }

    let raw = reqwest::Client::new()
        .post(format!("{}/wish", app.url()))
        .header("content-type", "application/json")
        .body("{oops")
        .send()
        .await
        .unwrap();
    assert_eq!(raw.status(), StatusCode::BAD_REQUEST);

    assert!(app.store.rows("wishs").is_empty());
}

#[tokio::test]
async fn test_wish_stored_lowercase_and_duplicates_rejected() {
    let app = common::spawn_app(unlimited()).await;
    let client = WishesClient::new(&app.url());

    let ok = client.send_wish(Some("Alice"), Some("Congrats!")).await.unwrap();
    assert_eq!(ok.message, "success insert");

    let rows = app.store.rows("wishs");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "alice");
    assert_eq!(rows[0]["message"], "Congrats!");

    let err = client.send_wish(Some("ALICE"), Some("Again")).await.unwrap_err();
    let failure = err.api().unwrap();
    assert_eq!(failure.status, StatusCode::BAD_REQUEST);
    assert_eq!(failure.message, "oops you already send wish");
    assert_eq!(app.store.rows("wishs").len(), 1);
}

#[tokio::test]
async fn test_list_returns_every_wish() {
    let app = common::spawn_app(unlimited()).await;
    let client = WishesClient::new(&app.url());

    for name in ["Alice", "Bobby", "Carol"] {
        client.send_wish(Some(name), Some("best wishes")).await.unwrap();
    }

    let list = client.list_wishes().await.unwrap();
    assert_eq!(list.message, "success get data");
    let names: HashSet<_> = list
        .data
        .iter()
        .map(|w| w["name"].as_str().unwrap().to_string())
        .collect();
    let expected: HashSet<_> = ["alice", "bobby", "carol"].iter().map(|s| s.to_string()).collect();
    assert_eq!(names, expected);
    assert!(list.data.iter().all(|w| w.get("id").is_some()));
}

#[tokio::test]
async fn test_guest_invite_and_lookup() {
    let app = common::spawn_app(common::memory_config()).await;
    let client = WishesClient::new(&app.url());

    let invite = client.create_guest("John Doe").await.unwrap();
    assert_eq!(invite.name, "John Doe");
    let suffix = invite.slug.strip_prefix("john-doe-").unwrap();
    assert_eq!(suffix.len(), 5);
    assert!(suffix.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));
    assert_eq!(invite.url, format!("http://wedding.local:8181/?guest={}", invite.slug));

    let guest = client.get_guest(&invite.slug).await.unwrap();
    assert_eq!(guest.name, "John Doe");

    let err = client.get_guest("nonexistent-slug").await.unwrap_err();
    let failure = err.api().unwrap();
    assert_eq!(failure.status, StatusCode::NOT_FOUND);
    assert_eq!(failure.message, "guest not found");
}

#[tokio::test]
async fn test_guest_requires_name() {
    let app = common::spawn_app(common::memory_config()).await;
    let client = WishesClient::new(&app.url());

    let err = client.create_guest("").await.unwrap_err();
    let failure = err.api().unwrap();
    assert_eq!(failure.status, StatusCode::BAD_REQUEST);
    assert_eq!(failure.message, "name is required");
}

#[tokio::test]
async fn test_sixth_submission_is_rate_limited() {
    let app = common::spawn_app(common::memory_config()).await;
    let client = WishesClient::new(&app.url());

    // Bad input still counts against the window.
    for i in 0..5 {
        let name = format!("guest{}", i);
        let message = if i % 2 == 0 { Some("hello") } else { None };
        let _ = client.send_wish(Some(&name), message).await;
    }

    let raw = reqwest::Client::new()
        .post(format!("{}/wish", app.url()))
        .json(&serde_json::json!({"name": "latecomer", "message": "hi"}))
        .send()
        .await
        .unwrap();
    assert_eq!(raw.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(raw.headers().contains_key("retry-after"));
    let body: serde_json::Value = raw.json().await.unwrap();
    assert_eq!(body["message"], "Too many requests, please try again later.");

    // Other routes are not limited.
    assert!(client.list_wishes().await.is_ok());
    assert!(client.health().await.is_ok());
}

#[tokio::test]
async fn test_database_failures_are_500() {
    let app = common::spawn_app(unlimited()).await;
    let client = WishesClient::new(&app.url());
    app.store.set_failure(Some("connection refused"));

    let err = client.send_wish(Some("Alice"), Some("hi")).await.unwrap_err();
    let failure = err.api().unwrap();
    assert_eq!(failure.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(failure.message, "connection refused");

    let err = client.list_wishes().await.unwrap_err();
    let failure = err.api().unwrap();
    assert_eq!(failure.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(failure.message, "failed get data");

    let err = client.create_guest("Ann").await.unwrap_err();
    let failure = err.api().unwrap();
    assert_eq!(failure.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(failure.message, "failed generate guest");
}

#[tokio::test]
async fn test_response_headers() {
    let app = common::spawn_app(common::memory_config()).await;

    let resp = reqwest::Client::new()
        .get(format!("{}/wish", app.url()))
        .header("origin", "http://wedding.local:8181")
        .header("x-request-id", "trace-me")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    assert_eq!(resp.headers()["x-request-id"], "trace-me");
    assert_eq!(resp.headers()["x-frame-options"], "SAMEORIGIN");
}

#[tokio::test]
async fn test_rate_limit_window_reopens() {
    let clock = Arc::new(ManualClock::new());
    let limiter = Arc::new(RateLimiter::new(5, Duration::from_secs(5), clock.clone()));
    let app = common::spawn_app_with_limiter(common::memory_config(), limiter).await;
    let client = WishesClient::new(&app.url());

    for i in 0..5 {
        let name = format!("friend{}", i);
        client.send_wish(Some(&name), Some("cheers")).await.unwrap();
    }
    let err = client.send_wish(Some("friend5"), Some("cheers")).await.unwrap_err();
    assert_eq!(err.api().unwrap().status, StatusCode::TOO_MANY_REQUESTS);

    clock.advance(Duration::from_secs(5));
    let ok = client.send_wish(Some("friend5"), Some("cheers")).await.unwrap();
    assert_eq!(ok.message, "success insert");
    assert_eq!(app.store.rows("wishs").len(), 6);
}

#[tokio::test]
async fn test_list_returns_rows_with_untyped_columns() {
    let app = common::spawn_app(unlimited()).await;
    let client = WishesClient::new(&app.url());

    client.send_wish(Some("Alice"), Some("hi")).await.unwrap();
    let db = Database::new(Arc::new(app.store.clone()));
    db.from("wishs")
        .insert(&serde_json::json!({"name": "bobby", "message": null}))
        .execute()
        .await
        .unwrap();

    let list = client.list_wishes().await.unwrap();
    assert_eq!(list.data.len(), 2);
    let bobby = list.data.iter().find(|w| w["name"] == "bobby").unwrap();
    assert!(bobby["message"].is_null());
}
