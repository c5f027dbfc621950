//! Handler tests for the Users domain
//!
//! These run against the in-memory repository and verify request
//! deserialization, response shape and HTTP status codes.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_users::*;
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt; // For oneshot()

fn app() -> axum::Router {
    let repo = InMemoryUserRepository::new();
    let service = UserService::new(repo);
    handlers::router(service)
}

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_user(name: &str, email: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({ "name": name, "email": email })).unwrap(),
        ))
        .unwrap()
}

#[tokio::test]
async fn test_create_user_returns_201() {
    let app = app();

    let response = app
        .oneshot(post_user("Alice", "alice@example.com"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let user: User = json_body(response.into_body()).await;
    assert_eq!(user.name, "Alice");
    assert_eq!(user.email, "alice@example.com");
}

#[tokio::test]
async fn test_create_user_with_bad_email_returns_400() {
    let app = app();

    let response = app
        .oneshot(post_user("Alice", "not-an-email"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_email_returns_409() {
    let app = app();

    let first = app
        .clone()
        .oneshot(post_user("Alice", "alice@example.com"))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .oneshot(post_user("Someone Else", "alice@example.com"))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_get_missing_user_returns_404() {
    let app = app();

    let request = Request::builder()
        .method("GET")
        .uri(format!("/{}", uuid::Uuid::now_v7()))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_user_changes_name_only() {
    let app = app();

    let created = app
        .clone()
        .oneshot(post_user("Alice", "alice@example.com"))
        .await
        .unwrap();
    let user: User = json_body(created.into_body()).await;

    let request = Request::builder()
        .method("PATCH")
        .uri(format!("/{}", user.id))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({ "name": "Alice Cooper" })).unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated: User = json_body(response.into_body()).await;
    assert_eq!(updated.name, "Alice Cooper");
    assert_eq!(updated.email, "alice@example.com");
}

#[tokio::test]
async fn test_delete_user_returns_204() {
    let app = app();

    let created = app
        .clone()
        .oneshot(post_user("Alice", "alice@example.com"))
        .await
        .unwrap();
    let user: User = json_body(created.into_body()).await;

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/{}", user.id))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
