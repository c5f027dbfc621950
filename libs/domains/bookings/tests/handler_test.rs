//! Handler tests for the Bookings domain
//!
//! These run the real router against the in-memory repository and
//! collaborators, covering the lifecycle end to end at the HTTP level.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Duration, Utc};
use domain_bookings::*;
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;

struct TestApp {
    app: axum::Router,
    users: InMemoryUserDirectory,
    items: InMemoryItemCatalog,
}

fn test_app() -> TestApp {
    let users = InMemoryUserDirectory::new();
    let items = InMemoryItemCatalog::new();
    let service = BookingService::new(
        InMemoryBookingRepository::new(),
        Arc::new(users.clone()),
        Arc::new(items.clone()),
        Arc::new(SystemClock),
    );
    TestApp {
        app: handlers::router(service),
        users,
        items,
    }
}

async fn seed_users_and_item(app: &TestApp, available: bool) -> (Uuid, Uuid, Uuid) {
    let owner = Uuid::now_v7();
    let booker = Uuid::now_v7();
    let item = Uuid::now_v7();

    app.users.insert(UserRef { id: owner }).await;
    app.users.insert(UserRef { id: booker }).await;
    app.items
        .insert(ItemRef {
            id: item,
            owner_id: owner,
            available,
        })
        .await;

    (owner, booker, item)
}

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_booking(
    user_id: Uuid,
    item_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .header("x-user-id", user_id.to_string())
        .body(Body::from(
            serde_json::to_string(&json!({
                "item_id": item_id,
                "start_date": start,
                "end_date": end,
            }))
            .unwrap(),
        ))
        .unwrap()
}

#[tokio::test]
async fn test_create_booking_returns_201_waiting() {
    let app = test_app();
    let (_, booker, item) = seed_users_and_item(&app, true).await;
    let now = Utc::now();

    let response = app
        .app
        .oneshot(post_booking(
            booker,
            item,
            now + Duration::days(1),
            now + Duration::days(2),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let booking: Booking = json_body(response.into_body()).await;
    assert_eq!(booking.status, BookingStatus::Waiting);
    assert_eq!(booking.booker_id, booker);
    assert_eq!(booking.item_id, item);
}

#[tokio::test]
async fn test_missing_user_header_returns_400() {
    let app = test_app();
    let (_, _, item) = seed_users_and_item(&app, true).await;
    let now = Utc::now();

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "item_id": item,
                "start_date": now + Duration::days(1),
                "end_date": now + Duration::days(2),
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_inverted_period_returns_400() {
    let app = test_app();
    let (_, booker, item) = seed_users_and_item(&app, true).await;
    let now = Utc::now();

    let response = app
        .app
        .oneshot(post_booking(
            booker,
            item,
            now + Duration::days(2),
            now + Duration::days(1),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_owner_booking_own_item_returns_404() {
    let app = test_app();
    let (owner, _, item) = seed_users_and_item(&app, true).await;
    let now = Utc::now();

    let response = app
        .app
        .oneshot(post_booking(
            owner,
            item,
            now + Duration::days(1),
            now + Duration::days(2),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_state_returns_400_with_message() {
    let app = test_app();
    let (_, booker, _) = seed_users_and_item(&app, true).await;

    let request = Request::builder()
        .method("GET")
        .uri("/?state=SOMETHING")
        .header("x-user-id", booker.to_string())
        .body(Body::empty())
        .unwrap();

    let response = app.app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Unknown state: SOMETHING");
}

#[tokio::test]
async fn test_full_lifecycle_scenario() {
    let app = test_app();
    let (owner, booker, item) = seed_users_and_item(&app, true).await;
    let now = Utc::now();

    // Booker requests the item
    let created = app
        .app
        .clone()
        .oneshot(post_booking(
            booker,
            item,
            now + Duration::days(1),
            now + Duration::days(2),
        ))
        .await
        .unwrap();
    let booking: Booking = json_body(created.into_body()).await;

    // Owner sees it in the waiting bucket
    let waiting_list = app
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/owner?state=waiting")
                .header("x-user-id", owner.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let listed: Vec<Booking> = json_body(waiting_list.into_body()).await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, booking.id);

    // Owner approves
    let approved = app
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/{}?approved=true", booking.id))
                .header("x-user-id", owner.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(approved.status(), StatusCode::OK);
    let decided: Booking = json_body(approved.into_body()).await;
    assert_eq!(decided.status, BookingStatus::Approved);

    // Booker now finds it under future, and no longer under waiting
    let future_list = app
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/?state=FUTURE")
                .header("x-user-id", booker.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let listed: Vec<Booking> = json_body(future_list.into_body()).await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, BookingStatus::Approved);

    let waiting_again = app
        .app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/?state=waiting")
                .header("x-user-id", booker.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let listed: Vec<Booking> = json_body(waiting_again.into_body()).await;
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_pagination_from_2_size_1_returns_third_booking() {
    let app = test_app();
    let (_, booker, item) = seed_users_and_item(&app, true).await;
    let now = Utc::now();

    let mut earliest_start = None;
    for days in [1, 3, 5] {
        let start = now + Duration::days(days);
        if earliest_start.is_none() {
            earliest_start = Some(start);
        }
        let response = app
            .app
            .clone()
            .oneshot(post_booking(booker, item, start, start + Duration::hours(6)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let page = app
        .app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/?state=all&from=2&size=1")
                .header("x-user-id", booker.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(page.status(), StatusCode::OK);

    // Third element in start-descending order is the earliest start
    let listed: Vec<Booking> = json_body(page.into_body()).await;
    assert_eq!(listed.len(), 1);
    assert_eq!(Some(listed[0].start_date), earliest_start);
}
