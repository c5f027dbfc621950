use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    UserIdHeader, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi};

use crate::error::{BookingError, BookingResult};
use crate::models::{Booking, BookingState, CreateBooking, PageRequest};
use crate::repository::BookingRepository;
use crate::service::BookingService;

pub const TAG: &str = "bookings";

/// OpenAPI documentation for the Bookings API
#[derive(OpenApi)]
#[openapi(
    paths(create_booking, get_booking, approve_booking, list_bookings, list_owner_bookings),
    components(
        schemas(Booking, CreateBooking, BookingState, PageRequest),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Booking lifecycle and state queries")
    )
)]
pub struct ApiDoc;

/// State filter and pagination as they appear on the listing endpoints
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListQuery {
    /// State bucket; defaults to `all`, parsed case-insensitively
    pub state: Option<String>,
    #[serde(default)]
    pub from: usize,
    #[serde(default = "default_size")]
    pub size: usize,
}

fn default_size() -> usize {
    10
}

impl ListQuery {
    fn state(&self) -> BookingResult<BookingState> {
        match &self.state {
            None => Ok(BookingState::All),
            Some(raw) => raw
                .parse()
                .map_err(|_| BookingError::UnknownState(raw.clone())),
        }
    }

    fn page(&self) -> PageRequest {
        PageRequest::new(self.from, self.size)
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ApproveQuery {
    pub approved: bool,
}

/// Create the booking router with all HTTP endpoints
pub fn router<R: BookingRepository + 'static>(service: BookingService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_bookings).post(create_booking))
        .route("/owner", get(list_owner_bookings))
        .route("/{id}", get(get_booking).patch(approve_booking))
        .with_state(shared_service)
}

/// Request a booking
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateBooking,
    params(
        ("X-User-Id" = Uuid, Header, description = "Requesting user")
    ),
    responses(
        (status = 201, description = "Booking created in waiting status", body = Booking),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_booking<R: BookingRepository>(
    State(service): State<Arc<BookingService<R>>>,
    UserIdHeader(booker_id): UserIdHeader,
    ValidatedJson(input): ValidatedJson<CreateBooking>,
) -> BookingResult<impl IntoResponse> {
    let booking = service.create_booking(booker_id, input).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// Get a booking; visible to the booker and the item owner only
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Booking ID"),
        ("X-User-Id" = Uuid, Header, description = "Requesting user")
    ),
    responses(
        (status = 200, description = "Booking found", body = Booking),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_booking<R: BookingRepository>(
    State(service): State<Arc<BookingService<R>>>,
    UserIdHeader(requester_id): UserIdHeader,
    UuidPath(id): UuidPath,
) -> BookingResult<Json<Booking>> {
    let booking = service.get_booking(id, requester_id).await?;
    Ok(Json(booking))
}

/// Approve or reject a waiting booking (item owner only)
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Booking ID"),
        ("X-User-Id" = Uuid, Header, description = "Requesting user"),
        ApproveQuery
    ),
    responses(
        (status = 200, description = "Booking decided", body = Booking),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn approve_booking<R: BookingRepository>(
    State(service): State<Arc<BookingService<R>>>,
    UserIdHeader(approver_id): UserIdHeader,
    UuidPath(id): UuidPath,
    Query(query): Query<ApproveQuery>,
) -> BookingResult<Json<Booking>> {
    let booking = service.approve(id, approver_id, query.approved).await?;
    Ok(Json(booking))
}

/// The requester's bookings as booker, newest start first
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(
        ("X-User-Id" = Uuid, Header, description = "Requesting user"),
        ListQuery
    ),
    responses(
        (status = 200, description = "Bookings in the requested state", body = Vec<Booking>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_bookings<R: BookingRepository>(
    State(service): State<Arc<BookingService<R>>>,
    UserIdHeader(booker_id): UserIdHeader,
    Query(query): Query<ListQuery>,
) -> BookingResult<Json<Vec<Booking>>> {
    let state = query.state()?;
    let bookings = service
        .list_for_booker(booker_id, state, query.page())
        .await?;
    Ok(Json(bookings))
}

/// Bookings on the requester's items, newest start first
#[utoipa::path(
    get,
    path = "/owner",
    tag = TAG,
    params(
        ("X-User-Id" = Uuid, Header, description = "Requesting user"),
        ListQuery
    ),
    responses(
        (status = 200, description = "Bookings in the requested state", body = Vec<Booking>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_owner_bookings<R: BookingRepository>(
    State(service): State<Arc<BookingService<R>>>,
    UserIdHeader(owner_id): UserIdHeader,
    Query(query): Query<ListQuery>,
) -> BookingResult<Json<Vec<Booking>>> {
    let state = query.state()?;
    let bookings = service.list_for_owner(owner_id, state, query.page()).await?;
    Ok(Json(bookings))
}
