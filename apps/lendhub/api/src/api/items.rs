//! Item endpoints, composed in the app.
//!
//! Item responses are annotated with data from the booking domain: the
//! owner's item views carry the last and next approved booking window,
//! and comments are gated on a completed booking by the author. The
//! composition happens here so the domains stay decoupled.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    AppError, UserIdHeader, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};
use uuid::Uuid;

use domain_bookings::BookingWindow;
use domain_items::{Comment, CreateComment, CreateItem, Item, ItemFilter, UpdateItem};

use crate::state::AppState;

pub const TAG: &str = "items";

/// OpenAPI documentation for the Items API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_items,
        create_item,
        search_items,
        get_item,
        update_item,
        add_comment
    ),
    components(
        schemas(
            Item,
            ItemDetail,
            Comment,
            CreateItem,
            UpdateItem,
            CreateComment,
            BookingWindow
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Item catalog, search and comments")
    )
)]
pub struct ApiDoc;

/// An item annotated with its approved booking window and comments.
///
/// The booking window is populated only when the requester owns the
/// item; renters see `null` in both fields.
#[derive(Debug, Serialize, ToSchema)]
pub struct ItemDetail {
    #[serde(flatten)]
    pub item: Item,
    pub last_booking: Option<BookingWindow>,
    pub next_booking: Option<BookingWindow>,
    pub comments: Vec<Comment>,
}

/// Text search over available items
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

impl SearchQuery {
    fn filter(&self) -> ItemFilter {
        ItemFilter {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

/// Create the item router with all HTTP endpoints
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/search", get(search_items))
        .route("/{id}", get(get_item).patch(update_item))
        .route("/{id}/comments", post(add_comment))
        .with_state(state)
}

/// List a new item
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateItem,
    params(
        ("X-User-Id" = Uuid, Header, description = "Item owner")
    ),
    responses(
        (status = 201, description = "Item created", body = Item),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_item(
    State(state): State<AppState>,
    UserIdHeader(owner_id): UserIdHeader,
    ValidatedJson(input): ValidatedJson<CreateItem>,
) -> Result<impl IntoResponse, AppError> {
    // The owner must be a registered user
    state.users.get_user(owner_id).await?;

    let item = state.items.create_item(owner_id, input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// The requester's items, annotated with booking windows and comments
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(
        ("X-User-Id" = Uuid, Header, description = "Item owner"),
        ItemFilter
    ),
    responses(
        (status = 200, description = "The requester's items", body = Vec<ItemDetail>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_items(
    State(state): State<AppState>,
    UserIdHeader(owner_id): UserIdHeader,
    Query(filter): Query<ItemFilter>,
) -> Result<Json<Vec<ItemDetail>>, AppError> {
    let items = state.items.list_owner_items(owner_id, filter).await?;
    let ids: Vec<Uuid> = items.iter().map(|item| item.id).collect();

    // Two batched queries instead of 2N single-item lookups
    let mut windows = state.bookings.booking_windows(ids.clone()).await?;
    let mut comments = state.items.comments_for_items(ids).await?;

    let details = items
        .into_iter()
        .map(|item| {
            let (last, next) = windows.remove(&item.id).unwrap_or((None, None));
            let comments = comments.remove(&item.id).unwrap_or_default();
            ItemDetail {
                item,
                last_booking: last,
                next_booking: next,
                comments,
            }
        })
        .collect();

    Ok(Json(details))
}

/// Search available items by name or description
#[utoipa::path(
    get,
    path = "/search",
    tag = TAG,
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching available items", body = Vec<Item>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_items(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Item>>, AppError> {
    let items = state
        .items
        .search_items(&query.text, query.filter())
        .await?;
    Ok(Json(items))
}

/// Get an item with its comments; the owner also sees the booking window
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Item ID"),
        ("X-User-Id" = Uuid, Header, description = "Requesting user")
    ),
    responses(
        (status = 200, description = "Item found", body = ItemDetail),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_item(
    State(state): State<AppState>,
    UserIdHeader(requester_id): UserIdHeader,
    UuidPath(id): UuidPath,
) -> Result<Json<ItemDetail>, AppError> {
    let item = state.items.get_item(id).await?;
    let comments = state.items.list_comments(id).await?;

    let (last_booking, next_booking) = if item.owner_id == requester_id {
        state.bookings.booking_window(id).await?
    } else {
        (None, None)
    };

    Ok(Json(ItemDetail {
        item,
        last_booking,
        next_booking,
        comments,
    }))
}

/// Update an item (owner only)
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Item ID"),
        ("X-User-Id" = Uuid, Header, description = "Requesting user")
    ),
    request_body = UpdateItem,
    responses(
        (status = 200, description = "Item updated", body = Item),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_item(
    State(state): State<AppState>,
    UserIdHeader(requester_id): UserIdHeader,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateItem>,
) -> Result<Json<Item>, AppError> {
    let item = state.items.update_item(id, requester_id, input).await?;
    Ok(Json(item))
}

/// Comment on an item after a completed booking
#[utoipa::path(
    post,
    path = "/{id}/comments",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Item ID"),
        ("X-User-Id" = Uuid, Header, description = "Comment author")
    ),
    request_body = CreateComment,
    responses(
        (status = 201, description = "Comment created", body = Comment),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_comment(
    State(state): State<AppState>,
    UserIdHeader(author_id): UserIdHeader,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<CreateComment>,
) -> Result<impl IntoResponse, AppError> {
    let author = state.users.get_user(author_id).await?;

    if !state.bookings.has_completed_booking(id, author_id).await? {
        return Err(AppError::BadRequest(format!(
            "User {} has no completed booking of item {}",
            author_id, id
        )));
    }

    let comment = state
        .items
        .add_comment(id, author_id, author.name, input)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}
