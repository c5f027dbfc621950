//! Requester identity extractor.
//!
//! The edge gateway authenticates users and forwards the caller's id in
//! the `X-User-Id` header; handlers read it through this extractor.

use crate::errors::AppError;
use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

/// Name of the header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extractor for the `X-User-Id` request header.
///
/// Rejects the request with 400 when the header is missing or is not a
/// valid UUID.
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::UserIdHeader;
///
/// async fn my_bookings(UserIdHeader(user_id): UserIdHeader) -> String {
///     format!("Bookings for {}", user_id)
/// }
/// ```
pub struct UserIdHeader(pub Uuid);

impl<S> FromRequestParts<S> for UserIdHeader
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts.headers.get(USER_ID_HEADER).ok_or_else(|| {
            AppError::BadRequest(format!("Missing {} header", USER_ID_HEADER)).into_response()
        })?;

        let value = value.to_str().map_err(|_| {
            AppError::BadRequest(format!("Invalid {} header", USER_ID_HEADER)).into_response()
        })?;

        match Uuid::parse_str(value) {
            Ok(uuid) => Ok(UserIdHeader(uuid)),
            Err(_) => Err(
                AppError::BadRequest(format!("Invalid {} header: {}", USER_ID_HEADER, value))
                    .into_response(),
            ),
        }
    }
}
