use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Item not found: {0}")]
    ItemNotFound(Uuid),

    #[error("Booking not found: {0}")]
    BookingNotFound(Uuid),

    /// Requester is not allowed to see or act on this booking. Serialized
    /// as 404 so callers cannot distinguish "denied" from "absent".
    #[error("Access denied to booking resource {0}")]
    AccessDenied(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Unknown state: {0}")]
    UnknownState(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type BookingResult<T> = Result<T, BookingError>;

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::UserNotFound(id) => {
                AppError::NotFound(format!("User {} not found", id))
            }
            BookingError::ItemNotFound(id) => {
                AppError::NotFound(format!("Item {} not found", id))
            }
            BookingError::BookingNotFound(id) => {
                AppError::NotFound(format!("Booking {} not found", id))
            }
            BookingError::AccessDenied(id) => {
                AppError::NotFound(format!("Booking {} not found", id))
            }
            BookingError::Validation(msg) => AppError::BadRequest(msg),
            BookingError::UnknownState(state) => {
                AppError::BadRequest(format!("Unknown state: {}", state))
            }
            BookingError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
