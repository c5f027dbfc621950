use axum::Router;
use domain_bookings::handlers;

pub fn router(state: &crate::state::AppState) -> Router {
    handlers::router(state.bookings.clone())
}
