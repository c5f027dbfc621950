use axum::Router;
use axum::routing::get;

pub mod bookings;
pub mod health;
pub mod items;
pub mod users;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix is added by the `create_router` helper.
///
/// Users and bookings mount their domain routers directly. Items are
/// composed here in the app because the item views are annotated with
/// booking windows and comments, which crosses domain boundaries.
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new()
        .nest("/users", users::router(state))
        .nest("/items", items::router(state.clone()))
        .nest("/bookings", bookings::router(state))
}

/// Creates a router with the /ready endpoint that performs actual
/// dependency checks, as opposed to the liveness-only /health route.
pub fn ready_router(state: crate::state::AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
