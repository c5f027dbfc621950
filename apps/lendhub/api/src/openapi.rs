use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "LendHub API",
        version = "0.1.0",
        description = "Peer-to-peer item sharing: users, items, bookings and comments"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/users", api = domain_users::handlers::ApiDoc),
        (path = "/items", api = crate::api::items::ApiDoc),
        (path = "/bookings", api = domain_bookings::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;
