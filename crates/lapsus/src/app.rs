use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, StatusCode},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    normalize_path::NormalizePath,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use lapsus_auth::auth_routes;

use crate::{
    config::Config,
    handlers::{
        health::health,
        images::upload_image,
        licenses::{create_license, delete_license, get_license, list_licenses, update_license},
        root::root,
        users::{create_user, delete_user, get_user, list_users, update_user},
        NEXT_CURSOR,
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
///
/// Paths with and without a trailing slash route the same.
pub fn create_app(state: AppState, config: &Config) -> NormalizePath<Router> {
    let upload_limit = DefaultBodyLimit::max(state.upload_max_bytes);

    let api_routes = Router::new()
        // User routes
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        // License routes
        .route("/licenses", get(list_licenses).post(create_license))
        .route(
            "/licenses/upload-image",
            post(upload_image).layer(upload_limit),
        )
        .route(
            "/licenses/{id}",
            get(get_license).put(update_license).delete(delete_license),
        );

    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(api_routes)
        .merge(auth_routes::<AppState>())
        .layer(cors_layer(&config.cors_allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout(),
        ))
        .with_state(state);

    NormalizePath::trim_trailing_slash(router)
}

/// CORS for the configured origins, with credentials.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .expose_headers([NEXT_CURSOR])
}
