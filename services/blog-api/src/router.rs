//! HTTP router
//!
//! Route groups are split by gate: public, optional auth, required auth.

use axum::routing::{delete, get, post, put};
use axum::Router;
use quill_axum::AuthLayer;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::handlers;
use crate::state::AppState;

/// Build the full application router
pub fn build_router(state: AppState) -> Router {
    let request_timeout = state.request_timeout();
    let validator = state.auth.validator();

    // No credential involved
    let public = Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/comments/post/{post_id}", get(handlers::list_comments));

    // Anonymous callers allowed, read-only
    let optional = Router::new()
        .route("/posts", get(handlers::list_posts))
        .route("/posts/{id}", get(handlers::get_post))
        .route_layer(AuthLayer::optional(validator.clone()));

    // Valid bearer token required
    let required = Router::new()
        .route("/auth/profile", get(handlers::profile))
        .route("/posts", post(handlers::create_post))
        .route("/posts/{id}", put(handlers::update_post))
        .route("/posts/{id}", delete(handlers::delete_post))
        .route("/comments", post(handlers::create_comment))
        .route("/comments/{id}", delete(handlers::delete_comment))
        .route_layer(AuthLayer::required(validator));

    let api_v1 = Router::new().merge(public).merge(optional).merge(required);

    // Health route (no timeout - must always respond quickly)
    let health_routes = Router::new().route("/health", get(handlers::health));

    // Build middleware stack (order matters - outermost first)
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TimeoutLayer::new(request_timeout));

    Router::new()
        .nest("/api/v1", api_v1)
        .layer(middleware)
        .merge(health_routes)
        .with_state(state)
}
