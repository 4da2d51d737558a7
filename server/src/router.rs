use axum::Router;
use axum::routing::{get, post, put};
use tower_http::trace::TraceLayer;

use crate::AppState;
use crate::handlers;

#[allow(unreachable_pub)]
pub fn init(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/check/{ip}", get(handlers::check))
        .route("/refresh", post(handlers::refresh))
        .route("/overrides", get(handlers::list_overrides))
        .route(
            "/overrides/{entry}",
            put(handlers::add_override).delete(handlers::remove_override),
        )
        .route("/ping", post(handlers::ping))
        .route("/stats", get(handlers::stats))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
