//! Router assembly.

use axum::{Router, extract::State, http::StatusCode, middleware, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::cart::STORAGE_KEY;
use crate::middleware::request_id_middleware;
use crate::routes;
use crate::state::AppState;
use crate::storage::KeyValueStore;

/// Build the storefront router with its middleware stack.
///
/// Sentry layers are added by the binary so tests can drive this router
/// without a Sentry client.
pub fn router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config().static_dir);
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .nest_service("/static", static_files)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies the cart storage can be read.
/// Returns 503 Service Unavailable if it cannot.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.cart().await.storage().get(STORAGE_KEY) {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Storage not readable");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
