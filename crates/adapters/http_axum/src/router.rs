//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use seva_app::ports::DocumentStore;

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests the RPC routes under `/Rpc` and exposes `/health`.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<S>(state: AppState<S>) -> Router
where
    S: DocumentStore + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/Rpc", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
