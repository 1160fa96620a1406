//! JSON RPC handler modules.
//!
//! Every operation is a `POST` to `/Rpc/<Area>/<Operation>` with a JSON
//! request body whose keys are PascalCase.

#[allow(clippy::missing_errors_doc)]
pub mod domains;
#[allow(clippy::missing_errors_doc)]
pub mod events;
#[allow(clippy::missing_errors_doc)]
pub mod specs;

use axum::Router;
use axum::routing::post;

use seva_app::ports::DocumentStore;

use crate::state::AppState;

/// Build the `/Rpc` sub-router.
pub fn routes<S>() -> Router<AppState<S>>
where
    S: DocumentStore + Send + Sync + 'static,
{
    Router::new()
        // Domains
        .route("/Domains/Create", post(domains::create::<S>))
        .route("/Domains/List", post(domains::list::<S>))
        // Specs
        .route("/Specs/Create", post(specs::create::<S>))
        .route("/Specs/Get", post(specs::get::<S>))
        .route("/Specs/List", post(specs::list::<S>))
        // Events
        .route("/Events/Create", post(events::create::<S>))
        .route("/Events/List", post(events::list::<S>))
}
