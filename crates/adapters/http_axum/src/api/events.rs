//! RPC handlers for events.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;

use seva_app::ports::DocumentStore;
use seva_domain::event::Event;

use crate::error::ApiError;
use crate::rpc::RpcOk;
use crate::state::AppState;

/// Request body for appending an event.
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateEventRequest {
    pub domain: String,
    pub event_type: String,
    pub body: serde_json::Value,
}

/// Request body for listing the events of a domain.
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListEventsRequest {
    pub domain: String,
}

/// `POST /Rpc/Events/Create`
pub async fn create<S>(
    State(state): State<AppState<S>>,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<RpcOk<Event>, ApiError>
where
    S: DocumentStore + Send + Sync + 'static,
{
    let Json(req) = payload?;
    let event = state
        .event_service
        .append(&req.domain, &req.event_type, req.body)
        .await?;
    Ok(RpcOk::created(event))
}

/// `POST /Rpc/Events/List`
///
/// Events come back oldest first.
pub async fn list<S>(
    State(state): State<AppState<S>>,
    payload: Result<Json<ListEventsRequest>, JsonRejection>,
) -> Result<RpcOk<Vec<Event>>, ApiError>
where
    S: DocumentStore + Send + Sync + 'static,
{
    let Json(req) = payload?;
    let events = state.event_service.list(&req.domain).await?;
    Ok(RpcOk::ok(events))
}
