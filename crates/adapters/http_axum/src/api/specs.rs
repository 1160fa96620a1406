//! RPC handlers for event type specs.

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;

use seva_app::ports::DocumentStore;
use seva_domain::name::EventType;
use seva_domain::spec::Spec;

use crate::error::ApiError;
use crate::rpc::RpcOk;
use crate::state::AppState;

/// Request body for registering a spec.
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateSpecRequest {
    pub domain: String,
    pub event_type: String,
    pub spec: Spec,
}

/// Request body for fetching one spec.
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetSpecRequest {
    pub domain: String,
    pub event_type: String,
}

/// Request body for listing the specs of a domain.
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListSpecsRequest {
    pub domain: String,
}

/// `POST /Rpc/Specs/Create`
pub async fn create<S>(
    State(state): State<AppState<S>>,
    payload: Result<Json<CreateSpecRequest>, JsonRejection>,
) -> Result<RpcOk<Spec>, ApiError>
where
    S: DocumentStore + Send + Sync + 'static,
{
    let Json(req) = payload?;
    let spec = state
        .spec_service
        .create(&req.domain, &req.event_type, req.spec)
        .await?;
    Ok(RpcOk::created(spec))
}

/// `POST /Rpc/Specs/Get`
pub async fn get<S>(
    State(state): State<AppState<S>>,
    payload: Result<Json<GetSpecRequest>, JsonRejection>,
) -> Result<RpcOk<Spec>, ApiError>
where
    S: DocumentStore + Send + Sync + 'static,
{
    let Json(req) = payload?;
    let spec = state.spec_service.get(&req.domain, &req.event_type).await?;
    Ok(RpcOk::ok(spec))
}

/// `POST /Rpc/Specs/List`
pub async fn list<S>(
    State(state): State<AppState<S>>,
    payload: Result<Json<ListSpecsRequest>, JsonRejection>,
) -> Result<RpcOk<BTreeMap<EventType, Spec>>, ApiError>
where
    S: DocumentStore + Send + Sync + 'static,
{
    let Json(req) = payload?;
    let specs = state.spec_service.get_all(&req.domain).await?;
    Ok(RpcOk::ok(specs))
}
