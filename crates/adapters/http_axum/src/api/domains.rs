//! RPC handlers for domains.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;

use seva_app::ports::DocumentStore;
use seva_domain::name::DomainName;

use crate::error::ApiError;
use crate::rpc::RpcOk;
use crate::state::AppState;

/// Request body for creating a domain.
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateDomainRequest {
    pub domain: String,
}

/// `POST /Rpc/Domains/Create`
pub async fn create<S>(
    State(state): State<AppState<S>>,
    payload: Result<Json<CreateDomainRequest>, JsonRejection>,
) -> Result<RpcOk<()>, ApiError>
where
    S: DocumentStore + Send + Sync + 'static,
{
    let Json(req) = payload?;
    state.domain_service.create(&req.domain).await?;
    Ok(RpcOk::created(()))
}

/// `POST /Rpc/Domains/List`
///
/// Names are returned in ascending order.
pub async fn list<S>(State(state): State<AppState<S>>) -> Result<RpcOk<Vec<DomainName>>, ApiError>
where
    S: DocumentStore + Send + Sync + 'static,
{
    let mut domains = state.domain_service.list().await?;
    domains.sort();
    Ok(RpcOk::ok(domains))
}
