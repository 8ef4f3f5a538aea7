//! Query envelope route
//!
//! Accepts `{"query": "<name>", "arguments": {...}}` and dispatches to the
//! same operations as the REST routes, so the web client can keep a single
//! query call site.

use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    Json,
};
use serde::{Deserialize, Serialize};
use substatus_billing::{IdentityContext, PortalResponse, QueryResponse, SubscriptionStatusResponse};

use super::billing::{portal_link, subscription_status, GetSubscriptionArgs};
use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

pub const GET_SUBSCRIPTION: &str = "getSubscription";
pub const CREATE_BILLING_PORTAL: &str = "createBillingPortal";

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum QueryData {
    SubscriptionStatus(SubscriptionStatusResponse),
    BillingPortal(PortalResponse),
}

pub async fn run_query(
    State(state): State<AppState>,
    Extension(identity): Extension<IdentityContext>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> ApiResult<Json<QueryResponse<QueryData>>> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    tracing::debug!(query = %request.query, "Dispatching query");

    let data = match request.query.as_str() {
        GET_SUBSCRIPTION => {
            let args = parse_arguments(request.arguments)?;
            QueryData::SubscriptionStatus(subscription_status(&state, &identity, args).await?)
        }
        CREATE_BILLING_PORTAL => QueryData::BillingPortal(portal_link(&state, &identity).await?),
        other => {
            return Err(ApiError::BadRequest(format!("Unknown query: {}", other)));
        }
    };

    Ok(Json(QueryResponse::ok(data)))
}

fn parse_arguments(arguments: serde_json::Value) -> ApiResult<GetSubscriptionArgs> {
    if arguments.is_null() {
        return Ok(GetSubscriptionArgs::default());
    }
    serde_json::from_value(arguments)
        .map_err(|e| ApiError::BadRequest(format!("Invalid arguments: {}", e)))
}
