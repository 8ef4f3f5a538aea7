//! Billing routes for the subscription status page

use std::sync::Arc;

use axum::{
    extract::{Extension, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use substatus_billing::{
    BillingError, BillingService, IdentityContext, PortalResponse, QueryResponse,
    SubscriptionStatusResponse, PORTAL_FALLBACK_MESSAGE, SUBSCRIPTION_FALLBACK_MESSAGE,
};

use crate::{
    analytics::{self, AnalyticsEvent},
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Arguments of the subscription status query
#[derive(Debug, Default, Deserialize)]
pub struct GetSubscriptionArgs {
    /// Accepted for compatibility; customer resolution does not use it
    pub email: Option<String>,
}

fn billing_service<'a>(
    state: &'a AppState,
    fallback: &'static str,
) -> ApiResult<&'a Arc<BillingService>> {
    state.billing.as_ref().ok_or_else(|| {
        ApiError::billing(
            BillingError::Configuration("Stripe credentials are not configured".to_string()),
            fallback,
        )
    })
}

pub(crate) async fn subscription_status(
    state: &AppState,
    identity: &IdentityContext,
    args: GetSubscriptionArgs,
) -> ApiResult<SubscriptionStatusResponse> {
    let billing = billing_service(state, SUBSCRIPTION_FALLBACK_MESSAGE)?;

    let response = billing
        .subscriptions
        .get_subscription_status(identity, args.email.as_deref())
        .await
        .map_err(|e| ApiError::billing(e, SUBSCRIPTION_FALLBACK_MESSAGE))?;

    analytics::track(
        AnalyticsEvent::SubscriptionViewed,
        Some(&response.user_id),
        json!({
            "subscriptions": response.subscriptions.len(),
            "invoices": response.billing_history.len(),
        }),
    );

    Ok(response)
}

pub(crate) async fn portal_link(
    state: &AppState,
    identity: &IdentityContext,
) -> ApiResult<PortalResponse> {
    let billing = billing_service(state, PORTAL_FALLBACK_MESSAGE)?;

    let response = billing
        .portal
        .create_portal_link(identity)
        .await
        .map_err(|e| ApiError::billing(e, PORTAL_FALLBACK_MESSAGE))?;

    analytics::track(
        AnalyticsEvent::BillingPortalOpened,
        identity.sub.as_deref(),
        json!({}),
    );

    Ok(response)
}

/// Subscriptions and billing history for the signed-in user
pub async fn get_subscription(
    State(state): State<AppState>,
    Extension(identity): Extension<IdentityContext>,
    Query(args): Query<GetSubscriptionArgs>,
) -> ApiResult<Json<QueryResponse<SubscriptionStatusResponse>>> {
    let response = subscription_status(&state, &identity, args).await?;
    Ok(Json(QueryResponse::ok(response)))
}

/// Create a Stripe billing portal session; the client redirects to `url`
pub async fn create_billing_portal(
    State(state): State<AppState>,
    Extension(identity): Extension<IdentityContext>,
) -> ApiResult<Json<QueryResponse<PortalResponse>>> {
    let response = portal_link(&state, &identity).await?;
    Ok(Json(QueryResponse::ok(response)))
}
