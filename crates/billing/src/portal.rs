//! Stripe Billing Portal

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{BillingError, BillingResult};
use crate::identity::{resolve_principal, CustomerResolver, IdentityContext};
use crate::provider::BillingProvider;

/// Portal service for Stripe billing portal sessions
#[derive(Clone)]
pub struct PortalService {
    provider: Arc<dyn BillingProvider>,
    customers: Arc<dyn CustomerResolver>,
    return_url: String,
}

impl PortalService {
    pub fn new(
        provider: Arc<dyn BillingProvider>,
        customers: Arc<dyn CustomerResolver>,
        return_url: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            customers,
            return_url: return_url.into(),
        }
    }

    /// Create a billing portal session for the calling user
    pub async fn create_portal_link(&self, identity: &IdentityContext) -> BillingResult<PortalResponse> {
        let principal = resolve_principal(identity)?;
        let customer_id = self.customers.customer_for(&principal).await?;

        let url = self
            .provider
            .create_portal_session(&customer_id, &self.return_url)
            .await?;

        if url.trim().is_empty() {
            return Err(BillingError::MissingData(
                "No portal URL returned".to_string(),
            ));
        }

        tracing::info!(user_id = %principal, "Billing portal link created");

        Ok(PortalResponse { url })
    }
}

/// Response for creating a portal session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalResponse {
    pub url: String,
}
