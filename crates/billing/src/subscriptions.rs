//! Subscription status query
//!
//! Resolves the caller, reads subscriptions and recent invoices from the
//! provider in parallel, names the products on every line item, and reshapes
//! it all into [`SubscriptionStatusResponse`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::BillingResult;
use crate::format::{display_currency, epoch_to_iso, minor_to_major};
use crate::history::{billing_history, BillingHistoryRecord};
use crate::identity::{resolve_principal, CustomerResolver, IdentityContext};
use crate::products::{resolve_product_names, ProductLookupPolicy, ProductNames};
use crate::provider::{BillingProvider, ProviderSubscription, INVOICE_HISTORY_LIMIT};

/// The only status that carries a renewal date
const ACTIVE_STATUS: &str = "active";

/// A subscription as the UI renders it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionView {
    pub id: String,
    pub status: String,
    /// Product display name for every line item
    pub items: Vec<String>,
    /// Next renewal (ISO-8601), only for active subscriptions
    pub renewal_date: Option<String>,
    /// Unit price of the first line item in major currency units
    pub amount: f64,
    pub currency: String,
}

/// Result of the subscription status query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatusResponse {
    pub user_id: String,
    pub stripe_customer_id: String,
    pub subscriptions: Vec<SubscriptionView>,
    pub billing_history: Vec<BillingHistoryRecord>,
}

/// Reshape one provider subscription
pub fn subscription_view(subscription: ProviderSubscription, names: &ProductNames) -> SubscriptionView {
    let first_item = subscription.items.first();

    let renewal_date = if subscription.status == ACTIVE_STATUS {
        first_item
            .and_then(|item| item.current_period_end)
            .and_then(epoch_to_iso)
    } else {
        None
    };

    let amount = minor_to_major(first_item.and_then(|item| item.unit_amount).unwrap_or(0));

    let items = subscription
        .items
        .iter()
        .map(|item| names.name_for(item.product_id.as_deref()))
        .collect();

    SubscriptionView {
        currency: display_currency(&subscription.currency),
        id: subscription.id,
        status: subscription.status,
        items,
        renewal_date,
        amount,
    }
}

/// Subscription status service
#[derive(Clone)]
pub struct SubscriptionService {
    provider: Arc<dyn BillingProvider>,
    customers: Arc<dyn CustomerResolver>,
    product_lookup: ProductLookupPolicy,
}

impl SubscriptionService {
    pub fn new(
        provider: Arc<dyn BillingProvider>,
        customers: Arc<dyn CustomerResolver>,
        product_lookup: ProductLookupPolicy,
    ) -> Self {
        Self {
            provider,
            customers,
            product_lookup,
        }
    }

    /// Subscriptions and billing history for the calling user.
    ///
    /// `email` is accepted from the caller but plays no part in customer
    /// resolution.
    pub async fn get_subscription_status(
        &self,
        identity: &IdentityContext,
        email: Option<&str>,
    ) -> BillingResult<SubscriptionStatusResponse> {
        let principal = resolve_principal(identity)?;
        let customer_id = self.customers.customer_for(&principal).await?;

        tracing::info!(
            user_id = %principal,
            customer_id = %customer_id,
            email = ?email,
            "Fetching subscription status"
        );

        // Both reads run to completion before either result is inspected
        let (subscriptions, invoices) = tokio::join!(
            self.provider.list_subscriptions(&customer_id),
            self.provider.list_invoices(&customer_id, INVOICE_HISTORY_LIMIT),
        );
        let subscriptions = subscriptions?;
        let invoices = invoices?;

        let names =
            resolve_product_names(self.provider.as_ref(), &subscriptions, self.product_lookup)
                .await?;

        let subscriptions: Vec<SubscriptionView> = subscriptions
            .into_iter()
            .map(|sub| subscription_view(sub, &names))
            .collect();
        let billing_history = billing_history(invoices);

        tracing::info!(
            user_id = %principal,
            subscriptions = subscriptions.len(),
            invoices = billing_history.len(),
            products = names.len(),
            "Subscription status assembled"
        );

        Ok(SubscriptionStatusResponse {
            user_id: principal.to_string(),
            stripe_customer_id: customer_id,
            subscriptions,
            billing_history,
        })
    }
}
