//! Payment provider seam
//!
//! Services never talk to Stripe types directly. They go through
//! [`BillingProvider`], which hands back the plain records below. The Stripe
//! implementation lives in `stripe_provider`; tests use `testing::StubProvider`.

use async_trait::async_trait;

use crate::error::BillingResult;

/// Page size for the billing history read
pub const INVOICE_HISTORY_LIMIT: u64 = 12;

/// One line item of a subscription as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderLineItem {
    pub product_id: Option<String>,
    /// Unit price in minor currency units
    pub unit_amount: Option<i64>,
    /// Epoch seconds
    pub current_period_end: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSubscription {
    pub id: String,
    /// Provider lifecycle state, verbatim (`active`, `canceled`, `past_due`, ...)
    pub status: String,
    /// Lower-case ISO 4217 code as Stripe reports it
    pub currency: String,
    pub items: Vec<ProviderLineItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInvoice {
    pub id: String,
    pub number: Option<String>,
    /// Epoch seconds
    pub created: Option<i64>,
    /// Total in minor currency units
    pub total: Option<i64>,
    pub currency: Option<String>,
    pub status: Option<String>,
    pub hosted_invoice_url: Option<String>,
    pub invoice_pdf: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProduct {
    pub id: String,
    pub name: Option<String>,
}

/// Read and portal operations consumed from the payment provider
#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// Every subscription for the customer regardless of status, with
    /// line-item prices included
    async fn list_subscriptions(&self, customer_id: &str)
        -> BillingResult<Vec<ProviderSubscription>>;

    /// The `limit` most recent invoices for the customer, newest first
    async fn list_invoices(
        &self,
        customer_id: &str,
        limit: u64,
    ) -> BillingResult<Vec<ProviderInvoice>>;

    async fn retrieve_product(&self, product_id: &str) -> BillingResult<ProviderProduct>;

    /// Create a hosted billing portal session and return its URL
    async fn create_portal_session(&self, customer_id: &str, return_url: &str)
        -> BillingResult<String>;
}
