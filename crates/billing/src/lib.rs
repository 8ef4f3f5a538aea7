// Test code patterns (expected in test files):
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Subscription Status Billing Module
//!
//! Reads a customer's subscriptions and invoices from Stripe and reshapes
//! them for the subscription status page.
//!
//! ## Features
//!
//! - **Subscription Status**: Every subscription regardless of status, with
//!   product names, display price and renewal date
//! - **Billing History**: The 12 most recent invoices with receipt links
//! - **Billing Portal**: Hosted Stripe portal session for self-service
//! - **Retries**: Bounded exponential backoff for transient Stripe failures

pub mod client;
pub mod error;
pub mod format;
pub mod history;
pub mod identity;
pub mod portal;
pub mod products;
pub mod provider;
pub mod response;
pub mod retry;
pub mod stripe_provider;
pub mod subscriptions;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

#[cfg(test)]
mod edge_case_tests;

use std::sync::Arc;

// Client
pub use client::{StripeClient, StripeConfig};

// Error
pub use error::{
    BillingError, BillingResult, ErrorKind, PORTAL_FALLBACK_MESSAGE,
    SUBSCRIPTION_FALLBACK_MESSAGE,
};

// History
pub use history::BillingHistoryRecord;

// Identity
pub use identity::{resolve_principal, CustomerResolver, FixedCustomer, IdentityContext, Principal};

// Portal
pub use portal::{PortalResponse, PortalService};

// Products
pub use products::{ProductLookupPolicy, UNKNOWN_PRODUCT};

// Provider
pub use provider::{BillingProvider, INVOICE_HISTORY_LIMIT};

// Response
pub use response::QueryResponse;

// Retry
pub use retry::RetryPolicy;

// Subscriptions
pub use subscriptions::{SubscriptionService, SubscriptionStatusResponse, SubscriptionView};

/// Main billing service that combines all billing functionality
#[derive(Clone)]
pub struct BillingService {
    pub subscriptions: SubscriptionService,
    pub portal: PortalService,
}

impl BillingService {
    /// Create a new billing service from environment variables
    pub fn from_env() -> BillingResult<Self> {
        Ok(Self::new(StripeConfig::from_env()?))
    }

    /// Create a new billing service with explicit config
    pub fn new(config: StripeConfig) -> Self {
        let customers = Arc::new(FixedCustomer::new(config.customer_id.clone()));
        let return_url = config.portal_return_url();
        let product_lookup = config.product_lookup;
        let stripe = Arc::new(StripeClient::new(config));

        Self::with_provider(stripe, customers, product_lookup, return_url)
    }

    /// Create a billing service over any provider and customer mapping
    pub fn with_provider(
        provider: Arc<dyn BillingProvider>,
        customers: Arc<dyn CustomerResolver>,
        product_lookup: ProductLookupPolicy,
        portal_return_url: impl Into<String>,
    ) -> Self {
        Self {
            subscriptions: SubscriptionService::new(
                provider.clone(),
                customers.clone(),
                product_lookup,
            ),
            portal: PortalService::new(provider, customers, portal_return_url),
        }
    }
}
