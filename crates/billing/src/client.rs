//! Stripe client configuration

use std::sync::Arc;

use crate::error::{BillingError, BillingResult};
use crate::products::ProductLookupPolicy;
use crate::retry::RetryPolicy;

const DEFAULT_APP_BASE_URL: &str = "http://localhost:5173";

/// Stripe configuration, loaded from the environment.
///
/// The secret key and customer id stay server-side and are never included
/// in a response. `Debug` redacts both.
#[derive(Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    pub customer_id: String,
    /// Base URL of the web app, used to build the portal return URL
    pub app_base_url: String,
    pub retry: RetryPolicy,
    pub product_lookup: ProductLookupPolicy,
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("secret_key", &"[REDACTED]")
            .field("customer_id", &"[REDACTED]")
            .field("app_base_url", &self.app_base_url)
            .field("retry", &self.retry)
            .field("product_lookup", &self.product_lookup)
            .finish()
    }
}

impl StripeConfig {
    pub fn from_env() -> BillingResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key/value source
    pub fn from_lookup<F>(lookup: F) -> BillingResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> BillingResult<String> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| BillingError::Configuration(format!("{} is not set", key)))
        };

        let secret_key = required("STRIPE_SECRET_KEY")?;
        let customer_id = required("STRIPE_CUSTOMER_ID")?;

        let app_base_url = lookup("APP_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_APP_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let defaults = RetryPolicy::default();
        let retry = RetryPolicy {
            max_retries: parse_or(&lookup, "STRIPE_MAX_RETRIES", defaults.max_retries)?,
            base_delay_ms: parse_or(&lookup, "STRIPE_RETRY_BASE_MS", defaults.base_delay_ms)?,
        };

        let product_lookup = if parse_or(&lookup, "PRODUCT_LOOKUP_STRICT", false)? {
            ProductLookupPolicy::Strict
        } else {
            ProductLookupPolicy::Placeholder
        };

        Ok(Self {
            secret_key,
            customer_id,
            app_base_url,
            retry,
            product_lookup,
        })
    }

    /// Where Stripe sends the user back after leaving the portal
    pub fn portal_return_url(&self) -> String {
        format!("{}/subscription", self.app_base_url)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> BillingResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| BillingError::Configuration(format!("{} has an invalid value", key))),
        _ => Ok(default),
    }
}

/// Shared handle to the Stripe API
#[derive(Clone)]
pub struct StripeClient {
    inner: stripe::Client,
    config: Arc<StripeConfig>,
}

impl StripeClient {
    pub fn new(config: StripeConfig) -> Self {
        let inner = stripe::Client::new(config.secret_key.clone());
        Self {
            inner,
            config: Arc::new(config),
        }
    }

    pub fn from_env() -> BillingResult<Self> {
        Ok(Self::new(StripeConfig::from_env()?))
    }

    pub fn inner(&self) -> &stripe::Client {
        &self.inner
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }
}
