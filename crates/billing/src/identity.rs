//! Caller identity
//!
//! The HTTP layer turns a verified bearer token into an [`IdentityContext`].
//! Billing queries only ever see the resolved [`Principal`].

use std::fmt;

use async_trait::async_trait;

use crate::error::{BillingError, BillingResult};

/// Identity claims attached to an inbound request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityContext {
    pub sub: Option<String>,
    pub email: Option<String>,
}

/// Authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal(String);

impl Principal {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the principal from the identity context, failing closed
pub fn resolve_principal(identity: &IdentityContext) -> BillingResult<Principal> {
    match identity.sub.as_deref().map(str::trim) {
        Some(sub) if !sub.is_empty() => Ok(Principal(sub.to_string())),
        _ => Err(BillingError::Unauthorized),
    }
}

/// Maps an authenticated principal to the provider's customer reference
#[async_trait]
pub trait CustomerResolver: Send + Sync {
    async fn customer_for(&self, principal: &Principal) -> BillingResult<String>;
}

/// Every principal maps to the one configured customer.
///
/// TODO: replace with a principal -> customer lookup table once accounts are
/// provisioned per user.
#[derive(Debug, Clone)]
pub struct FixedCustomer {
    customer_id: String,
}

impl FixedCustomer {
    pub fn new(customer_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
        }
    }
}

#[async_trait]
impl CustomerResolver for FixedCustomer {
    async fn customer_for(&self, principal: &Principal) -> BillingResult<String> {
        if self.customer_id.trim().is_empty() {
            return Err(BillingError::Configuration(
                "STRIPE_CUSTOMER_ID is not set".to_string(),
            ));
        }
        tracing::debug!(
            principal = %principal,
            customer_id = %self.customer_id,
            "Resolved customer from fixed mapping"
        );
        Ok(self.customer_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(sub: Option<&str>) -> IdentityContext {
        IdentityContext {
            sub: sub.map(String::from),
            email: Some("user@example.com".to_string()),
        }
    }

    #[test]
    fn test_resolve_principal() {
        let principal = resolve_principal(&identity(Some("user-123"))).unwrap();
        assert_eq!(principal.as_str(), "user-123");
    }

    #[test]
    fn test_missing_sub_is_unauthorized() {
        assert!(matches!(
            resolve_principal(&identity(None)),
            Err(BillingError::Unauthorized)
        ));
    }

    #[test]
    fn test_blank_sub_is_unauthorized() {
        assert!(matches!(
            resolve_principal(&identity(Some(""))),
            Err(BillingError::Unauthorized)
        ));
        assert!(matches!(
            resolve_principal(&identity(Some("   "))),
            Err(BillingError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_fixed_customer_ignores_principal() {
        let resolver = FixedCustomer::new("cus_fixed");
        let a = resolve_principal(&identity(Some("a"))).unwrap();
        let b = resolve_principal(&identity(Some("b"))).unwrap();
        assert_eq!(resolver.customer_for(&a).await.unwrap(), "cus_fixed");
        assert_eq!(resolver.customer_for(&b).await.unwrap(), "cus_fixed");
    }

    #[tokio::test]
    async fn test_empty_fixed_customer_is_configuration_error() {
        let resolver = FixedCustomer::new("");
        let principal = resolve_principal(&identity(Some("a"))).unwrap();
        assert!(matches!(
            resolver.customer_for(&principal).await,
            Err(BillingError::Configuration(_))
        ));
    }
}
