//! Billing error types

use serde::{Deserialize, Serialize};

/// Fallback message for the subscription query when a failure carries no text
pub const SUBSCRIPTION_FALLBACK_MESSAGE: &str = "Failed to fetch subscription status";

/// Fallback message for the billing portal query when a failure carries no text
pub const PORTAL_FALLBACK_MESSAGE: &str = "Failed to open billing portal";

/// Result alias used across the billing crate
pub type BillingResult<T> = Result<T, BillingError>;

/// Every way a billing query can fail
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    /// No principal in the identity context. The provider is never called.
    #[error("Unauthorized: No user identity found")]
    Unauthorized,

    /// A credential or the customer mapping is missing from the environment
    #[error("Billing is not configured: {0}")]
    Configuration(String),

    /// Stripe rejected the call or could not be reached
    #[error("{0}")]
    UpstreamProvider(String),

    /// The provider answered but a field we depend on was absent
    #[error("Missing billing data: {0}")]
    MissingData(String),
}

/// Machine-readable error category carried in every error response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Unauthorized,
    Configuration,
    UpstreamProvider,
    MissingData,
    BadRequest,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Unauthorized => write!(f, "unauthorized"),
            ErrorKind::Configuration => write!(f, "configuration"),
            ErrorKind::UpstreamProvider => write!(f, "upstream_provider"),
            ErrorKind::MissingData => write!(f, "missing_data"),
            ErrorKind::BadRequest => write!(f, "bad_request"),
        }
    }
}

impl BillingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BillingError::Unauthorized => ErrorKind::Unauthorized,
            BillingError::Configuration(_) => ErrorKind::Configuration,
            BillingError::UpstreamProvider(_) => ErrorKind::UpstreamProvider,
            BillingError::MissingData(_) => ErrorKind::MissingData,
        }
    }

    /// Message shown to the caller, falling back to `fallback` when the
    /// underlying error carries no detail of its own
    pub fn user_message(&self, fallback: &str) -> String {
        let detail = match self {
            BillingError::Unauthorized => return self.to_string(),
            BillingError::Configuration(detail)
            | BillingError::UpstreamProvider(detail)
            | BillingError::MissingData(detail) => detail,
        };
        if detail.trim().is_empty() {
            fallback.to_string()
        } else {
            self.to_string()
        }
    }
}

impl From<stripe::StripeError> for BillingError {
    fn from(err: stripe::StripeError) -> Self {
        match err {
            stripe::StripeError::Stripe(request_error) => BillingError::UpstreamProvider(
                request_error
                    .message
                    .unwrap_or_else(|| format!("Stripe returned HTTP {}", request_error.http_status)),
            ),
            other => BillingError::UpstreamProvider(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_cover_every_variant() {
        assert_eq!(BillingError::Unauthorized.kind(), ErrorKind::Unauthorized);
        assert_eq!(
            BillingError::Configuration("STRIPE_SECRET_KEY".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            BillingError::UpstreamProvider("boom".into()).kind(),
            ErrorKind::UpstreamProvider
        );
        assert_eq!(
            BillingError::MissingData("url".into()).kind(),
            ErrorKind::MissingData
        );
    }

    #[test]
    fn test_user_message_uses_fallback_for_empty_upstream_message() {
        let err = BillingError::UpstreamProvider(String::new());
        assert_eq!(
            err.user_message(SUBSCRIPTION_FALLBACK_MESSAGE),
            SUBSCRIPTION_FALLBACK_MESSAGE
        );

        let err = BillingError::UpstreamProvider("No such customer: 'cus_123'".into());
        assert_eq!(
            err.user_message(SUBSCRIPTION_FALLBACK_MESSAGE),
            "No such customer: 'cus_123'"
        );
    }

    #[test]
    fn test_user_message_falls_back_for_every_empty_detail() {
        for err in [
            BillingError::Configuration(String::new()),
            BillingError::MissingData("  ".into()),
            BillingError::UpstreamProvider(String::new()),
        ] {
            assert_eq!(err.user_message(PORTAL_FALLBACK_MESSAGE), PORTAL_FALLBACK_MESSAGE);
        }

        let err = BillingError::MissingData("No portal URL returned".into());
        assert_eq!(
            err.user_message(PORTAL_FALLBACK_MESSAGE),
            "Missing billing data: No portal URL returned"
        );
        assert_eq!(
            BillingError::Unauthorized.user_message(PORTAL_FALLBACK_MESSAGE),
            "Unauthorized: No user identity found"
        );
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::UpstreamProvider).unwrap();
        assert_eq!(json, "\"upstream_provider\"");
        assert_eq!(ErrorKind::MissingData.to_string(), "missing_data");
    }

    #[test]
    fn test_timeout_maps_to_upstream() {
        let err: BillingError = stripe::StripeError::Timeout.into();
        assert_eq!(err.kind(), ErrorKind::UpstreamProvider);
        assert!(err.to_string().contains("timeout"));
    }
}
