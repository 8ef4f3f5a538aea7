// Test file - these are expected patterns in test code
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

//! Edge Case Tests for the Billing Queries
//!
//! Tests boundary conditions across the whole query path:
//! - Identity (missing, blank principal)
//! - Money (zero, odd minor units, large totals)
//! - Dates (epoch zero, renewal only when active)
//! - Product resolution (many subscriptions sharing products)
//! - Fan-out failures (either read failing, strict product lookups)

#[cfg(test)]
mod identity_tests {
    use std::sync::Arc;

    use crate::identity::{FixedCustomer, IdentityContext};
    use crate::products::ProductLookupPolicy;
    use crate::testing::{line_item, subscription, StubProvider};
    use crate::{BillingError, BillingService};

    fn billing(provider: Arc<StubProvider>) -> BillingService {
        BillingService::with_provider(
            provider,
            Arc::new(FixedCustomer::new("cus_test")),
            ProductLookupPolicy::Placeholder,
            "http://localhost:5173/subscription",
        )
    }

    // =========================================================================
    // Email without a subject claim is still unauthenticated
    // =========================================================================
    #[tokio::test]
    async fn test_email_alone_is_not_a_principal() {
        let provider = Arc::new(
            StubProvider::new()
                .with_subscription(subscription("sub_1", "active", vec![line_item(None, 1, 1)]))
                .with_portal_url("https://billing.stripe.com/p"),
        );
        let identity = IdentityContext {
            sub: None,
            email: Some("user@example.com".to_string()),
        };

        let service = billing(provider.clone());
        assert!(matches!(
            service
                .subscriptions
                .get_subscription_status(&identity, Some("user@example.com"))
                .await,
            Err(BillingError::Unauthorized)
        ));
        assert!(matches!(
            service.portal.create_portal_link(&identity).await,
            Err(BillingError::Unauthorized)
        ));
        assert_eq!(provider.total_calls(), 0);
    }
}

#[cfg(test)]
mod amount_tests {
    use crate::format::minor_to_major;
    use crate::history::BillingHistoryRecord;
    use crate::products::ProductNames;
    use crate::subscriptions::subscription_view;
    use crate::testing::{invoice, line_item, subscription};

    #[test]
    fn test_single_cent() {
        assert_eq!(minor_to_major(1), 0.01);
    }

    #[test]
    fn test_large_invoice_total() {
        let record = BillingHistoryRecord::from(invoice("in_big", 123_456_789, "usd", 0));
        assert_eq!(record.amount, 1_234_567.89);
    }

    #[test]
    fn test_zero_priced_subscription() {
        let view = subscription_view(
            subscription("sub_free", "active", vec![line_item(Some("prod_free"), 0, 1)]),
            &ProductNames::default(),
        );
        assert_eq!(view.amount, 0.0);
    }

    #[test]
    fn test_refund_credit_total_stays_negative() {
        let record = BillingHistoryRecord::from(invoice("in_credit", -500, "gbp", 0));
        assert_eq!(record.amount, -5.0);
        assert_eq!(record.currency.as_deref(), Some("GBP"));
    }
}

#[cfg(test)]
mod date_tests {
    use crate::history::BillingHistoryRecord;
    use crate::products::ProductNames;
    use crate::subscriptions::subscription_view;
    use crate::testing::{invoice, line_item, subscription};

    #[test]
    fn test_epoch_zero_invoice() {
        let record = BillingHistoryRecord::from(invoice("in_0", 100, "usd", 0));
        assert_eq!(record.date.as_deref(), Some("1970-01-01T00:00:00.000Z"));
    }

    #[test]
    fn test_renewal_taken_from_first_item() {
        let view = subscription_view(
            subscription(
                "sub_1",
                "active",
                vec![
                    line_item(Some("prod_a"), 100, 1_700_000_000),
                    line_item(Some("prod_b"), 100, 1_800_000_000),
                ],
            ),
            &ProductNames::default(),
        );
        assert_eq!(view.renewal_date.as_deref(), Some("2023-11-14T22:13:20.000Z"));
    }

    #[test]
    fn test_unknown_future_status_is_representable() {
        let view = subscription_view(
            subscription("sub_1", "some_new_state", vec![line_item(None, 100, 1_700_000_000)]),
            &ProductNames::default(),
        );
        assert_eq!(view.status, "some_new_state");
        assert!(view.renewal_date.is_none());
    }
}

#[cfg(test)]
mod fan_out_tests {
    use std::sync::Arc;

    use crate::identity::{FixedCustomer, IdentityContext};
    use crate::products::{ProductLookupPolicy, UNKNOWN_PRODUCT};
    use crate::subscriptions::SubscriptionService;
    use crate::testing::{invoice, line_item, subscription, StubProvider};
    use crate::{BillingError, INVOICE_HISTORY_LIMIT};

    fn signed_in() -> IdentityContext {
        IdentityContext {
            sub: Some("user-1".to_string()),
            email: None,
        }
    }

    fn service(provider: Arc<StubProvider>, policy: ProductLookupPolicy) -> SubscriptionService {
        SubscriptionService::new(provider, Arc::new(FixedCustomer::new("cus_test")), policy)
    }

    // =========================================================================
    // Ten subscriptions over three products: exactly three lookups
    // =========================================================================
    #[tokio::test]
    async fn test_many_subscriptions_few_products() {
        let products = ["prod_a", "prod_b", "prod_c"];
        let mut provider = StubProvider::new()
            .with_product("prod_a", "A")
            .with_product("prod_b", "B")
            .with_product("prod_c", "C");
        for i in 0..10 {
            provider = provider.with_subscription(subscription(
                &format!("sub_{}", i),
                "active",
                vec![line_item(Some(products[i % 3]), 100, 1_700_000_000)],
            ));
        }
        let provider = Arc::new(provider);

        let response = service(provider.clone(), ProductLookupPolicy::Strict)
            .get_subscription_status(&signed_in(), None)
            .await
            .unwrap();

        assert_eq!(response.subscriptions.len(), 10);
        assert_eq!(provider.total_product_lookups(), 3);
        for id in products {
            assert_eq!(provider.product_lookups(id), 1);
        }
    }

    // =========================================================================
    // History is capped at the page size even if the provider has more
    // =========================================================================
    #[tokio::test]
    async fn test_history_capped_at_limit() {
        let mut provider = StubProvider::new();
        for i in 0..20 {
            provider = provider.with_invoice(invoice(&format!("in_{}", i), 100, "usd", 1_690_000_000 + i));
        }
        let provider = Arc::new(provider);

        let response = service(provider, ProductLookupPolicy::Placeholder)
            .get_subscription_status(&signed_in(), None)
            .await
            .unwrap();

        assert_eq!(response.billing_history.len(), INVOICE_HISTORY_LIMIT as usize);
    }

    // =========================================================================
    // Placeholder policy degrades one product, keeps the rest of the payload
    // =========================================================================
    #[tokio::test]
    async fn test_missing_product_degrades_to_placeholder() {
        let provider = Arc::new(
            StubProvider::new()
                .with_product("prod_a", "A")
                .with_subscription(subscription(
                    "sub_1",
                    "active",
                    vec![line_item(Some("prod_a"), 100, 1), line_item(Some("prod_missing"), 100, 1)],
                ))
                .with_invoice(invoice("in_1", 100, "usd", 1)),
        );

        let response = service(provider, ProductLookupPolicy::Placeholder)
            .get_subscription_status(&signed_in(), None)
            .await
            .unwrap();

        assert_eq!(response.subscriptions[0].items, vec!["A", UNKNOWN_PRODUCT]);
        assert_eq!(response.billing_history.len(), 1);
    }

    // =========================================================================
    // Strict policy turns a missing product into a failed request
    // =========================================================================
    #[tokio::test]
    async fn test_missing_product_fails_strict_request() {
        let provider = Arc::new(StubProvider::new().with_subscription(subscription(
            "sub_1",
            "active",
            vec![line_item(Some("prod_missing"), 100, 1)],
        )));

        let err = service(provider, ProductLookupPolicy::Strict)
            .get_subscription_status(&signed_in(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, BillingError::UpstreamProvider(ref m) if m.contains("prod_missing")));
    }

    // =========================================================================
    // Both reads failing surfaces a single error
    // =========================================================================
    #[tokio::test]
    async fn test_both_reads_failing() {
        let provider = Arc::new(
            StubProvider::new()
                .failing_subscriptions("subscriptions down")
                .failing_invoices("invoices down"),
        );

        let err = service(provider, ProductLookupPolicy::Placeholder)
            .get_subscription_status(&signed_in(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, BillingError::UpstreamProvider(ref m) if m == "subscriptions down"));
    }
}
