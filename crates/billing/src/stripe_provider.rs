//! [`BillingProvider`] backed by the Stripe API

use async_trait::async_trait;
use stripe::{
    BillingPortalSession, CreateBillingPortalSession, CustomerId, Expandable, Invoice,
    ListInvoices, ListSubscriptions, Product, ProductId, StripeError, Subscription,
    SubscriptionId, SubscriptionStatusFilter,
};

use crate::client::StripeClient;
use crate::error::{BillingError, BillingResult};
use crate::provider::{
    BillingProvider, ProviderInvoice, ProviderLineItem, ProviderProduct, ProviderSubscription,
};

/// Stripe caps list pages at 100
const SUBSCRIPTION_PAGE_LIMIT: u64 = 100;

/// Network trouble, timeouts, rate limits and 5xx are worth another attempt
pub(crate) fn is_transient(err: &StripeError) -> bool {
    match err {
        StripeError::Stripe(request_error) => {
            request_error.http_status == 429 || request_error.http_status >= 500
        }
        StripeError::ClientError(_) | StripeError::Timeout => true,
        _ => false,
    }
}

fn parse_customer_id(customer_id: &str) -> BillingResult<CustomerId> {
    customer_id
        .parse::<CustomerId>()
        .map_err(|e| BillingError::Configuration(format!("Invalid customer ID: {}", e)))
}

fn subscription_record(subscription: Subscription) -> ProviderSubscription {
    // The pinned API version reports the billing period on the subscription,
    // so every item shares it.
    let period_end = subscription.current_period_end;

    let items = subscription
        .items
        .data
        .into_iter()
        .map(|item| {
            let price = item.price.as_ref();
            ProviderLineItem {
                product_id: price.and_then(|p| p.product.as_ref()).map(|product| {
                    match product {
                        Expandable::Id(id) => id.to_string(),
                        Expandable::Object(product) => product.id.to_string(),
                    }
                }),
                unit_amount: price.and_then(|p| p.unit_amount),
                current_period_end: Some(period_end),
            }
        })
        .collect();

    ProviderSubscription {
        id: subscription.id.to_string(),
        status: subscription.status.as_str().to_string(),
        currency: subscription.currency.to_string(),
        items,
    }
}

fn invoice_record(invoice: Invoice) -> ProviderInvoice {
    ProviderInvoice {
        id: invoice.id.to_string(),
        number: invoice.number,
        created: invoice.created,
        total: invoice.total,
        currency: invoice.currency.map(|c| c.to_string()),
        status: invoice.status.map(|s| s.as_str().to_string()),
        hosted_invoice_url: invoice.hosted_invoice_url,
        invoice_pdf: invoice.invoice_pdf,
    }
}

#[async_trait]
impl BillingProvider for StripeClient {
    async fn list_subscriptions(
        &self,
        customer_id: &str,
    ) -> BillingResult<Vec<ProviderSubscription>> {
        let customer = &parse_customer_id(customer_id)?;
        let client = self.inner();

        let mut records = Vec::new();
        let mut starting_after: Option<SubscriptionId> = None;
        let mut pages = 0usize;

        loop {
            let cursor = starting_after.as_ref();
            let page = self
                .config()
                .retry
                .run(
                    "list_subscriptions",
                    move || {
                        let params = ListSubscriptions {
                            customer: Some(customer.clone()),
                            status: Some(SubscriptionStatusFilter::All),
                            limit: Some(SUBSCRIPTION_PAGE_LIMIT),
                            starting_after: cursor.cloned(),
                            ..Default::default()
                        };
                        async move { Subscription::list(client, &params).await }
                    },
                    is_transient,
                )
                .await?;
            pages += 1;

            let last_id = page.data.last().map(|sub| sub.id.clone());
            records.extend(page.data.into_iter().map(subscription_record));

            match last_id {
                Some(id) if page.has_more => starting_after = Some(id),
                _ => break,
            }
        }

        tracing::debug!(
            count = records.len(),
            pages,
            "Fetched subscriptions from Stripe"
        );

        Ok(records)
    }

    async fn list_invoices(
        &self,
        customer_id: &str,
        limit: u64,
    ) -> BillingResult<Vec<ProviderInvoice>> {
        let customer = &parse_customer_id(customer_id)?;
        let client = self.inner();

        let invoices = self
            .config()
            .retry
            .run(
                "list_invoices",
                move || {
                    let params = ListInvoices {
                        customer: Some(customer.clone()),
                        limit: Some(limit),
                        ..Default::default()
                    };
                    async move { Invoice::list(client, &params).await }
                },
                is_transient,
            )
            .await?;

        tracing::debug!(count = invoices.data.len(), "Fetched invoices from Stripe");

        Ok(invoices.data.into_iter().map(invoice_record).collect())
    }

    async fn retrieve_product(&self, product_id: &str) -> BillingResult<ProviderProduct> {
        let id = &product_id
            .parse::<ProductId>()
            .map_err(|e| BillingError::UpstreamProvider(format!("Invalid product ID: {}", e)))?;
        let client = self.inner();

        let product = self
            .config()
            .retry
            .run(
                "retrieve_product",
                move || async move { Product::retrieve(client, id, &[]).await },
                is_transient,
            )
            .await?;

        Ok(ProviderProduct {
            id: product.id.to_string(),
            name: product.name,
        })
    }

    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> BillingResult<String> {
        let customer = parse_customer_id(customer_id)?;

        let mut params = CreateBillingPortalSession::new(customer);
        params.return_url = Some(return_url);

        // Session creation is not idempotent, so it is never retried
        let session = BillingPortalSession::create(self.inner(), params).await?;

        tracing::info!(customer_id = %session.customer, "Created billing portal session");

        Ok(session.url)
    }
}
