//! In-memory provider for tests

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{BillingError, BillingResult};
use crate::provider::{
    BillingProvider, ProviderInvoice, ProviderLineItem, ProviderProduct, ProviderSubscription,
};

pub fn line_item(product_id: Option<&str>, unit_amount: i64, period_end: i64) -> ProviderLineItem {
    ProviderLineItem {
        product_id: product_id.map(String::from),
        unit_amount: Some(unit_amount),
        current_period_end: Some(period_end),
    }
}

pub fn subscription(id: &str, status: &str, items: Vec<ProviderLineItem>) -> ProviderSubscription {
    ProviderSubscription {
        id: id.to_string(),
        status: status.to_string(),
        currency: "usd".to_string(),
        items,
    }
}

pub fn invoice(id: &str, total: i64, currency: &str, created: i64) -> ProviderInvoice {
    ProviderInvoice {
        id: id.to_string(),
        number: Some(format!("INV-{}", id.trim_start_matches("in_"))),
        created: Some(created),
        total: Some(total),
        currency: Some(currency.to_string()),
        status: Some("paid".to_string()),
        hosted_invoice_url: Some(format!("https://invoice.stripe.com/i/{}", id)),
        invoice_pdf: Some(format!("https://pay.stripe.com/invoice/{}/pdf", id)),
    }
}

/// Canned [`BillingProvider`] that counts every call it receives
#[derive(Default)]
pub struct StubProvider {
    subscriptions: Vec<ProviderSubscription>,
    invoices: Vec<ProviderInvoice>,
    products: HashMap<String, ProviderProduct>,
    portal_url: Option<String>,
    subscriptions_error: Option<String>,
    invoices_error: Option<String>,
    calls: AtomicUsize,
    product_calls: Mutex<HashMap<String, usize>>,
    invoice_limits: Mutex<Vec<u64>>,
    portal_requests: Mutex<Vec<(String, String)>>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subscription(mut self, subscription: ProviderSubscription) -> Self {
        self.subscriptions.push(subscription);
        self
    }

    pub fn with_invoice(mut self, invoice: ProviderInvoice) -> Self {
        self.invoices.push(invoice);
        self
    }

    pub fn with_product(mut self, id: &str, name: &str) -> Self {
        self.products.insert(
            id.to_string(),
            ProviderProduct {
                id: id.to_string(),
                name: Some(name.to_string()),
            },
        );
        self
    }

    pub fn with_unnamed_product(mut self, id: &str) -> Self {
        self.products.insert(
            id.to_string(),
            ProviderProduct {
                id: id.to_string(),
                name: None,
            },
        );
        self
    }

    pub fn with_portal_url(mut self, url: &str) -> Self {
        self.portal_url = Some(url.to_string());
        self
    }

    pub fn failing_subscriptions(mut self, message: &str) -> Self {
        self.subscriptions_error = Some(message.to_string());
        self
    }

    pub fn failing_invoices(mut self, message: &str) -> Self {
        self.invoices_error = Some(message.to_string());
        self
    }

    /// Every provider call of any kind
    pub fn total_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn product_lookups(&self, id: &str) -> usize {
        self.product_calls.lock().unwrap().get(id).copied().unwrap_or(0)
    }

    pub fn total_product_lookups(&self) -> usize {
        self.product_calls.lock().unwrap().values().sum()
    }

    pub fn invoice_limits(&self) -> Vec<u64> {
        self.invoice_limits.lock().unwrap().clone()
    }

    /// `(customer_id, return_url)` for every portal session request
    pub fn portal_requests(&self) -> Vec<(String, String)> {
        self.portal_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl BillingProvider for StubProvider {
    async fn list_subscriptions(
        &self,
        _customer_id: &str,
    ) -> BillingResult<Vec<ProviderSubscription>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.subscriptions_error {
            Some(message) => Err(BillingError::UpstreamProvider(message.clone())),
            None => Ok(self.subscriptions.clone()),
        }
    }

    async fn list_invoices(
        &self,
        _customer_id: &str,
        limit: u64,
    ) -> BillingResult<Vec<ProviderInvoice>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.invoice_limits.lock().unwrap().push(limit);
        match &self.invoices_error {
            Some(message) => Err(BillingError::UpstreamProvider(message.clone())),
            None => Ok(self.invoices.iter().take(limit as usize).cloned().collect()),
        }
    }

    async fn retrieve_product(&self, product_id: &str) -> BillingResult<ProviderProduct> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .product_calls
            .lock()
            .unwrap()
            .entry(product_id.to_string())
            .or_insert(0) += 1;
        self.products.get(product_id).cloned().ok_or_else(|| {
            BillingError::UpstreamProvider(format!("No such product: '{}'", product_id))
        })
    }

    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> BillingResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.portal_requests
            .lock()
            .unwrap()
            .push((customer_id.to_string(), return_url.to_string()));
        Ok(self.portal_url.clone().unwrap_or_default())
    }
}
