//! Billing history (recent invoices)

use serde::{Deserialize, Serialize};

use crate::format::{display_currency, epoch_to_iso, minor_to_major};
use crate::provider::ProviderInvoice;

/// One row of the billing history table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingHistoryRecord {
    pub id: String,
    pub number: Option<String>,
    /// ISO-8601 creation time
    pub date: Option<String>,
    /// Total in major currency units
    pub amount: f64,
    /// Upper-cased; `None` when the provider omitted it
    pub currency: Option<String>,
    pub status: Option<String>,
    /// Hosted receipt page
    pub receipt_url: Option<String>,
    /// Downloadable PDF
    pub pdf_url: Option<String>,
}

impl From<ProviderInvoice> for BillingHistoryRecord {
    fn from(invoice: ProviderInvoice) -> Self {
        Self {
            date: invoice.created.and_then(epoch_to_iso),
            amount: minor_to_major(invoice.total.unwrap_or(0)),
            currency: invoice.currency.as_deref().map(display_currency),
            id: invoice.id,
            number: invoice.number,
            status: invoice.status,
            receipt_url: invoice.hosted_invoice_url,
            pdf_url: invoice.invoice_pdf,
        }
    }
}

/// Reshape provider invoices, keeping provider order (newest first)
pub fn billing_history(invoices: Vec<ProviderInvoice>) -> Vec<BillingHistoryRecord> {
    invoices.into_iter().map(BillingHistoryRecord::from).collect()
}
