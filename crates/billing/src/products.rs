//! Product display names for subscription line items

use std::collections::{HashMap, HashSet};

use futures::future::join_all;

use crate::error::BillingResult;
use crate::provider::{BillingProvider, ProviderSubscription};

/// Shown for a line item whose product could not be named
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

/// What to do when a single product lookup fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductLookupPolicy {
    /// Log it and show [`UNKNOWN_PRODUCT`] for that product
    #[default]
    Placeholder,
    /// Fail the whole query
    Strict,
}

/// Product id -> display name for one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductNames(HashMap<String, String>);

impl ProductNames {
    pub fn name_for(&self, product_id: Option<&str>) -> String {
        product_id
            .and_then(|id| self.0.get(id))
            .cloned()
            .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Unique product ids across every line item, in first-seen order
pub fn unique_product_ids(subscriptions: &[ProviderSubscription]) -> Vec<String> {
    let mut seen = HashSet::new();
    subscriptions
        .iter()
        .flat_map(|sub| sub.items.iter())
        .filter_map(|item| item.product_id.as_deref())
        .filter(|id| seen.insert(*id))
        .map(String::from)
        .collect()
}

/// Look up every referenced product once, concurrently
pub async fn resolve_product_names(
    provider: &dyn BillingProvider,
    subscriptions: &[ProviderSubscription],
    policy: ProductLookupPolicy,
) -> BillingResult<ProductNames> {
    let ids = unique_product_ids(subscriptions);
    if ids.is_empty() {
        return Ok(ProductNames::default());
    }

    let lookups = ids.iter().map(|id| provider.retrieve_product(id));
    let results = join_all(lookups).await;

    let mut names = HashMap::with_capacity(ids.len());
    for (id, result) in ids.into_iter().zip(results) {
        match result {
            Ok(product) => {
                let name = product
                    .name
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string());
                names.insert(id, name);
            }
            Err(e) if policy == ProductLookupPolicy::Placeholder => {
                tracing::warn!(
                    product_id = %id,
                    error = %e,
                    "Product lookup failed, using placeholder name"
                );
                names.insert(id, UNKNOWN_PRODUCT.to_string());
            }
            Err(e) => {
                tracing::error!(product_id = %id, error = %e, "Product lookup failed");
                return Err(e);
            }
        }
    }

    Ok(ProductNames(names))
}
