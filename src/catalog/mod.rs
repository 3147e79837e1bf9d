//! Product catalog collaborator.
//!
//! Fetches a product record by id and flattens its `skus` array into
//! [`SkuDetails`] field-sets. Two independent adapters implement the
//! fetch half of the contract:
//!
//! - `shopalyst` — the live catalog REST API over blocking HTTP.
//! - `replay`    — product documents captured to disk, for offline work.
//!
//! Failures never escape this module as errors: they are classified,
//! logged, and surfaced as [`Lookup::NoData`].

pub mod replay;
pub mod report;
pub mod shopalyst;

use serde_json::Value;

use crate::logging;
use crate::model::{CatalogError, NOT_AVAILABLE, SkuDetails};

/// Outcome of looking a product up, as reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The fetch failed or returned an empty record.
    NoData,
    /// The record exists but lists no SKUs.
    NoSkus,
    Skus(Vec<SkuDetails>),
}

/// A source of raw product records.
pub trait SkuSource {
    /// Short adapter name used in diagnostics.
    fn name(&self) -> &str;

    /// Retrieves the raw product document for `product_id`.
    fn fetch_product(&self, product_id: &str) -> Result<Value, CatalogError>;

    /// Fetches and flattens a product, folding every failure into
    /// [`Lookup::NoData`] after logging it.
    fn lookup(&self, product_id: &str) -> Lookup {
        let product_id = product_id.trim();
        let result = if product_id.is_empty() {
            Err(CatalogError::EmptyProductId)
        } else {
            self.fetch_product(product_id)
        };

        let product = match result {
            Ok(product) => product,
            Err(e) => {
                logging::log_catalog_failure(product_id, &format!("{} fetch", self.name()), &e);
                return Lookup::NoData;
            }
        };

        if is_empty_record(&product) {
            return Lookup::NoData;
        }

        let skus = extract_sku_details(&product);
        logging::debug(
            logging::Component::Catalog,
            Some(product_id),
            &format!("{} returned {} sku(s)", self.name(), skus.len()),
        );
        if skus.is_empty() {
            Lookup::NoSkus
        } else {
            Lookup::Skus(skus)
        }
    }

    /// Zero or more flattened SKUs; empty on any failure.
    fn fetch_skus(&self, product_id: &str) -> Vec<SkuDetails> {
        match self.lookup(product_id) {
            Lookup::Skus(skus) => skus,
            Lookup::NoData | Lookup::NoSkus => Vec::new(),
        }
    }
}

fn is_empty_record(product: &Value) -> bool {
    match product {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Renders one SKU attribute as text, `N/A` when missing or null.
///
/// Strings are taken verbatim; numbers and other JSON values use their
/// JSON text (`499`, `12.5`, `true`).
pub fn field_text(sku: &Value, key: &str) -> String {
    match sku.get(key) {
        None | Some(Value::Null) => NOT_AVAILABLE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Flattens the `skus` array of a product record. A record without a
/// `skus` array has no SKUs.
pub fn extract_sku_details(product: &Value) -> Vec<SkuDetails> {
    product
        .get("skus")
        .and_then(Value::as_array)
        .map(|skus| {
            skus.iter()
                .map(|sku| SkuDetails {
                    sku_id: field_text(sku, "skuId"),
                    shade: field_text(sku, "shade"),
                    offer_price: field_text(sku, "offerPrice"),
                    title: field_text(sku, "title"),
                })
                .collect()
        })
        .unwrap_or_default()
}
