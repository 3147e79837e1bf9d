//! Shopalyst product catalog API client
//!
//! Retrieves product records (with their nested SKU list) from the
//! Shopalyst product knowledge graph service.
//!
//! Endpoint: GET {base_url}/{productId}
//! Default base: https://dev.shopalyst.com/shopalyst-service/v1/products

use reqwest::Url;
use serde_json::Value;
use std::time::Duration;

use super::SkuSource;
use crate::config::CatalogConfig;
use crate::model::CatalogError;

// ============================================================================
// URL construction and response parsing
// ============================================================================

/// Builds the product URL for `product_id` under `base_url`.
///
/// The id is appended as a single percent-encoded path segment, so ids
/// containing `/` or spaces cannot escape the products collection.
pub fn build_product_url(base_url: &str, product_id: &str) -> Result<Url, CatalogError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| CatalogError::InvalidUrl(format!("{}: {}", base_url, e)))?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| CatalogError::InvalidUrl(format!("{}: cannot be a base", base_url)))?;
        segments.pop_if_empty().push(product_id);
    }
    Ok(url)
}

/// Decodes a product response body.
pub fn parse_product_response(body: &str) -> Result<Value, CatalogError> {
    serde_json::from_str(body).map_err(|e| CatalogError::ParseError(e.to_string()))
}

// ============================================================================
// API client
// ============================================================================

pub struct ShopalystClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl ShopalystClient {
    /// Creates a client whose every request is bounded by `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        // Validate once up front so a bad base URL fails fast.
        build_product_url(base_url, "0")?;

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl SkuSource for ShopalystClient {
    fn name(&self) -> &str {
        "shopalyst"
    }

    fn fetch_product(&self, product_id: &str) -> Result<Value, CatalogError> {
        let url = build_product_url(&self.base_url, product_id)?;

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .map_err(|e| CatalogError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CatalogError::HttpError(response.status().as_u16()));
        }

        let body = response
            .text()
            .map_err(|e| CatalogError::RequestFailed(e.to_string()))?;
        parse_product_response(&body)
    }
}

// ============================================================================
// Tests
// ============================================================================
