//! Replay of captured product records
//!
//! When the live catalog is unreachable (offline development, demos,
//! tests), product documents previously saved as `<dir>/<productId>.json`
//! stand in for API responses.

use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};

use super::SkuSource;
use super::shopalyst::parse_product_response;
use crate::logging::{self, Component};
use crate::model::CatalogError;

pub struct ReplaySource {
    dir: PathBuf,
}

impl ReplaySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of the captured record for `product_id`, or `None` when the
    /// id could name a file outside the replay directory.
    pub fn record_path(&self, product_id: &str) -> Option<PathBuf> {
        let escapes = product_id.is_empty()
            || product_id.starts_with('.')
            || product_id.contains(['/', '\\']);
        if escapes {
            None
        } else {
            Some(self.dir.join(format!("{}.json", product_id)))
        }
    }

    /// Saves a product document so later runs can replay it.
    pub fn capture(&self, product_id: &str, product: &Value) -> Result<PathBuf, CatalogError> {
        let path = self
            .record_path(product_id)
            .ok_or_else(|| CatalogError::InvalidProductId(product_id.to_string()))?;
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| CatalogError::WriteFailed(format!("{}: {}", self.dir.display(), e)))?;
        let body = serde_json::to_string_pretty(product)
            .map_err(|e| CatalogError::ParseError(e.to_string()))?;
        std::fs::write(&path, body)
            .map_err(|e| CatalogError::WriteFailed(format!("{}: {}", path.display(), e)))?;
        Ok(path)
    }
}

impl SkuSource for ReplaySource {
    fn name(&self) -> &str {
        "replay"
    }

    fn fetch_product(&self, product_id: &str) -> Result<Value, CatalogError> {
        let path = self
            .record_path(product_id)
            .ok_or_else(|| CatalogError::InvalidProductId(product_id.to_string()))?;

        let body = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => CatalogError::ProductNotFound(product_id.to_string()),
            _ => CatalogError::ReadFailed(format!("{}: {}", path.display(), e)),
        })?;
        parse_product_response(&body)
    }
}

/// Wraps another source and saves every record it fetches for later replay.
pub struct CapturingSource<S> {
    inner: S,
    replay: ReplaySource,
}

impl<S: SkuSource> CapturingSource<S> {
    pub fn new(inner: S, capture_dir: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            replay: ReplaySource::new(capture_dir),
        }
    }
}

impl<S: SkuSource> SkuSource for CapturingSource<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn fetch_product(&self, product_id: &str) -> Result<Value, CatalogError> {
        let product = self.inner.fetch_product(product_id)?;
        match self.replay.capture(product_id, &product) {
            Ok(path) => logging::debug(
                Component::Catalog,
                Some(product_id),
                &format!("captured record to {}", path.display()),
            ),
            Err(e) => logging::warn(
                Component::Catalog,
                Some(product_id),
                &format!("capture failed: {}", e),
            ),
        }
        Ok(product)
    }
}
