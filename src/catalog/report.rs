//! Rendering of flattened SKUs.
//!
//! Two output schemas share the same [`SkuDetails`] field-set:
//!
//! - `text` — one block per SKU between dashed separators, numbered from 1.
//! - `json` — a pretty-printed array of `{skuId, shade, offerPrice, title}`.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use super::Lookup;
use crate::model::SkuDetails;

pub const SEPARATOR: &str = "--------------------------";
pub const NO_PRODUCT_DATA: &str = "No product data available.";
pub const NO_SKUS: &str = "No SKUs found for the given product.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{}' (expected text or json)", other)),
        }
    }
}

/// Writes the numbered block report.
pub fn write_sku_text<W: Write>(skus: &[SkuDetails], out: &mut W) -> io::Result<()> {
    for (index, sku) in skus.iter().enumerate() {
        writeln!(out, "{}", SEPARATOR)?;
        writeln!(out, "Product {}", index + 1)?;
        writeln!(out, "skuId : {}", sku.sku_id)?;
        writeln!(out, "shade : {}", sku.shade)?;
        writeln!(out, "offerPrice : {}", sku.offer_price)?;
        writeln!(out, "title : {}", sku.title)?;
    }
    writeln!(out, "{}", SEPARATOR)
}

/// Writes the SKUs as a pretty-printed JSON array followed by a newline.
pub fn write_sku_json<W: Write>(skus: &[SkuDetails], out: &mut W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, skus)?;
    writeln!(out)
}

/// Writes a lookup outcome in the requested format. "No data" outcomes are
/// plain messages in either format.
pub fn write_lookup<W: Write>(lookup: &Lookup, format: OutputFormat, out: &mut W) -> io::Result<()> {
    match lookup {
        Lookup::NoData => writeln!(out, "{}", NO_PRODUCT_DATA),
        Lookup::NoSkus => writeln!(out, "{}", NO_SKUS),
        Lookup::Skus(skus) => match format {
            OutputFormat::Text => write_sku_text(skus, out),
            OutputFormat::Json => write_sku_json(skus, out),
        },
    }
}
