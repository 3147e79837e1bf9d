//! Catalog insights: product view-count reporting and catalog SKU lookup.
//!
//! Modules:
//! - `model`   — shared types (grouped measures, SKU field-sets, errors).
//! - `views`   — CSV loader → per-org aggregator → sorted text report.
//! - `catalog` — product fetch adapters and SKU reports.
//! - `config`  — TOML + environment configuration.
//! - `logging` — component-tagged diagnostics on stderr and an optional log file.

pub mod catalog;
pub mod config;
pub mod logging;
pub mod model;
pub mod views;
