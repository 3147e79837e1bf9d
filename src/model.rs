//! Core data types for the catalog insights tools.
//!
//! This module defines the shared domain model imported by all other modules:
//! the grouped view-count structures built by the views pipeline, the flat
//! SKU records produced by the catalog collaborator, and the error types of
//! both. It performs no I/O.

use serde::Serialize;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Default column names
// ---------------------------------------------------------------------------

/// Header of the top-level grouping column (parent organization).
pub const COLUMN_GROUP: &str = "Parent org";

/// Header of the second-level grouping column (brand).
pub const COLUMN_SUBGROUP: &str = "Brand";

/// Header of the numeric measure column.
pub const COLUMN_MEASURE: &str = "Product View Count";

/// Placeholder rendered for SKU fields missing from the catalog record.
pub const NOT_AVAILABLE: &str = "N/A";

// ---------------------------------------------------------------------------
// Grouped measures
// ---------------------------------------------------------------------------

/// One top-level group and its accumulated subgroup measures, in the order
/// the subgroups first appeared in the input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupEntry {
    pub key: String,
    subgroups: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl GroupEntry {
    fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Self::default()
        }
    }

    /// Subgroups and their accumulated measures, in first-appearance order.
    pub fn subgroups(&self) -> &[(String, u64)] {
        &self.subgroups
    }

    /// Accumulated measure for a subgroup, if it has been seen.
    pub fn measure(&self, subgroup: &str) -> Option<u64> {
        self.index.get(subgroup).map(|&i| self.subgroups[i].1)
    }

    fn add(&mut self, subgroup: &str, measure: u64) {
        match self.index.get(subgroup) {
            Some(&i) => {
                let slot = &mut self.subgroups[i].1;
                *slot = slot.saturating_add(measure);
            }
            None => {
                self.index.insert(subgroup.to_string(), self.subgroups.len());
                self.subgroups.push((subgroup.to_string(), measure));
            }
        }
    }
}

/// Mapping group key → (subgroup key → accumulated measure).
///
/// Lookups fall back to a zero entry on first sight of a key. Iteration
/// follows first-appearance order, which is the tie-break order the
/// reporter's stable sorts preserve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedMeasures {
    groups: Vec<GroupEntry>,
    index: HashMap<String, usize>,
}

impl GroupedMeasures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `measure` to the (group, subgroup) pair, registering either key
    /// on first sight.
    pub fn add(&mut self, group: &str, subgroup: &str, measure: u64) {
        self.entry(group).add(subgroup, measure);
    }

    /// Registers a group without any subgroups. Existing groups are left
    /// untouched.
    pub fn insert_group(&mut self, group: &str) {
        self.entry(group);
    }

    fn entry(&mut self, group: &str) -> &mut GroupEntry {
        let i = match self.index.get(group) {
            Some(&i) => i,
            None => {
                self.index.insert(group.to_string(), self.groups.len());
                self.groups.push(GroupEntry::new(group));
                self.groups.len() - 1
            }
        };
        &mut self.groups[i]
    }

    pub fn get(&self, group: &str) -> Option<&GroupEntry> {
        self.index.get(group).map(|&i| &self.groups[i])
    }

    /// Accumulated measure for a (group, subgroup) pair, if present.
    pub fn measure(&self, group: &str, subgroup: &str) -> Option<u64> {
        self.get(group).and_then(|g| g.measure(subgroup))
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroupEntry> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Per-group totals derived from a [`GroupedMeasures`].
///
/// Built only by `views::aggregate::compute_totals`; entries keep the
/// iteration order of the mapping they were derived from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupTotals {
    entries: Vec<(String, u64)>,
}

impl GroupTotals {
    pub(crate) fn from_entries(entries: Vec<(String, u64)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, group: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(key, _)| key == group)
            .map(|(_, total)| *total)
    }

    pub fn entries(&self) -> &[(String, u64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Row counters collected while loading a views file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub rows_read: usize,
    pub rows_accumulated: usize,
    pub rows_skipped: usize,
}

// ---------------------------------------------------------------------------
// Catalog types
// ---------------------------------------------------------------------------

/// Flat field-set for a single sellable variant of a catalog product.
///
/// Serializes with the catalog's own field names so the JSON report mirrors
/// the upstream record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuDetails {
    pub sku_id: String,
    pub shade: String,
    pub offer_price: String,
    pub title: String,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Fatal errors raised while loading a views CSV file.
#[derive(Debug, PartialEq)]
pub enum LoadError {
    /// The input file does not exist.
    NotFound(String),
    /// The input file exists but could not be read.
    Io { path: String, message: String },
    /// A required column is absent from the header row.
    MissingColumn(String),
    /// The CSV structure itself is broken (ragged rows, bad quoting, bad UTF-8).
    Malformed { line: Option<u64>, message: String },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::NotFound(path) => write!(f, "Input file not found: {}", path),
            LoadError::Io { path, message } => write!(f, "Failed to read {}: {}", path, message),
            LoadError::MissingColumn(column) => {
                write!(f, "Header row is missing required column '{}'", column)
            }
            LoadError::Malformed { line: Some(line), message } => {
                write!(f, "Malformed CSV at line {}: {}", line, message)
            }
            LoadError::Malformed { line: None, message } => {
                write!(f, "Malformed CSV: {}", message)
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// Errors that can arise when fetching a product record from the catalog.
#[derive(Debug, PartialEq)]
pub enum CatalogError {
    /// Non-2xx HTTP response from the catalog API.
    HttpError(u16),
    /// The request never produced a response (DNS, connect, timeout).
    RequestFailed(String),
    /// The response body could not be decoded as JSON.
    ParseError(String),
    /// No record exists for the identifier in a replay directory.
    ProductNotFound(String),
    /// The caller supplied a blank product identifier.
    EmptyProductId,
    /// The configured base URL cannot be turned into a product URL.
    InvalidUrl(String),
    /// A replayed record exists but could not be read.
    ReadFailed(String),
    /// The id cannot name a record file (path separators, leading dot).
    InvalidProductId(String),
    /// A captured record could not be written.
    WriteFailed(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::HttpError(code) => write!(f, "HTTP error: {}", code),
            CatalogError::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
            CatalogError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            CatalogError::ProductNotFound(id) => write!(f, "No data for product: {}", id),
            CatalogError::EmptyProductId => write!(f, "Product id must not be empty"),
            CatalogError::InvalidUrl(msg) => write!(f, "Invalid catalog URL: {}", msg),
            CatalogError::ReadFailed(msg) => write!(f, "Read failed: {}", msg),
            CatalogError::InvalidProductId(id) => write!(f, "Invalid product id: {}", id),
            CatalogError::WriteFailed(msg) => write!(f, "Write failed: {}", msg),
        }
    }
}

impl std::error::Error for CatalogError {}
