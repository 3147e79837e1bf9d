//! Structured logging for the catalog insights tools
//!
//! Provides context-rich diagnostics tagged with the emitting component and
//! an optional subject (file path, product id), with severity levels.
//! Console output always goes to stderr so that stdout carries only the
//! report; an optional append-only log file receives timestamped entries.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::str::FromStr;
use std::sync::Mutex;

use crate::model::CatalogError;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    Views,
    Catalog,
    Config,
    System,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Views => write!(f, "VIEWS"),
            Component::Catalog => write!(f, "CATALOG"),
            Component::Config => write!(f, "CONFIG"),
            Component::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - the product simply has no record
    Expected,
    /// Unexpected failure - indicates service degradation or an API change
    Unexpected,
    /// Unknown - cannot determine if this is expected or not
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    fn log(&self, level: LogLevel, component: &Component, subject: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let subject_part = subject.map(|s| format!(" [{}]", s)).unwrap_or_default();
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let log_entry = format!(
            "{} {} {}{}: {}",
            timestamp, level, component, subject_part, message
        );

        if self.console_timestamps {
            eprintln!("{}", log_entry);
        } else {
            match level {
                LogLevel::Error => eprintln!("✗ {}{}: {}", component, subject_part, message),
                LogLevel::Warning => eprintln!("⚠ {}{}: {}", component, subject_part, message),
                LogLevel::Info => eprintln!("  {}", message),
                LogLevel::Debug => eprintln!("  [DEBUG] {}{}: {}", component, subject_part, message),
            }
        }

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize (or reconfigure) the global logger.
///
/// Until this is called every logging function is a no-op, which keeps
/// library callers and unit tests silent by default.
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    let logger = Logger {
        min_level,
        log_file: log_file.map(String::from),
        console_timestamps,
    };
    if let Ok(mut slot) = LOGGER.lock() {
        *slot = Some(logger);
    }
}

fn dispatch(level: LogLevel, component: Component, subject: Option<&str>, message: &str) {
    if let Ok(slot) = LOGGER.lock() {
        if let Some(logger) = slot.as_ref() {
            logger.log(level, &component, subject, message);
        }
    }
}

/// Log a general informational message
pub fn info(component: Component, subject: Option<&str>, message: &str) {
    dispatch(LogLevel::Info, component, subject, message);
}

/// Log a warning message
pub fn warn(component: Component, subject: Option<&str>, message: &str) {
    dispatch(LogLevel::Warning, component, subject, message);
}

/// Log an error message
pub fn error(component: Component, subject: Option<&str>, message: &str) {
    dispatch(LogLevel::Error, component, subject, message);
}

/// Log a debug message
pub fn debug(component: Component, subject: Option<&str>, message: &str) {
    dispatch(LogLevel::Debug, component, subject, message);
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify a catalog fetch failure
pub fn classify_catalog_failure(err: &CatalogError) -> FailureType {
    match err {
        // Unknown or malformed ids are a normal outcome of user input
        CatalogError::HttpError(404)
        | CatalogError::ProductNotFound(_)
        | CatalogError::InvalidProductId(_)
        | CatalogError::EmptyProductId => FailureType::Expected,
        CatalogError::HttpError(_) | CatalogError::ParseError(_) | CatalogError::InvalidUrl(_) => {
            FailureType::Unexpected
        }
        CatalogError::RequestFailed(_) | CatalogError::ReadFailed(_) | CatalogError::WriteFailed(_) => {
            FailureType::Unknown
        }
    }
}

/// Log a catalog failure with automatic classification
pub fn log_catalog_failure(product_id: &str, operation: &str, err: &CatalogError) {
    let failure_type = classify_catalog_failure(err);

    let message = format!("{} failed [{}]: {}", operation, failure_type, err);

    match failure_type {
        FailureType::Expected => debug(Component::Catalog, Some(product_id), &message),
        FailureType::Unexpected => error(Component::Catalog, Some(product_id), &message),
        FailureType::Unknown => warn(Component::Catalog, Some(product_id), &message),
    }
}

// ---------------------------------------------------------------------------
// Load Summary Logging
// ---------------------------------------------------------------------------

/// Log a summary of a views file load
pub fn log_load_summary(path: &str, total: usize, accumulated: usize, skipped: usize) {
    let message = format!(
        "Load complete: {}/{} rows accumulated, {} skipped",
        accumulated, total, skipped
    );

    if skipped == 0 {
        info(Component::Views, Some(path), &message);
    } else if accumulated == 0 {
        error(Component::Views, Some(path), &message);
    } else {
        warn(Component::Views, Some(path), &message);
    }
}
