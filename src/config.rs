//! Runtime configuration.
//!
//! Settings come from three layers, later layers winning:
//!   1. built-in defaults,
//!   2. an optional TOML file (`catalog_insights.toml` or `--config <path>`),
//!   3. environment variables (a `.env` file is honoured).
//!
//! Command line flags are applied on top by the binary.

use serde::Deserialize;
use std::fmt;
use std::path::Path;

use crate::logging::{self, Component, LogLevel};
use crate::model::{COLUMN_GROUP, COLUMN_MEASURE, COLUMN_SUBGROUP};

/// Config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "catalog_insights.toml";

/// Product endpoint of the catalog service; the product id is appended.
pub const DEFAULT_CATALOG_URL: &str = "https://dev.shopalyst.com/shopalyst-service/v1/products";

pub const ENV_CATALOG_URL: &str = "CATALOG_API_URL";
pub const ENV_CATALOG_TIMEOUT: &str = "CATALOG_TIMEOUT_SECS";
pub const ENV_LOG_LEVEL: &str = "CATALOG_LOG_LEVEL";

// ---------------------------------------------------------------------------
// Config sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub views: ViewsConfig,
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

/// Input location and column names for the views report.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewsConfig {
    pub csv_path: String,
    pub group_column: String,
    pub subgroup_column: String,
    pub measure_column: String,
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            csv_path: "product_views.csv".to_string(),
            group_column: COLUMN_GROUP.to_string(),
            subgroup_column: COLUMN_SUBGROUP.to_string(),
            measure_column: COLUMN_MEASURE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// When set, product records are replayed from `<dir>/<productId>.json`
    /// instead of being fetched over HTTP.
    pub replay_dir: Option<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_URL.to_string(),
            timeout_secs: 10,
            replay_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub log_file: Option<String>,
    pub console_timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_file: None,
            console_timestamps: false,
        }
    }
}

impl LoggingConfig {
    pub fn min_level(&self) -> Result<LogLevel, ConfigError> {
        self.level
            .parse()
            .map_err(|e: String| ConfigError::Invalid(format!("logging.level: {}", e)))
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    Read { path: String, message: String },
    /// The config file is not valid TOML or has unknown keys.
    Parse { path: String, message: String },
    /// A value is syntactically valid but unusable.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, message } => {
                write!(f, "Failed to read config {}: {}", path, message)
            }
            ConfigError::Parse { path, message } => {
                write!(f, "Invalid config {}: {}", path, message)
            }
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parses a TOML document into an [`AppConfig`]; `origin` names the source
/// in error messages.
pub fn parse_config(contents: &str, origin: &str) -> Result<AppConfig, ConfigError> {
    toml::from_str(contents).map_err(|e| ConfigError::Parse {
        path: origin.to_string(),
        message: e.to_string(),
    })
}

/// Loads configuration from `path`, or from [`DEFAULT_CONFIG_FILE`] when it
/// exists. An explicitly named file must exist; the default one is optional.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let (path, required) = match path {
        Some(p) => (p, true),
        None => (Path::new(DEFAULT_CONFIG_FILE), false),
    };
    let display = path.display().to_string();

    let mut config = if path.exists() {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: display.clone(),
            message: e.to_string(),
        })?;
        let config = parse_config(&contents, &display)?;
        logging::debug(Component::Config, Some(&display), "loaded config file");
        config
    } else if required {
        return Err(ConfigError::Read {
            path: display,
            message: "file does not exist".to_string(),
        });
    } else {
        logging::debug(Component::Config, None, "no config file, using defaults");
        AppConfig::default()
    };

    if let Ok(env_file) = dotenv::dotenv() {
        logging::debug(
            Component::Config,
            Some(&env_file.display().to_string()),
            "loaded environment file",
        );
    }
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

/// Applies environment overrides. The lookup is injected so tests never
/// touch the process environment.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_CATALOG_URL).filter(|v| !v.trim().is_empty()) {
        config.catalog.base_url = url.trim().to_string();
        logging::debug(Component::Config, None, &format!("{} override applied", ENV_CATALOG_URL));
    }
    if let Some(raw) = lookup(ENV_CATALOG_TIMEOUT) {
        config.catalog.timeout_secs = raw.trim().parse().map_err(|_| {
            ConfigError::Invalid(format!(
                "{} must be a whole number of seconds, got '{}'",
                ENV_CATALOG_TIMEOUT, raw
            ))
        })?;
        logging::debug(
            Component::Config,
            None,
            &format!("{} override applied", ENV_CATALOG_TIMEOUT),
        );
    }
    if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.trim().is_empty()) {
        config.logging.level = level.trim().to_string();
        logging::debug(Component::Config, None, &format!("{} override applied", ENV_LOG_LEVEL));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_catalog_and_csv_layout() {
        let config = AppConfig::default();
        assert_eq!(config.views.csv_path, "product_views.csv");
        assert_eq!(config.views.group_column, "Parent org");
        assert_eq!(config.views.subgroup_column, "Brand");
        assert_eq!(config.views.measure_column, "Product View Count");
        assert_eq!(config.catalog.timeout_secs, 10);
        assert!(config.catalog.replay_dir.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults_for_missing_keys() {
        let config = parse_config(
            r#"
            [views]
            csv_path = "data/views.csv"

            [logging]
            level = "debug"
            "#,
            "inline",
        )
        .expect("valid config");

        assert_eq!(config.views.csv_path, "data/views.csv");
        assert_eq!(config.views.group_column, "Parent org");
        assert_eq!(config.logging.min_level(), Ok(LogLevel::Debug));
        assert_eq!(config.catalog.base_url, DEFAULT_CATALOG_URL);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result = parse_config("[catalog]\nbase_ulr = \"http://x\"\n", "inline");
        assert!(
            matches!(result, Err(ConfigError::Parse { .. })),
            "misspelled key should fail, got {:?}",
            result
        );
    }

    #[test]
    fn test_env_overrides_take_precedence() {
        let mut config = AppConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                (ENV_CATALOG_URL, "http://localhost:8080/products"),
                (ENV_CATALOG_TIMEOUT, "3"),
                (ENV_LOG_LEVEL, "warn"),
            ]),
        )
        .expect("valid overrides");

        assert_eq!(config.catalog.base_url, "http://localhost:8080/products");
        assert_eq!(config.catalog.timeout_secs, 3);
        assert_eq!(config.logging.min_level(), Ok(LogLevel::Warning));
    }

    #[test]
    fn test_env_overrides_win_over_file_values() {
        let mut config = parse_config(
            r#"
            [catalog]
            base_url = "http://file.example/products"
            timeout_secs = 30
            replay_dir = "captures"
            "#,
            "inline",
        )
        .expect("valid config");
        assert_eq!(config.catalog.base_url, "http://file.example/products");

        apply_env_overrides(
            &mut config,
            env(&[
                (ENV_CATALOG_URL, " http://env.example/products "),
                (ENV_CATALOG_TIMEOUT, "5"),
            ]),
        )
        .expect("valid overrides");

        assert_eq!(config.catalog.base_url, "http://env.example/products");
        assert_eq!(config.catalog.timeout_secs, 5);
        // Keys with no environment counterpart keep their file values.
        assert_eq!(config.catalog.replay_dir.as_deref(), Some("captures"));
    }

    #[test]
    fn test_blank_env_values_do_not_clear_file_values() {
        let mut config = parse_config("[logging]\nlevel = \"warn\"\n", "inline").expect("valid");
        apply_env_overrides(&mut config, env(&[(ENV_CATALOG_URL, "  "), (ENV_LOG_LEVEL, "")]))
            .expect("blank values are ignored");
        assert_eq!(config.catalog.base_url, DEFAULT_CATALOG_URL);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_overrides_are_logged_under_config_component() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log_path = dir.path().join("config.log");
        logging::init_logger(LogLevel::Debug, log_path.to_str(), false);

        let mut config = AppConfig::default();
        let result = apply_env_overrides(
            &mut config,
            env(&[(ENV_CATALOG_URL, "http://localhost:8080/products")]),
        );
        logging::init_logger(LogLevel::Error, None, false);
        result.expect("valid override");

        let contents = std::fs::read_to_string(&log_path).expect("log file written");
        assert!(
            contents.contains("DEBUG CONFIG: CATALOG_API_URL override applied"),
            "missing config entry in:\n{}",
            contents
        );
    }

    #[test]
    fn test_invalid_timeout_override_is_an_error() {
        let mut config = AppConfig::default();
        let result = apply_env_overrides(&mut config, env(&[(ENV_CATALOG_TIMEOUT, "soon")]));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_invalid_log_level_is_reported() {
        let mut config = AppConfig::default();
        config.logging.level = "chatty".to_string();
        assert!(config.logging.min_level().is_err());
    }

    #[test]
    fn test_explicit_missing_config_file_is_an_error() {
        let result = load_config(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
