//! `catalog_insights` command line: views reports and SKU lookups.

use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use catalog_insights::catalog::replay::{CapturingSource, ReplaySource};
use catalog_insights::catalog::report::{self, OutputFormat};
use catalog_insights::catalog::shopalyst::ShopalystClient;
use catalog_insights::catalog::SkuSource;
use catalog_insights::config::{self, AppConfig};
use catalog_insights::logging::{self, Component, LogLevel};
use catalog_insights::views::{self, loader::Columns};

/// Product view reports and catalog SKU lookups
#[derive(Parser)]
#[command(name = "catalog_insights")]
#[command(version, long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./catalog_insights.toml when present)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug diagnostics on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sum product views per parent org and brand from a CSV export
    Views {
        /// CSV file to read (defaults to views.csv_path from the config)
        csv_path: Option<PathBuf>,

        #[arg(long, value_name = "COLUMN")]
        group_column: Option<String>,

        #[arg(long, value_name = "COLUMN")]
        subgroup_column: Option<String>,

        #[arg(long, value_name = "COLUMN")]
        measure_column: Option<String>,
    },

    /// Fetch a product and print its SKUs
    Skus {
        /// Product id; prompted for on stdin when omitted
        product_id: Option<String>,

        /// Output schema: text or json
        #[arg(short, long, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Catalog products endpoint (overrides config and CATALOG_API_URL)
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,

        /// Read records from <DIR>/<productId>.json instead of the live API
        #[arg(long, value_name = "DIR", conflicts_with = "capture_dir")]
        replay_dir: Option<PathBuf>,

        /// Save every fetched record under <DIR> for later replay
        #[arg(long, value_name = "DIR")]
        capture_dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Console-only logger so config loading can report what it did.
    let bootstrap_level = if cli.verbose { LogLevel::Debug } else { LogLevel::Warning };
    logging::init_logger(bootstrap_level, None, false);

    let mut config = match config::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            logging::error(Component::Config, None, &e.to_string());
            return ExitCode::FAILURE;
        }
    };
    apply_cli(&cli, &mut config);
    if let Err(e) = init_logging(&config) {
        logging::error(Component::Config, None, &e.to_string());
        return ExitCode::FAILURE;
    }

    let result = match cli.command {
        Commands::Views { .. } => run_views(&config),
        Commands::Skus {
            product_id,
            format,
            capture_dir,
            ..
        } => run_skus(&config, product_id, format, capture_dir),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logging::error(Component::System, None, &e.to_string());
            ExitCode::FAILURE
        }
    }
}

/// Layers command line flags over the loaded configuration.
fn apply_cli(cli: &Cli, config: &mut AppConfig) {
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }

    match &cli.command {
        Commands::Views {
            csv_path,
            group_column,
            subgroup_column,
            measure_column,
        } => {
            if let Some(path) = csv_path {
                config.views.csv_path = path.to_string_lossy().into_owned();
            }
            if let Some(c) = group_column {
                config.views.group_column = c.clone();
            }
            if let Some(c) = subgroup_column {
                config.views.subgroup_column = c.clone();
            }
            if let Some(c) = measure_column {
                config.views.measure_column = c.clone();
            }
        }
        Commands::Skus {
            base_url,
            replay_dir,
            ..
        } => {
            if let Some(url) = base_url {
                config.catalog.base_url = url.clone();
            }
            if let Some(dir) = replay_dir {
                config.catalog.replay_dir = Some(dir.to_string_lossy().into_owned());
            }
        }
    }
}

fn init_logging(config: &AppConfig) -> Result<(), config::ConfigError> {
    let level: LogLevel = config.logging.min_level()?;
    logging::init_logger(
        level,
        config.logging.log_file.as_deref(),
        config.logging.console_timestamps,
    );
    Ok(())
}

fn run_views(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let path = PathBuf::from(&config.views.csv_path);
    let columns = Columns::from(&config.views);
    logging::debug(
        Component::Views,
        Some(&path.display().to_string()),
        &format!(
            "columns: group='{}' subgroup='{}' measure='{}'",
            columns.group, columns.subgroup, columns.measure
        ),
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    views::run_report(&path, &columns, &mut out)?;
    out.flush()?;
    Ok(())
}

fn run_skus(
    config: &AppConfig,
    product_id: Option<String>,
    format: OutputFormat,
    capture_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let product_id = match product_id {
        Some(id) => id,
        None => prompt_product_id()?,
    };

    let lookup = match &config.catalog.replay_dir {
        Some(dir) => {
            logging::debug(Component::Catalog, None, &format!("replaying records from {}", dir));
            ReplaySource::new(dir).lookup(&product_id)
        }
        None => {
            let client = ShopalystClient::from_config(&config.catalog)?;
            logging::debug(Component::Catalog, None, &format!("fetching from {}", client.base_url()));
            match capture_dir {
                Some(dir) => CapturingSource::new(client, dir).lookup(&product_id),
                None => client.lookup(&product_id),
            }
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    report::write_lookup(&lookup, format, &mut out)?;
    out.flush()?;
    Ok(())
}

fn prompt_product_id() -> io::Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "Enter the productId: ")?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
