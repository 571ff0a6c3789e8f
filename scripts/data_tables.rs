//! Data table extractor
//!
//! Reads test-class descriptors and prints the parameter tables of their
//! data-driven tests as JSON, keyed by class name then by table key.
//!
//! Usage:
//!   data-tables [OPTIONS] <DESCRIPTOR>...
//!
//! Examples:
//!   data-tables tests/descriptors/calculator.yml
//!   data-tables --resource-dir src/test/resources --delimiter ';' --pretty classes.yml
//!   data-tables --config serenity.yml classes.yml

use anyhow::{bail, Context, Result};
use clap::Parser;
use serenity_core::logging::{init_logging, LoggingConfig};
use serenity_core::EnvironmentVariables;
use serenity_junit5::{load_test_classes, DataDrivenAnnotations, ExtractorConfig};
use serenity_model::DataTableRegistry;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "data-tables")]
#[command(about = "Print the data tables of parameterized tests as JSON")]
#[command(version)]
struct Cli {
    /// Test-class descriptor files (YAML)
    #[arg(required = true)]
    descriptors: Vec<PathBuf>,

    /// Directory CSV resources are resolved against
    #[arg(short, long)]
    resource_dir: Option<PathBuf>,

    /// Default delimiter of CSV files
    #[arg(short, long)]
    delimiter: Option<char>,

    /// Serenity properties file (YAML), merged over the process environment
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let logging = LoggingConfig {
        service_name: "data-tables".to_string(),
        ..LoggingConfig::from_env()
    };
    init_logging(&logging).context("Failed to initialize logging")?;

    let mut environment = EnvironmentVariables::from_system();
    if let Some(path) = &cli.config {
        let properties = EnvironmentVariables::load(path)
            .with_context(|| format!("Failed to load properties from {}", path.display()))?;
        environment = environment.merged_with(properties);
    }

    let mut config = ExtractorConfig::from_environment(&environment);
    if let Some(dir) = cli.resource_dir {
        config.resource_dir = dir;
    }
    if let Some(delimiter) = cli.delimiter {
        if !delimiter.is_ascii() {
            bail!("CSV delimiter must be a single ASCII character, got {:?}", delimiter);
        }
        config.csv_delimiter = delimiter;
    }

    let mut tables: BTreeMap<String, DataTableRegistry> = BTreeMap::new();
    for path in &cli.descriptors {
        let test_classes = load_test_classes(path)
            .with_context(|| format!("Failed to read descriptor {}", path.display()))?;

        for test_class in &test_classes {
            let annotations = DataDrivenAnnotations::with_config(test_class, &config);
            info!(
                class = annotations.class_name(),
                tables = annotations.parameter_tables().len(),
                "Extracted data tables"
            );
            tables.insert(
                annotations.class_name().to_string(),
                annotations.into_parameter_tables(),
            );
        }
    }

    let json = if cli.pretty {
        serde_json::to_string_pretty(&tables)
    } else {
        serde_json::to_string(&tables)
    }
    .context("Failed to serialize data tables")?;
    println!("{}", json);

    Ok(())
}
