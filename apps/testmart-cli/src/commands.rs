//! CLI command implementations.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use testmart_core::{FlatRateQuoter, Money, ShippingService};
use tracing::info;

use crate::config::{CliConfig, OutputFormat};
use crate::error::AppError;
use crate::runner::Runner;
use crate::script::Script;
use crate::store::CartStore;

/// Arguments for the run command.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Script file, or `-` for stdin.
    pub file: PathBuf,

    /// Purchase output format (overrides TESTMART_OUTPUT).
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Receipt header (overrides TESTMART_STORE_NAME).
    #[arg(long)]
    pub store_name: Option<String>,

    /// Print JSON on a single line.
    #[arg(long)]
    pub compact: bool,
}

impl RunArgs {
    /// Applies the flags on top of the environment configuration.
    pub fn apply_to(&self, config: &mut CliConfig) {
        if let Some(format) = self.format {
            config.output = format;
        }
        if let Some(name) = &self.store_name {
            config.store_name = name.clone();
        }
        if self.compact {
            config.pretty_json = false;
        }
    }
}

/// Arguments for the services command.
#[derive(Debug, Args)]
pub struct ServicesArgs {
    /// Output format (overrides TESTMART_OUTPUT).
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

impl ServicesArgs {
    /// Applies the flags on top of the environment configuration.
    pub fn apply_to(&self, config: &mut CliConfig) {
        if let Some(format) = self.format {
            config.output = format;
        }
    }
}

/// Runs a command script against a fresh cart store.
pub fn run<W: Write>(args: &RunArgs, config: &CliConfig, out: &mut W) -> Result<(), AppError> {
    let script = if args.file.as_os_str() == "-" {
        Script::from_reader(io::stdin().lock())?
    } else {
        Script::parse(&fs::read_to_string(&args.file)?)?
    };

    let store = CartStore::default();
    let steps = Runner::new(&store, config).run(&script, out)?;
    info!(steps, carts = store.len(), "script finished");
    Ok(())
}

/// A shipping service with its flat rate.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceRate {
    pub service: ShippingService,
    pub rate: Money,
}

/// Every shipping service with its flat rate.
pub fn service_rates() -> Vec<ServiceRate> {
    ShippingService::ALL
        .into_iter()
        .map(|service| ServiceRate {
            service,
            rate: FlatRateQuoter::rate(service),
        })
        .collect()
}

/// Prints the shipping services and their flat rates.
pub fn services<W: Write>(config: &CliConfig, out: &mut W) -> Result<(), AppError> {
    let rates = service_rates();
    match config.output {
        OutputFormat::Text => {
            for rate in &rates {
                writeln!(out, "{:<20} {:>8}", rate.service.name(), rate.rate.to_string())?;
            }
        }
        OutputFormat::Json if config.pretty_json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&rates)?)?;
        }
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&rates)?)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = RunArgs {
            file: PathBuf::from("-"),
            format: Some(OutputFormat::Json),
            store_name: Some("CORNER SHOP".to_string()),
            compact: true,
        };
        let mut config = CliConfig::default();
        args.apply_to(&mut config);
        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.store_name, "CORNER SHOP");
        assert!(!config.pretty_json);
    }

    #[test]
    fn test_services_flag_overrides_config() {
        let mut config = CliConfig {
            output: OutputFormat::Json,
            ..CliConfig::default()
        };
        ServicesArgs { format: None }.apply_to(&mut config);
        assert_eq!(config.output, OutputFormat::Json);

        ServicesArgs {
            format: Some(OutputFormat::Text),
        }
        .apply_to(&mut config);
        assert_eq!(config.output, OutputFormat::Text);
    }

    #[test]
    fn test_services_text() {
        let mut out = Vec::new();
        services(&CliConfig::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("USPS Priority Mail"));
        assert!(lines[0].ends_with("$10.00"));
        assert!(lines[2].ends_with("$30.00"));
    }

    #[test]
    fn test_services_json() {
        let mut config = CliConfig::default();
        ServicesArgs {
            format: Some(OutputFormat::Json),
        }
        .apply_to(&mut config);
        assert_eq!(config.output, OutputFormat::Json);

        let mut out = Vec::new();
        services(&config, &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json[1]["service"], "UPS Ground");
        assert_eq!(json[1]["rate"], 2000);
    }

    #[test]
    fn test_run_missing_file_is_io_error() {
        let args = RunArgs {
            file: PathBuf::from("/nonexistent/testmart-script.json"),
            format: None,
            store_name: None,
            compact: false,
        };
        let err = run(&args, &CliConfig::default(), &mut Vec::new()).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::IoError);
    }
}
