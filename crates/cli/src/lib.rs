mod check;
mod filter;
mod scheme;

use clap::{Parser, Subcommand};
use hostbound_core::config::{BoundaryConfig, HostConfig};
use hostbound_core::logging::{LoggingOptions, init_logging};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "hostbound",
    version,
    about = "Inspect module isolation and SSO settings of an embedded application host",
    long_about = "Hostbound decides which class and resource names a hosted application must \
                  resolve from its own graphs, filters provider discovery listings, and selects \
                  the authentication scheme guarding the application."
)]
pub struct Cli {
    /// Host configuration file (JSON). Defaults to the runner's built-in boundary.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report whether a class or resource name is confined to the hosted application
    Check {
        /// Binary class name or slash-separated resource path
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Apply provider exclusions to a discovery listing
    #[command(
        long_about = "Prints, in order, the origins that remain visible for a provider listing \
                      such as META-INF/services/jakarta.servlet.ServletContainerInitializer."
    )]
    Filter {
        #[arg(value_name = "RESOURCE")]
        resource: String,
        /// Origins (jar URLs) the listing was found in
        #[arg(value_name = "ORIGIN", required = true)]
        origins: Vec<String>,
    },
    /// Show the authentication scheme selected for an authentication type
    Scheme {
        /// e.g. BASIC, DIGEST, SPNEGO, CLIENT-CERT. Falls back to the configured type.
        #[arg(value_name = "AUTH_TYPE")]
        auth_type: Option<String>,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = init_logging(&LoggingOptions::new("cli"));

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Check { name } => check::run(&config, &name, cli.json),
        Commands::Filter { resource, origins } => {
            filter::run(&config, &resource, origins, cli.json)
        }
        Commands::Scheme { auth_type } => scheme::run(&config, auth_type, cli.json),
    }
}

fn load_config(path: Option<&Path>) -> hostbound_core::Result<HostConfig> {
    match path {
        Some(path) => {
            info!("Loading host configuration from {}", path.display());
            HostConfig::load(path)
        }
        None => Ok(HostConfig {
            boundary: BoundaryConfig::runner_defaults(),
            ..HostConfig::default()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter_with_global_config() {
        let cli = Cli::try_parse_from([
            "hostbound",
            "filter",
            "META-INF/services/a.B",
            "jar:file:/x.jar!/",
            "--config",
            "host.json",
        ])
        .unwrap();
        assert_eq!(cli.config.as_deref(), Some(Path::new("host.json")));
        match cli.command {
            Commands::Filter { resource, origins } => {
                assert_eq!(resource, "META-INF/services/a.B");
                assert_eq!(origins, vec!["jar:file:/x.jar!/"]);
            }
            _ => panic!("expected filter"),
        }
    }

    #[test]
    fn test_filter_requires_origins() {
        assert!(Cli::try_parse_from(["hostbound", "filter", "META-INF/services/a.B"]).is_err());
    }

    #[test]
    fn test_default_config_is_runner_boundary() {
        let config = load_config(None).unwrap();
        assert_eq!(config.boundary, BoundaryConfig::runner_defaults());
        assert!(config.auth.auth_type.is_none());
    }
}
