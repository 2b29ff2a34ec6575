use crate::config::SubdomainConfig;
use crate::host::{normalize_subdomain, valid_subdomain, HostParts};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::num::NonZeroUsize;
use tracing::debug;

/// Command-line interface for subdomain routes
///
/// Inspects how hosts are split into subdomain and domain, using the same
/// rules as route recognition.
#[derive(Parser, Debug)]
#[command(name = "subroutes")]
#[command(about = "Subdomain routing utilities", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split a host into its subdomain and domain
    Split {
        /// Host, optionally with a port (e.g. `admin.example.com:8080`)
        host: String,

        /// Number of trailing labels forming the domain
        /// (falls back to SUBROUTES_DOMAIN_LENGTH)
        #[arg(short, long)]
        domain_length: Option<NonZeroUsize>,

        /// Print JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Check whether a subdomain is well formed
    Check {
        /// Subdomain to check (case-insensitive)
        subdomain: String,

        /// Print JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Debug, Serialize)]
struct SplitReport<'a> {
    host: &'a str,
    subdomain: Option<&'a str>,
    domain: &'a str,
    port: Option<u16>,
    ip: bool,
}

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    subdomain: &'a str,
    valid: bool,
}

/// Parse the process arguments and run the selected command on stdout.
pub fn run_cli() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    run(&cli, &SubdomainConfig::from_env(), &mut stdout.lock())?;
    Ok(())
}

/// Run `cli` against `config`, writing the report to `out`.
///
/// `check` exits successfully for malformed subdomains too; the verdict is in
/// the output.
pub fn run(cli: &Cli, config: &SubdomainConfig, out: &mut impl Write) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Split {
            host,
            domain_length,
            json,
        } => {
            let domain_length = domain_length.or(config.domain_length);
            debug!(host = %host, domain_length = ?domain_length, "Splitting host");
            let parts = HostParts::parse(host, domain_length)?;
            if *json {
                let report = SplitReport {
                    host,
                    subdomain: parts.subdomain.as_deref(),
                    domain: &parts.domain,
                    port: parts.port,
                    ip: parts.is_ip,
                };
                writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
            } else {
                writeln!(out, "subdomain: {}", parts.subdomain.as_deref().unwrap_or("<none>"))?;
                writeln!(out, "domain:    {}", parts.domain_with_port())?;
                if parts.is_ip {
                    writeln!(out, "note:      IP address hosts never carry a subdomain")?;
                }
            }
        }
        Commands::Check { subdomain, json } => {
            let normalized = normalize_subdomain(subdomain);
            let valid = valid_subdomain(&normalized);
            if *json {
                let report = CheckReport {
                    subdomain: &normalized,
                    valid,
                };
                writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
            } else if valid {
                writeln!(out, "'{normalized}' is a valid subdomain")?;
            } else {
                writeln!(out, "'{normalized}' is not a valid subdomain")?;
            }
        }
    }
    Ok(())
}
