//! # CLI Module
//!
//! Command-line utilities for checking subdomain handling without a running
//! application.
//!
//! ## Commands
//!
//! ### `split`
//!
//! Split a host into subdomain and domain:
//!
//! ```bash
//! subroutes split www.test.example.com --domain-length 2
//! ```
//!
//! Options:
//! - `--domain-length <N>` - Labels forming the domain (default: `SUBROUTES_DOMAIN_LENGTH`)
//! - `--json` - Machine-readable output
//!
//! ### `check`
//!
//! Check that a subdomain is well formed:
//!
//! ```bash
//! subroutes check Admin --json
//! ```
//!
//! ## Usage from Code
//!
//! ```rust
//! use clap::Parser;
//! use subdomain_routes::cli::{run, Cli};
//! use subdomain_routes::config::SubdomainConfig;
//!
//! let cli = Cli::parse_from(["subroutes", "check", "www"]);
//! let mut out = Vec::new();
//! run(&cli, &SubdomainConfig::default(), &mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "'www' is a valid subdomain\n");
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run, run_cli, Cli, Commands};
