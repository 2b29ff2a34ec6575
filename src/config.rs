//! # Subdomain Configuration Module
//!
//! Process-level settings that affect how hosts are split and how absolute URLs
//! are built.
//!
//! ## Environment Variables
//!
//! ### `SUBROUTES_DOMAIN_LENGTH`
//!
//! Number of trailing dot-separated labels that form the domain. `example.com`
//! is 2, `example.com.au` is 3. When unset, hosts are split with a
//! one-label-subdomain heuristic (see [`crate::host::split_host`]); set it
//! explicitly whenever multi-level subdomains (`www.test.example.com`) are in use.
//!
//! ### `SUBROUTES_SCHEME`
//!
//! `http` (default) or `https`. Used for every absolute URL.
//!
//! ### `SUBROUTES_DEFAULT_DOMAIN`
//!
//! Domain used to build absolute URLs when there is no ambient request host,
//! e.g. when generating links from a background job.
//!
//! ## Usage
//!
//! ```rust
//! use subdomain_routes::config::SubdomainConfig;
//!
//! let config = SubdomainConfig::from_env();
//! println!("domain length: {:?}", config.domain_length);
//! ```
//!
//! Each [`crate::router::RouteSet`] owns its configuration, so tests override
//! it by constructing the route set with [`SubdomainConfig::with_domain_length`].

use serde::Deserialize;
use std::env;
use std::fmt;
use std::num::NonZeroUsize;
use tracing::warn;

/// URL scheme for generated absolute URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl Scheme {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "http" => Some(Scheme::Http),
            "https" => Some(Scheme::Https),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subdomain routing configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SubdomainConfig {
    /// Trailing labels that make up the domain (`None` = heuristic split)
    pub domain_length: Option<NonZeroUsize>,
    /// Scheme of generated absolute URLs
    pub scheme: Scheme,
    /// Domain to use when no request host is available
    pub default_domain: Option<String>,
}

impl SubdomainConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let domain_length = match env::var("SUBROUTES_DOMAIN_LENGTH") {
            Ok(val) => match val.trim().parse::<NonZeroUsize>() {
                Ok(len) => Some(len),
                Err(_) => {
                    warn!(value = %val, "Ignoring invalid SUBROUTES_DOMAIN_LENGTH");
                    None
                }
            },
            Err(_) => None,
        };
        let scheme = match env::var("SUBROUTES_SCHEME") {
            Ok(val) => Scheme::parse(&val).unwrap_or_else(|| {
                warn!(value = %val, "Ignoring invalid SUBROUTES_SCHEME");
                Scheme::Http
            }),
            Err(_) => Scheme::Http,
        };
        let default_domain = env::var("SUBROUTES_DEFAULT_DOMAIN")
            .ok()
            .map(|d| d.trim().to_lowercase())
            .filter(|d| !d.is_empty());

        SubdomainConfig {
            domain_length,
            scheme,
            default_domain,
        }
    }

    /// Configuration with a fixed domain length and defaults otherwise.
    ///
    /// A length of zero leaves the domain length unset.
    #[must_use]
    pub fn with_domain_length(length: usize) -> Self {
        SubdomainConfig {
            domain_length: NonZeroUsize::new(length),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    #[must_use]
    pub fn default_domain(mut self, domain: impl Into<String>) -> Self {
        self.default_domain = Some(domain.into().to_lowercase());
        self
    }
}
