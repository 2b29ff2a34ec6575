//! # Host Splitting Module
//!
//! Splits a request host into a *subdomain token* and a *domain*.
//!
//! ## Domain length
//!
//! The domain is the trailing `domain_length` labels of the host. With a domain
//! length of 2:
//!
//! | host                   | token        | domain        |
//! |------------------------|--------------|---------------|
//! | `www.example.com`      | `"www"`      | `example.com` |
//! | `www.test.example.com` | `"www.test"` | `example.com` |
//! | `example.com`          | `""`         | `example.com` |
//!
//! Without a configured domain length, a host with more than two labels is
//! split after its first label and anything shorter has an empty token. This
//! heuristic cannot tell `blah.www.example.com` apart from a three-label domain,
//! so multi-level subdomain setups must configure the length.
//!
//! ## Tokens
//!
//! [`split_host`] returns the empty string when there is no subdomain. Everywhere
//! a token is compared against a route it is first turned into an
//! `Option<String>` where `None` means "no subdomain" (see [`HostParts`]).

use crate::error::{Result, RoutingError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::num::NonZeroUsize;

/// Allowed subdomain alphabet: dot-separated DNS labels.
static SUBDOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)*$")
        .expect("Failed to compile subdomain regex")
});

/// Split `host` into `(token, domain)`.
///
/// The host is lowercased and any `:port` suffix is dropped first.
///
/// # Errors
///
/// [`RoutingError::HostMissing`] if `host` is `None` or blank.
///
/// # Example
///
/// ```rust
/// use std::num::NonZeroUsize;
/// use subdomain_routes::host::split_host;
///
/// let (token, domain) = split_host(Some("www.example.com"), NonZeroUsize::new(2)).unwrap();
/// assert_eq!(token, "www");
/// assert_eq!(domain, "example.com");
/// ```
pub fn split_host(
    host: Option<&str>,
    domain_length: Option<NonZeroUsize>,
) -> Result<(String, String)> {
    let host = host.map(str::trim).filter(|h| !h.is_empty());
    let Some(host) = host else {
        return Err(RoutingError::HostMissing);
    };
    let (name, _port) = strip_port(host);
    let name = name.trim_end_matches('.').to_lowercase();
    if name.is_empty() {
        return Err(RoutingError::HostMissing);
    }

    let labels: Vec<&str> = name.split('.').collect();
    let keep = match domain_length {
        Some(len) => len.get(),
        None => 2,
    };
    if labels.len() <= keep {
        return Ok((String::new(), name));
    }
    match domain_length {
        Some(_) => {
            let split = labels.len() - keep;
            Ok((labels[..split].join("."), labels[split..].join(".")))
        }
        None => Ok((labels[0].to_string(), labels[1..].join("."))),
    }
}

/// The subdomain token of `host` (empty string when there is none).
pub fn subdomain_for_host(host: &str, domain_length: Option<NonZeroUsize>) -> Result<String> {
    split_host(Some(host), domain_length).map(|(token, _)| token)
}

/// The domain of `host`.
pub fn domain_for_host(host: &str, domain_length: Option<NonZeroUsize>) -> Result<String> {
    split_host(Some(host), domain_length).map(|(_, domain)| domain)
}

/// Whether `subdomain` is made only of well-formed DNS labels.
///
/// Callers lowercase user input first; uppercase letters are rejected here.
#[must_use]
pub fn valid_subdomain(subdomain: &str) -> bool {
    SUBDOMAIN_RE.is_match(subdomain)
}

/// Lowercase and trim a user-supplied subdomain.
#[must_use]
pub fn normalize_subdomain(subdomain: &str) -> String {
    subdomain.trim().to_lowercase()
}

/// A host broken into the pieces needed for recognition and URL building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostParts {
    /// Subdomain token, `None` when the host has none
    pub subdomain: Option<String>,
    /// Domain without port
    pub domain: String,
    /// Port suffix of the original host, if any
    pub port: Option<u16>,
    /// Whether the host is an IP address literal
    pub is_ip: bool,
}

impl HostParts {
    /// Parse a request host.
    ///
    /// IP address hosts never carry a subdomain: their whole address is kept as
    /// the domain and `is_ip` is set.
    pub fn parse(host: &str, domain_length: Option<NonZeroUsize>) -> Result<Self> {
        let trimmed = host.trim();
        if trimmed.is_empty() {
            return Err(RoutingError::HostMissing);
        }
        let (name, port) = strip_port(trimmed);
        if is_ip_address(name) {
            return Ok(HostParts {
                subdomain: None,
                domain: name.to_lowercase(),
                port,
                is_ip: true,
            });
        }
        let (token, domain) = split_host(Some(trimmed), domain_length)?;
        Ok(HostParts {
            subdomain: Some(token).filter(|t| !t.is_empty()),
            domain,
            port,
            is_ip: false,
        })
    }

    /// Domain with the original port re-attached.
    #[must_use]
    pub fn domain_with_port(&self) -> String {
        with_port(&self.domain, self.port)
    }
}

/// `{subdomain}.{domain}`, or just the domain when there is no subdomain.
pub(crate) fn join_host(subdomain: Option<&str>, domain: &str) -> String {
    match subdomain {
        Some(sub) if !sub.is_empty() => format!("{sub}.{domain}"),
        _ => domain.to_string(),
    }
}

pub(crate) fn with_port(host: &str, port: Option<u16>) -> String {
    match port {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}

/// Split a trailing `:port` off a host. Bracketed IPv6 literals keep their brackets.
fn strip_port(host: &str) -> (&str, Option<u16>) {
    if host.starts_with('[') {
        if let Some(end) = host.find(']') {
            let port = host[end + 1..]
                .strip_prefix(':')
                .and_then(|p| p.parse().ok());
            return (&host[..=end], port);
        }
        return (host, None);
    }
    match host.rsplit_once(':') {
        Some((name, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => {
            (name, port.parse().ok())
        }
        _ => (host, None),
    }
}

fn is_ip_address(name: &str) -> bool {
    matches!(
        url::Host::parse(name),
        Ok(url::Host::Ipv4(_)) | Ok(url::Host::Ipv6(_))
    )
}
