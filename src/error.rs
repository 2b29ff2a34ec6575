//! # Error Module
//!
//! Every fallible operation in this crate returns [`RoutingError`]. The variants
//! fall into five groups:
//!
//! - **Configuration** - [`RoutingError::InvalidSpecifiers`] is raised while the
//!   route table is being built and is fatal to that registration call only.
//! - **Input** - [`RoutingError::HostMissing`] and [`RoutingError::HostNotSupplied`]
//!   are raised when a host is needed and none (or an IP address) was given.
//! - **No match** - [`RoutingError::RouteNotFound`], [`RoutingError::InvalidSubdomain`],
//!   [`RoutingError::UnknownRoute`] and [`RoutingError::MissingParameter`] are
//!   expected conditions that a web layer usually turns into a 404.
//! - **Missing registration** - [`RoutingError::GeneratorMissing`].
//! - **Collaborator** - [`RoutingError::Callback`] carries the error returned by a
//!   user-registered recognize or generate callback, untouched.

use http::Method;
use std::fmt;

/// Error returned by subdomain recognition, generation and route registration.
#[derive(Debug)]
pub enum RoutingError {
    /// A host was required but was absent or empty.
    HostMissing,
    /// A subdomain route was generated without an ambient host (or with an IP
    /// address host) and no default domain to fall back on.
    HostNotSupplied,
    /// No registered route matched both the path and the subdomain.
    RouteNotFound {
        /// Request method
        method: Method,
        /// Request path
        path: String,
        /// Request host, if any
        host: Option<String>,
    },
    /// The requested or generated subdomain is not accepted by the route.
    InvalidSubdomain {
        /// Route being generated
        route: String,
        /// Offending subdomain (`None` for the absent subdomain)
        subdomain: Option<String>,
    },
    /// The generation target does not name a registered route.
    UnknownRoute {
        /// Route name or `controller#action`
        target: String,
    },
    /// A path parameter needed to fill the route pattern was not supplied.
    MissingParameter {
        /// Route being generated
        route: String,
        /// Name of the missing parameter
        param: String,
    },
    /// A procedure route had to be generated but no generator is registered.
    GeneratorMissing {
        /// Procedure identifier
        id: String,
    },
    /// The subdomain specifiers passed to a scope were rejected.
    InvalidSpecifiers {
        /// Why the specifier list was rejected
        reason: String,
    },
    /// Error raised by a registered recognize or generate callback.
    Callback(anyhow::Error),
}

impl RoutingError {
    /// Whether the error is an expected "no such route" condition.
    ///
    /// Host frameworks map these to their not-found response.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RoutingError::RouteNotFound { .. }
                | RoutingError::InvalidSubdomain { .. }
                | RoutingError::UnknownRoute { .. }
                | RoutingError::MissingParameter { .. }
        )
    }

    /// The callback error, if this error came from a registered callback.
    #[must_use]
    pub fn callback_error(&self) -> Option<&anyhow::Error> {
        match self {
            RoutingError::Callback(err) => Some(err),
            _ => None,
        }
    }

    pub(crate) fn invalid_specifiers(reason: impl Into<String>) -> Self {
        RoutingError::InvalidSpecifiers {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for RoutingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingError::HostMissing => write!(f, "no host was supplied"),
            RoutingError::HostNotSupplied => write!(
                f,
                "a subdomain route needs a host: no request host (or an IP address host) \
                 and no default domain configured"
            ),
            RoutingError::RouteNotFound { method, path, host } => match host {
                Some(host) => write!(f, "no route matches {method} {path} on host '{host}'"),
                None => write!(f, "no route matches {method} {path}"),
            },
            RoutingError::InvalidSubdomain { route, subdomain } => match subdomain {
                Some(subdomain) => {
                    write!(f, "route '{route}' does not accept subdomain '{subdomain}'")
                }
                None => write!(f, "route '{route}' requires a subdomain"),
            },
            RoutingError::UnknownRoute { target } => {
                write!(f, "no route is registered for '{target}'")
            }
            RoutingError::MissingParameter { route, param } => {
                write!(f, "route '{route}' requires parameter '{param}'")
            }
            RoutingError::GeneratorMissing { id } => {
                write!(f, "no subdomain generator is registered for '{id}'")
            }
            RoutingError::InvalidSpecifiers { reason } => {
                write!(f, "invalid subdomain specifiers: {reason}")
            }
            RoutingError::Callback(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for RoutingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RoutingError::Callback(err) => Some(&**err),
            _ => None,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = RoutingError> = std::result::Result<T, E>;
