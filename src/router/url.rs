//! # URL Generation
//!
//! Path and URL generation for subdomain-constrained routes.
//!
//! Generation runs in two steps:
//!
//! 1. **Resolve the subdomain** the target route should be served on. It comes
//!    from an explicit request ([`UrlOptions::subdomain`]), from the route's own
//!    rule (a model id parameter, a procedure generator), or from the ambient
//!    request's host. The result is checked against the route's constraint.
//! 2. **Decide the host** ([`HostDecision`]). A token equal to the ambient
//!    request's keeps the current host, so [`RouteSet::path_for`] can return a
//!    bare path; any other token moves to `{token}.{domain}` and forces an
//!    absolute URL.
//!
//! ## Example
//!
//! ```rust
//! use subdomain_routes::config::SubdomainConfig;
//! use subdomain_routes::request::Request;
//! use subdomain_routes::router::{RouteSet, ScopeOptions, UrlOptions};
//!
//! let mut routes = RouteSet::new(SubdomainConfig::with_domain_length(2));
//! routes
//!     .map_subdomain(["admin"], ScopeOptions::new().no_name(), |admin| {
//!         admin.resources("items");
//!     })
//!     .unwrap();
//!
//! let here = Request::get("/").with_host("admin.example.com");
//! let there = Request::get("/").with_host("www.example.com");
//! let items = UrlOptions::named("items");
//!
//! assert_eq!(routes.path_for(&items, Some(&here)).unwrap(), "/items");
//! assert_eq!(
//!     routes.path_for(&items, Some(&there)).unwrap(),
//!     "http://admin.example.com/items"
//! );
//! ```

use super::core::{Route, RouteSet};
use crate::constraint::SubdomainConstraint;
use crate::error::{Result, RoutingError};
use crate::host::{join_host, normalize_subdomain, valid_subdomain, HostParts};
use crate::request::{ParamValue, Params, Request};
use tracing::debug;
use url::form_urlencoded;

/// Parameters consumed by routing rather than sent in the query string.
const RESERVED_PARAMS: [&str; 3] = ["controller", "action", "subdomain"];

/// The subdomain a caller asks a URL to be generated for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestedSubdomain {
    /// Derive it from the route and the ambient request.
    #[default]
    Inherit,
    /// The bare domain, without any subdomain.
    Absent,
    /// This subdomain (lowercased before use).
    Named(String),
}

/// Which route a URL is generated for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlTarget {
    /// A named route, e.g. `admin_users`.
    Named(String),
    /// The first route dispatching to `controller#action`.
    Action { controller: String, action: String },
}

impl std::fmt::Display for UrlTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UrlTarget::Named(name) => f.write_str(name),
            UrlTarget::Action { controller, action } => write!(f, "{controller}#{action}"),
        }
    }
}

/// Options of a single path/URL generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlOptions {
    target: UrlTarget,
    params: Params,
    subdomain: RequestedSubdomain,
    context: Option<Params>,
    only_path: Option<bool>,
}

impl UrlOptions {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(UrlTarget::Named(name.into()))
    }

    #[must_use]
    pub fn for_action(controller: impl Into<String>, action: impl Into<String>) -> Self {
        Self::new(UrlTarget::Action {
            controller: controller.into(),
            action: action.into(),
        })
    }

    fn new(target: UrlTarget) -> Self {
        Self {
            target,
            params: Params::new(),
            subdomain: RequestedSubdomain::Inherit,
            context: None,
            only_path: None,
        }
    }

    /// Add a path or query parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key, value);
        self
    }

    #[must_use]
    pub fn params(mut self, params: Params) -> Self {
        self.params.extend(params);
        self
    }

    /// Generate for this subdomain instead of deriving one.
    #[must_use]
    pub fn subdomain(mut self, subdomain: impl Into<String>) -> Self {
        self.subdomain = RequestedSubdomain::Named(subdomain.into());
        self
    }

    /// Generate for the bare domain.
    #[must_use]
    pub fn no_subdomain(mut self) -> Self {
        self.subdomain = RequestedSubdomain::Absent;
        self
    }

    /// Context handed to procedure generators and searched for model ids.
    #[must_use]
    pub fn context(mut self, context: Params) -> Self {
        self.context = Some(context);
        self
    }

    /// Override the path/URL default of the generating call.
    ///
    /// `only_path(true)` still yields an absolute URL when the host must change.
    #[must_use]
    pub fn only_path(mut self, only_path: bool) -> Self {
        self.only_path = Some(only_path);
        self
    }

    #[must_use]
    pub fn target(&self) -> &UrlTarget {
        &self.target
    }

    #[must_use]
    pub fn requested_subdomain(&self) -> &RequestedSubdomain {
        &self.subdomain
    }
}

/// Where a generated route lives relative to the ambient request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostDecision {
    /// The current host serves the route; a bare path is enough.
    Path,
    /// The route must be reached on this host (may include a port).
    Host(String),
}

/// The ambient request's host, split.
struct Ambient<'r> {
    request: Option<&'r Request>,
    /// Raw host of the request, `None` when absent or blank
    host: Option<&'r str>,
    /// Split host, `None` when absent or an IP address
    parts: Option<HostParts>,
}

impl Ambient<'_> {
    fn token(&self) -> Option<Option<&str>> {
        self.parts.as_ref().map(|p| p.subdomain.as_deref())
    }
}

impl RouteSet {
    /// Generate a path for the target route, or an absolute URL when the route
    /// lives on a different host than `current`.
    ///
    /// # Errors
    ///
    /// - [`RoutingError::UnknownRoute`] if the target is not registered
    /// - [`RoutingError::InvalidSubdomain`] if the resolved subdomain is not
    ///   accepted by the route
    /// - [`RoutingError::HostNotSupplied`] if a host is needed and neither
    ///   `current` nor the configured default domain provides one
    /// - [`RoutingError::GeneratorMissing`] for a procedure route with no
    ///   generator and no ambient host (or an IP-address host)
    /// - [`RoutingError::MissingParameter`] if a path parameter is missing
    /// - [`RoutingError::Callback`] if a procedure callback fails
    pub fn path_for(&self, options: &UrlOptions, current: Option<&Request>) -> Result<String> {
        self.generate(options, current, true)
    }

    /// Generate an absolute URL for the target route.
    ///
    /// Fails like [`RouteSet::path_for`].
    pub fn url_for(&self, options: &UrlOptions, current: Option<&Request>) -> Result<String> {
        self.generate(options, current, false)
    }

    /// Resolve the target's subdomain and decide which host serves it.
    pub fn host_decision(&self, options: &UrlOptions, current: Option<&Request>) -> Result<HostDecision> {
        let route = self.target_route(&options.target)?;
        let ambient = self.ambient(current);
        self.decide(route, options, &ambient)
    }

    fn generate(&self, options: &UrlOptions, current: Option<&Request>, path_default: bool) -> Result<String> {
        let route = self.target_route(&options.target)?;
        let ambient = self.ambient(current);
        let decision = self.decide(route, options, &ambient)?;
        let path = self.build_path(route, options)?;

        let only_path = options.only_path.unwrap_or(path_default);
        let host = match decision {
            HostDecision::Path if only_path => return Ok(path),
            HostDecision::Path => match ambient.host {
                Some(host) => host.to_lowercase(),
                None => self
                    .config()
                    .default_domain
                    .clone()
                    .ok_or(RoutingError::HostNotSupplied)?,
            },
            HostDecision::Host(host) => host,
        };
        Ok(format!("{}://{}{}", self.config().scheme, host, path))
    }

    fn target_route(&self, target: &UrlTarget) -> Result<&Route> {
        self.find_target(target)
            .map(|route| &**route)
            .ok_or_else(|| RoutingError::UnknownRoute {
                target: target.to_string(),
            })
    }

    fn ambient<'r>(&self, current: Option<&'r Request>) -> Ambient<'r> {
        let host = current
            .and_then(Request::host)
            .filter(|h| !h.trim().is_empty());
        let parts = host
            .and_then(|h| HostParts::parse(h, self.config().domain_length).ok())
            .filter(|p| !p.is_ip);
        Ambient {
            request: current,
            host,
            parts,
        }
    }

    fn decide(&self, route: &Route, options: &UrlOptions, ambient: &Ambient<'_>) -> Result<HostDecision> {
        let Some(constraint) = route.constraint.as_deref() else {
            return Ok(HostDecision::Path);
        };
        let token = self.resolve_token(route, constraint, options, ambient)?;

        let decision = if ambient.token() == Some(token.as_deref()) {
            HostDecision::Path
        } else {
            let domain = match &ambient.parts {
                Some(parts) => parts.domain_with_port(),
                None => self
                    .config()
                    .default_domain
                    .clone()
                    .ok_or(RoutingError::HostNotSupplied)?,
            };
            HostDecision::Host(join_host(token.as_deref(), &domain))
        };
        debug!(
            route = %route.label(),
            subdomain = ?token,
            current_host = ?ambient.host,
            decision = ?decision,
            "Host decision"
        );
        Ok(decision)
    }

    /// The subdomain `route` is generated for; `None` is the bare domain.
    fn resolve_token(
        &self,
        route: &Route,
        constraint: &SubdomainConstraint,
        options: &UrlOptions,
        ambient: &Ambient<'_>,
    ) -> Result<Option<String>> {
        let invalid = |subdomain: Option<String>| RoutingError::InvalidSubdomain {
            route: route.label(),
            subdomain,
        };
        let requested = match &options.subdomain {
            RequestedSubdomain::Inherit => None,
            RequestedSubdomain::Absent => Some(None),
            RequestedSubdomain::Named(name) => {
                Some(Some(normalize_subdomain(name)).filter(|n| !n.is_empty()))
            }
        };

        match constraint {
            SubdomainConstraint::Fixed(_) | SubdomainConstraint::Absent => {
                let token = match requested {
                    Some(token) => token,
                    None => {
                        let current = ambient.token();
                        let allowed = match current {
                            Some(current) => constraint.matches(current, self.procs())?,
                            None => false,
                        };
                        match (current, constraint.single_token()) {
                            (Some(current), _) if allowed => current.map(str::to_string),
                            (_, Some(single)) => single.map(str::to_string),
                            (None, None) => return Err(RoutingError::HostNotSupplied),
                            (Some(current), None) => {
                                return Err(invalid(current.map(str::to_string)))
                            }
                        }
                    }
                };
                if constraint.matches(token.as_deref(), self.procs())? {
                    Ok(token)
                } else {
                    Err(invalid(token))
                }
            }
            SubdomainConstraint::Model(_) => {
                let param = constraint.model_param().unwrap_or_default();
                let from_params = options
                    .params
                    .get(&param)
                    .or_else(|| options.context.as_ref().and_then(|c| c.get(&param)))
                    .map(|v| Some(normalize_subdomain(&v.to_string())));
                let token = match from_params.or(requested) {
                    Some(token) => token,
                    None => ambient
                        .token()
                        .ok_or(RoutingError::HostNotSupplied)?
                        .map(str::to_string),
                };
                match token {
                    Some(token) if valid_subdomain(&token) => Ok(Some(token)),
                    other => Err(invalid(other)),
                }
            }
            SubdomainConstraint::Procedure(id) => {
                let token = match requested {
                    Some(Some(token)) if valid_subdomain(&token) => token,
                    Some(other) => return Err(invalid(other)),
                    None if self.procs().has_generator(id) => {
                        let generated = self.procs().generate(
                            id,
                            ambient.request,
                            options.context.as_ref(),
                        )?;
                        let generated = normalize_subdomain(&generated);
                        if generated.is_empty() {
                            return Ok(None);
                        }
                        if !valid_subdomain(&generated) {
                            return Err(invalid(Some(generated)));
                        }
                        generated
                    }
                    None => match ambient.token() {
                        None => return Err(RoutingError::GeneratorMissing { id: id.clone() }),
                        Some(None) => return Err(invalid(None)),
                        Some(Some(current)) => current.to_string(),
                    },
                };
                if self.procs().recognize(id, &token)? {
                    Ok(Some(token))
                } else {
                    Err(invalid(Some(token)))
                }
            }
        }
    }

    /// Fill the route's path and append the remaining parameters as a query.
    fn build_path(&self, route: &Route, options: &UrlOptions) -> Result<String> {
        let mut path = route
            .pattern
            .fill(&options.params)
            .map_err(|param| RoutingError::MissingParameter {
                route: route.label(),
                param,
            })?;

        let model_param = route.constraint.as_deref().and_then(SubdomainConstraint::model_param);
        let path_params = route.pattern.param_names();
        let mut query = form_urlencoded::Serializer::new(String::new());
        let mut has_query = false;
        for (key, value) in options.params.iter() {
            if RESERVED_PARAMS.contains(&key)
                || model_param.as_deref() == Some(key)
                || path_params.iter().any(|p| p == key)
            {
                continue;
            }
            match value {
                ParamValue::One(v) => {
                    query.append_pair(key, v);
                }
                ParamValue::Many(values) => {
                    let key = format!("{key}[]");
                    for v in values {
                        query.append_pair(&key, v);
                    }
                }
            }
            has_query = true;
        }
        if has_query {
            path.push('?');
            path.push_str(&query.finish());
        }
        Ok(path)
    }
}
