//! Router core: the route table and subdomain-aware recognition.

use super::pattern::PathPattern;
use super::scope::{plan_scopes, RouteScope, ScopeOptions, SubdomainSpec};
use super::url::UrlTarget;
use crate::config::SubdomainConfig;
use crate::constraint::SubdomainConstraint;
use crate::error::{Result, RoutingError};
use crate::host::HostParts;
use crate::procs::{SubdomainProcs, Truthiness};
use crate::request::{ParamValue, Params, Request};
use http::Method;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A registered route.
#[derive(Debug, Clone)]
pub struct Route {
    /// Route name used by URL generation (e.g. `admin_users`)
    pub name: Option<String>,
    pub method: Method,
    pub pattern: PathPattern,
    /// Controller path including any namespace (e.g. `admin/users`)
    pub controller: String,
    pub action: String,
    /// Subdomain rule; `None` for routes declared outside any subdomain scope
    pub constraint: Option<Arc<SubdomainConstraint>>,
}

impl Route {
    /// Route name, or `controller#action` for unnamed routes.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("{}#{}", self.controller, self.action),
        }
    }
}

/// Result of recognizing a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Name of the matched route, if it has one
    pub route_name: Option<String>,
    pub controller: String,
    pub action: String,
    /// `controller`, `action`, path parameters and the injected subdomain
    /// parameters
    pub params: Params,
}

impl RouteMatch {
    /// Get a recognized parameter by name if it is a single value.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get_str(name)
    }
}

/// Route table with subdomain-aware recognition and generation.
///
/// Routes are tried in registration order; the first route whose method, path
/// *and* subdomain constraint all match wins.
#[derive(Debug)]
pub struct RouteSet {
    config: SubdomainConfig,
    procs: Arc<SubdomainProcs>,
    routes: Vec<Arc<Route>>,
    /// route name -> index into `routes`; later registrations win
    names: HashMap<String, usize>,
}

impl Default for RouteSet {
    fn default() -> Self {
        Self::new(SubdomainConfig::default())
    }
}

impl RouteSet {
    /// Create an empty route set with its own procedure registry.
    #[must_use]
    pub fn new(config: SubdomainConfig) -> Self {
        Self::with_procs(config, Arc::new(SubdomainProcs::new()))
    }

    /// Create an empty route set sharing `procs` with other route sets.
    #[must_use]
    pub fn with_procs(config: SubdomainConfig, procs: Arc<SubdomainProcs>) -> Self {
        Self {
            config,
            procs,
            routes: Vec::new(),
            names: HashMap::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SubdomainConfig {
        &self.config
    }

    #[must_use]
    pub fn procs(&self) -> &Arc<SubdomainProcs> {
        &self.procs
    }

    /// Register the recognize callback of a procedure subdomain.
    pub fn recognize_subdomain<F, T>(&self, id: &str, recognize: F)
    where
        F: Fn(&str) -> anyhow::Result<T> + Send + Sync + 'static,
        T: Truthiness,
    {
        self.procs.register_recognize(id, recognize);
    }

    /// Register the generate callback of a procedure subdomain.
    pub fn generate_subdomain<F, S>(&self, id: &str, generate: F)
    where
        F: Fn(Option<&Request>, Option<&Params>) -> anyhow::Result<S> + Send + Sync + 'static,
        S: Into<String>,
    {
        self.procs.register_generate(id, generate);
    }

    /// Declare routes that answer on any host.
    pub fn draw<F>(&mut self, declare: F) -> &mut Self
    where
        F: FnOnce(&mut RouteScope<'_>),
    {
        let before = self.routes.len();
        declare(&mut RouteScope::new(self, None, None, None));
        info!(
            routes_added = self.routes.len() - before,
            routes_count = self.routes.len(),
            "Routes registered"
        );
        self
    }

    /// Declare routes restricted to the given subdomains.
    ///
    /// `declare` is called once per registration the specifiers stand for: once
    /// per literal subdomain by default, or once for the whole list when the
    /// scope is unnamed ([`ScopeOptions::no_name`]), explicitly named, or a
    /// model/proc rule.
    ///
    /// # Errors
    ///
    /// [`RoutingError::InvalidSpecifiers`] if the list is empty, contains a
    /// malformed subdomain, or mixes a model/proc rule with other entries. No
    /// route is registered in that case.
    pub fn map_subdomain<S, F>(&mut self, specs: S, options: ScopeOptions, mut declare: F) -> Result<&mut Self>
    where
        S: IntoIterator,
        S::Item: Into<SubdomainSpec>,
        F: FnMut(&mut RouteScope<'_>),
    {
        let specs: Vec<SubdomainSpec> = specs.into_iter().map(Into::into).collect();
        let plans = plan_scopes(specs, &options)?;

        for plan in plans {
            let before = self.routes.len();
            let constraint = Arc::new(plan.constraint);
            let label = constraint.to_string();
            declare(&mut RouteScope::new(
                self,
                plan.name_prefix.clone(),
                plan.namespace.clone(),
                Some(constraint),
            ));
            info!(
                subdomain = %label,
                name_prefix = ?plan.name_prefix,
                namespace = ?plan.namespace,
                routes_added = self.routes.len() - before,
                routes_count = self.routes.len(),
                "Subdomain routes registered"
            );
        }
        Ok(self)
    }

    pub(crate) fn push_route(&mut self, route: Route) {
        if let Some(name) = &route.name {
            self.names.insert(name.clone(), self.routes.len());
        }
        debug!(
            route = %route.label(),
            method = %route.method,
            path = %route.pattern.as_str(),
            controller = %route.controller,
            action = %route.action,
            subdomain = ?route.constraint.as_deref().map(ToString::to_string),
            "Route added"
        );
        self.routes.push(Arc::new(route));
    }

    /// Look up a route by name.
    #[must_use]
    pub fn named(&self, name: &str) -> Option<&Arc<Route>> {
        self.names.get(name).and_then(|&idx| self.routes.get(idx))
    }

    /// All routes in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &Arc<Route>> {
        self.routes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// `METHOD /path -> controller#action [subdomain]` for every route.
    #[must_use]
    pub fn route_summaries(&self) -> Vec<String> {
        self.routes
            .iter()
            .map(|r| {
                let subdomain = r
                    .constraint
                    .as_deref()
                    .map(|c| format!(" [{c}]"))
                    .unwrap_or_default();
                format!(
                    "{} {} -> {}#{}{}",
                    r.method,
                    r.pattern.as_str(),
                    r.controller,
                    r.action,
                    subdomain
                )
            })
            .collect()
    }

    /// Recognize `request` against the route table.
    ///
    /// The request host is only split when a subdomain-constrained route's
    /// method and path match, so requests without a host still reach
    /// unconstrained routes.
    ///
    /// # Errors
    ///
    /// - [`RoutingError::RouteNotFound`] if no route matches path and subdomain
    /// - [`RoutingError::HostMissing`] if a constrained route had to be checked
    ///   and the request has no host
    /// - [`RoutingError::Callback`] if a recognize callback fails
    pub fn recognize(&self, request: &Request) -> Result<RouteMatch> {
        let method = request.method();
        let path = request.path();
        debug!(
            method = %method,
            path = %path,
            host = ?request.host(),
            "Route match attempt"
        );

        // Computed on first use; `None` until a constrained candidate is reached.
        let mut token: Option<Option<String>> = None;

        for route in &self.routes {
            if route.method != *method {
                continue;
            }
            let Some(captures) = route.pattern.captures(path) else {
                continue;
            };
            let Some(constraint) = route.constraint.as_deref() else {
                return Ok(self.matched(route, captures, None));
            };
            if token.is_none() {
                token = Some(self.request_token(request)?);
            }
            let current = token.as_ref().and_then(|t| t.as_deref());
            if constraint.matches(current, &self.procs)? {
                return Ok(self.matched(route, captures, current));
            }
            debug!(
                route = %route.label(),
                subdomain = ?current,
                constraint = %constraint,
                "Path matched but subdomain did not"
            );
        }

        warn!(
            method = %method,
            path = %path,
            host = ?request.host(),
            "No route matched"
        );
        Err(RoutingError::RouteNotFound {
            method: method.clone(),
            path: path.to_string(),
            host: request.host().map(str::to_string),
        })
    }

    /// Recognize `request` and inject the recognized parameters into it.
    pub fn recognize_into(&self, request: &mut Request) -> Result<RouteMatch> {
        let matched = self.recognize(request)?;
        request.params_mut().extend(matched.params.clone());
        Ok(matched)
    }

    /// Recognize a bare method/path/host triple.
    pub fn recognize_path(&self, method: Method, path: &str, host: Option<&str>) -> Result<RouteMatch> {
        let mut request = Request::new(method, path);
        if let Some(host) = host {
            request.set_host(host);
        }
        self.recognize(&request)
    }

    /// The request's subdomain token; IP address hosts have none.
    fn request_token(&self, request: &Request) -> Result<Option<String>> {
        let host = request.host().ok_or(RoutingError::HostMissing)?;
        HostParts::parse(host, self.config.domain_length).map(|parts| parts.subdomain)
    }

    fn matched(&self, route: &Route, captures: Vec<(String, String)>, token: Option<&str>) -> RouteMatch {
        let mut params: Params = captures.into_iter().collect();
        params.insert("controller", route.controller.as_str());
        params.insert("action", route.action.as_str());

        if let Some(constraint) = route.constraint.as_deref() {
            let token = token.map(str::to_lowercase);
            match constraint {
                SubdomainConstraint::Fixed(_) | SubdomainConstraint::Absent => {
                    params.insert("subdomain", ParamValue::Many(constraint.allowed_names()));
                }
                SubdomainConstraint::Model(_) => {
                    if let (Some(param), Some(token)) = (constraint.model_param(), token) {
                        params.insert(param, token.clone());
                        params.insert("subdomain", token);
                    }
                }
                SubdomainConstraint::Procedure(_) => {
                    if let Some(token) = token {
                        params.insert("subdomain", token);
                    }
                }
            }
        }

        info!(
            route = %route.label(),
            controller = %route.controller,
            action = %route.action,
            route_pattern = %route.pattern.as_str(),
            params = ?params,
            "Route matched"
        );

        RouteMatch {
            route_name: route.name.clone(),
            controller: route.controller.clone(),
            action: route.action.clone(),
            params,
        }
    }

    /// Find the route a generation target refers to.
    pub(crate) fn find_target(&self, target: &UrlTarget) -> Option<&Arc<Route>> {
        match target {
            UrlTarget::Named(name) => self.named(name),
            UrlTarget::Action { controller, action } => self
                .routes
                .iter()
                .find(|r| r.controller == *controller && r.action == *action),
        }
    }
}
