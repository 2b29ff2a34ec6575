//! Subdomain scopes: turning a list of subdomain specifiers into constrained
//! route registrations.
//!
//! ```rust
//! use subdomain_routes::config::SubdomainConfig;
//! use subdomain_routes::router::{RouteSet, ScopeOptions};
//!
//! let mut routes = RouteSet::new(SubdomainConfig::with_domain_length(2));
//! routes
//!     .map_subdomain(["admin"], ScopeOptions::new(), |admin| {
//!         admin.resources("users");
//!     })
//!     .unwrap();
//! assert!(routes.named("admin_users").is_some());
//! ```

use super::core::{Route, RouteSet};
use super::pattern::PathPattern;
use crate::constraint::SubdomainConstraint;
use crate::error::{Result, RoutingError};
use crate::host::{normalize_subdomain, valid_subdomain};
use http::Method;
use std::sync::Arc;
use tracing::warn;

/// One entry of the subdomain list passed to [`RouteSet::map_subdomain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubdomainSpec {
    /// A literal subdomain such as `"admin"`.
    Name(String),
    /// No subdomain at all (`example.com`).
    Absent,
    /// Any subdomain, identifying an instance of the named model.
    Model(String),
    /// Subdomains accepted by the named registered procedure.
    Proc(String),
}

impl SubdomainSpec {
    pub fn model(name: impl Into<String>) -> Self {
        SubdomainSpec::Model(name.into())
    }

    pub fn proc(id: impl Into<String>) -> Self {
        SubdomainSpec::Proc(id.into())
    }
}

impl From<&str> for SubdomainSpec {
    fn from(name: &str) -> Self {
        SubdomainSpec::Name(name.to_string())
    }
}

impl From<String> for SubdomainSpec {
    fn from(name: String) -> Self {
        SubdomainSpec::Name(name)
    }
}

impl From<Option<&str>> for SubdomainSpec {
    fn from(name: Option<&str>) -> Self {
        match name {
            Some(name) => SubdomainSpec::Name(name.to_string()),
            None => SubdomainSpec::Absent,
        }
    }
}

/// How a scope prefixes route names or controller paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Prefix {
    /// Derived from the subdomain (or model/proc name).
    #[default]
    Default,
    /// No prefix.
    Disabled,
    /// An explicit prefix.
    Named(String),
}

/// Options of a subdomain scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeOptions {
    /// Route-name prefix
    pub name: Prefix,
    /// Controller namespace
    pub namespace: Prefix,
}

impl ScopeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Prefix::Named(name.into());
        self
    }

    /// Leave route names unprefixed and register the whole list as one route set.
    #[must_use]
    pub fn no_name(mut self) -> Self {
        self.name = Prefix::Disabled;
        self
    }

    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Prefix::Named(namespace.into());
        self
    }

    #[must_use]
    pub fn no_namespace(mut self) -> Self {
        self.namespace = Prefix::Disabled;
        self
    }
}

/// One registration produced from a specifier list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScopePlan {
    pub(crate) name_prefix: Option<String>,
    pub(crate) namespace: Option<String>,
    pub(crate) constraint: SubdomainConstraint,
}

/// Validate `specs` and compute the registrations they stand for.
pub(crate) fn plan_scopes(specs: Vec<SubdomainSpec>, options: &ScopeOptions) -> Result<Vec<ScopePlan>> {
    if specs.is_empty() {
        return Err(RoutingError::invalid_specifiers(
            "at least one subdomain must be given",
        ));
    }

    let rule = specs
        .iter()
        .find(|s| matches!(s, SubdomainSpec::Model(_) | SubdomainSpec::Proc(_)));
    if let Some(rule) = rule {
        if specs.len() > 1 {
            return Err(RoutingError::invalid_specifiers(
                "a model or proc subdomain must be given on its own",
            ));
        }
        let (rule_name, constraint) = match rule {
            SubdomainSpec::Model(name) => {
                let name = rule_identifier(name)?;
                (name.clone(), SubdomainConstraint::Model(name))
            }
            SubdomainSpec::Proc(id) => {
                let id = rule_identifier(id)?;
                (id.clone(), SubdomainConstraint::Procedure(id))
            }
            SubdomainSpec::Name(_) | SubdomainSpec::Absent => {
                return Err(RoutingError::invalid_specifiers("unexpected subdomain rule"))
            }
        };
        let name_prefix = resolve_name(&options.name, Some(&rule_name));
        return Ok(vec![plan(name_prefix, &options.namespace, constraint)]);
    }

    let mut tokens: Vec<Option<String>> = Vec::new();
    for spec in specs {
        let token = match spec {
            SubdomainSpec::Name(name) => {
                let name = normalize_subdomain(&name);
                if !valid_subdomain(&name) {
                    return Err(RoutingError::invalid_specifiers(format!(
                        "'{name}' is not a valid subdomain"
                    )));
                }
                Some(name)
            }
            _ => None,
        };
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }

    if tokens.iter().all(Option::is_none) {
        let name_prefix = resolve_name(&options.name, None);
        return Ok(vec![plan(
            name_prefix,
            &options.namespace,
            SubdomainConstraint::Absent,
        )]);
    }

    match &options.name {
        Prefix::Default => Ok(tokens
            .into_iter()
            .map(|token| match token {
                Some(name) => plan(
                    Some(identifier(&name)),
                    &options.namespace,
                    SubdomainConstraint::fixed([Some(name)]),
                ),
                None => plan(None, &options.namespace, SubdomainConstraint::Absent),
            })
            .collect()),
        Prefix::Disabled => Ok(vec![plan(
            None,
            &options.namespace,
            SubdomainConstraint::fixed(tokens),
        )]),
        Prefix::Named(name) => Ok(vec![plan(
            Some(identifier(name)),
            &options.namespace,
            SubdomainConstraint::fixed(tokens),
        )]),
    }
}

fn plan(name_prefix: Option<String>, namespace: &Prefix, constraint: SubdomainConstraint) -> ScopePlan {
    let namespace = match namespace {
        Prefix::Default => name_prefix.clone(),
        Prefix::Disabled => None,
        Prefix::Named(ns) => Some(ns.trim_matches('/').to_string()).filter(|ns| !ns.is_empty()),
    };
    ScopePlan {
        name_prefix,
        namespace,
        constraint,
    }
}

fn resolve_name(name: &Prefix, default: Option<&str>) -> Option<String> {
    match name {
        Prefix::Default => default.map(identifier),
        Prefix::Disabled => None,
        Prefix::Named(name) => Some(identifier(name)),
    }
}

fn rule_identifier(name: &str) -> Result<String> {
    let name = name.trim().to_lowercase();
    if name.is_empty() {
        return Err(RoutingError::invalid_specifiers(
            "model and proc subdomains need a name",
        ));
    }
    Ok(name)
}

/// Route-name-safe form of a subdomain (`www.test` -> `www_test`).
fn identifier(name: &str) -> String {
    name.trim().replace(['.', '-'], "_")
}

/// Handle passed to route declaration blocks.
///
/// Routes declared through a scope inherit its name prefix, controller
/// namespace and subdomain constraint.
#[derive(Debug)]
pub struct RouteScope<'a> {
    set: &'a mut RouteSet,
    name_prefix: Option<String>,
    namespace: Option<String>,
    constraint: Option<Arc<SubdomainConstraint>>,
}

impl<'a> RouteScope<'a> {
    pub(crate) fn new(
        set: &'a mut RouteSet,
        name_prefix: Option<String>,
        namespace: Option<String>,
        constraint: Option<Arc<SubdomainConstraint>>,
    ) -> Self {
        Self {
            set,
            name_prefix,
            namespace,
            constraint,
        }
    }

    /// Declare one route. `to` is `"controller#action"`.
    ///
    /// The route name, if given, gets the scope's name prefix.
    pub fn route(&mut self, name: Option<&str>, method: Method, path: &str, to: &str) -> &mut Self {
        let (controller, action) = to.split_once('#').unwrap_or((to, "index"));
        let name = name.map(|n| self.route_name(None, n));
        self.add(name, method, path, controller, action);
        self
    }

    /// Declare a `GET` route.
    pub fn get(&mut self, name: Option<&str>, path: &str, to: &str) -> &mut Self {
        self.route(name, Method::GET, path, to)
    }

    /// Declare the seven conventional routes of a resource.
    ///
    /// `resources("items")` in an `admin` scope declares `admin_items`
    /// (`GET`/`POST /items`), `new_admin_item`, `admin_item`
    /// (`GET`/`PUT`/`PATCH`/`DELETE /items/{id}`) and `edit_admin_item`.
    ///
    /// A plural without a trailing `s` (`people`) names its collection route
    /// `people_index` so it does not collide with the member route `people`.
    pub fn resources(&mut self, plural: &str) -> &mut Self {
        let plural = plural.trim_matches('/');
        let singular = plural.strip_suffix('s').unwrap_or(plural);
        let collection = format!("/{plural}");
        let member = format!("/{plural}/{{id}}");

        let index = if singular == plural {
            warn!(
                resource = %plural,
                "Resource name has no distinct singular, collection route suffixed with _index"
            );
            self.route_name(None, &format!("{plural}_index"))
        } else {
            self.route_name(None, plural)
        };
        let new = self.route_name(Some("new"), singular);
        let show = self.route_name(None, singular);
        let edit = self.route_name(Some("edit"), singular);

        self.add(Some(index), Method::GET, &collection, plural, "index");
        self.add(None, Method::POST, &collection, plural, "create");
        self.add(Some(new), Method::GET, &format!("{collection}/new"), plural, "new");
        self.add(Some(edit), Method::GET, &format!("{member}/edit"), plural, "edit");
        self.add(Some(show), Method::GET, &member, plural, "show");
        self.add(None, Method::PUT, &member, plural, "update");
        self.add(None, Method::PATCH, &member, plural, "update");
        self.add(None, Method::DELETE, &member, plural, "destroy");
        self
    }

    fn route_name(&self, action_prefix: Option<&str>, base: &str) -> String {
        action_prefix
            .into_iter()
            .chain(self.name_prefix.as_deref())
            .chain(std::iter::once(base))
            .collect::<Vec<_>>()
            .join("_")
    }

    fn add(&mut self, name: Option<String>, method: Method, path: &str, controller: &str, action: &str) {
        let controller = match &self.namespace {
            Some(ns) => format!("{ns}/{controller}"),
            None => controller.to_string(),
        };
        self.set.push_route(Route {
            name,
            method,
            pattern: PathPattern::new(path),
            controller,
            action: action.to_string(),
            constraint: self.constraint.clone(),
        });
    }
}
