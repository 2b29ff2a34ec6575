//! Shared fixtures for integration tests.
//!
//! Route tables are described in YAML so each test file can declare the scopes
//! it needs next to its assertions.

#![allow(dead_code)]

use serde::Deserialize;
use subdomain_routes::config::SubdomainConfig;
use subdomain_routes::request::Request;
use subdomain_routes::router::{RouteSet, ScopeOptions, SubdomainSpec};

/// One `map_subdomain` call.
#[derive(Debug, Deserialize)]
pub struct ScopeFixture {
    /// Literal subdomains; `~` stands for "no subdomain"
    #[serde(default)]
    pub subdomains: Vec<Option<String>>,
    pub model: Option<String>,
    #[serde(rename = "proc")]
    pub procedure: Option<String>,
    /// `false` leaves route names unprefixed
    #[serde(default = "default_true")]
    pub named: bool,
    pub name: Option<String>,
    pub namespace: Option<String>,
    #[serde(default)]
    pub resources: Vec<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct RoutesFixture {
    pub domain_length: Option<usize>,
    #[serde(default)]
    pub scopes: Vec<ScopeFixture>,
    /// Resources declared outside any subdomain scope
    #[serde(default)]
    pub resources: Vec<String>,
}

impl ScopeFixture {
    fn specs(&self) -> Vec<SubdomainSpec> {
        if let Some(model) = &self.model {
            return vec![SubdomainSpec::model(model.as_str())];
        }
        if let Some(id) = &self.procedure {
            return vec![SubdomainSpec::proc(id.as_str())];
        }
        self.subdomains
            .iter()
            .map(|s| SubdomainSpec::from(s.as_deref()))
            .collect()
    }

    fn options(&self) -> ScopeOptions {
        let mut options = ScopeOptions::new();
        if !self.named {
            options = options.no_name();
        }
        if let Some(name) = &self.name {
            options = options.name(name.as_str());
        }
        if let Some(namespace) = &self.namespace {
            options = options.namespace(namespace.as_str());
        }
        options
    }
}

/// Build a route set from a YAML description.
pub fn routes_from_yaml(yaml: &str) -> RouteSet {
    let fixture: RoutesFixture = serde_yaml::from_str(yaml).expect("valid routes fixture");
    let config = SubdomainConfig::with_domain_length(fixture.domain_length.unwrap_or(0));
    let mut routes = RouteSet::new(config);
    for scope in &fixture.scopes {
        routes
            .map_subdomain(scope.specs(), scope.options(), |map| {
                for resource in &scope.resources {
                    map.resources(resource);
                }
            })
            .expect("valid scope fixture");
    }
    routes.draw(|map| {
        for resource in &fixture.resources {
            map.resources(resource);
        }
    });
    routes
}

/// An empty route set with a domain length of 2.
pub fn routes() -> RouteSet {
    RouteSet::new(SubdomainConfig::with_domain_length(2))
}

/// A `GET /` request on `host`, used as the ambient request for generation.
pub fn with_host(host: &str) -> Request {
    Request::get("/").with_host(host)
}
