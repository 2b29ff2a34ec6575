//! # Router Module
//!
//! The router module holds the route table and the two adapters that make it
//! subdomain aware: recognition of inbound requests and generation of paths
//! and URLs.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Registering routes inside subdomain scopes ([`RouteSet::map_subdomain`])
//! - Matching requests on method, path *and* host subdomain ([`RouteSet::recognize`])
//! - Injecting the recognized subdomain (and model ids) into the parameters
//! - Generating paths, or absolute URLs when the host must change
//!   ([`RouteSet::path_for`], [`RouteSet::url_for`])
//!
//! ## Architecture
//!
//! The router works in two phases:
//!
//! 1. **Registration**: each scope turns its subdomain specifiers into one
//!    [`SubdomainConstraint`](crate::constraint::SubdomainConstraint) per
//!    registration, and every route declared in the scope carries it. Paths
//!    such as `/items/{id}` are compiled into regexes once.
//!
//! 2. **Per request**: recognition tries routes in registration order and
//!    treats the subdomain constraint as an extra filter after the path match.
//!    Generation resolves the target's subdomain and compares it with the
//!    ambient request's host.
//!
//! ## Example
//!
//! ```rust
//! use subdomain_routes::config::SubdomainConfig;
//! use subdomain_routes::request::Request;
//! use subdomain_routes::router::{RouteSet, ScopeOptions, SubdomainSpec};
//!
//! let mut routes = RouteSet::new(SubdomainConfig::with_domain_length(2));
//! routes
//!     .map_subdomain([SubdomainSpec::model("city")], ScopeOptions::new(), |city| {
//!         city.resources("events");
//!     })
//!     .unwrap();
//!
//! let request = Request::get("/events").with_host("canberra.example.com");
//! let matched = routes.recognize(&request).unwrap();
//! assert_eq!(matched.param("city_id"), Some("canberra"));
//! assert_eq!(matched.controller, "city/events");
//! ```

mod core;
mod pattern;
mod scope;
mod url;

pub use core::{Route, RouteMatch, RouteSet};
pub use pattern::PathPattern;
pub use scope::{Prefix, RouteScope, ScopeOptions, SubdomainSpec};
pub use url::{HostDecision, RequestedSubdomain, UrlOptions, UrlTarget};
