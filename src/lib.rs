//! # subdomain-routes
//!
//! **subdomain-routes** makes a path router subdomain aware: routes can be
//! restricted to hosts such as `admin.example.com`, recognition injects the
//! matched subdomain into the request parameters, and URL generation decides
//! whether a link can stay a bare path or has to switch host.
//!
//! ## Overview
//!
//! Given an incoming request host, the crate derives a subdomain token
//! (`admin`, or `www.test` for multi-level subdomains), matches it against the
//! constraint of every candidate route, and injects it as a routing parameter.
//! In the other direction it resolves the subdomain a named route should be
//! served on, validates it with the same constraint logic, and returns either
//! `/items` or `http://admin.example.com/items`.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - **[`host`]** - Splitting hosts into subdomain and domain; subdomain syntax
//! - **[`constraint`]** - The four subdomain rules (fixed set, absent, model, procedure)
//! - **[`procs`]** - Registry of recognize/generate callbacks for procedure rules
//! - **[`router`]** - Route table, subdomain scopes, recognition and URL generation
//! - **[`request`]** - The request and parameter types the router reads and fills
//! - **[`config`]** - Domain length, scheme and default domain
//! - **[`error`]** - The [`RoutingError`] taxonomy
//! - **[`logging`]** - `tracing-subscriber` setup for applications and the CLI
//! - **[`cli`]** - The `subroutes` command-line tool
//!
//! ### Request Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant App
//!     participant RouteSet
//!     participant Host as host::HostParts
//!     participant Constraint as SubdomainConstraint
//!     participant Procs as SubdomainProcs
//!
//!     App->>RouteSet: recognize(request)
//!     RouteSet->>RouteSet: match method + path
//!     RouteSet->>Host: parse(host, domain_length)
//!     Host-->>RouteSet: subdomain token
//!     RouteSet->>Constraint: matches(token)
//!     Constraint->>Procs: recognize(id, token) (procedure rules)
//!     Procs-->>Constraint: truthy / falsy
//!     Constraint-->>RouteSet: bool
//!     RouteSet-->>App: RouteMatch { params + subdomain }
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use subdomain_routes::config::SubdomainConfig;
//! use subdomain_routes::request::Request;
//! use subdomain_routes::router::{RouteSet, ScopeOptions, UrlOptions};
//!
//! let mut routes = RouteSet::new(SubdomainConfig::with_domain_length(2));
//! routes
//!     .map_subdomain(["admin"], ScopeOptions::new(), |admin| {
//!         admin.resources("users");
//!     })
//!     .unwrap();
//! routes.draw(|map| {
//!     map.get(Some("home"), "/", "pages#home");
//! });
//!
//! let request = Request::get("/users").with_host("admin.example.com");
//! let matched = routes.recognize(&request).unwrap();
//! assert_eq!(matched.controller, "admin/users");
//! assert_eq!(matched.action, "index");
//!
//! let elsewhere = Request::get("/").with_host("www.example.com");
//! let url = routes
//!     .path_for(&UrlOptions::named("admin_users"), Some(&elsewhere))
//!     .unwrap();
//! assert_eq!(url, "http://admin.example.com/users");
//! ```
//!
//! ## Procedure Subdomains
//!
//! Subdomains backed by application data are declared with a procedure rule
//! and two callbacks:
//!
//! ```rust
//! use subdomain_routes::config::SubdomainConfig;
//! use subdomain_routes::request::Request;
//! use subdomain_routes::router::{RouteSet, ScopeOptions, SubdomainSpec, UrlOptions};
//!
//! let mut routes = RouteSet::new(SubdomainConfig::with_domain_length(2));
//! routes.recognize_subdomain("city", |city| Ok(["boston", "hobart"].contains(&city)));
//! routes.generate_subdomain("city", |_request, _context| Ok("Hobart"));
//! routes
//!     .map_subdomain([SubdomainSpec::proc("city")], ScopeOptions::new(), |city| {
//!         city.resources("events");
//!     })
//!     .unwrap();
//!
//! let request = Request::get("/events").with_host("boston.example.com");
//! assert_eq!(routes.recognize(&request).unwrap().param("subdomain"), Some("boston"));
//!
//! let url = routes.path_for(&UrlOptions::named("city_events"), Some(&request)).unwrap();
//! assert_eq!(url, "http://hobart.example.com/events");
//! ```
//!
//! ## Logging
//!
//! Registration, recognition and host decisions emit structured `tracing`
//! events. Applications install their own subscriber or use
//! [`logging::init_logging_with_config`].

pub mod cli;
pub mod config;
pub mod constraint;
pub mod error;
pub mod host;
pub mod logging;
pub mod procs;
pub mod request;
pub mod router;

pub use config::SubdomainConfig;
pub use constraint::SubdomainConstraint;
pub use error::{Result, RoutingError};
pub use procs::{SubdomainProcs, Truthiness};
pub use request::{ParamValue, Params, Request};
pub use router::{RouteMatch, RouteSet, UrlOptions};
