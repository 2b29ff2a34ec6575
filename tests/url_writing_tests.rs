mod common;

use common::{routes, routes_from_yaml, with_host};
use std::sync::{Arc, Mutex};
use subdomain_routes::request::{Params, Request};
use subdomain_routes::router::{HostDecision, RouteSet, ScopeOptions, SubdomainSpec, UrlOptions};
use subdomain_routes::RoutingError;

fn www_and_users() -> RouteSet {
    routes_from_yaml(
        r#"
domain_length: 2
scopes:
  - subdomains: [www]
    resources: [users]
resources: [users]
"#,
    )
}

#[test]
fn test_missing_or_ip_host_for_subdomain_route() {
    let routes = www_and_users();
    let www_users = UrlOptions::named("www_users");
    let users = UrlOptions::named("users");

    let ip = with_host("207.192.69.152");
    for current in [None, Some(&ip)] {
        let err = routes.path_for(&www_users, current).unwrap_err();
        assert!(matches!(err, RoutingError::HostNotSupplied), "{err}");
        assert_eq!(routes.path_for(&users, current).unwrap(), "/users");
    }
}

fn single_scope(subdomain: Option<&str>) -> RouteSet {
    let mut routes = routes();
    routes
        .map_subdomain([subdomain], ScopeOptions::new().no_name(), |map| {
            map.resources("users");
        })
        .unwrap();
    routes
}

#[test]
fn test_single_subdomain_url_writing() {
    for (subdomain, host) in [(Some("admin"), "admin.example.com"), (None, "example.com")] {
        let routes = single_scope(subdomain);
        let users = UrlOptions::named("users");
        let here = with_host(host);
        let other = with_host("other.example.com");
        let absolute = format!("http://{host}/users");

        assert_eq!(routes.url_for(&users, Some(&here)).unwrap(), absolute);
        assert_eq!(routes.url_for(&users, Some(&other)).unwrap(), absolute);
        assert_eq!(routes.path_for(&users, Some(&here)).unwrap(), "/users");
        assert_eq!(routes.path_for(&users, Some(&other)).unwrap(), absolute);

        let explicit = match subdomain {
            Some(name) => users.clone().subdomain(name),
            None => users.clone().no_subdomain(),
        };
        assert_eq!(routes.path_for(&explicit, Some(&other)).unwrap(), absolute);
        assert_eq!(routes.path_for(&explicit, Some(&here)).unwrap(), "/users");

        let err = routes
            .path_for(&users.clone().subdomain("other"), Some(&here))
            .unwrap_err();
        assert!(matches!(err, RoutingError::InvalidSubdomain { .. }));
    }
}

#[test]
fn test_multiple_subdomain_url_writing() {
    let cases: [(&[Option<&str>], [&str; 2]); 2] = [
        (&[Some("books"), Some("dvds")], ["books.example.com", "dvds.example.com"]),
        (&[None, Some("www")], ["example.com", "www.example.com"]),
    ];
    for (subdomains, hosts) in cases {
        let mut routes = routes();
        routes
            .map_subdomain(subdomains.iter().copied(), ScopeOptions::new().no_name(), |map| {
                map.resources("items");
            })
            .unwrap();
        let items = UrlOptions::named("items");

        for host in hosts {
            let here = with_host(host);
            assert_eq!(
                routes.url_for(&items, Some(&here)).unwrap(),
                format!("http://{host}/items")
            );
            assert_eq!(routes.path_for(&items, Some(&here)).unwrap(), "/items");
        }

        let other = with_host("other.example.com");
        let item = UrlOptions::named("item").param("id", 1);
        assert!(matches!(
            routes.url_for(&item, Some(&other)).unwrap_err(),
            RoutingError::InvalidSubdomain { .. }
        ));
        assert!(routes.path_for(&item, Some(&other)).is_err());

        for (subdomain, new_host, old_host) in [
            (subdomains[0], hosts[0], hosts[1]),
            (subdomains[1], hosts[1], hosts[0]),
        ] {
            let options = match subdomain {
                Some(name) => items.clone().subdomain(name),
                None => items.clone().no_subdomain(),
            };
            assert_eq!(
                routes.path_for(&options, Some(&with_host(old_host))).unwrap(),
                format!("http://{new_host}/items")
            );
            assert!(routes
                .path_for(&items.clone().subdomain("other"), Some(&with_host(old_host)))
                .is_err());
        }
    }
}

#[test]
fn test_supplied_subdomain_is_downcased() {
    let mut routes = routes();
    routes
        .map_subdomain(["www1", "www2"], ScopeOptions::new().no_name(), |map| {
            map.resources("users");
        })
        .unwrap();
    let current = with_host("www.example.com");

    for (mixed, lower) in [("Www1", "www1"), ("WWW2", "www2")] {
        assert_eq!(
            routes
                .url_for(&UrlOptions::named("users").subdomain(mixed), Some(&current))
                .unwrap(),
            format!("http://{lower}.example.com/users")
        );
    }
}

#[test]
fn test_multi_level_host_regenerates_with_other_subdomain() {
    let routes = routes_from_yaml(
        r#"
domain_length: 2
scopes:
  - subdomains: [admin]
    resources: [users]
"#,
    );
    assert_eq!(
        routes
            .path_for(
                &UrlOptions::named("admin_users"),
                Some(&with_host("www.test.example.com"))
            )
            .unwrap(),
        "http://admin.example.com/users"
    );
}

#[test]
fn test_for_action_target() {
    let routes = routes_from_yaml(
        r#"
domain_length: 2
scopes:
  - subdomains: [admin]
    named: false
    resources: [items]
"#,
    );
    let options = UrlOptions::for_action("items", "show").param("id", 4);
    assert_eq!(
        routes.path_for(&options, Some(&with_host("admin.example.com"))).unwrap(),
        "/items/4"
    );
}

/// Records every token passed to the `city` recognizer.
fn city_routes(accept: &'static [&'static str]) -> (RouteSet, Arc<Mutex<Vec<String>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    let mut routes = routes();
    routes.recognize_subdomain("city", move |city| {
        log.lock().unwrap().push(city.to_string());
        Ok(accept.iter().any(|a| *a == city))
    });
    routes
        .map_subdomain([SubdomainSpec::proc("city")], ScopeOptions::new(), |city| {
            city.resources("events");
        })
        .unwrap();
    (routes, seen)
}

fn seen(log: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
    log.lock().unwrap().clone()
}

#[test]
fn test_proc_without_recognizer_is_a_routing_error() {
    let mut routes = routes();
    routes
        .map_subdomain([SubdomainSpec::proc("city")], ScopeOptions::new(), |city| {
            city.resources("events");
        })
        .unwrap();
    let current = with_host("boston.example.com");
    let events = UrlOptions::named("city_events");
    assert!(matches!(
        routes.url_for(&events, Some(&current)).unwrap_err(),
        RoutingError::InvalidSubdomain { .. }
    ));
    assert!(matches!(
        routes.path_for(&events, None).unwrap_err(),
        RoutingError::GeneratorMissing { ref id } if id == "city"
    ));
    // an IP host has no subdomain to inherit, same as no host at all
    assert!(matches!(
        routes.path_for(&events, Some(&with_host("207.192.69.152"))).unwrap_err(),
        RoutingError::GeneratorMissing { ref id } if id == "city"
    ));
}

#[test]
fn test_explicit_proc_subdomain_must_be_well_formed() {
    let mut routes = routes();
    routes.recognize_subdomain("city", |_| Ok(true));
    routes
        .map_subdomain([SubdomainSpec::proc("city")], ScopeOptions::new(), |city| {
            city.resources("events");
        })
        .unwrap();
    let current = with_host("www.example.com");

    let err = routes
        .path_for(&UrlOptions::named("city_events").subdomain("bad!name"), Some(&current))
        .unwrap_err();
    assert!(matches!(
        err,
        RoutingError::InvalidSubdomain { subdomain: Some(ref token), .. } if token == "bad!name"
    ));
    assert_eq!(
        routes
            .path_for(&UrlOptions::named("city_events").subdomain("Boston"), Some(&current))
            .unwrap(),
        "http://boston.example.com/events"
    );
}

#[test]
fn test_proc_recognizes_ambient_subdomain() {
    let (routes, log) = city_routes(&["boston"]);
    let current = with_host("boston.example.com");
    let events = UrlOptions::named("city_events");

    assert_eq!(
        routes.url_for(&events, Some(&current)).unwrap(),
        "http://boston.example.com/events"
    );
    assert_eq!(routes.path_for(&events, Some(&current)).unwrap(), "/events");
    assert_eq!(seen(&log), vec!["boston", "boston"]);
}

#[test]
fn test_proc_rejects_ambient_subdomain() {
    let (routes, log) = city_routes(&[]);
    let current = with_host("www.example.com");
    let events = UrlOptions::named("city_events");

    assert!(routes.url_for(&events, Some(&current)).is_err());
    assert!(routes.path_for(&events, Some(&current)).is_err());
    assert_eq!(seen(&log), vec!["www", "www"]);
}

#[test]
fn test_proc_explicit_subdomain() {
    let (routes, log) = city_routes(&["boston"]);
    let current = with_host("www.example.com");
    let boston = UrlOptions::named("city_events").subdomain("Boston");

    assert_eq!(
        routes.url_for(&boston, Some(&current)).unwrap(),
        "http://boston.example.com/events"
    );
    assert_eq!(
        routes.path_for(&boston, Some(&current)).unwrap(),
        "http://boston.example.com/events"
    );

    let hobart = UrlOptions::named("city_events").subdomain("hobart");
    assert!(routes.url_for(&hobart, Some(&current)).unwrap_err().is_not_found());
    assert!(routes.path_for(&hobart, Some(&current)).is_err());
    assert_eq!(seen(&log), vec!["boston", "boston", "hobart", "hobart"]);

    let absent = UrlOptions::named("city_events").no_subdomain();
    assert!(matches!(
        routes.path_for(&absent, Some(&current)).unwrap_err(),
        RoutingError::InvalidSubdomain { subdomain: None, .. }
    ));
}

/// `city` routes whose generator returns `output` and records its inputs.
fn generated_city_routes(
    output: &'static str,
) -> (RouteSet, Arc<Mutex<Vec<String>>>, Arc<Mutex<Vec<(bool, Option<Params>)>>>) {
    let (routes, recognized) = city_routes(&["canberra", "hobart"]);
    let calls = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&calls);
    routes.generate_subdomain("city", move |request: Option<&Request>, context: Option<&Params>| {
        log.lock()
            .unwrap()
            .push((request.is_some(), context.cloned()));
        Ok(output)
    });
    (routes, recognized, calls)
}

#[test]
fn test_generator_output_is_downcased() {
    let (routes, recognized, _) = generated_city_routes("Canberra");
    assert_eq!(
        routes
            .path_for(&UrlOptions::named("city_events"), Some(&with_host("www.example.com")))
            .unwrap(),
        "http://canberra.example.com/events"
    );
    assert_eq!(seen(&recognized), vec!["canberra"]);
}

#[test]
fn test_generator_receives_request_and_context() {
    let (routes, _, calls) = generated_city_routes("canberra");
    let current = with_host("www.example.com");

    routes
        .path_for(&UrlOptions::named("city_events"), Some(&current))
        .unwrap();
    let context = Params::new().with("city_id", 2);
    routes
        .path_for(&UrlOptions::named("city_events").context(context.clone()), None)
        .unwrap_err();

    let calls = calls.lock().unwrap().clone();
    assert_eq!(calls, vec![(true, None), (false, Some(context))]);
}

#[test]
fn test_generator_with_default_domain() {
    let config = subdomain_routes::SubdomainConfig::with_domain_length(2).default_domain("example.com");
    let mut routes = RouteSet::new(config);
    routes.recognize_subdomain("city", |city| Ok(city == "canberra"));
    routes.generate_subdomain("city", |_, context: Option<&Params>| {
        Ok(match context.and_then(|c| c.get_str("city")) {
            Some(city) => city.to_string(),
            None => String::new(),
        })
    });
    routes
        .map_subdomain([SubdomainSpec::proc("city")], ScopeOptions::new(), |city| {
            city.resources("events");
        })
        .unwrap();

    let options = UrlOptions::named("city_events").context(Params::new().with("city", "canberra"));
    assert_eq!(
        routes.path_for(&options, None).unwrap(),
        "http://canberra.example.com/events"
    );
}

#[derive(Debug)]
struct GeneratorFailed;

impl std::fmt::Display for GeneratorFailed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("no city in session")
    }
}

impl std::error::Error for GeneratorFailed {}

#[test]
fn test_generator_errors_propagate() {
    let (routes, _) = city_routes(&["canberra"]);
    routes.generate_subdomain("city", |_, _| -> anyhow::Result<String> { Err(GeneratorFailed.into()) });

    let err = routes
        .path_for(&UrlOptions::named("city_events"), Some(&with_host("www.example.com")))
        .unwrap_err();
    assert!(err.callback_error().unwrap().is::<GeneratorFailed>());
    assert_eq!(err.to_string(), "no city in session");
}

#[test]
fn test_generated_subdomain_is_recognized() {
    let current = with_host("www.example.com");
    let events = UrlOptions::named("city_events");

    let (routes, recognized, _) = generated_city_routes("www");
    assert!(matches!(
        routes.path_for(&events, Some(&current)).unwrap_err(),
        RoutingError::InvalidSubdomain { ref subdomain, .. } if subdomain.as_deref() == Some("www")
    ));
    assert_eq!(seen(&recognized), vec!["www"]);

    let (routes, _, _) = generated_city_routes("hobart");
    assert!(routes.path_for(&events, Some(&current)).is_ok());
}

#[test]
fn test_malformed_generated_subdomain() {
    let (routes, recognized, _) = generated_city_routes("www!");
    let err = routes
        .path_for(&UrlOptions::named("city_events"), Some(&with_host("www.example.com")))
        .unwrap_err();
    assert!(matches!(err, RoutingError::InvalidSubdomain { .. }));
    assert!(seen(&recognized).is_empty());
}

#[test]
fn test_blank_generated_subdomain_skips_checks() {
    let (routes, recognized, _) = generated_city_routes("");
    let current = with_host("www.example.com");
    let events = UrlOptions::named("city_events");

    assert_eq!(
        routes.host_decision(&events, Some(&current)).unwrap(),
        HostDecision::Host("example.com".to_string())
    );
    assert!(seen(&recognized).is_empty());
}

#[test]
fn test_explicit_subdomain_skips_generator() {
    let (routes, recognized, calls) = generated_city_routes("canberra");
    let current = with_host("www.example.com");

    assert_eq!(
        routes
            .path_for(&UrlOptions::named("city_events").subdomain("hobart"), Some(&current))
            .unwrap(),
        "http://hobart.example.com/events"
    );
    assert!(routes
        .path_for(&UrlOptions::named("city_events").subdomain("www"), Some(&current))
        .is_err());
    assert!(calls.lock().unwrap().is_empty());
    assert_eq!(seen(&recognized), vec!["hobart", "www"]);
}

#[test]
fn test_query_string_and_scheme() {
    let config = subdomain_routes::SubdomainConfig::with_domain_length(2)
        .scheme(subdomain_routes::config::Scheme::Https);
    let mut routes = RouteSet::new(config);
    routes
        .map_subdomain(["admin"], ScopeOptions::new(), |admin| {
            admin.resources("users");
        })
        .unwrap();

    let options = UrlOptions::named("admin_users").param("page", 2);
    assert_eq!(
        routes.url_for(&options, Some(&with_host("www.example.com:8443"))).unwrap(),
        "https://admin.example.com:8443/users?page=2"
    );
}
