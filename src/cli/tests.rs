//! Unit tests for CLI commands

use crate::cli::{run, Cli, Commands};
use crate::config::SubdomainConfig;
use clap::Parser;

fn output(args: &[&str], config: &SubdomainConfig) -> String {
    let cli = Cli::try_parse_from(args).unwrap();
    let mut out = Vec::new();
    run(&cli, config, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_split_command_parses() {
    let cli = Cli::try_parse_from(["subroutes", "split", "admin.example.com", "-d", "2"]).unwrap();

    match cli.command {
        Commands::Split {
            host,
            domain_length,
            json,
        } => {
            assert_eq!(host, "admin.example.com");
            assert_eq!(domain_length.map(|n| n.get()), Some(2));
            assert!(!json);
        }
        _ => panic!("Expected Split command"),
    }
}

#[test]
fn test_split_rejects_zero_domain_length() {
    assert!(Cli::try_parse_from(["subroutes", "split", "example.com", "-d", "0"]).is_err());
}

#[test]
fn test_split_text_output() {
    let text = output(
        &["subroutes", "split", "www.test.example.com:8080", "--domain-length", "2"],
        &SubdomainConfig::default(),
    );
    assert_eq!(text, "subdomain: www.test\ndomain:    example.com:8080\n");
}

#[test]
fn test_split_uses_configured_domain_length() {
    let text = output(
        &["subroutes", "split", "a.b.example.co.uk"],
        &SubdomainConfig::with_domain_length(3),
    );
    assert!(text.starts_with("subdomain: a.b\n"));
}

#[test]
fn test_split_json_output() {
    let text = output(
        &["subroutes", "split", "Admin.Example.com", "--json"],
        &SubdomainConfig::default(),
    );
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["subdomain"], "admin");
    assert_eq!(value["domain"], "example.com");
    assert_eq!(value["ip"], false);
}

#[test]
fn test_split_ip_host() {
    let text = output(
        &["subroutes", "split", "207.192.69.152", "--json"],
        &SubdomainConfig::default(),
    );
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(value["subdomain"].is_null());
    assert_eq!(value["ip"], true);
}

#[test]
fn test_check_command() {
    let config = SubdomainConfig::default();
    assert_eq!(
        output(&["subroutes", "check", "Admin"], &config),
        "'admin' is a valid subdomain\n"
    );
    assert_eq!(
        output(&["subroutes", "check", "www!"], &config),
        "'www!' is not a valid subdomain\n"
    );

    let text = output(&["subroutes", "check", "bad_name", "--json"], &config);
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["valid"], false);
}
