//! CLI argument parsing tests.

use std::time::Duration;

use cfops::cli::{Cli, Command, DeleteTarget, Entity};
use clap::Parser;

#[test]
fn test_cli_parses_list_subcommand() {
    let cli = Cli::parse_from(["cfops", "list", "organizations"]);

    assert!(!cli.json);
    match cli.command {
        Command::List { entity } => assert_eq!(entity, Entity::Organization),
        _ => panic!("Expected List command"),
    }
}

#[test]
fn test_cli_parses_get_subcommand() {
    let cli = Cli::parse_from(["cfops", "--org", "my-org", "get", "space", "dev"]);

    assert_eq!(cli.org.as_deref(), Some("my-org"));
    match cli.command {
        Command::Get { entity, name } => {
            assert_eq!(entity, Entity::Space);
            assert_eq!(name, "dev");
        }
        _ => panic!("Expected Get command"),
    }
}

#[test]
fn test_cli_parses_delete_subcommand() {
    let cli = Cli::parse_from([
        "cfops",
        "delete",
        "service-instance",
        "my-db",
        "--org",
        "my-org",
        "--space",
        "dev",
    ]);

    assert_eq!(cli.space.as_deref(), Some("dev"));
    match cli.command {
        Command::Delete { entity, name } => {
            assert_eq!(entity, DeleteTarget::ServiceInstance);
            assert_eq!(name, "my-db");
        }
        _ => panic!("Expected Delete command"),
    }
}

#[test]
fn test_global_json_flag() {
    let cli = Cli::parse_from(["cfops", "list", "spaces", "--json"]);
    assert!(cli.json);
}

#[test]
fn test_entity_variants() {
    let cases = [
        ("organization", Entity::Organization),
        ("orgs", Entity::Organization),
        ("space", Entity::Space),
        ("spaces", Entity::Space),
        ("space-quota", Entity::SpaceQuota),
        ("space-quotas", Entity::SpaceQuota),
    ];

    for (arg, expected) in cases {
        let cli = Cli::parse_from(["cfops", "list", arg]);
        match cli.command {
            Command::List { entity } => assert_eq!(entity, expected, "argument {arg}"),
            _ => panic!("Expected List command"),
        }
    }
}

#[test]
fn test_unknown_delete_target_is_rejected() {
    let result = Cli::try_parse_from(["cfops", "delete", "organization", "my-org"]);
    assert!(result.is_err());
}

#[test]
fn test_poll_flags_map_to_poll_config() {
    let cli = Cli::parse_from([
        "cfops",
        "--poll-interval-ms",
        "250",
        "--timeout-secs",
        "30",
        "delete",
        "space",
        "dev",
    ]);

    let config = cli.poll_config();
    assert_eq!(config.poll_interval, Some(Duration::from_millis(250)));
    assert_eq!(config.timeout, Some(Duration::from_secs(30)));
}

#[test]
fn test_poll_config_defaults_without_flags() {
    let cli = Cli::parse_from(["cfops", "delete", "space", "dev"]);
    let config = cli.poll_config();
    assert_eq!(config.poll_interval, None);
    assert_eq!(config.timeout, None);
}
