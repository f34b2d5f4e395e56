//! Unit tests for CLI argument parsing

use crate::cli::{Cli, Commands, OutputFormat};
use clap::Parser;

#[test]
fn test_routes_command_defaults_to_text() {
    let cli = Cli::try_parse_from(["chainrouter", "routes", "--manifest", "r.yaml"]).unwrap();
    match cli.command {
        Commands::Routes { manifest, format } => {
            assert_eq!(manifest.to_string_lossy(), "r.yaml");
            assert_eq!(format, OutputFormat::Text);
        }
        Commands::Match { .. } => panic!("Expected Routes command"),
    }
}

#[test]
fn test_routes_command_json() {
    let cli = Cli::try_parse_from(["chainrouter", "routes", "-m", "r.yaml", "--format", "json"])
        .unwrap();
    assert!(matches!(
        cli.command,
        Commands::Routes {
            format: OutputFormat::Json,
            ..
        }
    ));
}

#[test]
fn test_match_command_positionals() {
    let cli = Cli::try_parse_from([
        "chainrouter",
        "match",
        "--manifest",
        "r.yaml",
        "--prefix",
        "/v2",
        "GET",
        "/v2/users/1",
    ])
    .unwrap();
    match cli.command {
        Commands::Match {
            prefix,
            method,
            path,
            ..
        } => {
            assert_eq!(prefix.as_deref(), Some("/v2"));
            assert_eq!(method, "GET");
            assert_eq!(path, "/v2/users/1");
        }
        Commands::Routes { .. } => panic!("Expected Match command"),
    }
}

#[test]
fn test_match_requires_path() {
    assert!(Cli::try_parse_from(["chainrouter", "match", "-m", "r.yaml", "GET"]).is_err());
}
