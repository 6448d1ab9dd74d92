//! CLI integration tests.
//!
//! Tests for argument parsing and the library entry point the CLI drives.

use clap::Parser;
use meraki_health_check::cli::args::{Args, Command, OutputFormat};
use meraki_health_check::{run_health_check, AuditError, Config, ConfigError};
use std::path::PathBuf;

fn parse(args: &[&str]) -> Args {
    let mut argv = vec!["meraki-health-check"];
    argv.extend_from_slice(args);
    Args::try_parse_from(argv).unwrap()
}

#[test]
fn test_global_flags_after_subcommand() {
    let args = parse(&["run", "--config", "prod.yaml", "--quiet", "--format", "junit"]);

    assert_eq!(args.command(), Command::Run);
    assert_eq!(args.config, PathBuf::from("prod.yaml"));
    assert!(args.quiet);
    assert_eq!(args.format, OutputFormat::Junit);
}

#[test]
fn test_flags_without_subcommand_run_the_audit() {
    let args = parse(&["-v", "--timeout", "30"]);

    assert_eq!(args.command(), Command::Run);
    assert!(args.verbose);
    assert_eq!(args.timeout, Some(30.0));
}

#[test]
fn test_no_color_flag() {
    assert!(!parse(&["--no-color"]).use_color());
    assert!(!parse(&["-o", "report.txt"]).use_color());
}

#[test]
fn test_invalid_timeout_rejected() {
    assert!(Args::try_parse_from(["meraki-health-check", "--timeout", "soon"]).is_err());
}

#[test]
fn test_unknown_subcommand_rejected() {
    assert!(Args::try_parse_from(["meraki-health-check", "scan"]).is_err());
}

#[tokio::test]
async fn test_invalid_config_is_reported_before_any_request() {
    let config = Config::from_yaml_str("api_key: key\norganizations: []\n").unwrap();

    let err = run_health_check(&config).await.unwrap_err();

    assert!(matches!(err, AuditError::Config(ConfigError::Invalid(_))));
}
