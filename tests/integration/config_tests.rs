//! Configuration loading tests.
//!
//! Files are written to a temporary directory and loaded the way the CLI
//! loads them.

use meraki_health_check::{Config, ConfigError};
use std::io::Write;
use std::time::Duration;
use tempfile::{Builder, TempDir};

fn write_config(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn test_load_yaml_config() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "config.yaml",
        r#"
api_key: "0123456789abcdef"
organizations:
  - "549236"
  - "549237"
thresholds:
  max_admins: 4
  inactive_admin_days: 60
  "5G Channel Utilization": 65
  "5G Min Bitrate": 24
  "2.4G Min Bitrate": 11
api:
  max_retries: 5
  retry_interval: 2
  rate_limit: 5
  network_timeout: 120
"#,
    );

    let config = Config::load(&path).unwrap();

    assert_eq!(config.api_key, "0123456789abcdef");
    assert_eq!(config.organizations, vec!["549236", "549237"]);
    assert_eq!(config.thresholds.max_admins, 4);
    assert_eq!(config.thresholds.inactive_admin_days, 60);
    assert_eq!(config.thresholds.channel_utilization_5g, 65.0);
    assert_eq!(config.thresholds.min_bitrate_5g, 24.0);
    assert_eq!(config.thresholds.min_bitrate_24g, 11.0);
    assert_eq!(config.thresholds.max_vlans, 20);
    assert_eq!(config.api.max_retries, 5);
    assert_eq!(config.api.retry_delay(), Duration::from_secs(2));
    assert_eq!(config.api.rate_limit, 5);
    assert_eq!(config.api.network_deadline(), Some(Duration::from_secs(120)));
}

#[test]
fn test_load_toml_config_by_extension() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "audit.toml",
        r#"
api_key = "0123456789abcdef"
organizations = ["1"]

[thresholds]
max_firewall_rules = 25
"#,
    );

    let config = Config::load(&path).unwrap();

    assert_eq!(config.thresholds.max_firewall_rules, 25);
    assert_eq!(config.api.max_retries, 3);
}

#[test]
fn test_unknown_threshold_keys_are_kept_aside() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "config.yml",
        "api_key: k\norganizations: [\"1\"]\nthresholds:\n  max_admins: 3\n  max_widgets: 9\n",
    );

    let config = Config::load(&path).unwrap();

    assert_eq!(config.thresholds.max_admins, 3);
    let unknown: Vec<&str> = config.thresholds.unrecognized_keys().collect();
    assert_eq!(unknown, vec!["max_widgets"]);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.yaml");

    let err = Config::load(&path).unwrap_err();

    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("absent.yaml"));
}

#[test]
fn test_malformed_yaml_is_parse_error() {
    let file = Builder::new().suffix(".yaml").tempfile().unwrap();
    std::fs::write(file.path(), "organizations: [unterminated\n").unwrap();

    let err = Config::load(file.path()).unwrap_err();

    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn test_invalid_settings_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "config.yaml",
        "api_key: k\norganizations: [\"1\"]\napi:\n  rate_limit: 0\n",
    );

    let err = Config::load(&path).unwrap_err();

    assert!(matches!(err, ConfigError::Invalid(_)));
    assert!(err.to_string().contains("rate_limit"));
}
