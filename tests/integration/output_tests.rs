//! Output formatting tests.
//!
//! Tests for terminal, JSON, and JUnit XML output formatters.

use chrono::{TimeZone, Utc};
use meraki_health_check::cli::args::OutputFormat;
use meraki_health_check::cli::output::{
    get_formatter, JsonFormatter, JunitFormatter, OutputFormatter, TerminalFormatter,
};
use meraki_health_check::engine::result::SwitchChecks;
use meraki_health_check::{
    CheckDetails, CheckResult, EntityResult, NetworkReport, OrganizationReport, RemoteError,
    ResultTree, Severity,
};
use std::collections::BTreeMap;

fn passing() -> CheckResult {
    CheckResult::new(CheckDetails::None)
}

fn create_sample_tree() -> ResultTree {
    let mut admins = CheckResult::new(CheckDetails::Admins {
        admin_count: 12,
        full_access_admins: 2,
        inactive_admins: 0,
    });
    admins.add_issue(
        Severity::Medium,
        "Admin Count",
        "Number of admins (12) exceeds the recommended amount (10)",
    );

    let mut ports = CheckResult::new(CheckDetails::PortSecurity { ports_checked: 48 });
    ports.add_issue(Severity::Low, "Port Security", "Access port 7 has no access policy");

    let mut switch_checks = SwitchChecks::default();
    switch_checks.checks.insert("stp".into(), passing());
    switch_checks
        .devices
        .entry("port_security".into())
        .or_default()
        .insert("Q2SW-0001".into(), ports);

    let network = NetworkReport {
        name: "HQ <main>".into(),
        product_types: vec!["appliance".into(), "switch".into()],
        network_checks: BTreeMap::from([("health".to_string(), passing())]),
        switch_checks,
    };

    let org = OrganizationReport {
        org_checks: BTreeMap::from([("admins".to_string(), admins)]),
        networks: BTreeMap::from([
            ("N_1".to_string(), EntityResult::Completed(network)),
            (
                "N_2".to_string(),
                EntityResult::failed(&RemoteError::new(
                    "Network checks did not finish within 5.0s",
                    "Timeout",
                    Severity::High,
                )),
            ),
        ]),
    };

    ResultTree {
        timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        total_duration_ms: 2500,
        organizations: BTreeMap::from([
            ("111".to_string(), EntityResult::Completed(org)),
            (
                "222".to_string(),
                EntityResult::failed(&RemoteError::api(
                    "Failed to check organization admins: API request failed after 3 attempts: HTTP 401: unauthorized",
                )),
            ),
        ]),
    }
}

fn empty_tree() -> ResultTree {
    ResultTree {
        timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        total_duration_ms: 0,
        organizations: BTreeMap::new(),
    }
}

#[test]
fn test_terminal_output_lists_every_branch() {
    let formatter = TerminalFormatter::new(false, false, false);
    let output = formatter.format(&create_sample_tree());

    assert!(output.contains("ORGANIZATION 111"));
    assert!(output.contains("[FAIL] admins"));
    assert!(output.contains("[MEDIUM] Admin Count: Number of admins (12)"));
    assert!(output.contains("Network N_1 (HQ <main>) [appliance, switch]"));
    assert!(output.contains("[PASS] health"));
    assert!(output.contains("[WARN] port_security[Q2SW-0001]"));
    assert!(output.contains("[ERROR] HIGH - Timeout: Network checks did not finish within 5.0s"));
    assert!(output.contains("ORGANIZATION 222"));
    assert!(output.contains("HTTP 401: unauthorized"));
    assert!(output.contains("Total time: 2.5s"));
    assert!(output.contains("Exit code: 1 (failures detected)"));
    assert!(!output.contains("\x1b["));
}

#[test]
fn test_terminal_quiet_hides_passing_checks() {
    let formatter = TerminalFormatter::new(false, false, true);
    let output = formatter.format(&create_sample_tree());

    assert!(!output.contains("[PASS]"));
    assert!(output.contains("[FAIL] admins"));
    assert!(output.contains("[ERROR]"));
}

#[test]
fn test_terminal_verbose_shows_details() {
    let formatter = TerminalFormatter::new(false, true, false);
    let output = formatter.format(&create_sample_tree());

    assert!(output.contains(r#"details: {"kind":"admins","admin_count":12"#));
}

#[test]
fn test_terminal_color_output() {
    let formatter = TerminalFormatter::new(true, false, false);
    let output = formatter.format(&create_sample_tree());

    assert!(output.contains("\x1b[31m[FAIL]\x1b[0m"));
    assert!(output.contains("\x1b[32m[PASS]\x1b[0m"));
    assert!(output.contains("\x1b[33m[WARN]\x1b[0m"));
}

#[test]
fn test_json_output_is_valid() {
    let formatter = JsonFormatter::new(true);
    let output = formatter.format(&create_sample_tree());

    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["summary"]["failed_organizations"], 1);
    assert_eq!(value["summary"]["failed_networks"], 1);
    assert_eq!(value["summary"]["checks_run"], 4);
    assert_eq!(
        value["organizations"]["111"]["networks"]["N_2"]["error"],
        "HIGH - Timeout: Network checks did not finish within 5.0s"
    );
    assert_eq!(
        value["organizations"]["111"]["networks"]["N_1"]["switch_checks"]["port_security"]["Q2SW-0001"]
            ["issues"][0]["severity"],
        "low"
    );
    assert!(value["organizations"]["222"]["error"]
        .as_str()
        .unwrap()
        .contains("HTTP 401"));
}

#[test]
fn test_junit_output_structure() {
    let output = JunitFormatter::new().format(&create_sample_tree());

    assert!(output.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(output.contains("<testsuites tests=\"6\" failures=\"2\" errors=\"2\" time=\"2.500\">"));
    assert!(output.contains("<testsuite name=\"organization.111\""));
    assert!(output.contains("<testsuite name=\"organization.222\""));
    assert!(output.contains(
        "<testcase name=\"admins\" classname=\"meraki-health-check.111\">"
    ));
    assert!(output.contains(
        "<testcase name=\"health\" classname=\"meraki-health-check.111.N_1\" />"
    ));
    assert!(output.contains("<failure message=\"1 issue(s)\">"));
    assert!(output.contains("<testcase name=\"network N_2\" classname=\"meraki-health-check.111\">"));
    assert!(output.contains("<testcase name=\"organization 222\" classname=\"meraki-health-check\">"));
    assert!(output.ends_with("</testsuites>"));
}

#[test]
fn test_empty_tree_renders_in_every_format() {
    let tree = empty_tree();

    let text = TerminalFormatter::new(false, false, false).format(&tree);
    assert!(text.contains("SUMMARY: 0 organizations, 0 networks"));
    assert!(text.contains("Exit code: 0 (all checks passed)"));

    let json: serde_json::Value =
        serde_json::from_str(&JsonFormatter::new(false).format(&tree)).unwrap();
    assert_eq!(json["organizations"], serde_json::json!({}));

    let xml = JunitFormatter::new().format(&tree);
    assert!(xml.contains("<testsuites tests=\"0\" failures=\"0\" errors=\"0\""));
}

#[test]
fn test_get_formatter() {
    let tree = create_sample_tree();

    let json = get_formatter(OutputFormat::Json, false, false, false).format(&tree);
    assert!(json.trim_start().starts_with('{'));

    let junit = get_formatter(OutputFormat::Junit, false, false, false).format(&tree);
    assert!(junit.starts_with("<?xml"));

    let text = get_formatter(OutputFormat::Text, false, false, false).format(&tree);
    assert!(text.contains("SUMMARY:"));
}
