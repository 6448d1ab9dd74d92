//! Check tests.
//!
//! Each check is run through the real client so payload decoding, threshold
//! comparison, and error context are exercised together.

use meraki_health_check::checks::{network, organization, security, switch, wireless};
use meraki_health_check::{CheckDetails, Severity, Thresholds};
use serde_json::json;

use crate::mocks::MockTransport;

/// Thresholds as a config file would set them; unset keys keep defaults.
fn thresholds_from(yaml: &str) -> Thresholds {
    serde_yaml::from_str(yaml).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_firmware_mismatch_reports_one_issue() {
    let mock = MockTransport::new();
    mock.respond(
        "networks/N_1/firmwareUpgrades",
        json!({
            "currentVersion": {"firmware": "MX 17.10.2"},
            "lastUpgrade": {"toVersion": {"firmware": "MX 18.107"}}
        }),
    );
    let client = mock.client();

    let result = network::check_network_firmware(&client, "N_1", &Thresholds::default())
        .await
        .unwrap();

    assert!(!result.is_ok());
    assert_eq!(result.issues().len(), 1);
    let issue = &result.issues()[0];
    assert_eq!(issue.severity, Severity::Medium);
    assert_eq!(issue.category, "Firmware");
    assert_eq!(
        issue.message,
        "Network is not on the latest firmware version. Current: MX 17.10.2, Latest: MX 18.107"
    );
}

#[tokio::test(start_paused = true)]
async fn test_rf_profile_with_three_violations() {
    let mock = MockTransport::new();
    mock.respond(
        "networks/N_1/wireless/rfProfiles",
        json!([{
            "name": "High Density",
            "bandSelection": "5 GHz",
            "channelWidth": 80,
            "minBitrate": 6,
            "perSsidSettings": {}
        }]),
    );
    let client = mock.client();

    let result = wireless::check_wireless_rf_profiles(&client, "N_1", &Thresholds::default())
        .await
        .unwrap();

    let severities: Vec<Severity> = result.issues().iter().map(|i| i.severity).collect();
    assert_eq!(severities, vec![Severity::Medium, Severity::Low, Severity::Medium]);
    assert_eq!(
        result.issues()[2].message,
        "RF profile 'High Density' doesn't have minimum power settings for 2.4GHz"
    );
}

#[tokio::test(start_paused = true)]
async fn test_admin_thresholds_from_config() {
    let mock = MockTransport::new();
    mock.respond(
        "organizations/1/admins",
        json!([
            {"id": "a1", "email": "a@example.com", "orgAccess": "full", "lastActive": chrono::Utc::now().to_rfc3339()},
            {"id": "a2", "email": "b@example.com", "orgAccess": "full", "lastActive": chrono::Utc::now().to_rfc3339()},
            {"id": "a3", "email": "c@example.com", "orgAccess": "read-only", "lastActive": chrono::Utc::now().to_rfc3339()}
        ]),
    );
    let client = mock.client();
    let thresholds = thresholds_from("max_admins: 2\nmax_full_admins: 1\n");

    let result = organization::check_organization_admins(&client, "1", &thresholds)
        .await
        .unwrap();

    let categories: Vec<&str> = result.issues().iter().map(|i| i.category.as_str()).collect();
    assert_eq!(categories, vec!["Admin Count", "Admin Permissions"]);
    assert_eq!(
        result.issues()[0].message,
        "Number of admins (3) exceeds the recommended amount (2)"
    );
}

#[tokio::test(start_paused = true)]
async fn test_permissive_firewall_rule() {
    let mock = MockTransport::new();
    mock.respond(
        "networks/N_1/appliance/firewall/l3FirewallRules",
        json!({"rules": [
            {"comment": "Allow everything", "policy": "allow", "protocol": "any",
             "srcPort": "Any", "destPort": "Any", "srcCidr": "Any", "destCidr": "Any"},
            {"comment": "Default rule", "policy": "deny", "protocol": "any",
             "srcPort": "Any", "destPort": "Any", "srcCidr": "Any", "destCidr": "Any"}
        ]}),
    );
    let client = mock.client();

    let result = security::check_firewall_rules(&client, "N_1", &Thresholds::default())
        .await
        .unwrap();

    assert_eq!(result.worst_severity(), Some(Severity::High));
    assert!(result
        .issues()
        .iter()
        .any(|i| i.message == "Overly permissive rule found: Allow everything"));
    assert_eq!(result.details(), &CheckDetails::Firewall { rule_count: 2 });
}

#[tokio::test(start_paused = true)]
async fn test_stp_with_multiple_root_bridges() {
    let mock = MockTransport::new();
    mock.respond(
        "networks/N_1/switch/stp",
        json!({"stpInstances": [
            {"id": 1, "rootBridge": {"address": "00:11:22:33:44:55"}, "stpMode": "rstp"},
            {"id": 2, "rootBridge": {"address": "66:77:88:99:aa:bb"}, "stpMode": "rstp"}
        ]}),
    );
    let client = mock.client();

    let result = switch::check_switch_stp(&client, "N_1", &Thresholds::default())
        .await
        .unwrap();

    assert_eq!(result.issues().len(), 1);
    assert_eq!(result.issues()[0].severity, Severity::High);
    assert_eq!(result.issues()[0].category, "STP Root Bridge");
}

#[tokio::test(start_paused = true)]
async fn test_check_error_names_the_check() {
    let mock = MockTransport::new();
    mock.fail("networks/N_1/wireless/ssids", 403, "forbidden");
    let client = mock.client();

    let err = wireless::check_wireless_ssids(&client, "N_1", &Thresholds::default())
        .await
        .unwrap_err();

    assert_eq!(err.severity, Severity::High);
    assert!(err.message.starts_with("Failed to "), "{}", err.message);
    assert!(err.message.contains("HTTP 403: forbidden"));
}

#[tokio::test(start_paused = true)]
async fn test_undecodable_payload_is_an_error() {
    let mock = MockTransport::new();
    mock.respond("networks/N_1/appliance/security/intrusion", json!({"unexpected": true}));
    let client = mock.client();

    let err = security::check_intrusion_prevention(&client, "N_1", &Thresholds::default())
        .await
        .unwrap_err();

    assert!(err.message.contains("unexpected response from networks/N_1/appliance/security/intrusion"));
    assert_eq!(mock.call_count("networks/N_1/appliance/security/intrusion"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_port_utilization_over_threshold() {
    let mock = MockTransport::new();
    mock.respond(
        "devices/Q2SW-0001/switch/ports/statuses",
        json!([
            {"portId": "1", "status": "Connected"},
            {"portId": "2", "status": "Connected"},
            {"portId": "3", "status": "Connected"},
            {"portId": "4", "status": "Connected"},
            {"portId": "5", "status": "Disconnected"}
        ]),
    );
    let client = mock.client();

    let result = switch::check_switch_ports(&client, "Q2SW-0001", &Thresholds::default())
        .await
        .unwrap();

    assert_eq!(result.issues().len(), 0, "80% equals the threshold");

    let thresholds = thresholds_from("port_utilization: 50\n");
    let result = switch::check_switch_ports(&client, "Q2SW-0001", &thresholds)
        .await
        .unwrap();
    assert_eq!(result.issues().len(), 1);
    assert_eq!(result.issues()[0].category, "Port Utilization");
}
