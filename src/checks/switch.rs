//! Switching checks.
//!
//! `stp` runs once per switch network. `ports` and `port_security` run once
//! per switch serial. `vlan_configuration` reads the appliance VLAN table
//! and runs for appliance networks.

use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

use super::percent;
use crate::api::client::RemoteClient;
use crate::api::models::{StpSettings, SwitchPort, SwitchPortStatus, Vlan};
use crate::engine::orchestrator::{ProductScope, RegisteredCheck};
use crate::error::RemoteError;
use crate::thresholds::Thresholds;
use crate::{CheckDetails, CheckResult, Severity};

/// Checks run against the switch network as a whole
pub fn switch_network_checks() -> Vec<RegisteredCheck> {
    vec![RegisteredCheck::new(
        "stp",
        "Spanning tree instance count, root bridge, and mode",
        ProductScope::Switch,
        |client, network_id, thresholds| Box::pin(check_switch_stp(client, network_id, thresholds)),
    )]
}

/// Checks run once per switch serial
pub fn switch_device_checks() -> Vec<RegisteredCheck> {
    vec![
        RegisteredCheck::new(
            "ports",
            "Connected port utilization",
            ProductScope::Switch,
            |client, serial, thresholds| Box::pin(check_switch_ports(client, serial, thresholds)),
        ),
        RegisteredCheck::new(
            "port_security",
            "Open access ports and unrestricted trunks",
            ProductScope::Switch,
            |client, serial, thresholds| Box::pin(check_port_security(client, serial, thresholds)),
        ),
    ]
}

pub fn vlan_checks() -> Vec<RegisteredCheck> {
    vec![RegisteredCheck::new(
        "vlan_configuration",
        "VLAN count and overlapping subnets",
        ProductScope::Appliance,
        |client, network_id, thresholds| Box::pin(check_vlan_configuration(client, network_id, thresholds)),
    )]
}

pub async fn check_switch_stp(
    client: &RemoteClient,
    network_id: &str,
    thresholds: &Thresholds,
) -> Result<CheckResult, RemoteError> {
    info!(network_id, "checking switch STP");
    let stp = client
        .switch_stp(network_id)
        .await
        .map_err(|e| e.context("check switch STP"))?;
    Ok(evaluate_stp(&stp, thresholds))
}

pub(crate) fn evaluate_stp(stp: &StpSettings, thresholds: &Thresholds) -> CheckResult {
    let instances = &stp.stp_instances;
    let mut result = CheckResult::new(CheckDetails::Stp {
        stp_instances: instances.len(),
    });

    if instances.len() > thresholds.stp_instances {
        warn!(instances = instances.len(), "too many STP instances");
        result.add_issue(
            Severity::Medium,
            "STP Instances",
            format!(
                "Number of STP instances ({}) exceeds the recommended amount ({})",
                instances.len(),
                thresholds.stp_instances
            ),
        );
    }

    let roots: BTreeSet<&str> = instances
        .iter()
        .map(|i| i.root_bridge.address.as_str())
        .collect();
    if roots.len() > 1 {
        let listed: Vec<&str> = roots.into_iter().collect();
        warn!(roots = %listed.join(", "), "multiple STP root bridges");
        result.add_issue(
            Severity::High,
            "STP Root Bridge",
            format!("Multiple STP root bridges detected: {}", listed.join(", ")),
        );
    }

    for instance in instances {
        if instance.stp_mode.as_deref() != Some("rstp") {
            let id = instance
                .id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            result.add_issue(
                Severity::Medium,
                "STP Mode",
                format!("STP instance {id} is not using RSTP mode"),
            );
        }
    }

    result
}

pub async fn check_switch_ports(
    client: &RemoteClient,
    serial: &str,
    thresholds: &Thresholds,
) -> Result<CheckResult, RemoteError> {
    info!(serial, "checking switch ports");
    let statuses = client
        .switch_port_statuses(serial)
        .await
        .map_err(|e| e.context("check switch ports"))?;
    Ok(evaluate_ports(&statuses, thresholds))
}

pub(crate) fn evaluate_ports(statuses: &[SwitchPortStatus], thresholds: &Thresholds) -> CheckResult {
    let connected = statuses.iter().filter(|p| p.status == "Connected").count();
    let utilization = percent(connected, statuses.len());

    let mut result = CheckResult::new(CheckDetails::Ports {
        connected_ports: connected,
        total_ports: statuses.len(),
        utilization,
    });

    if utilization > thresholds.port_utilization {
        warn!(utilization, "high switch port utilization");
        result.add_issue(
            Severity::Medium,
            "Port Utilization",
            format!(
                "Port utilization ({:.2}%) exceeds the recommended threshold ({}%)",
                utilization, thresholds.port_utilization
            ),
        );
    }

    result
}

pub async fn check_port_security(
    client: &RemoteClient,
    serial: &str,
    _thresholds: &Thresholds,
) -> Result<CheckResult, RemoteError> {
    info!(serial, "checking switch port security");
    let ports = client
        .switch_ports(serial)
        .await
        .map_err(|e| e.context("check switch port security"))?;
    Ok(evaluate_port_security(&ports))
}

pub(crate) fn evaluate_port_security(ports: &[SwitchPort]) -> CheckResult {
    let enabled: Vec<&SwitchPort> = ports.iter().filter(|p| p.enabled).collect();
    let mut result = CheckResult::new(CheckDetails::PortSecurity {
        ports_checked: enabled.len(),
    });

    for port in enabled {
        match port.port_type.as_deref() {
            Some("access")
                if port
                    .access_policy_type
                    .as_deref()
                    .is_some_and(|p| p.eq_ignore_ascii_case("open")) =>
            {
                result.add_issue(
                    Severity::Low,
                    "Port Security",
                    format!("Access port {} has no access policy", port.port_id),
                );
            }
            Some("trunk")
                if port
                    .allowed_vlans
                    .as_deref()
                    .is_some_and(|v| v.trim().eq_ignore_ascii_case("all")) =>
            {
                warn!(port = %port.port_id, "trunk allows all VLANs");
                result.add_issue(
                    Severity::Medium,
                    "Port Security",
                    format!("Trunk port {} allows all VLANs", port.port_id),
                );
            }
            _ => {}
        }
    }

    result
}

pub async fn check_vlan_configuration(
    client: &RemoteClient,
    network_id: &str,
    thresholds: &Thresholds,
) -> Result<CheckResult, RemoteError> {
    info!(network_id, "checking VLAN configuration");
    let vlans = client
        .appliance_vlans(network_id)
        .await
        .map_err(|e| e.context("check VLAN configuration"))?;
    Ok(evaluate_vlans(&vlans, thresholds))
}

pub(crate) fn evaluate_vlans(vlans: &[Vlan], thresholds: &Thresholds) -> CheckResult {
    let mut result = CheckResult::new(CheckDetails::Vlans {
        vlan_count: vlans.len(),
    });

    if vlans.len() > thresholds.max_vlans {
        warn!(vlans = vlans.len(), "too many VLANs");
        result.add_issue(
            Severity::Medium,
            "VLAN Configuration",
            format!(
                "Number of VLANs ({}) exceeds the recommended amount ({})",
                vlans.len(),
                thresholds.max_vlans
            ),
        );
    }

    let mut by_subnet: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for vlan in vlans {
        if let Some(subnet) = vlan.subnet.as_deref().filter(|s| !s.is_empty()) {
            by_subnet.entry(subnet).or_default().push(vlan.id.to_string());
        }
    }

    for (subnet, ids) in by_subnet.into_iter().filter(|(_, ids)| ids.len() > 1) {
        warn!(subnet, "subnet shared by several VLANs");
        result.add_issue(
            Severity::High,
            "VLAN Configuration",
            format!("Subnet {subnet} is assigned to multiple VLANs: {}", ids.join(", ")),
        );
    }

    result
}
