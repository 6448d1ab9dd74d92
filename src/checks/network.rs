//! Network-wide checks: health alerts, firmware currency, device status.

use serde::Serialize;
use tracing::{info, warn};

use crate::api::client::RemoteClient;
use crate::api::models::{Device, FirmwareUpgrades, HealthAlert};
use crate::engine::orchestrator::{ProductScope, RegisteredCheck};
use crate::error::RemoteError;
use crate::thresholds::Thresholds;
use crate::{CheckDetails, CheckResult, Severity};

/// Firmware position of one product line in a network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FirmwareStatus {
    pub product: String,
    pub current_version: String,
    pub latest_version: Option<String>,
    pub upgrade_scheduled: bool,
}

pub fn network_checks() -> Vec<RegisteredCheck> {
    vec![
        RegisteredCheck::new(
            "health",
            "Open critical and warning health alerts",
            ProductScope::Any,
            |client, network_id, thresholds| Box::pin(check_network_health(client, network_id, thresholds)),
        ),
        RegisteredCheck::new(
            "firmware",
            "Firmware behind the latest stable release",
            ProductScope::Any,
            |client, network_id, thresholds| Box::pin(check_network_firmware(client, network_id, thresholds)),
        ),
        RegisteredCheck::new(
            "devices",
            "Devices that are not online",
            ProductScope::Any,
            |client, network_id, thresholds| Box::pin(check_network_devices(client, network_id, thresholds)),
        ),
    ]
}

pub async fn check_network_health(
    client: &RemoteClient,
    network_id: &str,
    _thresholds: &Thresholds,
) -> Result<CheckResult, RemoteError> {
    info!(network_id, "checking network health");
    let alerts = client
        .network_health_alerts(network_id)
        .await
        .map_err(|e| e.context("check network health"))?;
    Ok(evaluate_health(&alerts))
}

pub(crate) fn evaluate_health(alerts: &[HealthAlert]) -> CheckResult {
    let mut result = CheckResult::new(CheckDetails::NetworkHealth {
        alert_count: alerts.len(),
    });

    for alert in alerts {
        let (severity, label) = match alert.severity.as_str() {
            "critical" => (Severity::High, "Critical"),
            "warning" => (Severity::Medium, "Warning"),
            _ => continue,
        };
        warn!(category = %alert.category, alert_type = %alert.alert_type, "health alert");
        result.add_issue(
            severity,
            "Network Health",
            format!("{label} health alert: {} - {}", alert.category, alert.alert_type),
        );
    }

    result
}

pub async fn check_network_firmware(
    client: &RemoteClient,
    network_id: &str,
    _thresholds: &Thresholds,
) -> Result<CheckResult, RemoteError> {
    info!(network_id, "checking network firmware");
    let upgrades = client
        .network_firmware_upgrades(network_id)
        .await
        .map_err(|e| e.context("check network firmware"))?;
    Ok(evaluate_firmware(&upgrades))
}

pub(crate) fn evaluate_firmware(upgrades: &FirmwareUpgrades) -> CheckResult {
    if upgrades.products.is_empty() {
        return evaluate_single_firmware(upgrades);
    }

    let statuses: Vec<FirmwareStatus> = upgrades
        .products
        .iter()
        .map(|(product, firmware)| FirmwareStatus {
            product: product.clone(),
            current_version: firmware.current_version.name().unwrap_or_default().to_string(),
            latest_version: firmware
                .available_versions
                .iter()
                .rev()
                .find(|v| v.release_type.as_deref() == Some("stable"))
                .and_then(|v| v.name())
                .map(str::to_string),
            upgrade_scheduled: firmware
                .next_upgrade
                .as_ref()
                .and_then(|next| next.time.as_deref())
                .is_some_and(|time| !time.is_empty()),
        })
        .collect();

    let mut result = CheckResult::new(CheckDetails::Firmware {
        products: statuses.clone(),
    });

    for status in &statuses {
        let Some(latest) = status.latest_version.as_deref() else {
            continue;
        };
        if latest == status.current_version {
            continue;
        }

        warn!(product = %status.product, current = %status.current_version, latest, "firmware behind stable");
        if status.upgrade_scheduled {
            result.add_issue(
                Severity::Medium,
                "Firmware",
                format!(
                    "{} firmware {} is not the latest stable release ({}); an upgrade is scheduled",
                    status.product, status.current_version, latest
                ),
            );
        } else {
            result.add_issue(
                Severity::High,
                "Firmware",
                format!(
                    "{} firmware {} is not the latest stable release ({}) and no upgrade is scheduled",
                    status.product, status.current_version, latest
                ),
            );
        }
    }

    result
}

fn evaluate_single_firmware(upgrades: &FirmwareUpgrades) -> CheckResult {
    let current = upgrades
        .current_version
        .as_ref()
        .and_then(|v| v.firmware.clone())
        .unwrap_or_default();
    let latest = upgrades
        .last_upgrade
        .as_ref()
        .and_then(|u| u.to_version.firmware.clone())
        .unwrap_or_default();

    let mut result = CheckResult::new(CheckDetails::Firmware {
        products: vec![FirmwareStatus {
            product: "network".to_string(),
            current_version: current.clone(),
            latest_version: Some(latest.clone()),
            upgrade_scheduled: false,
        }],
    });

    if current != latest {
        warn!(current = %current, latest = %latest, "network not on latest firmware");
        result.add_issue(
            Severity::Medium,
            "Firmware",
            format!("Network is not on the latest firmware version. Current: {current}, Latest: {latest}"),
        );
    }

    result
}

pub async fn check_network_devices(
    client: &RemoteClient,
    network_id: &str,
    _thresholds: &Thresholds,
) -> Result<CheckResult, RemoteError> {
    info!(network_id, "checking network devices");
    let devices = client
        .network_devices(network_id)
        .await
        .map_err(|e| e.context("check network devices"))?;
    Ok(evaluate_devices(&devices))
}

pub(crate) fn evaluate_devices(devices: &[Device]) -> CheckResult {
    let offline: Vec<&Device> = devices
        .iter()
        .filter(|d| d.status.as_deref() != Some("online"))
        .collect();

    let mut result = CheckResult::new(CheckDetails::Devices {
        total: devices.len(),
        offline: offline.len(),
    });

    for device in offline {
        let status = device.status.as_deref().unwrap_or("unknown");
        warn!(serial = %device.serial, status, "device not online");
        result.add_issue(
            Severity::High,
            "Device Status",
            format!("Device {} is {}", device.label(), status),
        );
    }

    result
}
