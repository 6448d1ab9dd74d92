//! Organization-wide checks: administrators, inventory, licensing, alerts.

use chrono::{DateTime, Duration, Utc};
use std::cmp::Ordering;
use tracing::{info, warn};

use super::percent;
use crate::api::client::RemoteClient;
use crate::api::models::{Admin, AlertSettings, InventoryDevice, License};
use crate::engine::orchestrator::{ProductScope, RegisteredCheck};
use crate::error::RemoteError;
use crate::thresholds::{compare_versions, Thresholds};
use crate::{CheckDetails, CheckResult, Severity};

/// Alert types every organization is expected to have configured
pub const IMPORTANT_ALERTS: [&str; 3] = ["gateway_down", "vpn_connectivity_change", "excessive_dhcp_leases"];

/// Get all organization checks, in execution order
pub fn organization_checks() -> Vec<RegisteredCheck> {
    vec![
        RegisteredCheck::new(
            "admins",
            "Administrator count, full-access count, and inactivity",
            ProductScope::Any,
            |client, org_id, thresholds| Box::pin(check_organization_admins(client, org_id, thresholds)),
        ),
        RegisteredCheck::new(
            "inventory",
            "Inventory utilization, unclaimed devices, and firmware floor",
            ProductScope::Any,
            |client, org_id, thresholds| Box::pin(check_organization_inventory(client, org_id, thresholds)),
        ),
        RegisteredCheck::new(
            "licensing",
            "License expiration and utilization",
            ProductScope::Any,
            |client, org_id, thresholds| Box::pin(check_organization_licensing(client, org_id, thresholds)),
        ),
        RegisteredCheck::new(
            "alerts",
            "Organization-wide alert configuration",
            ProductScope::Any,
            |client, org_id, thresholds| Box::pin(check_organization_alerts(client, org_id, thresholds)),
        ),
    ]
}

pub async fn check_organization_admins(
    client: &RemoteClient,
    org_id: &str,
    thresholds: &Thresholds,
) -> Result<CheckResult, RemoteError> {
    info!(org_id, "checking organization admins");
    let admins = client
        .organization_admins(org_id)
        .await
        .map_err(|e| e.context("check organization admins"))?;
    Ok(evaluate_admins(&admins, thresholds, Utc::now()))
}

pub(crate) fn evaluate_admins(admins: &[Admin], thresholds: &Thresholds, now: DateTime<Utc>) -> CheckResult {
    let full_access = admins
        .iter()
        .filter(|a| a.org_access.as_deref() == Some("full"))
        .count();

    // Never having been active counts as inactive. A window reaching past
    // the representable range has no cutoff.
    let cutoff = Duration::try_days(thresholds.inactive_admin_days)
        .and_then(|window| now.checked_sub_signed(window));
    let inactive = admins
        .iter()
        .filter(|a| match (a.last_active, cutoff) {
            (None, _) => true,
            (Some(seen), Some(cutoff)) => seen < cutoff,
            (Some(_), None) => false,
        })
        .count();

    let mut result = CheckResult::new(CheckDetails::Admins {
        admin_count: admins.len(),
        full_access_admins: full_access,
        inactive_admins: inactive,
    });

    if admins.len() > thresholds.max_admins {
        warn!(admin_count = admins.len(), "too many organization admins");
        result.add_issue(
            Severity::Medium,
            "Admin Count",
            format!(
                "Number of admins ({}) exceeds the recommended amount ({})",
                admins.len(),
                thresholds.max_admins
            ),
        );
    }

    if full_access > thresholds.max_full_admins {
        warn!(full_access, "too many full-access admins");
        result.add_issue(
            Severity::High,
            "Admin Permissions",
            format!(
                "Number of admins with full access ({}) exceeds the recommended amount ({})",
                full_access, thresholds.max_full_admins
            ),
        );
    }

    if inactive > 0 {
        warn!(inactive, "inactive admins found");
        result.add_issue(
            Severity::Low,
            "Inactive Admins",
            format!(
                "Found {} inactive admins (last active > {} days ago)",
                inactive, thresholds.inactive_admin_days
            ),
        );
    }

    result
}

pub async fn check_organization_inventory(
    client: &RemoteClient,
    org_id: &str,
    thresholds: &Thresholds,
) -> Result<CheckResult, RemoteError> {
    info!(org_id, "checking organization inventory");
    let inventory = client
        .organization_inventory(org_id)
        .await
        .map_err(|e| e.context("check organization inventory"))?;
    Ok(evaluate_inventory(&inventory, thresholds))
}

pub(crate) fn evaluate_inventory(inventory: &[InventoryDevice], thresholds: &Thresholds) -> CheckResult {
    let total = inventory.len();
    let claimed = inventory.iter().filter(|d| d.is_claimed()).count();
    let unclaimed = total - claimed;
    let utilization = percent(claimed, total);

    let outdated = inventory
        .iter()
        .filter_map(|d| d.firmware.as_deref())
        .filter(|fw| !fw.is_empty())
        .filter(|fw| compare_versions(fw, &thresholds.min_firmware_version) == Ordering::Less)
        .count();

    let mut result = CheckResult::new(CheckDetails::Inventory {
        utilization,
        unclaimed_devices: unclaimed,
        outdated_firmware: outdated,
    });

    if utilization > thresholds.inventory_utilization {
        warn!(utilization, "high inventory utilization");
        result.add_issue(
            Severity::Medium,
            "Inventory Utilization",
            format!(
                "Inventory utilization ({:.2}%) exceeds the recommended threshold ({}%)",
                utilization, thresholds.inventory_utilization
            ),
        );
    }

    if unclaimed > thresholds.max_unclaimed_devices {
        warn!(unclaimed, "too many unclaimed devices");
        result.add_issue(
            Severity::Low,
            "Unclaimed Devices",
            format!(
                "Number of unclaimed devices ({}) exceeds the recommended amount ({})",
                unclaimed, thresholds.max_unclaimed_devices
            ),
        );
    }

    if outdated > 0 {
        warn!(outdated, "devices below minimum firmware");
        result.add_issue(
            Severity::Medium,
            "Outdated Firmware",
            format!(
                "Found {} devices with firmware older than {}",
                outdated, thresholds.min_firmware_version
            ),
        );
    }

    result
}

pub async fn check_organization_licensing(
    client: &RemoteClient,
    org_id: &str,
    thresholds: &Thresholds,
) -> Result<CheckResult, RemoteError> {
    info!(org_id, "checking organization licensing");
    let licenses = client
        .organization_licenses(org_id)
        .await
        .map_err(|e| e.context("check organization licensing"))?;
    Ok(evaluate_licensing(&licenses, thresholds, Utc::now()))
}

/// Whole days from `now` until `expires`, rounded toward negative infinity.
pub(crate) fn days_until(expires: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (expires - now).num_seconds().div_euclid(86_400)
}

pub(crate) fn evaluate_licensing(licenses: &[License], thresholds: &Thresholds, now: DateTime<Utc>) -> CheckResult {
    for license in licenses {
        let id = license.id.as_deref().unwrap_or("unknown");
        if license.device_count.is_none() || license.unused_count.is_none() {
            warn!(license = id, "license has no device counts, counted as 0");
        }
        if license.expiration_date.is_none() {
            warn!(license = id, "license has no expiration date, skipped for expiry");
        }
    }

    let licensed: u64 = licenses.iter().filter_map(|l| l.device_count).sum();
    let used: u64 = licenses
        .iter()
        .filter_map(|l| l.device_count.map(|count| count.saturating_sub(l.unused_count.unwrap_or(0))))
        .sum();
    let utilization = if licensed > 0 {
        used as f64 / licensed as f64 * 100.0
    } else {
        0.0
    };

    let mut result = CheckResult::new(CheckDetails::Licensing {
        licenses: licenses.len(),
        utilization,
    });

    for license in licenses {
        let Some(expires) = license.expiration_date else {
            continue;
        };
        let days = days_until(expires, now);
        if days < thresholds.license_expiration_warning {
            let id = license.id.as_deref().unwrap_or("unknown");
            warn!(license = id, days, "license expiring");
            let severity = if days < 0 { Severity::High } else { Severity::Medium };
            result.add_issue(
                severity,
                "License Expiration",
                format!("License {id} will expire in {days} days"),
            );
        }
    }

    if utilization > thresholds.license_utilization_warning {
        warn!(utilization, "high license utilization");
        result.add_issue(
            Severity::Medium,
            "License Utilization",
            format!("License utilization ({utilization:.2}%) is high"),
        );
    }

    result
}

pub async fn check_organization_alerts(
    client: &RemoteClient,
    org_id: &str,
    _thresholds: &Thresholds,
) -> Result<CheckResult, RemoteError> {
    info!(org_id, "checking organization alerts");
    let settings = client
        .organization_alert_settings(org_id)
        .await
        .map_err(|e| e.context("check organization alerts"))?;
    Ok(evaluate_alerts(&settings))
}

pub(crate) fn evaluate_alerts(settings: &AlertSettings) -> CheckResult {
    let mut result = CheckResult::new(CheckDetails::Alerts {
        configured_alerts: settings.alerts.len(),
    });

    if settings.enabled != Some(true) {
        warn!("organization-wide alerts are disabled");
        result.add_issue(
            Severity::High,
            "Alert Configuration",
            "Organization-wide alerts are disabled",
        );
    }

    if settings.alerts.is_empty() {
        warn!("no alert configurations found");
        result.add_issue(
            Severity::Medium,
            "Alert Configuration",
            "No alert configurations found",
        );
    }

    for important in IMPORTANT_ALERTS {
        if !settings.alerts.iter().any(|a| a.alert_type == important) {
            warn!(alert = important, "important alert not configured");
            result.add_issue(
                Severity::Medium,
                "Alert Configuration",
                format!("Important alert '{important}' is not configured"),
            );
        }
    }

    result
}
