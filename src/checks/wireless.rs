//! Wireless checks: SSIDs, RF profiles, channel utilization.

use tracing::{info, warn};

use crate::api::client::RemoteClient;
use crate::api::models::{ChannelUtilization, RfProfile, Ssid};
use crate::engine::orchestrator::{ProductScope, RegisteredCheck};
use crate::error::RemoteError;
use crate::thresholds::Thresholds;
use crate::{CheckDetails, CheckResult, Severity};

pub fn wireless_checks() -> Vec<RegisteredCheck> {
    vec![
        RegisteredCheck::new(
            "wireless_ssids",
            "Number of enabled SSIDs",
            ProductScope::Wireless,
            |client, network_id, thresholds| Box::pin(check_wireless_ssids(client, network_id, thresholds)),
        ),
        RegisteredCheck::new(
            "wireless_rf_profiles",
            "RF profile channel width, bitrates, and 2.4 GHz power",
            ProductScope::Wireless,
            |client, network_id, thresholds| Box::pin(check_wireless_rf_profiles(client, network_id, thresholds)),
        ),
        RegisteredCheck::new(
            "channel_utilization",
            "Per-AP channel utilization",
            ProductScope::Wireless,
            |client, network_id, thresholds| Box::pin(check_channel_utilization(client, network_id, thresholds)),
        ),
    ]
}

pub async fn check_wireless_ssids(
    client: &RemoteClient,
    network_id: &str,
    thresholds: &Thresholds,
) -> Result<CheckResult, RemoteError> {
    info!(network_id, "checking wireless SSIDs");
    let ssids = client
        .wireless_ssids(network_id)
        .await
        .map_err(|e| e.context("check wireless SSID amount"))?;
    Ok(evaluate_ssids(&ssids, thresholds))
}

pub(crate) fn evaluate_ssids(ssids: &[Ssid], thresholds: &Thresholds) -> CheckResult {
    let enabled = ssids.iter().filter(|s| s.enabled).count();
    let mut result = CheckResult::new(CheckDetails::Ssids { ssid_count: enabled });

    if enabled > thresholds.ssid_amount {
        warn!(enabled, "too many enabled SSIDs");
        result.add_issue(
            Severity::Medium,
            "SSID Configuration",
            format!(
                "Number of enabled SSIDs ({}) exceeds the recommended amount ({})",
                enabled, thresholds.ssid_amount
            ),
        );
    }

    result
}

pub async fn check_wireless_rf_profiles(
    client: &RemoteClient,
    network_id: &str,
    thresholds: &Thresholds,
) -> Result<CheckResult, RemoteError> {
    info!(network_id, "checking wireless RF profiles");
    let profiles = client
        .wireless_rf_profiles(network_id)
        .await
        .map_err(|e| e.context("check wireless RF profiles"))?;
    Ok(evaluate_rf_profiles(&profiles, thresholds))
}

#[derive(Debug, PartialEq)]
enum Band {
    FiveGhz,
    TwoPointFourGhz,
    Other,
}

fn band(selection: &str) -> Band {
    let normalized: String = selection
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    match normalized.as_str() {
        "5ghz" => Band::FiveGhz,
        "2.4ghz" => Band::TwoPointFourGhz,
        _ => Band::Other,
    }
}

pub(crate) fn evaluate_rf_profiles(profiles: &[RfProfile], thresholds: &Thresholds) -> CheckResult {
    let mut result = CheckResult::new(CheckDetails::RfProfiles {
        profile_count: profiles.len(),
    });

    for profile in profiles {
        match band(&profile.band_selection) {
            Band::FiveGhz => {
                if let Some(width) = profile.channel_width.filter(|w| *w > thresholds.max_channel_width_5g) {
                    warn!(profile = %profile.name, width, "5 GHz channel width too wide");
                    result.add_issue(
                        Severity::Medium,
                        "RF Profile",
                        format!(
                            "5GHz channel width ({}) exceeds the recommended maximum ({})",
                            width, thresholds.max_channel_width_5g
                        ),
                    );
                }
                if let Some(bitrate) = profile.min_bitrate.filter(|b| *b < thresholds.min_bitrate_5g) {
                    result.add_issue(
                        Severity::Low,
                        "RF Profile",
                        format!(
                            "5GHz minimum bitrate ({}) is below the recommended minimum ({})",
                            bitrate, thresholds.min_bitrate_5g
                        ),
                    );
                }
            }
            Band::TwoPointFourGhz => {
                if let Some(bitrate) = profile.min_bitrate.filter(|b| *b < thresholds.min_bitrate_24g) {
                    result.add_issue(
                        Severity::Low,
                        "RF Profile",
                        format!(
                            "2.4GHz minimum bitrate ({}) is below the recommended minimum ({})",
                            bitrate, thresholds.min_bitrate_24g
                        ),
                    );
                }
            }
            Band::Other => {}
        }

        if !profile.has_min24() {
            result.add_issue(
                Severity::Medium,
                "RF Profile",
                format!(
                    "RF profile '{}' doesn't have minimum power settings for 2.4GHz",
                    profile.name
                ),
            );
        }
    }

    result
}

pub async fn check_channel_utilization(
    client: &RemoteClient,
    network_id: &str,
    thresholds: &Thresholds,
) -> Result<CheckResult, RemoteError> {
    info!(network_id, "checking wireless channel utilization");
    let utilization = client
        .wireless_channel_utilization(network_id)
        .await
        .map_err(|e| e.context("check wireless channel utilization"))?;
    Ok(evaluate_channel_utilization(&utilization, thresholds))
}

pub(crate) fn evaluate_channel_utilization(
    utilization: &ChannelUtilization,
    thresholds: &Thresholds,
) -> CheckResult {
    let mut result = CheckResult::new(CheckDetails::ChannelUtilization {
        access_points: utilization.utilization_by_ap.len(),
    });

    for ap in &utilization.utilization_by_ap {
        for (band, value) in ap.bands() {
            if value > thresholds.channel_utilization_5g {
                warn!(serial = %ap.serial, band, value, "high channel utilization");
                result.add_issue(
                    Severity::High,
                    "Channel Utilization",
                    format!("AP {} has high channel utilization ({}%) on {}", ap.serial, value, band),
                );
            }
        }
    }

    result
}
