//! Policy thresholds the checks compare against.
//!
//! Keys keep the names used in existing config files, including the ones
//! with spaces (`5G Max Channel Width`). Missing keys take their defaults.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::warn;

use crate::error::ConfigError;

/// Longest day window accepted for day-based thresholds
pub const MAX_WINDOW_DAYS: i64 = 36_500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub max_admins: usize,
    pub max_full_admins: usize,
    pub inactive_admin_days: i64,
    /// Percent of inventory claimed into networks
    pub inventory_utilization: f64,
    pub max_unclaimed_devices: usize,
    pub min_firmware_version: String,
    /// Days before expiry at which a license is reported
    pub license_expiration_warning: i64,
    pub license_utilization_warning: f64,
    pub max_firewall_rules: usize,
    pub stp_instances: usize,
    pub port_utilization: f64,
    pub ssid_amount: usize,
    pub max_vlans: usize,

    #[serde(rename = "5G Channel Utilization")]
    pub channel_utilization_5g: f64,
    #[serde(rename = "5G Occurances Warning")]
    pub occurrences_warning_5g: u32,
    #[serde(rename = "5G Occurances Alarm")]
    pub occurrences_alarm_5g: u32,
    #[serde(rename = "5G Min TX Power")]
    pub min_tx_power_5g: f64,
    #[serde(rename = "5G Min Bitrate")]
    pub min_bitrate_5g: f64,
    #[serde(rename = "5G Max Channel Width")]
    pub max_channel_width_5g: f64,
    #[serde(rename = "2.4G Min Bitrate")]
    pub min_bitrate_24g: f64,

    #[serde(flatten, skip_serializing)]
    pub(crate) unrecognized: BTreeMap<String, Value>,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            max_admins: 10,
            max_full_admins: 5,
            inactive_admin_days: 30,
            inventory_utilization: 80.0,
            max_unclaimed_devices: 5,
            min_firmware_version: "1.0".to_string(),
            license_expiration_warning: 30,
            license_utilization_warning: 90.0,
            max_firewall_rules: 50,
            stp_instances: 5,
            port_utilization: 80.0,
            ssid_amount: 4,
            max_vlans: 20,
            channel_utilization_5g: 50.0,
            occurrences_warning_5g: 2,
            occurrences_alarm_5g: 4,
            min_tx_power_5g: 10.0,
            min_bitrate_5g: 12.0,
            max_channel_width_5g: 40.0,
            min_bitrate_24g: 0.0,
            unrecognized: BTreeMap::new(),
        }
    }
}

impl Thresholds {
    /// Keys present in the config that no check reads
    pub fn unrecognized_keys(&self) -> impl Iterator<Item = &str> {
        self.unrecognized.keys().map(String::as_str)
    }

    /// Reject day windows outside `0..=MAX_WINDOW_DAYS`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, days) in [
            ("inactive_admin_days", self.inactive_admin_days),
            ("license_expiration_warning", self.license_expiration_warning),
        ] {
            if !(0..=MAX_WINDOW_DAYS).contains(&days) {
                return Err(ConfigError::Invalid(format!(
                    "thresholds.{key} must be between 0 and {MAX_WINDOW_DAYS} days, got {days}"
                )));
            }
        }
        Ok(())
    }

    pub fn warn_unrecognized(&self) {
        for key in self.unrecognized_keys() {
            warn!(key, "ignoring unrecognized threshold");
        }
    }
}

/// Compare dotted version strings segment by segment.
///
/// Each segment is compared by its leading digits, so `"MX 18.107.2"` and
/// `"18.107.2"` order the same. Missing segments count as zero.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let left = version_segments(a);
    let right = version_segments(b);
    let len = left.len().max(right.len());

    (0..len)
        .map(|i| {
            let l = left.get(i).copied().unwrap_or(0);
            let r = right.get(i).copied().unwrap_or(0);
            l.cmp(&r)
        })
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

fn version_segments(version: &str) -> Vec<u64> {
    let start = version.find(|c: char| c.is_ascii_digit()).unwrap_or(version.len());
    version[start..]
        .split(['.', '-', '_'])
        .map(|segment| {
            let digits: String = segment.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().unwrap_or(0)
        })
        .collect()
}
