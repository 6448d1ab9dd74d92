//! Payload shapes returned by the dashboard API.
//!
//! Only the fields the checks read are modelled. Fields the checks cannot do
//! without are required, so a payload missing them fails to decode and the
//! check reports an API error instead of guessing.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Parse an optional timestamp. Accepts RFC 3339 and naive ISO 8601
/// (treated as UTC). Empty strings and null decode as `None`.
fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_timestamp(text)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{text}'"))),
    }
}

pub(crate) fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Identifier that the API sends either as a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FlexibleId {
    Number(u64),
    Text(String),
}

impl fmt::Display for FlexibleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlexibleId::Number(n) => write!(f, "{n}"),
            FlexibleId::Text(s) => f.write_str(s),
        }
    }
}

// Organization payloads

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub org_access: Option<String>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub last_active: Option<DateTime<Utc>>,
}

impl Admin {
    /// Name used in issue messages
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .or(self.id.as_deref())
            .unwrap_or("unknown")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryDevice {
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub network_id: Option<String>,
    #[serde(default)]
    pub firmware: Option<String>,
}

impl InventoryDevice {
    /// A device is claimed when it is assigned to a network.
    pub fn is_claimed(&self) -> bool {
        self.network_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub expiration_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub device_count: Option<u64>,
    #[serde(default)]
    pub unused_count: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertSettings {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub alerts: Vec<AlertSetting>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertSetting {
    #[serde(rename = "type")]
    pub alert_type: String,
    #[serde(default)]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub product_types: Vec<String>,
}

impl Network {
    pub fn has_product(&self, product: &str) -> bool {
        self.product_types
            .iter()
            .any(|p| p.eq_ignore_ascii_case(product))
    }
}

// Network payloads

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub serial: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Device {
    pub fn is_switch(&self) -> bool {
        self.model
            .as_deref()
            .is_some_and(|m| m.to_ascii_uppercase().starts_with("MS"))
            || self
                .product_type
                .as_deref()
                .is_some_and(|p| p.eq_ignore_ascii_case("switch"))
    }

    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.serial)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthAlert {
    pub severity: String,
    pub category: String,
    #[serde(rename = "type")]
    pub alert_type: String,
}

/// Firmware state of a network. The API answers with either a per-product
/// map or a single current/last-upgrade pair.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirmwareUpgrades {
    #[serde(default)]
    pub products: BTreeMap<String, ProductFirmware>,
    #[serde(default)]
    pub current_version: Option<FirmwareVersion>,
    #[serde(default)]
    pub last_upgrade: Option<LastUpgrade>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFirmware {
    pub current_version: FirmwareVersion,
    #[serde(default)]
    pub available_versions: Vec<FirmwareVersion>,
    #[serde(default)]
    pub next_upgrade: Option<NextUpgrade>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirmwareVersion {
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub firmware: Option<String>,
    #[serde(default)]
    pub release_type: Option<String>,
}

impl FirmwareVersion {
    /// Short name if present, otherwise the firmware string
    pub fn name(&self) -> Option<&str> {
        self.short_name.as_deref().or(self.firmware.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastUpgrade {
    #[serde(default)]
    pub to_version: FirmwareVersion,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextUpgrade {
    #[serde(default)]
    pub time: Option<String>,
}

// Appliance payloads

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirewallRule {
    pub policy: String,
    #[serde(default)]
    pub comment: Option<String>,
    pub src_port: String,
    pub dest_port: String,
    pub src_cidr: String,
    pub dest_cidr: String,
}

/// L3 rules arrive either bare or wrapped in `{"rules": [...]}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FirewallRules {
    Wrapped { rules: Vec<FirewallRule> },
    Bare(Vec<FirewallRule>),
}

impl FirewallRules {
    pub fn into_rules(self) -> Vec<FirewallRule> {
        match self {
            FirewallRules::Wrapped { rules } | FirewallRules::Bare(rules) => rules,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteToSiteVpn {
    pub mode: String,
    #[serde(default)]
    pub hubs: Vec<VpnHub>,
    #[serde(default)]
    pub subnets: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VpnHub {
    pub hub_id: String,
    #[serde(default)]
    pub use_default_route: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrusionSettings {
    pub mode: String,
    pub ids_rulesets: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFiltering {
    pub url_category_list_size: String,
    #[serde(default)]
    pub blocked_url_categories: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Vlan {
    pub id: FlexibleId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub subnet: Option<String>,
}

// Switch payloads

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StpSettings {
    #[serde(default)]
    pub stp_instances: Vec<StpInstance>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StpInstance {
    #[serde(default)]
    pub id: Option<FlexibleId>,
    pub root_bridge: RootBridge,
    #[serde(default)]
    pub stp_mode: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RootBridge {
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchPortStatus {
    #[serde(default)]
    pub port_id: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchPort {
    pub port_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default, rename = "type")]
    pub port_type: Option<String>,
    #[serde(default)]
    pub access_policy_type: Option<String>,
    #[serde(default)]
    pub allowed_vlans: Option<String>,
}

fn enabled_by_default() -> bool {
    true
}

// Wireless payloads

#[derive(Debug, Clone, Deserialize)]
pub struct Ssid {
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RfProfile {
    pub name: String,
    pub band_selection: String,
    #[serde(default)]
    pub channel_width: Option<f64>,
    #[serde(default)]
    pub min_bitrate: Option<f64>,
    #[serde(default)]
    pub per_ssid_settings: Map<String, Value>,
}

impl RfProfile {
    /// Whether `perSsidSettings.min24` is present and truthy.
    pub fn has_min24(&self) -> bool {
        match self.per_ssid_settings.get("min24") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(a)) => !a.is_empty(),
            Some(Value::Object(o)) => !o.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelUtilization {
    #[serde(default)]
    pub utilization_by_ap: Vec<ApUtilization>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApUtilization {
    pub serial: String,
    #[serde(default)]
    pub wifi0: Option<BandUtilization>,
    #[serde(default)]
    pub wifi1: Option<BandUtilization>,
}

impl ApUtilization {
    /// Bands that reported a measurement, by radio name
    pub fn bands(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        [("wifi0", &self.wifi0), ("wifi1", &self.wifi1)]
            .into_iter()
            .filter_map(|(band, util)| util.as_ref().map(|u| (band, u.utilization)))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BandUtilization {
    #[serde(default)]
    pub utilization: f64,
}
