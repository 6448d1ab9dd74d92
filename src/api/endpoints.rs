//! Typed GET helpers for the dashboard paths the checks read.

use super::client::RemoteClient;
use super::models::*;
use crate::error::RemoteError;

impl RemoteClient {
    pub async fn organization_admins(&self, org_id: &str) -> Result<Vec<Admin>, RemoteError> {
        self.get(&format!("organizations/{org_id}/admins")).await
    }

    pub async fn organization_inventory(
        &self,
        org_id: &str,
    ) -> Result<Vec<InventoryDevice>, RemoteError> {
        self.get(&format!("organizations/{org_id}/inventoryDevices")).await
    }

    pub async fn organization_licenses(&self, org_id: &str) -> Result<Vec<License>, RemoteError> {
        self.get(&format!("organizations/{org_id}/licenses")).await
    }

    pub async fn organization_alert_settings(
        &self,
        org_id: &str,
    ) -> Result<AlertSettings, RemoteError> {
        self.get(&format!("organizations/{org_id}/alerts/settings")).await
    }

    pub async fn organization_networks(&self, org_id: &str) -> Result<Vec<Network>, RemoteError> {
        self.get(&format!("organizations/{org_id}/networks")).await
    }

    pub async fn network_devices(&self, network_id: &str) -> Result<Vec<Device>, RemoteError> {
        self.get(&format!("networks/{network_id}/devices")).await
    }

    pub async fn network_health_alerts(
        &self,
        network_id: &str,
    ) -> Result<Vec<HealthAlert>, RemoteError> {
        self.get(&format!("networks/{network_id}/health/alerts")).await
    }

    pub async fn network_firmware_upgrades(
        &self,
        network_id: &str,
    ) -> Result<FirmwareUpgrades, RemoteError> {
        self.get(&format!("networks/{network_id}/firmwareUpgrades")).await
    }

    pub async fn firewall_rules(&self, network_id: &str) -> Result<Vec<FirewallRule>, RemoteError> {
        let rules: FirewallRules = self
            .get(&format!("networks/{network_id}/appliance/firewall/l3FirewallRules"))
            .await?;
        Ok(rules.into_rules())
    }

    pub async fn site_to_site_vpn(&self, network_id: &str) -> Result<SiteToSiteVpn, RemoteError> {
        self.get(&format!("networks/{network_id}/appliance/vpn/siteToSiteVpn")).await
    }

    pub async fn intrusion_settings(
        &self,
        network_id: &str,
    ) -> Result<IntrusionSettings, RemoteError> {
        self.get(&format!("networks/{network_id}/appliance/security/intrusion")).await
    }

    pub async fn content_filtering(
        &self,
        network_id: &str,
    ) -> Result<ContentFiltering, RemoteError> {
        self.get(&format!("networks/{network_id}/appliance/contentFiltering")).await
    }

    pub async fn appliance_vlans(&self, network_id: &str) -> Result<Vec<Vlan>, RemoteError> {
        self.get(&format!("networks/{network_id}/appliance/vlans")).await
    }

    pub async fn switch_stp(&self, network_id: &str) -> Result<StpSettings, RemoteError> {
        self.get(&format!("networks/{network_id}/switch/stp")).await
    }

    pub async fn wireless_ssids(&self, network_id: &str) -> Result<Vec<Ssid>, RemoteError> {
        self.get(&format!("networks/{network_id}/wireless/ssids")).await
    }

    pub async fn wireless_rf_profiles(
        &self,
        network_id: &str,
    ) -> Result<Vec<RfProfile>, RemoteError> {
        self.get(&format!("networks/{network_id}/wireless/rfProfiles")).await
    }

    pub async fn wireless_channel_utilization(
        &self,
        network_id: &str,
    ) -> Result<ChannelUtilization, RemoteError> {
        self.get(&format!("networks/{network_id}/wireless/channelUtilization")).await
    }

    pub async fn switch_ports(&self, serial: &str) -> Result<Vec<SwitchPort>, RemoteError> {
        self.get(&format!("devices/{serial}/switch/ports")).await
    }

    pub async fn switch_port_statuses(
        &self,
        serial: &str,
    ) -> Result<Vec<SwitchPortStatus>, RemoteError> {
        self.get(&format!("devices/{serial}/switch/ports/statuses")).await
    }
}
