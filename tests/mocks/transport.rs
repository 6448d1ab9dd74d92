//! Route-table transport.

use async_trait::async_trait;
use meraki_health_check::api::{ApiRequest, RateLimiter, RemoteClient, RetryPolicy, Transport};
use meraki_health_check::TransportError;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// How the mock answers one path
#[derive(Debug, Clone)]
pub enum Route {
    Json(Value),
    Status(u16, String),
    Delayed(Duration, Value),
}

/// Transport answering from a shared route table. Unknown paths get a 404.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    routes: Arc<Mutex<HashMap<String, Route>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, path: impl Into<String>, body: Value) -> &Self {
        self.routes.lock().insert(path.into(), Route::Json(body));
        self
    }

    pub fn fail(&self, path: impl Into<String>, status: u16, body: &str) -> &Self {
        self.routes
            .lock()
            .insert(path.into(), Route::Status(status, body.to_string()));
        self
    }

    pub fn delay(&self, path: impl Into<String>, delay: Duration, body: Value) -> &Self {
        self.routes
            .lock()
            .insert(path.into(), Route::Delayed(delay, body));
        self
    }

    /// Every path requested so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self, path: &str) -> usize {
        self.calls.lock().iter().filter(|p| *p == path).count()
    }

    /// Client over this transport with a generous rate limit and no retry
    /// pause, unless the test overrides them.
    pub fn client(&self) -> RemoteClient {
        self.client_with(
            RateLimiter::new(1000, Duration::from_secs(1)),
            RetryPolicy {
                max_retries: 3,
                retry_interval: Duration::from_millis(10),
            },
        )
    }

    pub fn client_with(&self, limiter: RateLimiter, retry: RetryPolicy) -> RemoteClient {
        RemoteClient::new(Box::new(self.clone()), limiter, retry)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &ApiRequest) -> Result<Value, TransportError> {
        self.calls.lock().push(request.path.clone());
        let route = self.routes.lock().get(&request.path).cloned();

        match route {
            Some(Route::Json(body)) => Ok(body),
            Some(Route::Status(status, body)) => Err(TransportError::Status { status, body }),
            Some(Route::Delayed(delay, body)) => {
                tokio::time::sleep(delay).await;
                Ok(body)
            }
            None => Err(TransportError::Status {
                status: 404,
                body: format!("no route for {}", request.path),
            }),
        }
    }
}

/// Organization with no admins, devices, or licenses and every important
/// alert configured.
pub fn healthy_organization(mock: &MockTransport, org_id: &str, networks: Value) {
    mock.respond(format!("organizations/{org_id}/admins"), json!([]))
        .respond(format!("organizations/{org_id}/inventoryDevices"), json!([]))
        .respond(format!("organizations/{org_id}/licenses"), json!([]))
        .respond(
            format!("organizations/{org_id}/alerts/settings"),
            json!({
                "enabled": true,
                "alerts": [
                    {"type": "gateway_down", "enabled": true},
                    {"type": "vpn_connectivity_change", "enabled": true},
                    {"type": "excessive_dhcp_leases", "enabled": true}
                ]
            }),
        )
        .respond(format!("organizations/{org_id}/networks"), networks);
}

/// Health, firmware, and device payloads that pass. `devices` is served
/// as the network's device list.
pub fn healthy_network(mock: &MockTransport, network_id: &str, devices: Value) {
    mock.respond(format!("networks/{network_id}/health/alerts"), json!([]))
        .respond(
            format!("networks/{network_id}/firmwareUpgrades"),
            json!({
                "currentVersion": {"firmware": "MX 18.107"},
                "lastUpgrade": {"toVersion": {"firmware": "MX 18.107"}}
            }),
        )
        .respond(format!("networks/{network_id}/devices"), devices);
}

pub fn healthy_appliance(mock: &MockTransport, network_id: &str) {
    mock.respond(
        format!("networks/{network_id}/appliance/firewall/l3FirewallRules"),
        json!({"rules": []}),
    )
    .respond(
        format!("networks/{network_id}/appliance/vpn/siteToSiteVpn"),
        json!({"mode": "hub", "hubs": [], "subnets": [{"localSubnet": "10.0.0.0/24", "useVpn": true}]}),
    )
    .respond(
        format!("networks/{network_id}/appliance/security/intrusion"),
        json!({"mode": "prevention", "idsRulesets": "balanced"}),
    )
    .respond(
        format!("networks/{network_id}/appliance/contentFiltering"),
        json!({"urlCategoryListSize": "fullList", "blockedUrlCategories": [{"id": "meraki:contentFiltering/category/1"}]}),
    )
    .respond(format!("networks/{network_id}/appliance/vlans"), json!([]));
}

pub fn healthy_wireless(mock: &MockTransport, network_id: &str) {
    mock.respond(format!("networks/{network_id}/wireless/ssids"), json!([]))
        .respond(format!("networks/{network_id}/wireless/rfProfiles"), json!([]))
        .respond(
            format!("networks/{network_id}/wireless/channelUtilization"),
            json!({"utilizationByAp": []}),
        );
}

/// STP for the network plus empty port tables for each serial.
pub fn healthy_switches(mock: &MockTransport, network_id: &str, serials: &[&str]) {
    mock.respond(
        format!("networks/{network_id}/switch/stp"),
        json!({"stpInstances": []}),
    );
    for serial in serials {
        mock.respond(format!("devices/{serial}/switch/ports"), json!([]))
            .respond(format!("devices/{serial}/switch/ports/statuses"), json!([]));
    }
}

pub fn switch_device(serial: &str) -> Value {
    json!({"serial": serial, "model": "MS225-48LP", "productType": "switch", "status": "online"})
}
