//! Check execution orchestrator.
//!
//! Walks organizations, then their networks, then switch devices, running
//! the registered checks for each and assembling the [`ResultTree`].
//!
//! # Failure isolation
//!
//! - A failing organization check, or a failure to list the organization's
//!   networks, records `{error}` for that organization and moves on to the
//!   next one.
//! - A failing network, switch, or device check records `{error}` for that
//!   network only. Sibling networks are unaffected.
//! - A network that overruns the optional deadline is recorded the same way.
//!
//! Organizations are processed one after another. Within an organization all
//! networks run concurrently on the current task and the organization waits
//! for every one of them before it completes.

use futures::future::join_all;
use futures::stream::{self, StreamExt};
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info, info_span, Instrument};

use crate::api::client::RemoteClient;
use crate::api::models::Network;
use crate::checks::{network, organization, security, switch, wireless};
use crate::config::ApiSettings;
use crate::engine::result::{EntityResult, NetworkReport, OrganizationReport, ResultTree, SwitchChecks};
use crate::error::RemoteError;
use crate::thresholds::Thresholds;
use crate::{CheckResult, Severity};

/// Future returned by a registered check
pub type CheckFuture<'a> = Pin<Box<dyn Future<Output = Result<CheckResult, RemoteError>> + 'a>>;

type CheckFn = dyn for<'a> Fn(&'a RemoteClient, &'a str, &'a Thresholds) -> CheckFuture<'a> + Send + Sync;

/// Network product a check needs before it is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductScope {
    Any,
    Wireless,
    Appliance,
    Switch,
}

impl ProductScope {
    pub fn applies_to(&self, network: &Network) -> bool {
        match self {
            ProductScope::Any => true,
            ProductScope::Wireless => network.has_product("wireless"),
            ProductScope::Appliance => network.has_product("appliance"),
            ProductScope::Switch => network.has_product("switch"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductScope::Any => "any",
            ProductScope::Wireless => "wireless",
            ProductScope::Appliance => "appliance",
            ProductScope::Switch => "switch",
        }
    }
}

impl fmt::Display for ProductScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered check with its execution function
pub struct RegisteredCheck {
    pub name: String,
    pub description: String,
    pub scope: ProductScope,
    check_fn: Box<CheckFn>,
}

impl RegisteredCheck {
    pub fn new<F>(name: &str, description: &str, scope: ProductScope, check_fn: F) -> Self
    where
        F: for<'a> Fn(&'a RemoteClient, &'a str, &'a Thresholds) -> CheckFuture<'a> + Send + Sync + 'static,
    {
        RegisteredCheck {
            name: name.to_string(),
            description: description.to_string(),
            scope,
            check_fn: Box::new(check_fn),
        }
    }

    pub fn run<'a>(
        &self,
        client: &'a RemoteClient,
        entity_id: &'a str,
        thresholds: &'a Thresholds,
    ) -> CheckFuture<'a> {
        (self.check_fn)(client, entity_id, thresholds)
    }
}

impl fmt::Debug for RegisteredCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredCheck")
            .field("name", &self.name)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// Where in the tree a group of checks runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckGroup {
    Organization,
    Network,
    SwitchNetwork,
    SwitchDevice,
}

impl CheckGroup {
    pub fn label(&self) -> &'static str {
        match self {
            CheckGroup::Organization => "Organization",
            CheckGroup::Network => "Network",
            CheckGroup::SwitchNetwork => "Switch network",
            CheckGroup::SwitchDevice => "Switch device",
        }
    }
}

/// Checks to run, grouped by the entity they target. Within a group checks
/// run in registration order.
#[derive(Debug, Default)]
pub struct CheckRegistry {
    organization: Vec<RegisteredCheck>,
    network: Vec<RegisteredCheck>,
    switch_network: Vec<RegisteredCheck>,
    switch_device: Vec<RegisteredCheck>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in check
    pub fn standard() -> Self {
        let mut registry = CheckRegistry::new();
        registry.register_checks(CheckGroup::Organization, organization::organization_checks());
        registry.register_checks(CheckGroup::Network, network::network_checks());
        registry.register_checks(CheckGroup::Network, wireless::wireless_checks());
        registry.register_checks(CheckGroup::Network, security::security_checks());
        registry.register_checks(CheckGroup::Network, switch::vlan_checks());
        registry.register_checks(CheckGroup::SwitchNetwork, switch::switch_network_checks());
        registry.register_checks(CheckGroup::SwitchDevice, switch::switch_device_checks());
        registry
    }

    pub fn register_check(&mut self, group: CheckGroup, check: RegisteredCheck) {
        self.group_mut(group).push(check);
    }

    pub fn register_checks(&mut self, group: CheckGroup, checks: Vec<RegisteredCheck>) {
        self.group_mut(group).extend(checks);
    }

    pub fn checks(&self, group: CheckGroup) -> &[RegisteredCheck] {
        match group {
            CheckGroup::Organization => &self.organization,
            CheckGroup::Network => &self.network,
            CheckGroup::SwitchNetwork => &self.switch_network,
            CheckGroup::SwitchDevice => &self.switch_device,
        }
    }

    fn group_mut(&mut self, group: CheckGroup) -> &mut Vec<RegisteredCheck> {
        match group {
            CheckGroup::Organization => &mut self.organization,
            CheckGroup::Network => &mut self.network,
            CheckGroup::SwitchNetwork => &mut self.switch_network,
            CheckGroup::SwitchDevice => &mut self.switch_device,
        }
    }

    pub fn len(&self) -> usize {
        self.organization.len() + self.network.len() + self.switch_network.len() + self.switch_device.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Orchestrator configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrchestratorConfig {
    /// Networks checked at once within an organization; unbounded when `None`
    pub max_parallel: Option<usize>,
    /// Deadline for one network's checks
    pub network_timeout: Option<Duration>,
}

impl OrchestratorConfig {
    pub fn from_settings(settings: &ApiSettings) -> Self {
        OrchestratorConfig {
            max_parallel: settings.max_parallel,
            network_timeout: settings.network_deadline(),
        }
    }
}

/// Health check orchestrator
pub struct HealthCheckOrchestrator<'a> {
    client: &'a RemoteClient,
    thresholds: &'a Thresholds,
    registry: CheckRegistry,
    config: OrchestratorConfig,
}

impl<'a> HealthCheckOrchestrator<'a> {
    pub fn new(
        client: &'a RemoteClient,
        thresholds: &'a Thresholds,
        registry: CheckRegistry,
        config: OrchestratorConfig,
    ) -> Self {
        HealthCheckOrchestrator {
            client,
            thresholds,
            registry,
            config,
        }
    }

    /// Check every organization in order and return the assembled tree.
    pub async fn run(&self, organizations: &[String]) -> ResultTree {
        let start = Instant::now();
        let timestamp = chrono::Utc::now();
        let mut results = BTreeMap::new();

        for org_id in organizations {
            let span = info_span!("organization", org_id = %org_id);
            let entry = match self.run_organization(org_id).instrument(span).await {
                Ok(report) => EntityResult::Completed(report),
                Err(e) => {
                    error!(org_id = %org_id, error = %e, "organization health check failed");
                    EntityResult::failed(&e)
                }
            };
            results.insert(org_id.clone(), entry);
        }

        let total_duration_ms = start.elapsed().as_millis() as u64;
        info!(
            organizations = organizations.len(),
            duration_ms = total_duration_ms,
            "health check complete"
        );

        ResultTree {
            timestamp,
            total_duration_ms,
            organizations: results,
        }
    }

    async fn run_organization(&self, org_id: &str) -> Result<OrganizationReport, RemoteError> {
        let mut org_checks = BTreeMap::new();
        for check in self.registry.checks(CheckGroup::Organization) {
            let result = check.run(self.client, org_id, self.thresholds).await?;
            org_checks.insert(check.name.clone(), result);
        }

        let networks = self
            .client
            .organization_networks(org_id)
            .await
            .map_err(|e| e.context("list organization networks"))?;
        info!(networks = networks.len(), "checking networks");

        let pending = networks
            .iter()
            .map(|network| async move { (network.id.clone(), self.check_network(network).await) });

        let completed: Vec<(String, EntityResult<NetworkReport>)> = match self.config.max_parallel {
            Some(limit) => stream::iter(pending).buffer_unordered(limit.max(1)).collect().await,
            None => join_all(pending).await,
        };

        Ok(OrganizationReport {
            org_checks,
            networks: completed.into_iter().collect(),
        })
    }

    async fn check_network(&self, network: &Network) -> EntityResult<NetworkReport> {
        let span = info_span!("network", network_id = %network.id, name = %network.name);
        let work = self.run_network(network);

        let outcome = match self.config.network_timeout {
            Some(limit) => match tokio::time::timeout(limit, work).instrument(span).await {
                Ok(outcome) => outcome,
                Err(_) => Err(RemoteError::new(
                    format!("Network checks did not finish within {:.1}s", limit.as_secs_f64()),
                    "Timeout",
                    Severity::High,
                )),
            },
            None => work.instrument(span).await,
        };

        match outcome {
            Ok(report) => EntityResult::Completed(report),
            Err(e) => {
                error!(network_id = %network.id, error = %e, "network health check failed");
                EntityResult::failed(&e)
            }
        }
    }

    async fn run_network(&self, network: &Network) -> Result<NetworkReport, RemoteError> {
        let mut network_checks = BTreeMap::new();
        for check in self
            .registry
            .checks(CheckGroup::Network)
            .iter()
            .filter(|c| c.scope.applies_to(network))
        {
            let result = check.run(self.client, &network.id, self.thresholds).await?;
            network_checks.insert(check.name.clone(), result);
        }

        let switch_checks = if network.has_product("switch") {
            self.run_switch_checks(network).await?
        } else {
            SwitchChecks::default()
        };

        Ok(NetworkReport {
            name: network.name.clone(),
            product_types: network.product_types.clone(),
            network_checks,
            switch_checks,
        })
    }

    async fn run_switch_checks(&self, network: &Network) -> Result<SwitchChecks, RemoteError> {
        let mut switch_checks = SwitchChecks::default();

        for check in self.registry.checks(CheckGroup::SwitchNetwork) {
            let result = check.run(self.client, &network.id, self.thresholds).await?;
            switch_checks.checks.insert(check.name.clone(), result);
        }

        let device_checks = self.registry.checks(CheckGroup::SwitchDevice);
        if device_checks.is_empty() {
            return Ok(switch_checks);
        }

        let devices = self
            .client
            .network_devices(&network.id)
            .await
            .map_err(|e| e.context("list switch devices"))?;
        let serials: Vec<&str> = devices
            .iter()
            .filter(|d| d.is_switch())
            .map(|d| d.serial.as_str())
            .collect();
        info!(switches = serials.len(), "checking switch devices");

        for check in device_checks {
            let by_serial = switch_checks.devices.entry(check.name.clone()).or_default();
            for serial in &serials {
                let result = check.run(self.client, serial, self.thresholds).await?;
                by_serial.insert(serial.to_string(), result);
            }
        }

        Ok(switch_checks)
    }
}
