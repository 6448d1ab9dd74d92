//! meraki-health-check library
//!
//! Audits Meraki dashboard configuration against policy thresholds.
//!
//! This library provides:
//! - A rate-limited, retrying client for the dashboard REST API
//! - Check functions for organizations, networks, switches, and wireless
//! - An orchestrator that fans checks out across networks and isolates failures
//! - Text, JSON, and JUnit renderers for the resulting report tree
//!
//! # Example
//!
//! ```no_run
//! use meraki_health_check::{run_health_check, Config};
//! use std::path::Path;
//!
//! # async fn demo() -> Result<(), meraki_health_check::AuditError> {
//! let config = Config::load(Path::new("config.yaml"))?;
//! let tree = run_health_check(&config).await?;
//! println!("Checks failed: {}", tree.summary().checks_failed);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod checks;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod thresholds;
pub mod version;

use serde::{Deserialize, Serialize};
use std::fmt;

use api::client::RemoteClient;
use engine::orchestrator::{CheckRegistry, HealthCheckOrchestrator, OrchestratorConfig};

// Re-exports for public API
pub use checks::network::FirmwareStatus;
pub use config::{ApiSettings, Config};
pub use engine::result::{EntityResult, NetworkReport, OrganizationReport, ResultSummary, ResultTree};
pub use error::{AuditError, ConfigError, RemoteError, TransportError};
pub use thresholds::Thresholds;

/// How serious a recorded policy violation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    pub fn as_upper(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded policy violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub category: String,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity.as_upper(), self.category, self.message)
    }
}

/// Check-specific values reported next to the issue list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckDetails {
    /// No extra values
    None,
    Admins {
        admin_count: usize,
        full_access_admins: usize,
        inactive_admins: usize,
    },
    Inventory {
        utilization: f64,
        unclaimed_devices: usize,
        outdated_firmware: usize,
    },
    Licensing {
        licenses: usize,
        utilization: f64,
    },
    Alerts {
        configured_alerts: usize,
    },
    NetworkHealth {
        alert_count: usize,
    },
    Firmware {
        products: Vec<FirmwareStatus>,
    },
    Devices {
        total: usize,
        offline: usize,
    },
    Firewall {
        rule_count: usize,
    },
    Vpn {
        mode: String,
    },
    Intrusion {
        mode: String,
    },
    ContentFiltering {
        blocked_categories: usize,
    },
    Vlans {
        vlan_count: usize,
    },
    Stp {
        stp_instances: usize,
    },
    Ports {
        connected_ports: usize,
        total_ports: usize,
        utilization: f64,
    },
    PortSecurity {
        ports_checked: usize,
    },
    Ssids {
        ssid_count: usize,
    },
    RfProfiles {
        profile_count: usize,
    },
    ChannelUtilization {
        access_points: usize,
    },
}

/// Outcome of a single check invocation.
///
/// `is_ok` is maintained by [`CheckResult::add_issue`]: it flips to false
/// the first time an issue is recorded and never flips back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    is_ok: bool,
    issues: Vec<Issue>,
    details: CheckDetails,
}

impl CheckResult {
    /// Create a passing result carrying the given details
    pub fn new(details: CheckDetails) -> Self {
        CheckResult {
            is_ok: true,
            issues: Vec::new(),
            details,
        }
    }

    /// Record a violation
    pub fn add_issue(&mut self, severity: Severity, category: &str, message: impl Into<String>) {
        self.is_ok = false;
        self.issues.push(Issue {
            severity,
            category: category.to_string(),
            message: message.into(),
        });
    }

    pub fn is_ok(&self) -> bool {
        self.is_ok
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn details(&self) -> &CheckDetails {
        &self.details
    }

    /// Highest severity among recorded issues
    pub fn worst_severity(&self) -> Option<Severity> {
        self.issues.iter().map(|i| i.severity).max()
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ok {
            write!(f, "OK")
        } else {
            write!(f, "{} issue(s)", self.issues.len())
        }
    }
}

/// Run every standard check for the organizations named in `config`.
///
/// This is the main library entry point. It builds one rate-limited client
/// for the whole run, hands it to the orchestrator, and returns the
/// assembled result tree. API failures never surface here: they are
/// recorded on the organization or network they belong to. Only
/// configuration and client construction problems are returned as errors.
///
/// # Example
///
/// ```no_run
/// use meraki_health_check::{run_health_check, Config};
///
/// # async fn demo(config: Config) {
/// match run_health_check(&config).await {
///     Ok(tree) => {
///         let summary = tree.summary();
///         println!("Passed: {}, Failed: {}", summary.checks_passed, summary.checks_failed);
///     }
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// # }
/// ```
pub async fn run_health_check(config: &Config) -> Result<ResultTree, AuditError> {
    config.validate()?;

    let client = RemoteClient::from_settings(&config.api_key, &config.api)?;
    let orchestrator = HealthCheckOrchestrator::new(
        &client,
        &config.thresholds,
        CheckRegistry::standard(),
        OrchestratorConfig::from_settings(&config.api),
    );

    Ok(orchestrator.run(&config.organizations).await)
}
