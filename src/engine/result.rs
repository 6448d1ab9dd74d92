//! Result tree and summary.
//!
//! The tree mirrors the audit's structure: organizations contain networks,
//! networks contain network-scoped and switch checks. Any organization or
//! network whose checks could not complete is recorded as `{"error": ...}`
//! in place of its subtree.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::RemoteError;
use crate::{CheckResult, Severity};

/// Either a completed subtree or the error that prevented it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EntityResult<T> {
    Completed(T),
    Failed { error: String },
}

impl<T> EntityResult<T> {
    pub fn failed(error: &RemoteError) -> Self {
        EntityResult::Failed {
            error: error.to_string(),
        }
    }

    pub fn completed(&self) -> Option<&T> {
        match self {
            EntityResult::Completed(value) => Some(value),
            EntityResult::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            EntityResult::Completed(_) => None,
            EntityResult::Failed { error } => Some(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultTree {
    pub timestamp: DateTime<Utc>,
    pub total_duration_ms: u64,
    pub organizations: BTreeMap<String, EntityResult<OrganizationReport>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrganizationReport {
    pub org_checks: BTreeMap<String, CheckResult>,
    pub networks: BTreeMap<String, EntityResult<NetworkReport>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkReport {
    pub name: String,
    pub product_types: Vec<String>,
    pub network_checks: BTreeMap<String, CheckResult>,
    pub switch_checks: SwitchChecks,
}

/// Switch results for one network.
///
/// Serializes as a single object: network-scoped checks map straight to a
/// result (`"stp": {...}`), per-device checks map to results keyed by serial
/// (`"ports": {"Q2XX-...": {...}}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SwitchChecks {
    #[serde(flatten)]
    pub checks: BTreeMap<String, CheckResult>,
    #[serde(flatten)]
    pub devices: BTreeMap<String, BTreeMap<String, CheckResult>>,
}

impl SwitchChecks {
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty() && self.devices.values().all(BTreeMap::is_empty)
    }

    /// Every result with a display label, `stp` or `ports[serial]`
    pub fn results(&self) -> Vec<(String, &CheckResult)> {
        let mut results: Vec<(String, &CheckResult)> =
            self.checks.iter().map(|(name, r)| (name.clone(), r)).collect();
        for (name, by_serial) in &self.devices {
            for (serial, r) in by_serial {
                results.push((format!("{name}[{serial}]"), r));
            }
        }
        results
    }
}

/// One check result located in the tree.
#[derive(Debug, Clone, Copy)]
pub struct CheckEntry<'a> {
    pub org_id: &'a str,
    pub network_id: Option<&'a str>,
    pub result: &'a CheckResult,
}

/// An organization or network that recorded an error instead of results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FailedEntity<'a> {
    pub org_id: &'a str,
    pub network_id: Option<&'a str>,
    pub error: &'a str,
}

impl ResultTree {
    /// All check results in tree order, labelled by check name.
    pub fn check_entries(&self) -> Vec<(String, CheckEntry<'_>)> {
        let mut entries = Vec::new();

        for (org_id, org) in &self.organizations {
            let Some(report) = org.completed() else {
                continue;
            };
            for (name, result) in &report.org_checks {
                entries.push((
                    name.clone(),
                    CheckEntry { org_id, network_id: None, result },
                ));
            }
            for (network_id, network) in &report.networks {
                let Some(network) = network.completed() else {
                    continue;
                };
                let located = |result| CheckEntry {
                    org_id,
                    network_id: Some(network_id.as_str()),
                    result,
                };
                for (name, result) in &network.network_checks {
                    entries.push((name.clone(), located(result)));
                }
                for (label, result) in network.switch_checks.results() {
                    entries.push((label, located(result)));
                }
            }
        }

        entries
    }

    pub fn failed_entities(&self) -> Vec<FailedEntity<'_>> {
        let mut failed = Vec::new();

        for (org_id, org) in &self.organizations {
            match org {
                EntityResult::Failed { error } => failed.push(FailedEntity {
                    org_id,
                    network_id: None,
                    error,
                }),
                EntityResult::Completed(report) => {
                    for (network_id, network) in &report.networks {
                        if let Some(error) = network.error() {
                            failed.push(FailedEntity {
                                org_id,
                                network_id: Some(network_id),
                                error,
                            });
                        }
                    }
                }
            }
        }

        failed
    }

    pub fn summary(&self) -> ResultSummary {
        let mut summary = ResultSummary {
            organizations: self.organizations.len(),
            total_duration_ms: self.total_duration_ms,
            ..ResultSummary::default()
        };

        for org in self.organizations.values() {
            if let Some(report) = org.completed() {
                summary.networks += report.networks.len();
            }
        }

        for entity in self.failed_entities() {
            if entity.network_id.is_some() {
                summary.failed_networks += 1;
            } else {
                summary.failed_organizations += 1;
            }
        }

        for (_, entry) in self.check_entries() {
            summary.checks_run += 1;
            if entry.result.is_ok() {
                summary.checks_passed += 1;
            } else {
                summary.checks_failed += 1;
            }
            for issue in entry.result.issues() {
                match issue.severity {
                    Severity::Low => summary.issues_low += 1,
                    Severity::Medium => summary.issues_medium += 1,
                    Severity::High => summary.issues_high += 1,
                }
            }
        }

        summary
    }
}

/// Counts derived from a [`ResultTree`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub organizations: usize,
    pub networks: usize,
    pub failed_organizations: usize,
    pub failed_networks: usize,
    pub checks_run: usize,
    pub checks_passed: usize,
    pub checks_failed: usize,
    pub issues_low: usize,
    pub issues_medium: usize,
    pub issues_high: usize,
    pub total_duration_ms: u64,
}

impl ResultSummary {
    /// Failed entities or any medium/high issue
    pub fn has_failures(&self) -> bool {
        self.failed_organizations > 0
            || self.failed_networks > 0
            || self.issues_medium > 0
            || self.issues_high > 0
    }

    /// Only low-severity issues
    pub fn has_warnings(&self) -> bool {
        !self.has_failures() && self.issues_low > 0
    }

    pub fn total_issues(&self) -> usize {
        self.issues_low + self.issues_medium + self.issues_high
    }

    /// 1 for failures, 2 for low-severity issues only, 0 when clean
    pub fn exit_code(&self) -> u8 {
        if self.has_failures() {
            1
        } else if self.has_warnings() {
            2
        } else {
            0
        }
    }
}
