//! Security appliance checks: L3 firewall, site-to-site VPN, intrusion
//! prevention, and content filtering.

use tracing::{info, warn};

use crate::api::client::RemoteClient;
use crate::api::models::{ContentFiltering, FirewallRule, IntrusionSettings, SiteToSiteVpn};
use crate::engine::orchestrator::{ProductScope, RegisteredCheck};
use crate::error::RemoteError;
use crate::thresholds::Thresholds;
use crate::{CheckDetails, CheckResult, Severity};

pub fn security_checks() -> Vec<RegisteredCheck> {
    vec![
        RegisteredCheck::new(
            "firewall_rules",
            "L3 firewall rule count and permissive allow rules",
            ProductScope::Appliance,
            |client, network_id, thresholds| Box::pin(check_firewall_rules(client, network_id, thresholds)),
        ),
        RegisteredCheck::new(
            "vpn_status",
            "Site-to-site VPN mode, hubs, and subnets",
            ProductScope::Appliance,
            |client, network_id, thresholds| Box::pin(check_vpn_status(client, network_id, thresholds)),
        ),
        RegisteredCheck::new(
            "intrusion_prevention",
            "Intrusion prevention mode and ruleset",
            ProductScope::Appliance,
            |client, network_id, thresholds| Box::pin(check_intrusion_prevention(client, network_id, thresholds)),
        ),
        RegisteredCheck::new(
            "content_filtering",
            "URL category list and blocked categories",
            ProductScope::Appliance,
            |client, network_id, thresholds| Box::pin(check_content_filtering(client, network_id, thresholds)),
        ),
    ]
}

fn is_any(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("any")
}

pub async fn check_firewall_rules(
    client: &RemoteClient,
    network_id: &str,
    thresholds: &Thresholds,
) -> Result<CheckResult, RemoteError> {
    info!(network_id, "checking firewall rules");
    let rules = client
        .firewall_rules(network_id)
        .await
        .map_err(|e| e.context("check firewall rules"))?;
    Ok(evaluate_firewall_rules(&rules, thresholds))
}

pub(crate) fn evaluate_firewall_rules(rules: &[FirewallRule], thresholds: &Thresholds) -> CheckResult {
    let mut result = CheckResult::new(CheckDetails::Firewall {
        rule_count: rules.len(),
    });

    if rules.len() > thresholds.max_firewall_rules {
        warn!(rule_count = rules.len(), "too many firewall rules");
        result.add_issue(
            Severity::Medium,
            "Firewall Rules",
            format!(
                "Number of firewall rules ({}) exceeds the recommended amount ({})",
                rules.len(),
                thresholds.max_firewall_rules
            ),
        );
    }

    for rule in rules.iter().filter(|r| r.policy.eq_ignore_ascii_case("allow")) {
        let name = rule.comment.as_deref().filter(|c| !c.is_empty()).unwrap_or("Unnamed rule");

        if is_any(&rule.src_port) && is_any(&rule.dest_port) {
            warn!(rule = name, "allow rule open on all ports");
            result.add_issue(
                Severity::High,
                "Firewall Rules",
                format!("Overly permissive rule found: {name}"),
            );
        }

        if is_any(&rule.src_cidr) || is_any(&rule.dest_cidr) {
            warn!(rule = name, "allow rule with unrestricted CIDR");
            result.add_issue(
                Severity::Medium,
                "Firewall Rules",
                format!("Broad CIDR range in allow rule: {name}"),
            );
        }
    }

    result
}

pub async fn check_vpn_status(
    client: &RemoteClient,
    network_id: &str,
    _thresholds: &Thresholds,
) -> Result<CheckResult, RemoteError> {
    info!(network_id, "checking site-to-site VPN");
    let vpn = client
        .site_to_site_vpn(network_id)
        .await
        .map_err(|e| e.context("check VPN status"))?;
    Ok(evaluate_vpn(&vpn))
}

pub(crate) fn evaluate_vpn(vpn: &SiteToSiteVpn) -> CheckResult {
    let mut result = CheckResult::new(CheckDetails::Vpn {
        mode: vpn.mode.clone(),
    });

    if vpn.mode == "none" {
        result.add_issue(
            Severity::Low,
            "VPN Configuration",
            "VPN is not configured for this network",
        );
        return result;
    }

    if vpn.mode == "spoke" {
        for hub in vpn.hubs.iter().filter(|h| h.hub_id != "default") {
            if !hub.use_default_route {
                warn!(hub = %hub.hub_id, "VPN hub without default route");
                result.add_issue(
                    Severity::Medium,
                    "VPN Configuration",
                    format!("VPN hub {} is not set to use default route", hub.hub_id),
                );
            }
        }
    }

    if vpn.subnets.is_empty() {
        warn!("no VPN subnets configured");
        result.add_issue(
            Severity::Medium,
            "VPN Configuration",
            "No subnets configured for VPN",
        );
    }

    result
}

pub async fn check_intrusion_prevention(
    client: &RemoteClient,
    network_id: &str,
    _thresholds: &Thresholds,
) -> Result<CheckResult, RemoteError> {
    info!(network_id, "checking intrusion prevention");
    let settings = client
        .intrusion_settings(network_id)
        .await
        .map_err(|e| e.context("check intrusion prevention settings"))?;
    Ok(evaluate_intrusion(&settings))
}

pub(crate) fn evaluate_intrusion(settings: &IntrusionSettings) -> CheckResult {
    let mut result = CheckResult::new(CheckDetails::Intrusion {
        mode: settings.mode.clone(),
    });

    if settings.mode != "prevention" {
        warn!(mode = %settings.mode, "intrusion prevention not enforcing");
        result.add_issue(
            Severity::High,
            "Intrusion Prevention",
            format!("Intrusion prevention mode is set to {}, not 'prevention'", settings.mode),
        );
    }

    if settings.ids_rulesets != "balanced" {
        warn!(ruleset = %settings.ids_rulesets, "non-default IDS ruleset");
        result.add_issue(
            Severity::Medium,
            "Intrusion Prevention",
            format!("IDS ruleset is set to {}, not 'balanced'", settings.ids_rulesets),
        );
    }

    result
}

pub async fn check_content_filtering(
    client: &RemoteClient,
    network_id: &str,
    _thresholds: &Thresholds,
) -> Result<CheckResult, RemoteError> {
    info!(network_id, "checking content filtering");
    let filtering = client
        .content_filtering(network_id)
        .await
        .map_err(|e| e.context("check content filtering settings"))?;
    Ok(evaluate_content_filtering(&filtering))
}

pub(crate) fn evaluate_content_filtering(filtering: &ContentFiltering) -> CheckResult {
    let mut result = CheckResult::new(CheckDetails::ContentFiltering {
        blocked_categories: filtering.blocked_url_categories.len(),
    });

    if filtering.url_category_list_size != "fullList" {
        result.add_issue(
            Severity::Medium,
            "Content Filtering",
            format!(
                "URL category list size is set to {}, not 'fullList'",
                filtering.url_category_list_size
            ),
        );
    }

    if filtering.blocked_url_categories.is_empty() {
        result.add_issue(
            Severity::Low,
            "Content Filtering",
            "No URL categories are blocked",
        );
    }

    result
}
