//! Audit checks.
//!
//! Checks are grouped by the entity they inspect:
//! - Organization: admins, inventory, licensing, alerts
//! - Network: health alerts, firmware, device status
//! - Security: firewall, site-to-site VPN, intrusion prevention, content filtering
//! - Switch: STP, VLANs, and per-device port checks
//! - Wireless: SSIDs, RF profiles, channel utilization
//!
//! Every check has the same shape: fetch through the shared client, compare
//! the payload against the thresholds, and return a [`crate::CheckResult`].
//! A failed fetch or an undecodable payload aborts the check with a
//! [`crate::RemoteError`] naming what was being checked. The evaluation step is
//! a plain function of the payload so it can be tested without a client.

pub mod network;
pub mod organization;
pub mod security;
pub mod switch;
pub mod wireless;

/// `part / whole * 100`, or 0 for an empty whole
pub(crate) fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
