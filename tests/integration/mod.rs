//! Integration tests for meraki-health-check.
//!
//! These tests drive the real client, checks, and orchestrator against a
//! mock transport.

pub mod check_tests;
pub mod cli_tests;
pub mod client_tests;
pub mod config_tests;
pub mod output_tests;
