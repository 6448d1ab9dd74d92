//! Mock implementations for testing without the dashboard API.
//!
//! [`MockTransport`] answers requests from an in-memory route table and
//! records every call, so tests can drive the real client, checks, and
//! orchestrator end to end.

pub mod transport;

pub use transport::*;
