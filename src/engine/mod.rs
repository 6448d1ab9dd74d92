//! Audit engine.
//!
//! Provides check registration, orchestration across organizations and
//! networks, and the result tree the renderers consume.

pub mod orchestrator;
pub mod result;
