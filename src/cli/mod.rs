//! CLI module for argument parsing and report rendering.
//!
//! Arguments are parsed with clap; rendering turns a result tree into text,
//! JSON, or JUnit XML.

pub mod args;
pub mod output;
