//! Dashboard API access.
//!
//! [`client::RemoteClient`] is the single entry point for outbound calls. It
//! applies the token-bucket limit from [`rate_limiter`] and the fixed-interval
//! retry policy to every request, and delegates the wire exchange to a
//! [`client::Transport`]. Typed helpers for each dashboard path live in
//! [`endpoints`], and the payload shapes they decode into live in [`models`].

pub mod client;
pub mod endpoints;
pub mod models;
pub mod rate_limiter;

pub use client::{ApiRequest, HttpTransport, RemoteClient, RetryPolicy, Transport};
pub use rate_limiter::RateLimiter;
pub use reqwest::Method;
