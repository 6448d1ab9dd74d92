//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter directives
pub const LOG_ENV: &str = "MERAKI_HEALTH_LOG";

static INIT: Once = Once::new();

/// Install the global subscriber, writing to stderr so reports on stdout
/// stay machine-readable.
///
/// `MERAKI_HEALTH_LOG` takes `EnvFilter` directives, e.g.
/// `MERAKI_HEALTH_LOG=meraki_health_check::api=debug`. When it is unset or
/// invalid the filter falls back to `info`, or `debug` with `verbose`.
///
/// Only the first call has any effect.
pub fn init_tracing(verbose: bool) {
    INIT.call_once(|| {
        let fallback = if verbose {
            "meraki_health_check=debug"
        } else {
            "meraki_health_check=info"
        };
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

        // A subscriber installed by an embedding application takes precedence.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .try_init();
    });
}
