//! Tracing subscriber setup for the binary.
//!
//! `RUST_LOG` wins, then `--verbose` (debug), then errors only: diagnostics are
//! reported by the CLI itself.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_logger(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("compmeta=debug")
        } else {
            EnvFilter::new("compmeta=error")
        }
    });

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact();

    // A second init (tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
