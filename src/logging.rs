// src/logging.rs
//! Diagnostic logging on stderr.
//!
//! Console progress and the summary go to stdout through `reporting`; this
//! subscriber only carries `tracing` events.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber. `RUST_LOG` wins over `verbose`.
///
/// Calling it twice is harmless; the second install is ignored.
pub fn init(verbose: bool) {
    let default = if verbose { "siteforge_core=debug,siteforge=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
