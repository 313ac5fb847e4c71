//! Logging setup for host processes embedding the store.
//!
//! The store itself only emits `tracing` events; the host bot decides where
//! they go. This helper wires a stderr subscriber with an `EnvFilter` so the
//! usual `RUST_LOG` conventions apply.

use tracing_subscriber::{EnvFilter, fmt};

/// Install a stderr subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter` (e.g. `"kanban_store=info"`) when unset.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
