//! Tracing subscriber setup for the `ftree` binary.

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static INIT: Once = Once::new();

/// Installs the global subscriber, logging to stderr.
///
/// Reads the `FTREE_LOG` filter (e.g. `FTREE_LOG=family_tree_rs=debug`) and
/// falls back to `family_tree_rs=info`. Safe to call more than once.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("FTREE_LOG")
            .unwrap_or_else(|_| EnvFilter::new("family_tree_rs=info"));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .init();
    });
}
