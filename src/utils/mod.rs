//! Utility modules

pub mod memory_storage;
pub mod validation;

pub use memory_storage::*;
pub use validation::*;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a global `tracing` subscriber. `RUST_LOG` overrides the default
/// `cashbook_ledger=info` filter. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("cashbook_ledger=info"));

        // Another subscriber may already be installed by the host application
        let _ = fmt().with_env_filter(filter).try_init();
    });
}
