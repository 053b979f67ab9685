#![doc(test(attr(deny(warnings))))]

//! Pixelfin Core offers the transaction ledger and trend analytics engine
//! behind a personal savings tracker: validated persistence, a running
//! balance, and a windowed mood/trend summary consumed by presentation layers.

pub mod config;
pub mod currency;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod store;
pub mod trend;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("pixelfin_core=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
        tracing::info!("Pixelfin Core tracing initialized.");
    });
}
