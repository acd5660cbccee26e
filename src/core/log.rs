//! Logging setup for the CLI.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

const APP_TARGET: &str = "divest";

/// Installs the global subscriber. `RUST_LOG` overrides the verbosity flag for
/// third-party targets; calling this twice keeps the first subscriber.
pub fn init_logging(verbose: bool) {
    let app_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::OFF
    };
    let app_filter = Targets::new().with_target(APP_TARGET, app_level);
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "off" }));

    if let Err(e) = tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time())
        .with(app_filter)
        .with(env_filter)
        .try_init()
    {
        tracing::debug!(error = %e, "Logging already initialized");
    }
}
