#![cfg(not(tarpaulin_include))]

use attendance::app;
use attendance::config::Config;
use std::env;

/// Main entry point for the attendance web application
///
/// Serves the scanner page and its JSON API. Arguments are parsed by
/// [`Config::from_args`]; log verbosity follows `RUST_LOG` (default `info`).
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_args(env::args().skip(1));
    log::info!(
        "Starting attendance scanner (banner {} ms, {:?} expiry)",
        config.notification_timeout.as_millis(),
        config.expiry
    );

    app::run(config).await
}
