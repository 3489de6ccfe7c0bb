use log::warn;
use std::net::SocketAddr;
use std::time::Duration;

use crate::notification::{DEFAULT_TIMEOUT, ExpiryPolicy};

pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Runtime settings for the web front end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub addr: SocketAddr,
    pub notification_timeout: Duration,
    pub expiry: ExpiryPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            addr: default_addr(),
            notification_timeout: DEFAULT_TIMEOUT,
            expiry: ExpiryPolicy::default(),
        }
    }
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

impl Config {
    /// Parse command-line arguments (program name already skipped).
    ///
    /// Accepted forms:
    /// * `<host:port>` - listen address
    /// * `--notice-ms <n>` - notification display window in milliseconds
    /// * `--legacy-expiry` - let every notification timer clear the banner
    ///
    /// Values that fail to parse keep their defaults.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Config::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_ref() {
                "--legacy-expiry" => config.expiry = ExpiryPolicy::Overlapping,
                "--notice-ms" => match args.next().map(|v| v.as_ref().parse::<u64>()) {
                    Some(Ok(ms)) => config.notification_timeout = Duration::from_millis(ms),
                    _ => warn!("--notice-ms expects a number of milliseconds"),
                },
                other => match other.parse::<SocketAddr>() {
                    Ok(addr) => config.addr = addr,
                    Err(_) => warn!("ignoring unrecognised argument {:?}", other),
                },
            }
        }

        config
    }
}
