//! Run settings.
//!
//! The input file and the target collection are fixed. Only the HTTP timeout
//! can be tuned, through `PRODUCT_LOADER_TIMEOUT_SECS` (a `.env` file is
//! loaded by the binary) or the `--timeout` flag.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// CSV file read from the working directory.
pub const INPUT_PATH: &str = "products.csv";

/// Create-record endpoint of the products collection.
pub const PRODUCTS_ENDPOINT: &str =
    "https://wasp-poetic-definitely.ngrok-free.app/api/collections/products/records";

/// Environment variable holding the request timeout in seconds.
pub const TIMEOUT_ENV: &str = "PRODUCT_LOADER_TIMEOUT_SECS";

/// Request timeout when nothing is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("product-loader/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub input_path: PathBuf,
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(INPUT_PATH),
            endpoint: PRODUCTS_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            settings.timeout = parse_timeout(&raw)?;
        }

        Ok(settings)
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout {
            value: raw.to_string(),
        }),
    }
}
