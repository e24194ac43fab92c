use std::{env, path::PathBuf, time::Duration};

use crate::{endpoint, error::ConfigError};

pub const DEFAULT_ORIGIN: &str = "http://localhost/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_IP_LOOKUP_URL: &str = "https://api.ipify.org?format=json";

#[derive(Clone, Debug)]
pub struct Config {
    pub origin: String,
    pub download_dir: PathBuf,
    pub timeout: Duration,
    pub ip_lookup_url: String,
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Config::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
        let origin = lookup("CRABDROP_ORIGIN").unwrap_or_else(|| DEFAULT_ORIGIN.to_owned());
        endpoint::parse_origin(&origin)?;

        let download_dir = lookup("CRABDROP_DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let timeout_secs = match lookup("CRABDROP_TIMEOUT_SECS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidValue {
                    name: "CRABDROP_TIMEOUT_SECS",
                    value,
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let ip_lookup_url =
            lookup("CRABDROP_IP_LOOKUP_URL").unwrap_or_else(|| DEFAULT_IP_LOOKUP_URL.to_owned());

        Ok(Config {
            origin,
            download_dir,
            timeout: Duration::from_secs(timeout_secs),
            ip_lookup_url,
        })
    }

    /// Command line flags win over the environment.
    pub fn with_overrides(
        mut self,
        origin: Option<String>,
        download_dir: Option<PathBuf>,
    ) -> Result<Config, ConfigError> {
        if let Some(origin) = origin {
            endpoint::parse_origin(&origin)?;
            self.origin = origin;
        }
        if let Some(download_dir) = download_dir {
            self.download_dir = download_dir;
        }
        Ok(self)
    }
}
