use std::time::Duration;

use reqwest::Client;

use crate::{configuration::Config, error::Error};

/// Shared HTTP client for every upstream adapter. The per-request transport
/// timeout is the only time bound an adapter carries; retries and caching
/// live with the caller, never here.
#[derive(Debug)]
pub struct HTTP {
    pub config: Config,
    pub client: Client,
}

impl HTTP {
    pub fn new(config: Config) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(HTTP { config, client })
    }
}
