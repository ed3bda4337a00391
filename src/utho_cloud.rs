pub mod error;
pub mod kubernetes;
mod request;

use reqwest::ClientBuilder;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, error::Error>;

pub const DEFAULT_ADDRESS: &str = "https://api.utho.com/v2/";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// HTTP client for the Utho REST API.
///
/// Immutable after construction, so a single instance can be shared by the
/// manager and every node group.
#[derive(Debug)]
pub struct Client {
    config: Config,
    http_client: reqwest::Client,
}

#[derive(Debug, Clone)]
pub struct Config {
    address: String,
    api_token: String,
}

impl Client {
    pub fn builder() -> Builder {
        Builder::default()
    }
}

#[derive(Clone, Debug, Default)]
pub struct Builder {
    address: Option<String>,
    api_token: Option<String>,
}

impl Builder {
    pub fn address(mut self, address: String) -> Self {
        self.address = Some(address);
        self
    }

    pub fn api_token(mut self, api_token: String) -> Self {
        self.api_token = Some(api_token);
        self
    }

    pub fn build(self) -> Result<Client> {
        use error::Error::*;

        let api_token = self
            .api_token
            .filter(|t| !t.is_empty())
            .ok_or(MissingConfig("api_token"))?;

        let mut address = self.address.unwrap_or_else(|| DEFAULT_ADDRESS.to_owned());
        if !address.ends_with('/') {
            address.push('/');
        }

        Ok(Client {
            config: Config { address, api_token },
            http_client: ClientBuilder::new()
                .timeout(DEFAULT_TIMEOUT)
                .build()?,
        })
    }
}
