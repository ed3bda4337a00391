use crate::cloud_provider::ResourceLimiter;
use crate::AppConfig;
use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Deserialize, Debug)]
pub struct Config {
    pub cloud_config: PathBuf,
    #[serde(with = "humantime_serde", default = "default_scan_interval")]
    pub scan_interval: Duration,
    #[serde(default)]
    pub resource_limits: Option<ResourceLimiter>,
    #[serde(default)]
    pub tracing: Tracing,
}

#[derive(Deserialize, Debug, Default)]
pub struct Tracing {
    /// `host:port` of a Jaeger agent; spans are only exported when set.
    pub jaeger_agent: Option<String>,
}

/// Credentials and cluster identity of the Utho account, stored as JSON.
#[derive(Deserialize, Clone, Default)]
pub struct CloudConfig {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub cluster_id: String,
    #[serde(default)]
    pub api_url: Option<String>,
}

impl std::fmt::Debug for CloudConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudConfig")
            .field("token", &"<redacted>")
            .field("cluster_id", &self.cluster_id)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl CloudConfig {
    pub fn from_reader(reader: impl Read) -> serde_json::Result<Self> {
        serde_json::from_reader(reader)
    }
}

fn default_scan_interval() -> Duration {
    Duration::from_secs(10)
}

/// Location of the app config file.
#[derive(Debug, PartialEq)]
pub struct ConfigPath {
    pub path: String,
    /// Why `APP_CONFIG` was not used, when the default path was taken.
    pub fallback_reason: Option<env::VarError>,
}

pub fn load_config(config_path: &ConfigPath) -> anyhow::Result<AppConfig> {
    let file = File::open(&config_path.path)
        .with_context(|| format!("Failed to open config file {}", &config_path.path))?;

    Ok(Arc::new(parse_config(BufReader::new(file))?))
}

fn parse_config(reader: impl Read) -> anyhow::Result<Config> {
    Ok(serde_yaml::from_reader(reader)?)
}

/// Reads `APP_CONFIG`, falling back to `config.yml`.
///
/// Runs before logging is set up, the caller reports the fallback.
pub fn get_config_path() -> ConfigPath {
    config_path_from(env::var("APP_CONFIG"))
}

fn config_path_from(var: Result<String, env::VarError>) -> ConfigPath {
    match var {
        Ok(path) => ConfigPath {
            path,
            fallback_reason: None,
        },
        Err(e) => ConfigPath {
            path: "config.yml".to_string(),
            fallback_reason: Some(e),
        },
    }
}
