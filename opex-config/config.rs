use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::runtime::Handle;

use crate::{ConfigWatcher, Persistable};

#[cfg(test)]
#[path = "./config.tests.rs"]
mod config_tests;

pub const APP_NAME: &str = "opex";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DEFAULT_USAGE_KIND: &str = "cpu";
pub const DEFAULT_REFRESH_INTERVAL: u64 = 300;
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

/// Possible errors from configuration files manipulation.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Cannot read/write configuration file.
    #[error("cannot read/write configuration file")]
    IoError(#[from] std::io::Error),

    /// Cannot serialize/deserialize configuration.
    #[error("cannot serialize/deserialize configuration")]
    SerializationError(#[from] serde_yaml::Error),
}

/// Application configuration.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Config {
    /// Base location of the usage data files, an `http(s)://` URL or a local directory.
    #[serde(default = "default_data_url")]
    pub data_url: String,

    /// Resource kind the node usage datasets are built for (`cpu` or `memory`).
    #[serde(default = "default_usage_kind")]
    pub usage_kind: String,

    /// Seconds between two refresh cycles.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,

    /// Seconds after which a single fetch is abandoned.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

fn default_data_url() -> String {
    "http://localhost:5483/dataset".to_owned()
}

fn default_usage_kind() -> String {
    DEFAULT_USAGE_KIND.to_owned()
}

fn default_refresh_interval() -> u64 {
    DEFAULT_REFRESH_INTERVAL
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_url: default_data_url(),
            usage_kind: default_usage_kind(),
            refresh_interval: default_refresh_interval(),
            request_timeout: default_request_timeout(),
            output_dir: None,
        }
    }
}

impl Config {
    /// Returns watcher for the configuration file under `path`.
    pub fn watcher(runtime: Handle, path: PathBuf) -> ConfigWatcher<Config> {
        ConfigWatcher::new(runtime, path)
    }

    /// Loads the configuration from the default file or creates it if the file does not exist.
    pub async fn load_or_create() -> Result<Self, ConfigError> {
        load_or_create_default(&Self::default_path()).await
    }

    /// Loads the configuration from the specified file or creates it if the file does not exist.
    pub async fn load_or_create_from(path: &Path) -> Result<Self, ConfigError> {
        load_or_create_default(path).await
    }

    /// Returns the time between two refresh cycles.\
    /// **Note** that zero is raised to one second.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval.max(1))
    }

    /// Returns the timeout for a single data file request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout.max(1))
    }
}

impl Persistable<Config> for Config {
    /// Returns the default configuration path: `HOME/.opex/config.yaml`.
    fn default_path() -> PathBuf {
        match std::env::home_dir() {
            Some(path) => path.join(format!(".{APP_NAME}")).join("config.yaml"),
            None => PathBuf::from("config.yaml"),
        }
    }

    async fn load(path: &Path) -> Result<Config, ConfigError> {
        let mut file = File::open(path).await?;

        let mut config_str = String::new();
        file.read_to_string(&mut config_str).await?;

        Ok(serde_yaml::from_str::<Config>(&config_str)?)
    }

    async fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let config_str = serde_yaml::to_string(self)?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = File::create(path).await?;
        file.write_all(config_str.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}

async fn load_or_create_default<T: Persistable<T> + Default>(path: &Path) -> Result<T, ConfigError> {
    let configuration = T::load(path).await;
    match configuration {
        Ok(configuration) => Ok(configuration),
        Err(ConfigError::SerializationError(error)) => {
            tracing::error!("Cannot deserialize config: {}", error);
            Ok(T::default())
        },
        Err(error) => {
            tracing::warn!("Cannot load config, creating a default one: {}", error);
            let configuration = T::default();
            configuration.save(path).await?;
            Ok(configuration)
        },
    }
}
