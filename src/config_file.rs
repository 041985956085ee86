use anyhow::{Context, Result, anyhow};
use std::{collections::HashMap, path::PathBuf};
use thiserror::Error;
use tokio::fs;

use serde::{Deserialize, Serialize};

use crate::args::{Arguments, OutputFormat};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("The given profile `{0}` doesn't exist")]
    ProfileNotFound(String),
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct Profile {
    /// Base url of the investors API
    pub base_url: Option<String>,

    /// Bearer token. Prefer `kaia-investors login`, which keeps it out of the config
    pub token: Option<String>,

    /// Request timeout in milliseconds
    pub timeout: Option<u64>,

    /// How the investors list gets printed
    pub output: Option<OutputFormat>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pub profile: HashMap<String, Profile>,
}

pub struct ConfigFile {
    file_path: PathBuf,
}

impl ConfigFile {
    pub fn new() -> Result<ConfigFile> {
        let mut home_dir = home::home_dir().context("Couldn't access $HOME_DIR")?;
        home_dir.push(".kaia/config.toml");

        Ok(ConfigFile {
            file_path: home_dir,
        })
    }

    pub fn from(file_path: PathBuf) -> ConfigFile {
        ConfigFile { file_path }
    }

    async fn read(&self) -> Config {
        log::debug!("Reading the config file");
        let text = match fs::read_to_string(&self.file_path).await {
            Ok(text) => text,
            Err(_) => {
                log::debug!(
                    "No config file at {}",
                    &self.file_path.to_string_lossy()
                );
                return Config::default();
            }
        };

        toml::from_str::<Config>(&text).unwrap_or_else(|e| {
            log::warn!(
                "Cannot parse config file {}. Error: {:?}",
                &self.file_path.to_string_lossy(),
                anyhow!(e)
            );

            Config::default()
        })
    }

    /// Fills the arguments left unset on the command line and in the
    /// environment with the values of the selected profile.
    pub async fn apply_profile(&self, args: &mut Arguments) -> Result<()> {
        let Some(name) = args.profile.to_owned() else {
            return Ok(());
        };

        let config = self.read().await;
        let profile = config
            .profile
            .get(&name)
            .ok_or(ConfigError::ProfileNotFound(name.to_owned()))?;

        log::debug!("Applying profile `{}`", name);

        if args.base_url.is_none() {
            args.base_url = profile.base_url.to_owned();
        }

        if args.token.is_none() {
            args.token = profile.token.to_owned();
        }

        if args.timeout.is_none() {
            args.timeout = profile.timeout;
        }

        if args.output.is_none() {
            args.output = profile.output.to_owned();
        }

        Ok(())
    }
}
