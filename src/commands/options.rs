use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};

use crate::{Client, Config};

/// User agent sent by the command line tool unless one is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("scs-key/", env!("SCS_KEY_VERSION"));

/// Client settings gathered from the command line.
///
/// Values given here take precedence over the ones read from `config_file`.
#[derive(Debug, Default, Clone)]
pub struct ClientOptions {
    pub base_url: Option<String>,
    pub auth_token: Option<String>,
    pub user_agent: Option<String>,
    pub config_file: Option<PathBuf>,
}

impl ClientOptions {
    /// Merges the options with the config file (if any) into a [`Config`].
    pub fn to_config(&self) -> Result<Config> {
        let mut config = match &self.config_file {
            Some(path) => load_config(path)?,
            None => Config::default(),
        };

        if let Some(base_url) = &self.base_url {
            config.base_url = Some(base_url.clone());
        }
        if let Some(auth_token) = &self.auth_token {
            config.auth_token = Some(auth_token.clone());
        }
        if let Some(user_agent) = &self.user_agent {
            config.user_agent = Some(user_agent.clone());
        }
        if config.user_agent.as_deref().is_none_or(str::is_empty) {
            config.user_agent = Some(DEFAULT_USER_AGENT.to_string());
        }

        Ok(config)
    }

    /// Builds the key service client described by the options.
    #[tracing::instrument(skip(self))]
    pub fn build_client(&self) -> Result<Client> {
        let config = self.to_config()?;
        debug!("Building client from {:?}", config);
        Client::new(Some(config)).context("Failed to set up key service client")
    }
}

fn load_config(path: &Path) -> Result<Config> {
    debug!("Loading config from {:?}...", path);
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {:?}", path))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file {:?}", path))
}
