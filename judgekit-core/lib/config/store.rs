//! On-disk store for the provider configuration.
//!
//! The store is read once when a host starts and written back on every change. A missing file
//! means nothing has been configured yet.

use std::path::PathBuf;

use getset::Getters;
use judgekit_utils::env;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::{
    config::{ProviderConfig, ProviderSettings},
    JudgekitResult,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Everything judgekit persists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JudgekitConfig {
    /// The selected judge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderConfig>,

    /// HTTP settings for the selected judge
    #[serde(default)]
    pub settings: ProviderSettings,
}

/// A [`JudgekitConfig`] bound to the file it was loaded from.
#[derive(Debug, Getters)]
#[getset(get = "pub with_prefix")]
pub struct ConfigStore {
    /// Location of the configuration file
    path: PathBuf,

    /// The loaded configuration
    config: JudgekitConfig,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ConfigStore {
    /// Loads the configuration file at `path`, or an empty configuration if it does not exist.
    pub async fn load(path: impl Into<PathBuf>) -> JudgekitResult<Self> {
        let path = path.into();

        let config = if fs::try_exists(&path).await? {
            let contents = fs::read_to_string(&path).await?;
            let config = toml::from_str(&contents)?;
            tracing::debug!("loaded configuration from {}", path.display());
            config
        } else {
            tracing::debug!("no configuration at {}, starting empty", path.display());
            JudgekitConfig::default()
        };

        Ok(Self { path, config })
    }

    /// Loads the configuration file from the judgekit home directory.
    pub async fn load_default() -> JudgekitResult<Self> {
        Self::load(env::get_config_path()).await
    }

    /// Replaces the selected judge and writes the file.
    pub async fn set_provider(&mut self, provider: ProviderConfig) -> JudgekitResult<()> {
        self.config.provider = Some(provider);
        self.save().await
    }

    /// Replaces the HTTP settings and writes the file.
    pub async fn set_settings(&mut self, settings: ProviderSettings) -> JudgekitResult<()> {
        self.config.settings = settings;
        self.save().await
    }

    /// The judge to use: the environment wins over the stored configuration.
    pub fn effective_provider(&self) -> JudgekitResult<Option<ProviderConfig>> {
        Ok(ProviderConfig::from_env()?.or_else(|| self.config.provider.clone()))
    }

    async fn save(&self) -> JudgekitResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let contents = toml::to_string_pretty(&self.config)?;
        fs::write(&self.path, contents).await?;
        tracing::info!("saved configuration to {}", self.path.display());

        Ok(())
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
