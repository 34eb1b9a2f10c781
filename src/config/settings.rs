//! # Configuration Settings
//!
//! Settings file layout for the `certchain` binary.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

use crate::chain::ChainResolver;
use crate::errors::{Error, Result};
use crate::secrets::{
    DataBagStore, NodeAttributes, SecretString, VaultBroker, VaultConfig, DEFAULT_DATA_BAG_PATH,
};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Top-level settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Settings {
    /// Node platform name, used for the default chain directory
    pub platform: String,

    /// Node attribute tree (`ssl_chain.*` and top-level fallbacks)
    pub attributes: Value,

    #[validate(nested)]
    pub data_bag: DataBagSettings,

    /// Vault connection for the `chef_vault` source. Absent means no broker.
    pub vault: Option<VaultConfig>,

    #[validate(nested)]
    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            platform: String::new(),
            attributes: Value::Object(Default::default()),
            data_bag: DataBagSettings::default(),
            vault: None,
            logging: LoggingSettings::default(),
        }
    }
}

/// Local data bag store
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DataBagSettings {
    /// Directory holding `<bag>/<item>.json`
    #[validate(length(min = 1, message = "Data bag path cannot be empty"))]
    pub path: String,
}

impl Default for DataBagSettings {
    fn default() -> Self {
        Self { path: DEFAULT_DATA_BAG_PATH.to_string() }
    }
}

/// Logging output
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default level when `RUST_LOG` is not set
    #[validate(custom(function = "validate_log_level"))]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}

pub fn validate_log_level(level: &str) -> std::result::Result<(), ValidationError> {
    if LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}

impl Settings {
    /// Load settings from `path` (if any), apply `CERTCHAIN_*` overrides, and validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply_env_overrides()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse a settings file. The format follows the extension: `.toml`,
    /// `.yaml`/`.yml` or `.json`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::io(e, format!("Failed to read settings file {}", path.display())))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        let parse_error = |e: Box<dyn std::error::Error + Send + Sync>| {
            Error::config_with_source(format!("Failed to parse settings file {}", path.display()), e)
        };

        match extension.to_ascii_lowercase().as_str() {
            "toml" => toml::from_str(&text).map_err(|e| parse_error(Box::new(e))),
            "yaml" | "yml" => serde_yaml::from_str(&text).map_err(|e| parse_error(Box::new(e))),
            "json" => serde_json::from_str(&text).map_err(|e| parse_error(Box::new(e))),
            other => Err(Error::config(format!(
                "Unsupported settings format '{}' for {}",
                other,
                path.display()
            ))),
        }
    }

    /// Apply `CERTCHAIN_*` environment variables on top of the loaded values.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(platform) = env_var("CERTCHAIN_PLATFORM") {
            self.platform = platform;
        }

        if let Some(path) = env_var("CERTCHAIN_DATA_BAG_PATH") {
            self.data_bag.path = path;
        }

        let vault_address = env_var("CERTCHAIN_VAULT_ADDR");
        if vault_address.is_some() && self.vault.is_none() {
            self.vault = Some(VaultConfig::default());
        }
        if let Some(vault) = self.vault.as_mut() {
            if let Some(address) = vault_address {
                vault.address = address;
            }
            if let Some(token) = env_var("CERTCHAIN_VAULT_TOKEN") {
                vault.token = Some(SecretString::new(token));
            }
            if let Some(mount) = env_var("CERTCHAIN_VAULT_MOUNT") {
                vault.mount_path = mount;
            }
        }

        if let Some(json) = env_var("CERTCHAIN_LOG_JSON") {
            self.logging.json = json.parse::<bool>().map_err(|_| {
                Error::config(format!("CERTCHAIN_LOG_JSON must be true or false, got '{}'", json))
            })?;
        }

        Ok(())
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(Error::from)?;

        if let Some(vault) = &self.vault {
            if vault.address.trim().is_empty() {
                return Err(Error::config("vault.address cannot be empty"));
            }
            if vault.mount_path.trim().is_empty() {
                return Err(Error::config("vault.mount_path cannot be empty"));
            }
        }

        if !self.attributes.is_object() {
            return Err(Error::config("attributes must be a mapping"));
        }

        Ok(())
    }

    pub fn node_attributes(&self) -> NodeAttributes {
        NodeAttributes::new(self.attributes.clone())
    }

    pub fn data_bag_path(&self) -> PathBuf {
        PathBuf::from(&self.data_bag.path)
    }

    /// Resolver wired to the configured data bag directory and, when a vault
    /// section is present, a Vault broker.
    pub fn resolver(&self) -> Result<ChainResolver> {
        let mut resolver = ChainResolver::new(self.node_attributes())
            .with_item_store(DataBagStore::new(self.data_bag_path()));

        if let Some(vault) = &self.vault {
            let broker = VaultBroker::new(vault.clone()).map_err(|e| {
                Error::config_with_source("Failed to configure Vault broker", Box::new(e))
            })?;
            resolver = resolver.with_secret_broker(broker);
        }

        Ok(resolver)
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}
