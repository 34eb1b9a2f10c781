//! HashiCorp Vault secret broker for the `chef_vault` chain source.
//!
//! Entries are read from the KV v2 engine at `<mount>/<bag>/<item>` and the
//! chain is taken from the `item_key` field. Vault handles its own access
//! control and decryption. This module only maps a missing secret or field
//! to "absent".
//!
//! # Example
//!
//! ```rust,ignore
//! use certchain::secrets::{SecretBroker, VaultBroker, VaultConfig};
//!
//! let broker = VaultBroker::new(VaultConfig {
//!     address: "https://vault.example.com:8200".to_string(),
//!     token: Some("vault-token".into()),
//!     namespace: None,
//!     mount_path: "secret".to_string(),
//! })?;
//!
//! let chain = broker.fetch("ssl", "web", "chain")?;
//! ```
//!
//! The underlying client is async. The broker owns a current-thread runtime
//! and drives each request to completion, so callers stay synchronous. Do not
//! call [`VaultBroker::fetch`] from inside another tokio runtime.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::runtime::{Builder, Runtime};
use vaultrs::client::{VaultClient, VaultClientSettingsBuilder};
use vaultrs::error::ClientError;
use vaultrs::kv2;

use super::client::SecretBroker;
use super::error::{BackendError, Result};
use super::types::SecretString;

/// Configuration for the Vault secret broker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Vault server address (e.g., "https://vault.example.com:8200")
    pub address: String,

    /// Vault authentication token
    #[serde(default)]
    pub token: Option<SecretString>,

    /// Vault namespace (Enterprise multi-tenancy)
    #[serde(default)]
    pub namespace: Option<String>,

    /// KV v2 mount path (default: "secret")
    #[serde(default = "default_mount_path")]
    pub mount_path: String,
}

pub(crate) fn default_mount_path() -> String {
    "secret".to_string()
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            address: "http://127.0.0.1:8200".to_string(),
            token: None,
            namespace: None,
            mount_path: default_mount_path(),
        }
    }
}

/// Secret broker backed by Vault KV v2.
pub struct VaultBroker {
    client: VaultClient,
    mount_path: String,
    runtime: Runtime,
}

impl VaultBroker {
    /// Creates a broker from settings. No request is made until the first fetch.
    ///
    /// # Errors
    ///
    /// - [`BackendError::Config`] if the address or mount path is empty or the
    ///   client settings are rejected
    pub fn new(config: VaultConfig) -> Result<Self> {
        if config.address.trim().is_empty() {
            return Err(BackendError::config("Vault address cannot be empty"));
        }
        if config.mount_path.trim().is_empty() {
            return Err(BackendError::config("Vault mount path cannot be empty"));
        }

        let runtime = Builder::new_current_thread().enable_all().build().map_err(|e| {
            BackendError::config(format!("Failed to start Vault client runtime: {}", e))
        })?;

        let mut settings_builder = VaultClientSettingsBuilder::default();
        settings_builder.address(&config.address);

        if let Some(ref token) = config.token {
            settings_builder.token(token.expose_secret());
        }

        if let Some(namespace) = config.namespace {
            settings_builder.namespace(Some(namespace));
        }

        let settings = settings_builder
            .build()
            .map_err(|e| BackendError::config(format!("Invalid Vault configuration: {}", e)))?;

        let client = {
            let _guard = runtime.enter();
            VaultClient::new(settings).map_err(|e| {
                BackendError::config(format!("Failed to create Vault client: {}", e))
            })?
        };

        tracing::debug!(address = %config.address, mount_path = %config.mount_path, "Vault broker configured");

        Ok(Self { client, mount_path: config.mount_path, runtime })
    }

    fn secret_path(bag: &str, item: &str) -> String {
        format!("{}/{}", bag.trim_matches('/'), item.trim_matches('/'))
    }
}

impl SecretBroker for VaultBroker {
    fn fetch(&self, bag: &str, item: &str, item_key: &str) -> Result<Option<Vec<u8>>> {
        let path = Self::secret_path(bag, item);

        let read: std::result::Result<HashMap<String, Value>, ClientError> =
            self.runtime.block_on(kv2::read(&self.client, &self.mount_path, &path));

        let secret = match read {
            Ok(secret) => secret,
            Err(ClientError::APIError { code: 404, .. }) => {
                tracing::debug!(mount_path = %self.mount_path, path = %path, "Vault secret not found");
                return Ok(None);
            }
            Err(e) => {
                tracing::error!(error = %e, mount_path = %self.mount_path, path = %path, "Failed to read secret from Vault");
                return Err(BackendError::vault(format!("reading '{}': {}", path, e)));
            }
        };

        match secret.get(item_key) {
            None | Some(Value::Null) => {
                tracing::debug!(path = %path, item_key = %item_key, "Vault secret has no such field");
                Ok(None)
            }
            Some(Value::String(text)) => Ok(Some(text.clone().into_bytes())),
            Some(_) => Err(BackendError::parse(
                format!("Vault secret {}->{}", path, item_key),
                "value is not a string",
            )),
        }
    }
}
