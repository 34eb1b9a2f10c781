//! Filesystem data-bag item store.
//!
//! Items live at `<root>/<bag>/<item>.json` as JSON objects. With
//! `encrypted = true` each value is an [`EncryptedEnvelope`] decrypted with
//! the trimmed contents of the secret file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::client::ItemStore;
use super::encrypted_item::EncryptedEnvelope;
use super::error::{BackendError, Result};
use super::types::SecretString;

/// Default data-bag root used when settings do not override it.
pub const DEFAULT_DATA_BAG_PATH: &str = "/var/chef/data_bags";

/// Data-bag store rooted at a directory.
#[derive(Debug, Clone)]
pub struct DataBagStore {
    root: PathBuf,
}

impl DataBagStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn item_path(&self, bag: &str, item: &str) -> Result<PathBuf> {
        validate_name(bag, "bag")?;
        validate_name(item, "item")?;
        Ok(self.root.join(bag).join(format!("{}.json", item)))
    }

    fn load_item(&self, bag: &str, item: &str) -> Result<Option<Map<String, Value>>> {
        let path = self.item_path(bag, item)?;
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(BackendError::io(path, e)),
        };

        match serde_json::from_slice::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(Some(map)),
            Ok(_) => Err(BackendError::parse(
                format!("data bag item {}/{}", bag, item),
                "item is not a JSON object",
            )),
            Err(e) => {
                Err(BackendError::parse(format!("data bag item {}/{}", bag, item), e.to_string()))
            }
        }
    }
}

impl ItemStore for DataBagStore {
    fn fetch(
        &self,
        bag: &str,
        item: &str,
        item_key: &str,
        encrypted: bool,
        secret_file: Option<&Path>,
    ) -> Result<Option<Vec<u8>>> {
        let Some(mut map) = self.load_item(bag, item)? else {
            tracing::debug!(bag = %bag, item = %item, "Data bag item not found");
            return Ok(None);
        };

        let Some(raw_value) = map.remove(item_key) else {
            tracing::debug!(bag = %bag, item = %item, item_key = %item_key, "Data bag key not found");
            return Ok(None);
        };

        let value = if encrypted {
            let secret_file = secret_file.ok_or_else(|| {
                BackendError::config(format!(
                    "data bag item {}/{} is encrypted but no secret file was configured",
                    bag, item
                ))
            })?;
            let secret = load_secret(secret_file)?;
            EncryptedEnvelope::from_value(&raw_value)?.decrypt(&secret)?
        } else {
            raw_value
        };

        tracing::debug!(bag = %bag, item = %item, item_key = %item_key, encrypted, "Read data bag value");

        match value {
            Value::Null => Ok(None),
            Value::String(text) => Ok(Some(text.into_bytes())),
            _ => Err(BackendError::parse(
                format!("data bag value {}.{}->{}", bag, item, item_key),
                "value is not a string",
            )),
        }
    }
}

/// Load the shared data-bag secret, trimming surrounding whitespace.
pub fn load_secret(path: &Path) -> Result<SecretString> {
    let raw = fs::read_to_string(path).map_err(|e| BackendError::io(path, e))?;
    let secret = SecretString::new(raw.trim());
    if secret.is_empty() {
        return Err(BackendError::config(format!("secret file {} is empty", path.display())));
    }
    Ok(secret)
}

/// Rejects names that would escape the bag directory.
fn validate_name(name: &str, what: &str) -> Result<()> {
    if name.is_empty() {
        return Err(BackendError::config(format!("data bag {} name cannot be empty", what)));
    }

    if name.contains('/') || name.contains('\\') {
        return Err(BackendError::config(format!(
            "data bag {} name '{}' cannot contain path separators",
            what, name
        )));
    }

    if name.contains("..") {
        return Err(BackendError::config(format!(
            "data bag {} name '{}' cannot contain '..'",
            what, name
        )));
    }

    Ok(())
}
