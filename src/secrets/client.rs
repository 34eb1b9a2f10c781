//! Backend reader traits.
//!
//! Each reader is a single fetch over explicit identifiers. Implementations
//! hold connection settings only, never resolution state, so any of them can
//! be swapped for a test double.

use std::path::Path;
use std::sync::Arc;

use super::error::Result;

/// Key/value item store (data bags).
///
/// # Arguments
///
/// * `bag` / `item` - Locate the stored item
/// * `item_key` - Key inside the item holding the chain
/// * `encrypted` - Whether the value is an encrypted envelope
/// * `secret_file` - Where the decryption secret lives when `encrypted` is set
///
/// Returns `Ok(None)` when the bag, item or key does not exist.
pub trait ItemStore {
    fn fetch(
        &self,
        bag: &str,
        item: &str,
        item_key: &str,
        encrypted: bool,
        secret_file: Option<&Path>,
    ) -> Result<Option<Vec<u8>>>;
}

/// Secret broker protecting entries with its own access control and decryption.
///
/// Returns `Ok(None)` when the entry or key does not exist.
pub trait SecretBroker {
    fn fetch(&self, bag: &str, item: &str, item_key: &str) -> Result<Option<Vec<u8>>>;
}

/// Raw filesystem reads.
///
/// Returns `Ok(None)` when nothing exists at `path`.
pub trait PathReader {
    fn read(&self, path: &Path) -> Result<Option<Vec<u8>>>;
}

impl<T: ItemStore + ?Sized> ItemStore for Arc<T> {
    fn fetch(
        &self,
        bag: &str,
        item: &str,
        item_key: &str,
        encrypted: bool,
        secret_file: Option<&Path>,
    ) -> Result<Option<Vec<u8>>> {
        (**self).fetch(bag, item, item_key, encrypted, secret_file)
    }
}

impl<T: SecretBroker + ?Sized> SecretBroker for Arc<T> {
    fn fetch(&self, bag: &str, item: &str, item_key: &str) -> Result<Option<Vec<u8>>> {
        (**self).fetch(bag, item, item_key)
    }
}

impl<T: PathReader + ?Sized> PathReader for Arc<T> {
    fn read(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        (**self).read(path)
    }
}

impl<T: ItemStore + ?Sized> ItemStore for &T {
    fn fetch(
        &self,
        bag: &str,
        item: &str,
        item_key: &str,
        encrypted: bool,
        secret_file: Option<&Path>,
    ) -> Result<Option<Vec<u8>>> {
        (**self).fetch(bag, item, item_key, encrypted, secret_file)
    }
}

impl<T: SecretBroker + ?Sized> SecretBroker for &T {
    fn fetch(&self, bag: &str, item: &str, item_key: &str) -> Result<Option<Vec<u8>>> {
        (**self).fetch(bag, item, item_key)
    }
}

impl<T: PathReader + ?Sized> PathReader for &T {
    fn read(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        (**self).read(path)
    }
}
