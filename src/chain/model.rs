//! Chain attribute model.
//!
//! Settings are evaluated in dependency order. `directory` comes from the
//! platform. `path` derives from `directory` and `name`. `content` depends on
//! `source`, which selects which of the remaining settings matter.

use std::path::{Path, PathBuf};

use once_cell::unsync::OnceCell;

use super::platform::default_chain_dir;
use crate::secrets::NodeAttributes;

/// Settings for one certificate-chain declaration.
///
/// `content` is a compute-once cell. The first successful resolution fills
/// it, and later reads return the cached value without touching a backend.
/// The cell is not thread-safe, so a `ChainConfig` cannot be shared across
/// threads.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    name: Option<String>,
    directory: PathBuf,
    path: Option<PathBuf>,
    source: Option<String>,
    bag: Option<String>,
    item: Option<String>,
    item_key: Option<String>,
    encrypted: bool,
    secret_file: Option<PathBuf>,
    content: OnceCell<Option<String>>,
}

impl ChainConfig {
    /// Empty declaration using the platform's default chain directory.
    pub fn new(platform: &str) -> Self {
        Self {
            name: None,
            directory: PathBuf::from(default_chain_dir(platform)),
            path: None,
            source: None,
            bag: None,
            item: None,
            item_key: None,
            encrypted: false,
            secret_file: None,
            content: OnceCell::new(),
        }
    }

    /// Declaration with every default read from the node attributes.
    ///
    /// `bag`, `item`, `encrypted` and `secret_file` fall back to top-level
    /// attributes when `ssl_chain.*` does not set them.
    pub fn from_attributes(platform: &str, attrs: &NodeAttributes) -> Self {
        let mut config = Self::new(platform);
        config.name = attrs.chain_str("name", false);
        config.source = attrs.chain_str("source", false);
        config.bag = attrs.chain_str("bag", true);
        config.item = attrs.chain_str("item", true);
        config.item_key = attrs.chain_str("item_key", false);
        config.encrypted = attrs.chain_bool("encrypted", true).unwrap_or(false);
        config.secret_file = attrs.chain_str("secret_file", true).map(PathBuf::from);
        config
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_bag(mut self, bag: impl Into<String>) -> Self {
        self.bag = Some(bag.into());
        self
    }

    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.item = Some(item.into());
        self
    }

    pub fn with_item_key(mut self, item_key: impl Into<String>) -> Self {
        self.item_key = Some(item_key.into());
        self
    }

    pub fn with_encrypted(mut self, encrypted: bool) -> Self {
        self.encrypted = encrypted;
        self
    }

    pub fn with_secret_file(mut self, secret_file: impl Into<PathBuf>) -> Self {
        self.secret_file = Some(secret_file.into());
        self
    }

    /// Set the chain content directly. No backend runs for this declaration.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = OnceCell::with_value(Some(content.into()));
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Explicit path, or `directory/name` when only a name is set.
    pub fn path(&self) -> Option<PathBuf> {
        match (&self.path, &self.name) {
            (Some(path), _) => Some(path.clone()),
            (None, Some(name)) => Some(self.directory.join(name)),
            (None, None) => None,
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn bag(&self) -> Option<&str> {
        self.bag.as_deref()
    }

    pub fn item(&self) -> Option<&str> {
        self.item.as_deref()
    }

    pub fn item_key(&self) -> Option<&str> {
        self.item_key.as_deref()
    }

    pub fn encrypted(&self) -> bool {
        self.encrypted
    }

    pub fn secret_file(&self) -> Option<&Path> {
        self.secret_file.as_deref()
    }

    /// Cached content, if resolution already ran. `Some(None)` means "no chain".
    pub fn resolved_content(&self) -> Option<Option<&str>> {
        self.content.get().map(|content| content.as_deref())
    }

    pub fn is_resolved(&self) -> bool {
        self.content.get().is_some()
    }

    pub(crate) fn content_cell(&self) -> &OnceCell<Option<String>> {
        &self.content
    }
}
