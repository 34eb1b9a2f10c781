//! Source resolution for chain content.
//!
//! The resolver normalizes the declared source tag, picks exactly one
//! backend, and checks that it returned non-empty UTF-8 text. The outcome is
//! memoized on the [`ChainConfig`], so each declaration hits its backend at
//! most once.
//!
//! | source       | backend                  | locator in errors          |
//! |--------------|--------------------------|----------------------------|
//! | `attribute`  | node attributes          | `ssl_chain.content`        |
//! | `data_bag`   | [`ItemStore`]            | `bag.item->item_key`       |
//! | `chef_vault` | [`SecretBroker`]         | `bag.item->item_key`       |
//! | `file`       | [`PathReader`]           | chain path                 |
//!
//! An unrecognized or missing tag resolves to `Ok(None)` with a debug note.

use serde_json::Value;

use super::model::ChainConfig;
use super::source::ChainSource;
use crate::errors::{ContentOrigin, Error, Result};
use crate::secrets::{
    BackendError, DataBagStore, FsReader, ItemStore, NodeAttributes, PathReader, SecretBroker,
    CHAIN_NAMESPACE, DEFAULT_DATA_BAG_PATH,
};

/// Broker used when no secret broker has been configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredBroker;

impl SecretBroker for UnconfiguredBroker {
    fn fetch(
        &self,
        _bag: &str,
        _item: &str,
        _item_key: &str,
    ) -> crate::secrets::Result<Option<Vec<u8>>> {
        Err(BackendError::config("no secret broker is configured"))
    }
}

/// Resolves chain content for [`ChainConfig`] declarations.
pub struct ChainResolver {
    attributes: NodeAttributes,
    item_store: Box<dyn ItemStore>,
    secret_broker: Box<dyn SecretBroker>,
    path_reader: Box<dyn PathReader>,
}

impl ChainResolver {
    /// Resolver over the given attributes with the default backends: data
    /// bags under [`DEFAULT_DATA_BAG_PATH`], no secret broker, and the local
    /// filesystem.
    pub fn new(attributes: NodeAttributes) -> Self {
        Self {
            attributes,
            item_store: Box::new(DataBagStore::new(DEFAULT_DATA_BAG_PATH)),
            secret_broker: Box::new(UnconfiguredBroker),
            path_reader: Box::new(FsReader::new()),
        }
    }

    pub fn with_item_store(mut self, store: impl ItemStore + 'static) -> Self {
        self.item_store = Box::new(store);
        self
    }

    pub fn with_secret_broker(mut self, broker: impl SecretBroker + 'static) -> Self {
        self.secret_broker = Box::new(broker);
        self
    }

    pub fn with_path_reader(mut self, reader: impl PathReader + 'static) -> Self {
        self.path_reader = Box::new(reader);
        self
    }

    pub fn attributes(&self) -> &NodeAttributes {
        &self.attributes
    }

    /// Resolve the chain content for `config`.
    ///
    /// Returns `Ok(None)` when no recognized source is declared. A failed
    /// resolution is not cached, so a later call runs the backend again.
    ///
    /// # Errors
    ///
    /// [`Error::Content`] when the selected backend returns nothing, an empty
    /// string, non-UTF-8 bytes, or fails outright.
    pub fn resolve<'c>(&self, config: &'c ChainConfig) -> Result<Option<&'c str>> {
        let content = config.content_cell().get_or_try_init(|| self.compute(config))?;
        Ok(content.as_deref())
    }

    /// Like [`ChainResolver::resolve`], with "no chain" as an empty string.
    pub fn content_or_default<'c>(&self, config: &'c ChainConfig) -> Result<&'c str> {
        Ok(self.resolve(config)?.unwrap_or_default())
    }

    fn compute(&self, config: &ChainConfig) -> Result<Option<String>> {
        let source = config.source().and_then(ChainSource::parse);

        let Some(source) = source else {
            tracing::debug!(source = ?config.source(), "No SSL intermediary chain provided.");
            return Ok(None);
        };

        let origin = ContentOrigin::from(source);
        let content = match source {
            ChainSource::Attribute => self.from_attribute(origin)?,
            ChainSource::DataBag => self.from_data_bag(config, origin)?,
            ChainSource::ChefVault => self.from_chef_vault(config, origin)?,
            ChainSource::File => self.from_file(config, origin)?,
        };

        tracing::debug!(source = %source, bytes = content.len(), "Resolved SSL intermediary chain");
        Ok(Some(content))
    }

    fn from_attribute(&self, origin: ContentOrigin) -> Result<String> {
        let locator = format!("{}.content", CHAIN_NAMESPACE);
        match self.attributes.chain_content() {
            Some(Value::String(text)) if !text.is_empty() => Ok(text.clone()),
            Some(Value::String(_)) => Err(Error::content_with_message(origin, locator, "content is empty")),
            Some(_) => Err(Error::content_with_message(origin, locator, "content is not a string")),
            None => Err(Error::content(origin, locator)),
        }
    }

    fn from_data_bag(&self, config: &ChainConfig, origin: ContentOrigin) -> Result<String> {
        let locator = item_locator(config);
        let (bag, item, item_key) = item_identifiers(config, origin, &locator)?;

        let fetched =
            self.item_store.fetch(bag, item, item_key, config.encrypted(), config.secret_file());
        into_chain_text(fetched, origin, locator)
    }

    fn from_chef_vault(&self, config: &ChainConfig, origin: ContentOrigin) -> Result<String> {
        let locator = item_locator(config);
        let (bag, item, item_key) = item_identifiers(config, origin, &locator)?;

        let fetched = self.secret_broker.fetch(bag, item, item_key);
        into_chain_text(fetched, origin, locator)
    }

    fn from_file(&self, config: &ChainConfig, origin: ContentOrigin) -> Result<String> {
        let Some(path) = config.path() else {
            return Err(Error::content_with_message(origin, "<unset>", "neither path nor name is set"));
        };

        let fetched = self.path_reader.read(&path);
        into_chain_text(fetched, origin, path.display().to_string())
    }
}

fn item_locator(config: &ChainConfig) -> String {
    format!(
        "{}.{}->{}",
        config.bag().unwrap_or_default(),
        config.item().unwrap_or_default(),
        config.item_key().unwrap_or_default()
    )
}

fn item_identifiers<'a>(
    config: &'a ChainConfig,
    origin: ContentOrigin,
    locator: &str,
) -> Result<(&'a str, &'a str, &'a str)> {
    match (config.bag(), config.item(), config.item_key()) {
        (Some(bag), Some(item), Some(item_key)) => Ok((bag, item, item_key)),
        _ => Err(Error::content_with_message(origin, locator, "bag, item and item_key must be set")),
    }
}

/// Turn a backend result into chain text, wrapping every failure with the locator.
fn into_chain_text(
    fetched: crate::secrets::Result<Option<Vec<u8>>>,
    origin: ContentOrigin,
    locator: String,
) -> Result<String> {
    let bytes = match fetched {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return Err(Error::content(origin, locator)),
        Err(e) => return Err(Error::content_with_cause(origin, locator, Box::new(e))),
    };

    let text = String::from_utf8(bytes)
        .map_err(|_| Error::content_with_message(origin, locator.clone(), "content is not text"))?;

    if text.is_empty() {
        return Err(Error::content_with_message(origin, locator, "content is empty"));
    }

    Ok(text)
}
