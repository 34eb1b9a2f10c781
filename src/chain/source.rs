//! Chain source tags.

use std::fmt;

/// Backend that supplies chain content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainSource {
    /// Literal content from the node attributes
    Attribute,
    /// Key/value item store, optionally encrypted
    DataBag,
    /// Secret broker
    ChefVault,
    /// File on disk at the chain path
    File,
}

/// Every recognized source, in declaration order.
pub const SOURCES: [ChainSource; 4] =
    [ChainSource::Attribute, ChainSource::DataBag, ChainSource::ChefVault, ChainSource::File];

impl ChainSource {
    /// Canonical tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainSource::Attribute => "attribute",
            ChainSource::DataBag => "data_bag",
            ChainSource::ChefVault => "chef_vault",
            ChainSource::File => "file",
        }
    }

    /// Parse a declared tag after normalization.
    ///
    /// Returns `None` for tags that match no source. That is the "not
    /// configured" case, not an error.
    pub fn parse(tag: &str) -> Option<Self> {
        let normalized = normalize_tag(tag);
        SOURCES.iter().copied().find(|source| source.as_str() == normalized)
    }
}

impl fmt::Display for ChainSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trim, lowercase and turn `-` into `_`.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_ascii_lowercase().replace('-', "_")
}
