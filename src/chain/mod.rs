//! Certificate-chain declarations and their content resolution.
//!
//! A [`ChainConfig`] describes one chain file: where it lives and which
//! source supplies its PEM text. [`ChainResolver`] reads that source once and
//! caches the outcome on the declaration.

pub mod model;
pub mod platform;
pub mod resolver;
pub mod source;

pub use model::ChainConfig;
pub use platform::{default_chain_dir, PlatformFamily};
pub use resolver::{ChainResolver, UnconfiguredBroker};
pub use source::{normalize_tag, ChainSource, SOURCES};
