//! # certchain
//!
//! Resolves SSL intermediate-certificate chain content from one of several
//! sources, and generates self-signed certificate authorities.
//!
//! ## Chain resolution
//!
//! A [`ChainConfig`] declares where a chain file lives and which source
//! supplies it: node attributes, a (possibly encrypted) data bag, a Vault
//! secret, or a file already on disk. [`ChainResolver`] reads the source
//! once and caches the result on the declaration.
//!
//! ```rust,no_run
//! use certchain::{ChainConfig, ChainResolver};
//! use certchain::secrets::{DataBagStore, NodeAttributes};
//!
//! # fn main() -> certchain::Result<()> {
//! let config = ChainConfig::new("ubuntu")
//!     .with_name("chain.pem")
//!     .with_source("data-bag")
//!     .with_bag("ssl")
//!     .with_item("web")
//!     .with_item_key("chain");
//!
//! let resolver = ChainResolver::new(NodeAttributes::empty())
//!     .with_item_store(DataBagStore::new("/srv/data_bags"));
//!
//! if let Some(pem) = resolver.resolve(&config)? {
//!     println!("{}", pem);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## CA generation
//!
//! See [`ca::generate`].

pub mod ca;
pub mod chain;
pub mod cli;
pub mod config;
pub mod errors;
pub mod observability;
pub mod secrets;

pub use chain::{ChainConfig, ChainResolver, ChainSource};
pub use config::Settings;
pub use errors::{Error, Result};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
