//! Backend readers for certificate-chain content.
//!
//! Each chain source is served by a reader behind a small trait:
//!
//! - [`ItemStore`]: key/value items, optionally encrypted with a shared
//!   secret ([`DataBagStore`])
//! - [`SecretBroker`]: access-controlled secret storage ([`VaultBroker`])
//! - [`PathReader`]: plain files ([`FsReader`])
//! - [`NodeAttributes`]: the node attribute tree for literal content
//!
//! Readers report "absent" as `Ok(None)` and real failures as
//! [`BackendError`]. Turning either into a chain error is the resolver's job.
//!
//! # Security Considerations
//!
//! - Secret values are never logged
//! - Passphrases and tokens travel as [`SecretString`]

pub mod attributes;
pub mod client;
pub mod data_bag;
pub mod encrypted_item;
pub mod error;
pub mod file;
pub mod types;
pub mod vault;

pub use attributes::{NodeAttributes, CHAIN_NAMESPACE};
pub use client::{ItemStore, PathReader, SecretBroker};
pub use data_bag::{load_secret, DataBagStore, DEFAULT_DATA_BAG_PATH};
pub use encrypted_item::EncryptedEnvelope;
pub use error::{BackendError, Result};
pub use file::FsReader;
pub use types::SecretString;
pub use vault::{VaultBroker, VaultConfig};
