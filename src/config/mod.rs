//! # Configuration Management
//!
//! Settings come from an optional TOML, YAML or JSON file, then
//! `CERTCHAIN_*` environment variables:
//!
//! | variable                  | setting              |
//! |---------------------------|----------------------|
//! | `CERTCHAIN_PLATFORM`      | `platform`           |
//! | `CERTCHAIN_DATA_BAG_PATH` | `data_bag.path`      |
//! | `CERTCHAIN_VAULT_ADDR`    | `vault.address`      |
//! | `CERTCHAIN_VAULT_TOKEN`   | `vault.token`        |
//! | `CERTCHAIN_VAULT_MOUNT`   | `vault.mount_path`   |
//! | `CERTCHAIN_LOG_JSON`      | `logging.json`       |

pub mod settings;

pub use settings::{DataBagSettings, LoggingSettings, Settings};
