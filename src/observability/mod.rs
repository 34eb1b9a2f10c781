//! # Observability Infrastructure
//!
//! Structured logging through `tracing`. Library code only emits events;
//! installing a subscriber is left to the binary.

pub mod logging;

pub use logging::{init_logging, log_config_info};
