//! # Error Handling
//!
//! Error types for chain resolution and CA generation. Backend-level failures
//! are wrapped into [`Error::Content`] at the resolver boundary and never
//! surface raw.

pub mod types;

pub use types::{ContentOrigin, Error, GenerationStep, Result};
