//! # Error Types
//!
//! Crate-wide error type for chain resolution and CA generation using `thiserror`.

use std::fmt;

use crate::chain::ChainSource;

/// Custom result type for certchain operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for certchain
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A recognized chain source produced no usable content
    #[error("Cannot read SSL intermediary chain from {source_kind}: {locator}{}", detail_suffix(.message))]
    Content {
        source_kind: ContentOrigin,
        locator: String,
        message: Option<String>,
        #[source]
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// CA key or certificate generation failed
    #[error("CA generation failed during {step}: {message}")]
    Generation {
        step: GenerationStep,
        message: String,
        #[source]
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A certificate could not be decoded or read back
    #[error("Invalid certificate: {message}")]
    Certificate {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O errors with additional context
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },
}

fn detail_suffix(message: &Option<String>) -> String {
    match message {
        Some(message) => format!(" ({})", message),
        None => String::new(),
    }
}

/// Where a content error originated, rendered the way operators know the sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentOrigin {
    Attribute,
    DataBag,
    ChefVault,
    Path,
}

impl From<ChainSource> for ContentOrigin {
    fn from(source: ChainSource) -> Self {
        match source {
            ChainSource::Attribute => ContentOrigin::Attribute,
            ChainSource::DataBag => ContentOrigin::DataBag,
            ChainSource::ChefVault => ContentOrigin::ChefVault,
            ChainSource::File => ContentOrigin::Path,
        }
    }
}

impl fmt::Display for ContentOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentOrigin::Attribute => write!(f, "content key value"),
            ContentOrigin::DataBag => write!(f, "data bag"),
            ContentOrigin::ChefVault => write!(f, "chef-vault"),
            ContentOrigin::Path => write!(f, "path"),
        }
    }
}

/// Pipeline step in which CA generation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStep {
    KeyGeneration,
    KeyWrite,
    KeyRead,
    CertificateBuild,
    Extension,
    Signing,
    CertificateWrite,
}

impl fmt::Display for GenerationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let step = match self {
            GenerationStep::KeyGeneration => "key_generation",
            GenerationStep::KeyWrite => "key_write",
            GenerationStep::KeyRead => "key_read",
            GenerationStep::CertificateBuild => "certificate_build",
            GenerationStep::Extension => "extension",
            GenerationStep::Signing => "signing",
            GenerationStep::CertificateWrite => "certificate_write",
        };
        write!(f, "{}", step)
    }
}

impl Error {
    /// Create a content error without an underlying cause
    pub fn content<S: Into<String>>(origin: ContentOrigin, locator: S) -> Self {
        Self::Content { source_kind: origin, locator: locator.into(), message: None, cause: None }
    }

    /// Create a content error with a short detail message
    pub fn content_with_message<S: Into<String>, M: Into<String>>(
        origin: ContentOrigin,
        locator: S,
        message: M,
    ) -> Self {
        Self::Content {
            source_kind: origin,
            locator: locator.into(),
            message: Some(message.into()),
            cause: None,
        }
    }

    /// Create a content error wrapping the backend failure
    pub fn content_with_cause<S: Into<String>>(
        origin: ContentOrigin,
        locator: S,
        cause: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Content {
            source_kind: origin,
            locator: locator.into(),
            message: Some(cause.to_string()),
            cause: Some(cause),
        }
    }

    /// Create a generation error with source
    pub fn generation_with_cause<E>(step: GenerationStep, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Generation { step, message: cause.to_string(), cause: Some(Box::new(cause)) }
    }

    /// Create a certificate error
    pub fn certificate<S: Into<String>>(message: S) -> Self {
        Self::Certificate { message: message.into(), source: None }
    }

    /// Create a certificate error with source
    pub fn certificate_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Certificate { message: message.into(), source: Some(Box::new(source)) }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into(), source: None }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>>(
        message: S,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Config { message: message.into(), source: Some(source) }
    }

    /// Create an I/O error with context
    pub fn io<S: Into<String>>(source: std::io::Error, context: S) -> Self {
        Self::Io { source, context: context.into() }
    }

    /// Whether this is a content error for a recognized source
    pub fn is_content(&self) -> bool {
        matches!(self, Self::Content { .. })
    }

    /// The failing generation step, if this is a generation error
    pub fn generation_step(&self) -> Option<GenerationStep> {
        match self {
            Self::Generation { step, .. } => Some(*step),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io { source: error, context: "I/O operation failed".to_string() }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Config { message: format!("Invalid settings: {}", errors), source: None }
    }
}
