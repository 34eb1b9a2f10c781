//! Self-signed certificate authority generation.
//!
//! ```rust,no_run
//! use certchain::ca::{generate, CaRequest, CaSubject, Validity};
//!
//! # fn main() -> certchain::Result<()> {
//! let subject = CaSubject::parse("/C=US/O=Example/CN=Example Root")?;
//! let request = CaRequest::new(subject, "ca.key", "ca.pem", Validity::days_from_now(365)?)
//!     .with_passphrase("change me");
//! let artifacts = generate(&request)?;
//! assert!(artifacts.key_encrypted());
//! # Ok(())
//! # }
//! ```

pub mod extensions;
pub mod generator;
pub mod inspect;
pub mod request;
pub mod subject;

pub use extensions::{CaExtension, CA_EXTENSIONS};
pub use generator::{generate, issue_ca_certificate, read_private_key, write_private_key};
pub use inspect::{inspect_certificate, CertificateSummary, ExtensionSummary};
pub use request::{CaArtifacts, CaRequest, SignatureDigest, Validity, DEFAULT_VALIDITY_DAYS};
pub use subject::CaSubject;
