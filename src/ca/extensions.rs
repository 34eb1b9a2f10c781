//! Fixed extension set carried by every generated authority.

use openssl::error::ErrorStack;
use openssl::x509::extension::{BasicConstraints, KeyUsage, SubjectKeyIdentifier};
use openssl::x509::{X509Extension, X509v3Context};

/// One X.509 v3 extension of the CA profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaExtension {
    /// `subjectKeyIdentifier=hash`
    SubjectKeyIdentifier,
    /// `basicConstraints=critical,CA:TRUE`
    BasicConstraints,
    /// `keyUsage=critical,cRLSign,keyCertSign`
    KeyUsage,
}

/// Extensions attached to a generated CA, in order.
pub const CA_EXTENSIONS: [CaExtension; 3] =
    [CaExtension::SubjectKeyIdentifier, CaExtension::BasicConstraints, CaExtension::KeyUsage];

impl CaExtension {
    /// OpenSSL long name, as listed by [`crate::ca::inspect_certificate`].
    pub fn name(&self) -> &'static str {
        match self {
            CaExtension::SubjectKeyIdentifier => "subjectKeyIdentifier",
            CaExtension::BasicConstraints => "basicConstraints",
            CaExtension::KeyUsage => "keyUsage",
        }
    }

    pub fn critical(&self) -> bool {
        !matches!(self, CaExtension::SubjectKeyIdentifier)
    }

    /// Build the extension. The context's subject must already carry its public key.
    pub(crate) fn build(&self, ctx: &X509v3Context<'_>) -> Result<X509Extension, ErrorStack> {
        match self {
            CaExtension::SubjectKeyIdentifier => SubjectKeyIdentifier::new().build(ctx),
            CaExtension::BasicConstraints => BasicConstraints::new().critical().ca().build(),
            CaExtension::KeyUsage => KeyUsage::new().critical().crl_sign().key_cert_sign().build(),
        }
    }
}
