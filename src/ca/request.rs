//! Inputs and outputs of CA generation.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use openssl::asn1::Asn1Time;
use openssl::error::ErrorStack;
use openssl::hash::MessageDigest;
use openssl::pkey::{PKey, Private};
use openssl::x509::X509;

use super::subject::CaSubject;
use crate::errors::{Error, Result};
use crate::secrets::SecretString;

/// Default lifetime of a generated authority.
pub const DEFAULT_VALIDITY_DAYS: u32 = 365;

/// Certificate validity window, in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validity {
    not_before: DateTime<Utc>,
    not_after: DateTime<Utc>,
}

impl Validity {
    /// # Errors
    ///
    /// [`Error::Config`] unless `not_after` is later than `not_before`.
    pub fn new(not_before: DateTime<Utc>, not_after: DateTime<Utc>) -> Result<Self> {
        if not_after <= not_before {
            return Err(Error::config(format!(
                "Validity ends ({}) before it starts ({})",
                not_after, not_before
            )));
        }
        Ok(Self { not_before, not_after })
    }

    /// Window starting now and lasting `days`.
    pub fn days_from_now(days: u32) -> Result<Self> {
        let length = Duration::try_days(i64::from(days))
            .ok_or_else(|| Error::config(format!("Validity of {} days is out of range", days)))?;
        let now = Utc::now();
        let not_after = now
            .checked_add_signed(length)
            .ok_or_else(|| Error::config(format!("Validity of {} days is out of range", days)))?;
        Self::new(now, not_after)
    }

    pub fn not_before(&self) -> DateTime<Utc> {
        self.not_before
    }

    pub fn not_after(&self) -> DateTime<Utc> {
        self.not_after
    }

    pub(crate) fn to_asn1(self) -> std::result::Result<(Asn1Time, Asn1Time), ErrorStack> {
        Ok((
            Asn1Time::from_unix(self.not_before.timestamp())?,
            Asn1Time::from_unix(self.not_after.timestamp())?,
        ))
    }
}

/// Digest used to sign the CA certificate.
///
/// SHA-1 is the default for compatibility with existing consumers of these
/// certificates. It is collision-prone; pick [`SignatureDigest::Sha256`] for
/// anything new.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureDigest {
    #[default]
    Sha1,
    Sha256,
}

impl SignatureDigest {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureDigest::Sha1 => "sha1",
            SignatureDigest::Sha256 => "sha256",
        }
    }

    pub(crate) fn message_digest(&self) -> MessageDigest {
        match self {
            SignatureDigest::Sha1 => MessageDigest::sha1(),
            SignatureDigest::Sha256 => MessageDigest::sha256(),
        }
    }
}

impl fmt::Display for SignatureDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureDigest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "").as_str() {
            "sha1" => Ok(SignatureDigest::Sha1),
            "sha256" => Ok(SignatureDigest::Sha256),
            other => Err(Error::config(format!("Unsupported signature digest '{}'", other))),
        }
    }
}

/// Everything needed to generate a self-signed authority.
#[derive(Debug, Clone)]
pub struct CaRequest {
    pub subject: CaSubject,
    pub key_file_path: PathBuf,
    pub cert_file_path: PathBuf,
    pub validity: Validity,
    /// When set, the key file is encrypted under this passphrase
    pub key_passphrase: Option<SecretString>,
    pub digest: SignatureDigest,
}

impl CaRequest {
    pub fn new(
        subject: CaSubject,
        key_file_path: impl Into<PathBuf>,
        cert_file_path: impl Into<PathBuf>,
        validity: Validity,
    ) -> Self {
        Self {
            subject,
            key_file_path: key_file_path.into(),
            cert_file_path: cert_file_path.into(),
            validity,
            key_passphrase: None,
            digest: SignatureDigest::default(),
        }
    }

    pub fn with_passphrase(mut self, passphrase: impl Into<SecretString>) -> Self {
        self.key_passphrase = Some(passphrase.into());
        self
    }

    pub fn with_digest(mut self, digest: SignatureDigest) -> Self {
        self.digest = digest;
        self
    }
}

/// Generated authority materials.
pub struct CaArtifacts {
    pub private_key: PKey<Private>,
    pub certificate: X509,
    pub subject: CaSubject,
    pub validity: Validity,
    pub key_file_path: PathBuf,
    pub cert_file_path: PathBuf,
    pub key_passphrase: Option<SecretString>,
}

impl CaArtifacts {
    pub fn key_file_path(&self) -> &Path {
        &self.key_file_path
    }

    pub fn cert_file_path(&self) -> &Path {
        &self.cert_file_path
    }

    /// Whether the key file on disk is passphrase-encrypted.
    pub fn key_encrypted(&self) -> bool {
        self.key_passphrase.is_some()
    }
}

impl fmt::Debug for CaArtifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaArtifacts")
            .field("subject", &self.subject.to_string())
            .field("validity", &self.validity)
            .field("key_file_path", &self.key_file_path)
            .field("cert_file_path", &self.cert_file_path)
            .field("key_passphrase", &self.key_passphrase)
            .finish_non_exhaustive()
    }
}
