//! Read back a CA certificate for display and verification.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use openssl::x509::X509;
use serde::Serialize;
use x509_parser::objects::{oid2sn, oid_registry};
use x509_parser::prelude::*;

use super::subject::format_name;
use crate::errors::{Error, Result};

/// One extension found on a certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionSummary {
    pub name: String,
    pub critical: bool,
}

/// Fields an operator checks on a generated authority.
#[derive(Debug, Clone, Serialize)]
pub struct CertificateSummary {
    pub subject: String,
    pub issuer: String,
    pub serial: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    pub signature_algorithm: String,
    pub key_bits: u32,
    /// Hex-encoded subject key identifier, if the extension is present
    pub subject_key_id: Option<String>,
    pub is_ca: bool,
    pub extensions: Vec<ExtensionSummary>,
    /// Issuer equals subject and the signature verifies under the certificate's own key
    pub is_self_signed: bool,
}

impl CertificateSummary {
    pub fn extension(&self, name: &str) -> Option<&ExtensionSummary> {
        self.extensions.iter().find(|ext| ext.name == name)
    }
}

/// Parse the PEM certificate at `path`.
pub fn inspect_certificate(path: &Path) -> Result<CertificateSummary> {
    let pem = fs::read(path)
        .map_err(|e| Error::io(e, format!("Failed to read certificate {}", path.display())))?;
    let cert = X509::from_pem(&pem).map_err(|e| {
        Error::certificate_with_source(format!("{} is not a PEM certificate", path.display()), e)
    })?;
    summarize(&cert)
}

pub(crate) fn summarize(cert: &X509) -> Result<CertificateSummary> {
    let der = cert
        .to_der()
        .map_err(|e| Error::certificate_with_source("Failed to encode certificate", e))?;
    let (_, parsed) = X509Certificate::from_der(&der)
        .map_err(|e| Error::certificate(format!("Failed to parse certificate: {}", e)))?;

    let public_key = cert
        .public_key()
        .map_err(|e| Error::certificate_with_source("Certificate has no usable public key", e))?;

    let subject = format_name(cert.subject_name());
    let issuer = format_name(cert.issuer_name());
    // A failed verification is an answer, not an error
    let is_self_signed = subject == issuer && cert.verify(&public_key).unwrap_or(false);

    let extensions = parsed
        .extensions()
        .iter()
        .map(|ext| ExtensionSummary {
            name: oid2sn(&ext.oid, oid_registry())
                .map(str::to_string)
                .unwrap_or_else(|_| ext.oid.to_id_string()),
            critical: ext.critical,
        })
        .collect();

    let is_ca = parsed.extensions().iter().any(|ext| {
        matches!(ext.parsed_extension(), ParsedExtension::BasicConstraints(bc) if bc.ca)
    });

    let validity = parsed.validity();
    Ok(CertificateSummary {
        subject,
        issuer,
        serial: format!("{:x}", parsed.serial),
        not_before: to_utc(validity.not_before.timestamp())?,
        not_after: to_utc(validity.not_after.timestamp())?,
        signature_algorithm: cert
            .signature_algorithm()
            .object()
            .nid()
            .long_name()
            .unwrap_or("unknown")
            .to_string(),
        key_bits: public_key.bits(),
        subject_key_id: cert.subject_key_id().map(|id| hex::encode(id.as_slice())),
        is_ca,
        extensions,
        is_self_signed,
    })
}

fn to_utc(timestamp: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp, 0)
        .ok_or_else(|| Error::certificate(format!("Timestamp {} is out of range", timestamp)))
}
