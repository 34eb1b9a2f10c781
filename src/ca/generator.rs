//! Self-signed CA generation.
//!
//! The pipeline runs in fixed order and stops at the first failure:
//!
//! 1. generate a 2048-bit RSA key and write it to a `0400` file
//! 2. read the key back from that file
//! 3. build a v3 certificate with issuer = subject
//! 4. attach [`CA_EXTENSIONS`]
//! 5. sign and write the PEM certificate
//!
//! Files are not cleaned up when a later step fails.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

use openssl::bn::{BigNum, MsbOption};
use openssl::error::ErrorStack;
use openssl::pkey::{PKey, Private};
use openssl::rsa::Rsa;
use openssl::symm::Cipher;
use openssl::x509::X509;
use zeroize::Zeroizing;

use super::extensions::CA_EXTENSIONS;
use super::request::{CaArtifacts, CaRequest};
use crate::errors::{Error, GenerationStep, Result};
use crate::secrets::SecretString;

const RSA_KEY_BITS: u32 = 2048;
const KEY_FILE_MODE: u32 = 0o400;
// X509 version 3 is encoded as 2
const X509_VERSION_3: i32 = 2;

/// Generate a CA key and self-signed certificate as described by `request`.
///
/// # Errors
///
/// [`Error::Generation`] naming the step that failed.
pub fn generate(request: &CaRequest) -> Result<CaArtifacts> {
    tracing::info!(
        subject = %request.subject,
        key_file = %request.key_file_path.display(),
        cert_file = %request.cert_file_path.display(),
        encrypted = request.key_passphrase.is_some(),
        digest = %request.digest,
        "Generating self-signed CA"
    );

    write_private_key(&request.key_file_path, request.key_passphrase.as_ref())?;
    let (private_key, certificate) = issue_ca_certificate(request)?;

    Ok(CaArtifacts {
        private_key,
        certificate,
        subject: request.subject.clone(),
        validity: request.validity,
        key_file_path: request.key_file_path.clone(),
        cert_file_path: request.cert_file_path.clone(),
        key_passphrase: request.key_passphrase.clone(),
    })
}

/// Generate an RSA key and persist it at `path` with mode `0400`.
///
/// Any existing file is removed first. With a passphrase the traditional PEM
/// is encrypted under AES-128-CBC.
pub fn write_private_key(path: &Path, passphrase: Option<&SecretString>) -> Result<PKey<Private>> {
    let rsa = Rsa::generate(RSA_KEY_BITS)
        .map_err(|e| Error::generation_with_cause(GenerationStep::KeyGeneration, e))?;

    let pem = Zeroizing::new(
        match passphrase {
            Some(passphrase) => {
                rsa.private_key_to_pem_passphrase(Cipher::aes_128_cbc(), passphrase.as_bytes())
            }
            None => rsa.private_key_to_pem(),
        }
        .map_err(|e| Error::generation_with_cause(GenerationStep::KeyGeneration, e))?,
    );

    create_key_file(path, &pem)
        .map_err(|e| Error::generation_with_cause(GenerationStep::KeyWrite, e))?;
    tracing::debug!(path = %path.display(), encrypted = passphrase.is_some(), "Wrote CA private key");

    PKey::from_rsa(rsa).map_err(|e| Error::generation_with_cause(GenerationStep::KeyGeneration, e))
}

fn create_key_file(path: &Path, pem: &[u8]) -> std::io::Result<()> {
    // An earlier 0400 key cannot be opened for writing
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let mut file = OpenOptions::new().write(true).create_new(true).mode(KEY_FILE_MODE).open(path)?;
    file.write_all(pem)?;
    file.sync_all()
}

/// Read the private key from `path`, decrypting it when a passphrase is given.
pub fn read_private_key(path: &Path, passphrase: Option<&SecretString>) -> Result<PKey<Private>> {
    let pem = Zeroizing::new(
        fs::read(path).map_err(|e| Error::generation_with_cause(GenerationStep::KeyRead, e))?,
    );

    match passphrase {
        Some(passphrase) => PKey::private_key_from_pem_passphrase(&pem, passphrase.as_bytes()),
        None => PKey::private_key_from_pem(&pem),
    }
    .map_err(|e| Error::generation_with_cause(GenerationStep::KeyRead, e))
}

/// Build, sign and write the CA certificate from the key already at
/// `request.key_file_path`.
pub fn issue_ca_certificate(request: &CaRequest) -> Result<(PKey<Private>, X509)> {
    let private_key = read_private_key(&request.key_file_path, request.key_passphrase.as_ref())?;
    let certificate = build_certificate(&private_key, request)?;

    let pem = certificate
        .to_pem()
        .map_err(|e| Error::generation_with_cause(GenerationStep::CertificateWrite, e))?;
    fs::write(&request.cert_file_path, pem)
        .map_err(|e| Error::generation_with_cause(GenerationStep::CertificateWrite, e))?;

    tracing::info!(
        path = %request.cert_file_path.display(),
        not_after = %request.validity.not_after(),
        "Wrote CA certificate"
    );
    Ok((private_key, certificate))
}

fn build_certificate(private_key: &PKey<Private>, request: &CaRequest) -> Result<X509> {
    let build_step = |e: ErrorStack| Error::generation_with_cause(GenerationStep::CertificateBuild, e);

    let mut builder = X509::builder().map_err(build_step)?;
    builder.set_version(X509_VERSION_3).map_err(build_step)?;

    let mut serial = BigNum::new().map_err(build_step)?;
    serial.rand(128, MsbOption::MAYBE_ZERO, false).map_err(build_step)?;
    let serial = serial.to_asn1_integer().map_err(build_step)?;
    builder.set_serial_number(&serial).map_err(build_step)?;

    builder.set_pubkey(private_key).map_err(build_step)?;

    let (not_before, not_after) = request.validity.to_asn1().map_err(build_step)?;
    builder.set_not_before(&not_before).map_err(build_step)?;
    builder.set_not_after(&not_after).map_err(build_step)?;

    let name = request.subject.to_x509_name().map_err(build_step)?;
    builder.set_subject_name(&name).map_err(build_step)?;
    builder.set_issuer_name(&name).map_err(build_step)?;

    // No issuer certificate: the context points at the certificate itself
    let extensions = {
        let ctx = builder.x509v3_context(None, None);
        CA_EXTENSIONS
            .iter()
            .map(|extension| extension.build(&ctx))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::generation_with_cause(GenerationStep::Extension, e))?
    };
    for extension in extensions {
        builder
            .append_extension(extension)
            .map_err(|e| Error::generation_with_cause(GenerationStep::Extension, e))?;
    }

    builder
        .sign(private_key, request.digest.message_digest())
        .map_err(|e| Error::generation_with_cause(GenerationStep::Signing, e))?;

    Ok(builder.build())
}
