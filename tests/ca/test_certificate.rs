use std::fs;

use certchain::ca::{generate, inspect_certificate, SignatureDigest, CA_EXTENSIONS};
use certchain::errors::GenerationStep;
use openssl::x509::X509;

use super::support::CaPaths;

#[test]
fn test_certificate_is_self_signed() {
    let paths = CaPaths::new();
    let artifacts = generate(&paths.request()).unwrap();

    let summary = inspect_certificate(&paths.cert).unwrap();
    assert_eq!(summary.subject, "/C=ES/O=Example Org/CN=Example Test CA");
    assert_eq!(summary.issuer, summary.subject);
    assert!(summary.is_self_signed);
    assert!(summary.is_ca);
    assert_eq!(summary.subject_key_id.as_ref().map(String::len), Some(40));

    let cert = X509::from_pem(&fs::read(&paths.cert).unwrap()).unwrap();
    assert!(cert.verify(&artifacts.private_key).unwrap());
}

#[test]
fn test_fixed_extensions_with_criticality() {
    let paths = CaPaths::new();
    generate(&paths.request()).unwrap();

    let summary = inspect_certificate(&paths.cert).unwrap();
    assert_eq!(summary.extensions.len(), CA_EXTENSIONS.len());
    for extension in CA_EXTENSIONS {
        let found: Vec<_> =
            summary.extensions.iter().filter(|ext| ext.name == extension.name()).collect();
        assert_eq!(found.len(), 1, "{}", extension.name());
        assert_eq!(found[0].critical, extension.critical(), "{}", extension.name());
    }
}

#[test]
fn test_public_key_matches_private_key() {
    let paths = CaPaths::new();
    let artifacts = generate(&paths.request()).unwrap();

    let public = artifacts.certificate.public_key().unwrap();
    assert!(public.public_eq(&artifacts.private_key));
}

#[test]
fn test_sha1_is_the_default_digest() {
    let paths = CaPaths::new();
    generate(&paths.request()).unwrap();

    let summary = inspect_certificate(&paths.cert).unwrap();
    assert_eq!(summary.signature_algorithm, "sha1WithRSAEncryption");
}

#[test]
fn test_sha256_opt_in() {
    let paths = CaPaths::new();
    generate(&paths.request().with_digest(SignatureDigest::Sha256)).unwrap();

    let summary = inspect_certificate(&paths.cert).unwrap();
    assert_eq!(summary.signature_algorithm, "sha256WithRSAEncryption");
}

#[test]
fn test_validity_window_is_applied() {
    let paths = CaPaths::new();
    let request = paths.request();
    generate(&request).unwrap();

    let summary = inspect_certificate(&paths.cert).unwrap();
    assert_eq!(summary.not_before.timestamp(), request.validity.not_before().timestamp());
    assert_eq!(summary.not_after.timestamp(), request.validity.not_after().timestamp());
}

#[test]
fn test_regeneration_overwrites_both_files() {
    let paths = CaPaths::new();
    let first = generate(&paths.request().with_passphrase("one")).unwrap();
    let first_cert = fs::read(&paths.cert).unwrap();

    let second = generate(&paths.request()).unwrap();
    let second_cert = fs::read(&paths.cert).unwrap();

    assert_ne!(first_cert, second_cert);
    assert!(!first.private_key.public_eq(&second.private_key));
    let key = openssl::pkey::PKey::private_key_from_pem(&fs::read(&paths.key).unwrap()).unwrap();
    assert!(key.public_eq(&second.private_key));
}

#[test]
fn test_missing_output_directory_fails_at_key_write() {
    let paths = CaPaths::new();
    let mut request = paths.request();
    request.key_file_path = paths.key.parent().unwrap().join("missing").join("ca.key");

    let err = generate(&request).unwrap_err();
    assert_eq!(err.generation_step(), Some(GenerationStep::KeyWrite));
}
