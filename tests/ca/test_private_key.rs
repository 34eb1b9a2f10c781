use std::fs;
use std::os::unix::fs::PermissionsExt;

use certchain::ca::{generate, read_private_key};
use certchain::errors::GenerationStep;
use certchain::secrets::SecretString;
use openssl::pkey::PKey;

use super::support::CaPaths;

#[test]
fn test_key_file_is_owner_read_only() {
    let paths = CaPaths::new();
    generate(&paths.request()).unwrap();

    let mode = fs::metadata(&paths.key).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o400);
}

#[test]
fn test_plain_key_parses_without_passphrase() {
    let paths = CaPaths::new();
    let artifacts = generate(&paths.request()).unwrap();
    assert!(!artifacts.key_encrypted());

    let pem = fs::read(&paths.key).unwrap();
    let key = PKey::private_key_from_pem(&pem).unwrap();
    assert!(key.public_eq(&artifacts.private_key));
    assert_eq!(key.bits(), 2048);
}

#[test]
fn test_passphrase_encrypts_key_at_rest() {
    let paths = CaPaths::new();
    let request = paths.request().with_passphrase("s3cr3t passphrase");
    let artifacts = generate(&request).unwrap();
    assert!(artifacts.key_encrypted());

    let pem = fs::read(&paths.key).unwrap();
    let text = String::from_utf8_lossy(&pem);
    assert!(text.contains("Proc-Type: 4,ENCRYPTED"));
    assert!(text.contains("DEK-Info: AES-128-CBC"));

    assert!(PKey::private_key_from_pem_passphrase(&pem, b"wrong").is_err());
    let key = PKey::private_key_from_pem_passphrase(&pem, b"s3cr3t passphrase").unwrap();
    assert!(key.public_eq(&artifacts.private_key));
}

#[test]
fn test_read_back_with_wrong_passphrase_names_step() {
    let paths = CaPaths::new();
    generate(&paths.request().with_passphrase("right")).unwrap();

    let err = read_private_key(&paths.key, Some(&SecretString::new("wrong"))).unwrap_err();
    assert_eq!(err.generation_step(), Some(GenerationStep::KeyRead));
}
