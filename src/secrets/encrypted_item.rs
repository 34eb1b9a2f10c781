//! Decryption of encrypted data-bag values.
//!
//! Each encrypted value is a JSON envelope keyed by a shared secret:
//!
//! | version | cipher        | integrity                                   |
//! |---------|---------------|---------------------------------------------|
//! | 1       | `aes-256-cbc` | none                                        |
//! | 2       | `aes-256-cbc` | HMAC-SHA256 over the base64 ciphertext text |
//! | 3       | `aes-256-gcm` | GCM authentication tag                      |
//!
//! The AES key is `SHA-256(secret)`. The plaintext is
//! `{"json_wrapper": <value>}`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use openssl::symm::{self, Cipher};
use serde::Deserialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::error::{BackendError, Result};
use super::types::SecretString;

type HmacSha256 = Hmac<Sha256>;

const CBC_CIPHER: &str = "aes-256-cbc";
const GCM_CIPHER: &str = "aes-256-gcm";

/// Encrypted value envelope as stored in a data-bag item.
#[derive(Debug, Clone, Deserialize)]
pub struct EncryptedEnvelope {
    pub encrypted_data: String,
    pub iv: String,
    pub version: u8,
    pub cipher: String,
    #[serde(default)]
    pub hmac: Option<String>,
    #[serde(default)]
    pub auth_tag: Option<String>,
}

#[derive(Deserialize)]
struct Wrapper {
    json_wrapper: Value,
}

impl EncryptedEnvelope {
    /// Parse an envelope from the raw item value.
    pub fn from_value(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone())
            .map_err(|e| BackendError::parse("encrypted data bag value", e.to_string()))
    }

    /// Decrypt the envelope with the shared secret and unwrap the stored value.
    pub fn decrypt(&self, secret: &SecretString) -> Result<Value> {
        let key = Sha256::digest(secret.as_bytes());
        let iv = decode_base64("iv", &self.iv)?;
        let ciphertext = decode_base64("encrypted_data", &self.encrypted_data)?;

        let plaintext = match self.version {
            1 => {
                self.expect_cipher(CBC_CIPHER)?;
                symm::decrypt(Cipher::aes_256_cbc(), &key, Some(&iv), &ciphertext)
                    .map_err(|_| BackendError::decryption("invalid secret or corrupt data"))?
            }
            2 => {
                self.expect_cipher(CBC_CIPHER)?;
                self.verify_hmac(&key)?;
                symm::decrypt(Cipher::aes_256_cbc(), &key, Some(&iv), &ciphertext)
                    .map_err(|_| BackendError::decryption("invalid secret or corrupt data"))?
            }
            3 => {
                self.expect_cipher(GCM_CIPHER)?;
                let tag = match &self.auth_tag {
                    Some(tag) => decode_base64("auth_tag", tag)?,
                    None => return Err(BackendError::decryption("version 3 value has no auth_tag")),
                };
                symm::decrypt_aead(Cipher::aes_256_gcm(), &key, Some(&iv), &[], &ciphertext, &tag)
                    .map_err(|_| BackendError::decryption("authentication tag mismatch"))?
            }
            other => {
                return Err(BackendError::decryption(format!(
                    "unsupported encrypted data bag format version {}",
                    other
                )))
            }
        };

        let wrapper: Wrapper = serde_json::from_slice(&plaintext)
            .map_err(|e| BackendError::decryption(format!("decrypted value is not JSON: {}", e)))?;

        Ok(wrapper.json_wrapper)
    }

    fn expect_cipher(&self, expected: &str) -> Result<()> {
        if self.cipher != expected {
            return Err(BackendError::decryption(format!(
                "version {} requires cipher {}, found {}",
                self.version, expected, self.cipher
            )));
        }
        Ok(())
    }

    // HMAC is computed over the base64 text exactly as stored, newlines included
    fn verify_hmac(&self, key: &[u8]) -> Result<()> {
        let expected = match &self.hmac {
            Some(hmac) => decode_base64("hmac", hmac)?,
            None => return Err(BackendError::decryption("version 2 value has no hmac")),
        };

        let mut mac = HmacSha256::new_from_slice(key)
            .map_err(|e| BackendError::decryption(format!("invalid HMAC key: {}", e)))?;
        mac.update(self.encrypted_data.as_bytes());
        mac.verify_slice(&expected).map_err(|_| BackendError::decryption("HMAC mismatch"))
    }
}

fn decode_base64(field: &str, text: &str) -> Result<Vec<u8>> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|e| BackendError::parse(format!("encrypted value field '{}'", field), e.to_string()))
}
