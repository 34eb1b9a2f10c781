use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use certchain::secrets::{BackendError, ItemStore, PathReader, Result, SecretBroker};
use hmac::{Hmac, Mac};
use openssl::symm::{self, Cipher};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

pub const CHAIN_PEM: &str = "-----BEGIN CERTIFICATE-----\nMIIDdzCCAl+gAwIBAgIE\n-----END CERTIFICATE-----\n";

/// What a mock backend hands back on every call.
#[derive(Clone)]
pub enum Reply {
    Text(&'static str),
    Bytes(Vec<u8>),
    Absent,
    Fail(&'static str),
}

impl Reply {
    fn produce(&self) -> Result<Option<Vec<u8>>> {
        match self {
            Reply::Text(text) => Ok(Some(text.as_bytes().to_vec())),
            Reply::Bytes(bytes) => Ok(Some(bytes.clone())),
            Reply::Absent => Ok(None),
            Reply::Fail(reason) => Err(BackendError::decryption(*reason)),
        }
    }
}

/// Item store double recording its calls.
pub struct MockItemStore {
    reply: Reply,
    pub calls: Cell<usize>,
    pub last_call: std::cell::RefCell<Option<(String, String, String, bool, Option<PathBuf>)>>,
}

impl MockItemStore {
    pub fn new(reply: Reply) -> Self {
        Self { reply, calls: Cell::new(0), last_call: Default::default() }
    }
}

impl ItemStore for MockItemStore {
    fn fetch(
        &self,
        bag: &str,
        item: &str,
        item_key: &str,
        encrypted: bool,
        secret_file: Option<&Path>,
    ) -> Result<Option<Vec<u8>>> {
        self.calls.set(self.calls.get() + 1);
        *self.last_call.borrow_mut() = Some((
            bag.to_string(),
            item.to_string(),
            item_key.to_string(),
            encrypted,
            secret_file.map(Path::to_path_buf),
        ));
        self.reply.produce()
    }
}

/// Secret broker double recording its calls.
pub struct MockBroker {
    reply: Reply,
    pub calls: Cell<usize>,
}

impl MockBroker {
    pub fn new(reply: Reply) -> Self {
        Self { reply, calls: Cell::new(0) }
    }
}

impl SecretBroker for MockBroker {
    fn fetch(&self, _bag: &str, _item: &str, _item_key: &str) -> Result<Option<Vec<u8>>> {
        self.calls.set(self.calls.get() + 1);
        self.reply.produce()
    }
}

/// Path reader double recording the paths it was asked for.
pub struct MockReader {
    reply: Reply,
    pub paths: std::cell::RefCell<Vec<PathBuf>>,
}

impl MockReader {
    pub fn new(reply: Reply) -> Self {
        Self { reply, paths: Default::default() }
    }

    pub fn calls(&self) -> usize {
        self.paths.borrow().len()
    }
}

impl PathReader for MockReader {
    fn read(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        self.paths.borrow_mut().push(path.to_path_buf());
        self.reply.produce()
    }
}

/// Write `<root>/<bag>/<item>.json`.
pub fn write_item(root: &Path, bag: &str, item: &str, body: &Value) -> PathBuf {
    let dir = root.join(bag);
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(format!("{}.json", item));
    fs::write(&path, serde_json::to_vec_pretty(body).unwrap()).unwrap();
    path
}

/// Encrypt `value` as a version 2 data bag envelope (AES-256-CBC plus HMAC).
pub fn encrypt_v2(secret: &str, value: Value) -> Value {
    let key = Sha256::digest(secret.trim().as_bytes());
    let iv = [3u8; 16];
    let plaintext = serde_json::to_vec(&json!({ "json_wrapper": value })).unwrap();
    let ciphertext = symm::encrypt(Cipher::aes_256_cbc(), &key, Some(&iv), &plaintext).unwrap();
    let encrypted_data = STANDARD.encode(ciphertext);

    let mut mac = Hmac::<Sha256>::new_from_slice(&key).unwrap();
    mac.update(encrypted_data.as_bytes());

    json!({
        "encrypted_data": encrypted_data,
        "hmac": STANDARD.encode(mac.finalize().into_bytes()),
        "iv": STANDARD.encode(iv),
        "version": 2,
        "cipher": "aes-256-cbc",
    })
}
