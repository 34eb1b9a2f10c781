use std::path::PathBuf;

use certchain::ca::{CaRequest, CaSubject, Validity};
use tempfile::TempDir;

/// Scratch directory with key and certificate paths for one generation run.
pub struct CaPaths {
    _dir: TempDir,
    pub key: PathBuf,
    pub cert: PathBuf,
}

impl CaPaths {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let key = dir.path().join("ca.key");
        let cert = dir.path().join("ca.pem");
        Self { _dir: dir, key, cert }
    }

    pub fn request(&self) -> CaRequest {
        let subject = CaSubject::parse("/C=ES/O=Example Org/CN=Example Test CA").unwrap();
        CaRequest::new(subject, &self.key, &self.cert, Validity::days_from_now(30).unwrap())
    }
}
