//! Filesystem reader for the `file` chain source.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::client::PathReader;
use super::error::{BackendError, Result};

/// Reads chain files straight from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl FsReader {
    pub fn new() -> Self {
        Self
    }
}

impl PathReader for FsReader {
    fn read(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        match fs::read(path) {
            Ok(bytes) => {
                tracing::debug!(path = %path.display(), bytes = bytes.len(), "Read chain file");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Chain file does not exist");
                Ok(None)
            }
            Err(e) => Err(BackendError::io(path, e)),
        }
    }
}
