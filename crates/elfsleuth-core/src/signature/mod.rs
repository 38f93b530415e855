//! Signature loading — the byte pattern that marks a binary as infected.
//!
//! The signature file is loaded fully into memory once at startup (it is
//! assumed small relative to RAM) and shared read-only by every worker for
//! the lifetime of the scan.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur while loading a signature.
///
/// All of these are fatal: scanning never starts with a bad signature.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// The path is missing, a directory, or otherwise not an ordinary file.
    #[error("signature path is not a regular file: {}", .0.display())]
    NotRegularFile(PathBuf),

    /// The file exists but could not be read.
    #[error("cannot read signature file {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The signature byte sequence has zero length.
    ///
    /// An empty pattern would trivially "match" every file, so it is
    /// rejected as a configuration error before any file is touched.
    #[error("signature is empty")]
    Empty,
}

/// An immutable, non-empty byte sequence to search for.
///
/// Cloning is cheap (the bytes live behind an `Arc`), so each scan task can
/// carry its own handle without copying the pattern.
#[derive(Debug, Clone)]
pub struct Signature {
    bytes: Arc<[u8]>,
}

impl Signature {
    /// Load a signature from a file, fully into memory.
    pub fn load(path: &Path) -> Result<Self, SignatureError> {
        match fs::metadata(path) {
            Ok(meta) if meta.is_file() => {}
            _ => return Err(SignatureError::NotRegularFile(path.to_path_buf())),
        }

        let bytes = fs::read(path).map_err(|source| SignatureError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_bytes(bytes)
    }

    /// Build a signature from raw bytes, rejecting empty input.
    ///
    /// Useful for tests and embedders that obtain the pattern from
    /// somewhere other than a file.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, SignatureError> {
        let bytes: Vec<u8> = bytes.into();
        if bytes.is_empty() {
            return Err(SignatureError::Empty);
        }
        Ok(Self {
            bytes: bytes.into(),
        })
    }

    /// The signature bytes. Guaranteed non-empty.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Signature length in bytes. Always ≥ 1.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Never true — empty signatures are rejected at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The carry size needed to catch a match straddling two read chunks:
    /// the last `len - 1` bytes of one chunk must be re-searched together
    /// with the head of the next.
    #[inline]
    pub fn overlap(&self) -> usize {
        self.bytes.len() - 1
    }
}
