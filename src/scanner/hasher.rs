//! SHA-256 file hasher with streaming support.
//!
//! # Overview
//!
//! This module provides the [`Hasher`] struct for computing SHA-256 digests
//! of file contents using memory-efficient streaming. Files are read in
//! bounded chunks and fed into a running digest, so memory use is constant
//! regardless of file size.
//!
//! The loop reads until a read returns zero bytes rather than trusting the
//! size reported by metadata; a file being appended to while we hash it
//! still produces a digest of exactly the bytes we read.
//!
//! # Example
//!
//! ```no_run
//! use picuniq::scanner::{hash_to_hex, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let hash = hasher.hash_file(Path::new("photo.jpg")).unwrap();
//! println!("{}", hash_to_hex(&hash));
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use super::HashError;

/// A 32-byte SHA-256 digest. Its hex rendering is the file's fingerprint.
pub type Hash = [u8; 32];

/// Read buffer size for streaming hashes.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Convert a hash to its lowercase hexadecimal representation.
#[must_use]
pub fn hash_to_hex(hash: &Hash) -> String {
    use std::fmt::Write;
    let mut hex = String::with_capacity(64);
    for byte in hash {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

/// Parse a 64-character hex string back into a [`Hash`].
///
/// Returns `None` if the string is not exactly 64 hex digits.
#[must_use]
pub fn hex_to_hash(hex: &str) -> Option<Hash> {
    if hex.len() != 64 {
        return None;
    }
    let mut hash = [0u8; 32];
    for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
        let s = std::str::from_utf8(chunk).ok()?;
        hash[i] = u8::from_str_radix(s, 16).ok()?;
    }
    Some(hash)
}

/// Streaming SHA-256 content hasher.
///
/// Stateless apart from the configured chunk size; a single instance can be
/// shared across worker threads behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Hasher {
    chunk_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default chunk size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
        }
    }

    /// Create a hasher with a custom chunk size (mainly for tests).
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero: a zero-length read buffer would
    /// end every read loop immediately and fingerprint all files as
    /// empty content.
    #[must_use]
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "chunk size must be non-zero");
        Self { chunk_size }
    }

    /// Compute the SHA-256 digest of the file's full byte content.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or a read fails
    /// mid-stream; the error identifies the offending path.
    pub fn hash_file(&self, path: &Path) -> Result<Hash, HashError> {
        let mut file = File::open(path).map_err(|e| HashError::from_io(path, e))?;

        let mut digest = Sha256::new();
        let mut buf = vec![0u8; self.chunk_size];

        loop {
            let n = file.read(&mut buf).map_err(|e| HashError::from_io(path, e))?;
            if n == 0 {
                break;
            }
            digest.update(&buf[..n]);
        }

        Ok(digest.finalize().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(content).unwrap();
        path
    }

    #[test]
    fn test_hash_known_vector() {
        // SHA-256 of the empty string is a published test vector
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "empty.jpg", b"");

        let hash = Hasher::new().hash_file(&path).unwrap();
        assert_eq!(
            hash_to_hex(&hash),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_identical_content_same_hash() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.jpg", b"same bytes");
        let b = write_file(&dir, "b.jpg", b"same bytes");
        let c = write_file(&dir, "c.jpg", b"other bytes");

        let hasher = Hasher::new();
        let ha = hasher.hash_file(&a).unwrap();
        let hb = hasher.hash_file(&b).unwrap();
        let hc = hasher.hash_file(&c).unwrap();

        assert_eq!(ha, hb);
        assert_ne!(ha, hc);
    }

    #[test]
    fn test_chunk_size_does_not_change_hash() {
        let dir = TempDir::new().unwrap();
        let content: Vec<u8> = (0..10_000).map(|i| (i % 251) as u8).collect();
        let path = write_file(&dir, "big.jpg", &content);

        let h1 = Hasher::with_chunk_size(7).hash_file(&path).unwrap();
        let h2 = Hasher::with_chunk_size(1024).hash_file(&path).unwrap();
        let h3 = Hasher::new().hash_file(&path).unwrap();

        assert_eq!(h1, h2);
        assert_eq!(h2, h3);
    }

    #[test]
    #[should_panic(expected = "chunk size must be non-zero")]
    fn test_zero_chunk_size_is_rejected() {
        let _ = Hasher::with_chunk_size(0);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("never-existed.jpg");

        let err = Hasher::new().hash_file(&path).unwrap_err();
        assert!(matches!(err, HashError::NotFound(_)));
        assert_eq!(err.path(), path.as_path());
    }

    #[test]
    fn test_hex_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "x.jpg", b"round trip");

        let hash = Hasher::new().hash_file(&path).unwrap();
        let hex = hash_to_hex(&hash);
        assert_eq!(hex.len(), 64);
        assert_eq!(hex_to_hash(&hex), Some(hash));
    }

    #[test]
    fn test_hex_to_hash_rejects_garbage() {
        assert_eq!(hex_to_hash("zz"), None);
        assert_eq!(hex_to_hash(&"a".repeat(63)), None);
        assert_eq!(hex_to_hash(&"g".repeat(64)), None);
    }
}
