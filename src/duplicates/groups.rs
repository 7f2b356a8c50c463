//! Content groups: files sharing one fingerprint.

use crate::scanner::{hash_to_hex, FileEntry, Hash};

/// A group of files with byte-identical content.
///
/// Membership is established by fingerprint equality; hash collisions are
/// treated as negligible for content addressing, not proven against
/// adversarial inputs.
#[derive(Debug, Clone)]
pub struct ContentGroup {
    /// SHA-256 content hash shared by all files in the group
    pub hash: Hash,
    /// Member files, in the order their hash results were aggregated
    pub files: Vec<FileEntry>,
}

impl ContentGroup {
    /// Create a new content group.
    ///
    /// # Panics
    ///
    /// Debug assertion fails if `files` is empty; a group always has at
    /// least one member.
    #[must_use]
    pub fn new(hash: Hash, files: Vec<FileEntry>) -> Self {
        debug_assert!(!files.is_empty(), "content group must have members");
        Self { hash, files }
    }

    /// The member copied to the destination: first in stored order.
    ///
    /// Any member would do, since all are content-identical.
    #[must_use]
    pub fn representative(&self) -> &FileEntry {
        &self.files[0]
    }

    /// Hex fingerprint of the group's content.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        hash_to_hex(&self.hash)
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of redundant copies (members beyond the representative).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Bytes occupied by redundant copies in the source tree.
    #[must_use]
    pub fn redundant_size(&self) -> u64 {
        self.files.iter().skip(1).map(|f| f.size).sum()
    }
}
