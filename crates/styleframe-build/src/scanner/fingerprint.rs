//! Two-level file fingerprints: (mtime, size), then xxh3 of the content.

use std::fs::Metadata;
use std::time::SystemTime;

use xxhash_rust::xxh3::xxh3_64;

/// Compute the xxh3 64-bit hash of file content.
#[inline]
pub fn hash_content(content: &[u8]) -> u64 {
    xxh3_64(content)
}

/// What a file looked like when it was last read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    pub modified: Option<SystemTime>,
    pub size: u64,
    pub hash: u64,
}

impl Fingerprint {
    pub fn new(metadata: &Metadata, content: &[u8]) -> Self {
        Self {
            modified: metadata.modified().ok(),
            size: metadata.len(),
            hash: hash_content(content),
        }
    }

    /// Level 1: whether metadata alone shows the file is unchanged.
    ///
    /// A filesystem without modification times never matches, which forces
    /// the content hash check.
    pub fn metadata_matches(&self, metadata: &Metadata) -> bool {
        match (self.modified, metadata.modified().ok()) {
            (Some(cached), Some(current)) => cached == current && self.size == metadata.len(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_hash() {
        assert_eq!(hash_content(b"badge"), hash_content(b"badge"));
        assert_ne!(hash_content(b"badge"), hash_content(b"button"));
    }

    #[test]
    fn metadata_level_matches_unchanged_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.vue");
        std::fs::write(&path, "badge").unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        let fingerprint = Fingerprint::new(&metadata, b"badge");
        assert_eq!(fingerprint.size, 5);
        if fingerprint.modified.is_some() {
            assert!(fingerprint.metadata_matches(&metadata));
        }
    }
}
