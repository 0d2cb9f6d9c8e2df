//! Content-hash deduplication gate.

use crate::error::ConsumeResult;
use docvault_db::Database;
use sha2::{Digest, Sha256};
use std::path::Path;

/// SHA-256 of the file's full bytes, hex-encoded.
pub(crate) fn file_checksum(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex(&hasher.finalize()))
}

/// Whether a document with this file's checksum already exists.
///
/// The sole authority on whether ingestion proceeds; must be called after
/// stability is confirmed and before any mutation of the file.
pub(crate) fn is_duplicate(db: &Database, path: &Path) -> ConsumeResult<bool> {
    let checksum = file_checksum(path)?;
    Ok(db.find_document_by_checksum(&checksum)?.is_some())
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use docvault_core::Document;

    #[test]
    fn test_checksum_is_sha256_hex() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.txt");
        std::fs::write(&path, b"hello").unwrap();

        assert_eq!(
            file_checksum(&path).unwrap(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_duplicate_gate_flips_after_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.txt");
        std::fs::write(&path, b"some document bytes").unwrap();

        let db = Database::open_in_memory().unwrap();
        assert!(!is_duplicate(&db, &path).unwrap());

        let checksum = file_checksum(&path).unwrap();
        let doc = Document::new("t", "c", "txt", checksum, Utc::now());
        db.create_document_with_tags(&doc, &[]).unwrap();

        assert!(is_duplicate(&db, &path).unwrap());
    }
}
