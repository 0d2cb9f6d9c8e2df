//! Document persistence: the store step of consumption.

use crate::dedup;
use crate::error::{ConsumeError, ConsumeResult};
use chrono::{DateTime, Utc};
use docvault_core::{Document, FileInfo, TagId};
use docvault_crypto::Encryptor;
use docvault_db::Database;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Builds and persists document records and their encrypted artifacts.
///
/// Sole writer of document rows and media artifacts.
pub struct DocumentStore {
    db: Database,
    encryptor: Arc<dyn Encryptor>,
    media_root: PathBuf,
}

impl DocumentStore {
    pub fn new(
        db: Database,
        encryptor: Arc<dyn Encryptor>,
        media_root: PathBuf,
    ) -> ConsumeResult<Self> {
        fs::create_dir_all(media_root.join("documents"))?;
        fs::create_dir_all(media_root.join("thumbnails"))?;

        Ok(Self {
            db,
            encryptor,
            media_root,
        })
    }

    /// Persist a consumed file: document row plus tag associations commit in
    /// one transaction, then the encrypted content and thumbnail artifacts
    /// are written. Artifact failures are surfaced, never swallowed.
    pub fn store(
        &self,
        text: &str,
        source: &Path,
        thumbnail: &Path,
        extracted_date: Option<DateTime<Utc>>,
    ) -> ConsumeResult<Document> {
        let info = FileInfo::from_path(source)
            .ok_or_else(|| ConsumeError::InvalidFilename(source.to_path_buf()))?;

        let mtime: DateTime<Utc> = fs::metadata(source)?.modified()?.into();
        let created = info.created.or(extracted_date).unwrap_or(mtime);

        // Byte-identical to the duplicate gate's hash: the file has not been
        // mutated since stability was confirmed.
        let checksum = dedup::file_checksum(source)?;

        let mut document = Document::new(info.title, text, info.extension, checksum, created);
        if let Some(correspondent) = info.correspondent {
            document = document.with_correspondent(correspondent);
        }

        let tag_ids = self.resolve_tags(text, &info.tags)?;

        debug!("Saving document record");
        self.db.create_document_with_tags(&document, &tag_ids)?;

        debug!("Encrypting the document");
        let encrypted = self.encryptor.encrypt(&fs::read(source)?)?;
        fs::write(document.content_artifact(&self.media_root), encrypted)?;

        debug!("Encrypting the thumbnail");
        let encrypted = self.encryptor.encrypt(&fs::read(thumbnail)?)?;
        fs::write(document.thumbnail_artifact(&self.media_root), encrypted)?;

        Ok(document)
    }

    /// Union of tags matched from content and tags named in the file name,
    /// deduplicated. Unknown file-name slugs are skipped; tags are
    /// operator-defined and never created by the pipeline.
    fn resolve_tags(&self, text: &str, filename_tags: &[String]) -> ConsumeResult<Vec<TagId>> {
        let mut ids: Vec<TagId> = Vec::new();
        let mut slugs: Vec<String> = Vec::new();

        for tag in self.db.match_tags(text)? {
            if !ids.contains(&tag.id) {
                slugs.push(tag.slug);
                ids.push(tag.id);
            }
        }

        for slug in filename_tags {
            match self.db.find_tag_by_slug(slug)? {
                Some(tag) => {
                    if !ids.contains(&tag.id) {
                        slugs.push(tag.slug);
                        ids.push(tag.id);
                    }
                }
                None => warn!("Unknown tag slug in file name: {}", slug),
            }
        }

        if !slugs.is_empty() {
            debug!("Tagging with {}", slugs.join(", "));
        }

        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::PlainEncryptor;
    use chrono::{Datelike, TimeZone};
    use docvault_core::Tag;
    use tempfile::tempdir;

    fn store_in(media: &Path, db: &Database) -> DocumentStore {
        DocumentStore::new(db.clone(), Arc::new(PlainEncryptor), media.to_path_buf()).unwrap()
    }

    #[test]
    fn test_store_commits_row_and_artifacts() {
        let dir = tempdir().unwrap();
        let db = Database::open_in_memory().unwrap();
        let store = store_in(&dir.path().join("media"), &db);

        let source = dir.path().join("Acme Corp - Invoice March.txt");
        fs::write(&source, "please remit payment").unwrap();
        let thumbnail = dir.path().join("preview.txt");
        fs::write(&thumbnail, "please remit").unwrap();

        let doc = store.store("please remit payment", &source, &thumbnail, None).unwrap();

        assert_eq!(doc.title, "Invoice March");
        assert_eq!(doc.correspondent, Some("Acme Corp".to_string()));
        assert_eq!(doc.file_type, "txt");
        assert_eq!(doc.checksum, dedup::file_checksum(&source).unwrap());

        let row = db.get_document(&doc.id).unwrap();
        assert_eq!(row.content, "please remit payment");

        // PlainEncryptor passes bytes through, so the artifacts mirror the inputs.
        let media = dir.path().join("media");
        assert_eq!(
            fs::read(doc.content_artifact(&media)).unwrap(),
            b"please remit payment"
        );
        assert_eq!(fs::read(doc.thumbnail_artifact(&media)).unwrap(), b"please remit");

        // The source file is the orchestrator's to delete, not the store's.
        assert!(source.exists());
    }

    #[test]
    fn test_created_priority_filename_then_extracted_then_mtime() {
        let dir = tempdir().unwrap();
        let db = Database::open_in_memory().unwrap();
        let store = store_in(&dir.path().join("media"), &db);

        let thumbnail = dir.path().join("p.txt");
        fs::write(&thumbnail, "p").unwrap();

        let extracted = Utc.with_ymd_and_hms(2023, 5, 5, 12, 0, 0).unwrap();

        // Filename date beats the extracted date.
        let dated = dir.path().join("20240101 - Acme - Report.txt");
        fs::write(&dated, "a").unwrap();
        let doc = store.store("a", &dated, &thumbnail, Some(extracted)).unwrap();
        assert_eq!((doc.created.year(), doc.created.month()), (2024, 1));

        // Extracted date beats the file mtime.
        let undated = dir.path().join("Acme - Letter.txt");
        fs::write(&undated, "b").unwrap();
        let doc = store.store("b", &undated, &thumbnail, Some(extracted)).unwrap();
        assert_eq!(doc.created, extracted);

        // Neither present: mtime wins.
        let plain = dir.path().join("Acme - Note.txt");
        fs::write(&plain, "c").unwrap();
        let mtime: DateTime<Utc> = fs::metadata(&plain).unwrap().modified().unwrap().into();
        let doc = store.store("c", &plain, &thumbnail, None).unwrap();
        assert_eq!(doc.created, mtime);
    }

    #[test]
    fn test_tag_union_from_content_and_filename() {
        let dir = tempdir().unwrap();
        let db = Database::open_in_memory().unwrap();
        let store = store_in(&dir.path().join("media"), &db);

        db.create_tag(&Tag::new("invoice", "invoice")).unwrap();
        db.create_tag(&Tag::new("signed", "")).unwrap();

        let source = dir.path().join("Acme - Contract - signed,unknown.txt");
        fs::write(&source, "your invoice is attached").unwrap();
        let thumbnail = dir.path().join("p.txt");
        fs::write(&thumbnail, "p").unwrap();

        let doc = store
            .store("your invoice is attached", &source, &thumbnail, None)
            .unwrap();

        let slugs: Vec<String> = db
            .get_document_tags(&doc.id)
            .unwrap()
            .into_iter()
            .map(|t| t.slug)
            .collect();
        // "invoice" matched from content, "signed" from the file name;
        // "unknown" has no tag row and is skipped.
        assert_eq!(slugs, vec!["invoice", "signed"]);
    }

    #[test]
    fn test_nonconforming_path_is_rejected() {
        let dir = tempdir().unwrap();
        let db = Database::open_in_memory().unwrap();
        let store = store_in(&dir.path().join("media"), &db);

        let source = dir.path().join("archive.zip");
        fs::write(&source, "x").unwrap();

        assert!(matches!(
            store.store("x", &source, &source, None),
            Err(ConsumeError::InvalidFilename(_))
        ));
    }
}
