//! Document operations.

use crate::database::Database;
use crate::error::{DbError, DbResult};
use chrono::{DateTime, Utc};
use docvault_core::{Document, TagId};
use rusqlite::{params, Row};

impl Database {
    /// Create a document and all of its tag associations in one transaction.
    ///
    /// Either the row and every association become visible together, or
    /// nothing does. `tag_ids` must already be deduplicated by the caller.
    pub fn create_document_with_tags(
        &self,
        document: &Document,
        tag_ids: &[TagId],
    ) -> DbResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO documents (id, correspondent, title, content, file_type, checksum, created, modified)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                document.id,
                document.correspondent,
                document.title,
                document.content,
                document.file_type,
                document.checksum,
                document.created.to_rfc3339(),
                document.modified.to_rfc3339(),
            ],
        )?;

        for tag_id in tag_ids {
            tx.execute(
                "INSERT OR IGNORE INTO document_tags (document_id, tag_id) VALUES (?1, ?2)",
                params![document.id, tag_id],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Find a document by its content checksum.
    pub fn find_document_by_checksum(&self, checksum: &str) -> DbResult<Option<Document>> {
        let conn = self.conn()?;
        let result = conn.query_row(
            "SELECT id, correspondent, title, content, file_type, checksum, created, modified
             FROM documents WHERE checksum = ?1",
            params![checksum],
            row_to_document,
        );

        match result {
            Ok(doc) => Ok(Some(doc)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DbError::from(e)),
        }
    }

    /// Get a document by ID.
    pub fn get_document(&self, id: &str) -> DbResult<Document> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, correspondent, title, content, file_type, checksum, created, modified
             FROM documents WHERE id = ?1",
            params![id],
            row_to_document,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                DbError::NotFound(format!("Document not found: {}", id))
            }
            _ => DbError::from(e),
        })
    }

    /// List documents, newest first.
    pub fn list_documents(&self, limit: i64) -> DbResult<Vec<Document>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, correspondent, title, content, file_type, checksum, created, modified
             FROM documents ORDER BY created DESC LIMIT ?1",
        )?;

        let docs = stmt.query_map(params![limit], row_to_document)?;
        docs.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// Total number of stored documents.
    pub fn count_documents(&self) -> DbResult<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn row_to_document(row: &Row<'_>) -> rusqlite::Result<Document> {
    let created_str: String = row.get(6)?;
    let modified_str: String = row.get(7)?;

    Ok(Document {
        id: row.get(0)?,
        correspondent: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        file_type: row.get(4)?,
        checksum: row.get(5)?,
        created: parse_timestamp(&created_str),
        modified: parse_timestamp(&modified_str),
    })
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docvault_core::Tag;

    fn sample_document(checksum: &str) -> Document {
        Document::new("Invoice March", "please remit payment", "pdf", checksum, Utc::now())
            .with_correspondent("Acme Corp")
    }

    #[test]
    fn test_create_and_fetch() {
        let db = Database::open_in_memory().unwrap();
        let doc = sample_document("aaa");

        db.create_document_with_tags(&doc, &[]).unwrap();

        let fetched = db.get_document(&doc.id).unwrap();
        assert_eq!(fetched.title, "Invoice March");
        assert_eq!(fetched.correspondent, Some("Acme Corp".to_string()));
        assert_eq!(fetched.checksum, "aaa");
    }

    #[test]
    fn test_find_by_checksum() {
        let db = Database::open_in_memory().unwrap();
        let doc = sample_document("bbb");
        db.create_document_with_tags(&doc, &[]).unwrap();

        assert!(db.find_document_by_checksum("bbb").unwrap().is_some());
        assert!(db.find_document_by_checksum("ccc").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_checksum_rejected() {
        let db = Database::open_in_memory().unwrap();
        db.create_document_with_tags(&sample_document("dup"), &[])
            .unwrap();

        let err = db
            .create_document_with_tags(&sample_document("dup"), &[])
            .unwrap_err();
        assert!(err.is_unique_violation());
        assert_eq!(db.count_documents().unwrap(), 1);
    }

    #[test]
    fn test_failed_create_leaves_no_associations() {
        let db = Database::open_in_memory().unwrap();
        let tag = Tag::new("legal", "contract");
        db.create_tag(&tag).unwrap();

        db.create_document_with_tags(&sample_document("x"), &[tag.id.clone()])
            .unwrap();

        // Same checksum: the insert fails, and the association from the
        // aborted transaction must not surface anywhere.
        let doc2 = sample_document("x");
        assert!(db
            .create_document_with_tags(&doc2, &[tag.id.clone()])
            .is_err());
        assert!(db.get_document_tags(&doc2.id).unwrap().is_empty());
    }

    #[test]
    fn test_list_documents() {
        let db = Database::open_in_memory().unwrap();
        db.create_document_with_tags(&sample_document("1"), &[])
            .unwrap();
        db.create_document_with_tags(&sample_document("2"), &[])
            .unwrap();

        assert_eq!(db.list_documents(10).unwrap().len(), 2);
        assert_eq!(db.list_documents(1).unwrap().len(), 1);
    }
}
