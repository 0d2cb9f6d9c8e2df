//! Tag operations and rule matching.

use crate::database::Database;
use crate::error::{DbError, DbResult};
use docvault_core::{MatchAlgorithm, Tag};
use rusqlite::{params, Row};

impl Database {
    /// Create a new tag.
    pub fn create_tag(&self, tag: &Tag) -> DbResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO tags (id, slug, match_text, algorithm) VALUES (?1, ?2, ?3, ?4)",
            params![tag.id, tag.slug, tag.match_text, tag.algorithm.as_str()],
        )?;
        Ok(())
    }

    /// Get a tag by slug.
    pub fn find_tag_by_slug(&self, slug: &str) -> DbResult<Option<Tag>> {
        let conn = self.conn()?;
        let result = conn.query_row(
            "SELECT id, slug, match_text, algorithm FROM tags WHERE slug = ?1",
            params![slug],
            row_to_tag,
        );

        match result {
            Ok(tag) => Ok(Some(tag)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DbError::from(e)),
        }
    }

    /// List all tags.
    pub fn list_tags(&self) -> DbResult<Vec<Tag>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, slug, match_text, algorithm FROM tags ORDER BY slug")?;

        let tags = stmt.query_map([], row_to_tag)?;
        tags.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// All tags whose match rule fires against the given text.
    pub fn match_tags(&self, text: &str) -> DbResult<Vec<Tag>> {
        Ok(self
            .list_tags()?
            .into_iter()
            .filter(|tag| tag.matches(text))
            .collect())
    }

    /// Get all tags associated with a document.
    pub fn get_document_tags(&self, document_id: &str) -> DbResult<Vec<Tag>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT t.id, t.slug, t.match_text, t.algorithm FROM tags t
             INNER JOIN document_tags dt ON dt.tag_id = t.id
             WHERE dt.document_id = ?1 ORDER BY t.slug",
        )?;

        let tags = stmt.query_map(params![document_id], row_to_tag)?;
        tags.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }
}

fn row_to_tag(row: &Row<'_>) -> rusqlite::Result<Tag> {
    let algorithm_str: String = row.get(3)?;

    Ok(Tag {
        id: row.get(0)?,
        slug: row.get(1)?,
        match_text: row.get(2)?,
        algorithm: MatchAlgorithm::from_str(&algorithm_str).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use docvault_core::Document;

    #[test]
    fn test_tag_crud() {
        let db = Database::open_in_memory().unwrap();

        let tag = Tag::new("invoice", "invoice rechnung").with_algorithm(MatchAlgorithm::Any);
        db.create_tag(&tag).unwrap();

        let fetched = db.find_tag_by_slug("invoice").unwrap().unwrap();
        assert_eq!(fetched.match_text, "invoice rechnung");
        assert_eq!(fetched.algorithm, MatchAlgorithm::Any);

        assert!(db.find_tag_by_slug("missing").unwrap().is_none());
        assert_eq!(db.list_tags().unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let db = Database::open_in_memory().unwrap();
        db.create_tag(&Tag::new("legal", "")).unwrap();
        assert!(db.create_tag(&Tag::new("legal", "")).is_err());
    }

    #[test]
    fn test_match_tags() {
        let db = Database::open_in_memory().unwrap();
        db.create_tag(&Tag::new("invoice", "invoice")).unwrap();
        db.create_tag(&Tag::new("legal", "contract")).unwrap();

        let matched = db.match_tags("your invoice is attached").unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].slug, "invoice");

        assert!(db.match_tags("nothing relevant").unwrap().is_empty());
    }

    #[test]
    fn test_document_tag_association() {
        let db = Database::open_in_memory().unwrap();

        let tag_a = Tag::new("a", "");
        let tag_b = Tag::new("b", "");
        db.create_tag(&tag_a).unwrap();
        db.create_tag(&tag_b).unwrap();

        let doc = Document::new("t", "c", "pdf", "sum", Utc::now());
        // Repeated id exercises the set semantics of the association insert
        db.create_document_with_tags(&doc, &[tag_a.id.clone(), tag_b.id.clone(), tag_a.id.clone()])
            .unwrap();

        let tags = db.get_document_tags(&doc.id).unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].slug, "a");
        assert_eq!(tags[1].slug, "b");
    }
}
