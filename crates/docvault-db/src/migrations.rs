//! Database migrations and schema management.

use crate::error::{DbError, DbResult};
use rusqlite::Connection;
use tracing::info;

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema.
pub fn initialize_schema(conn: &Connection) -> DbResult<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        info!("Creating initial database schema...");
        create_initial_schema(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version < SCHEMA_VERSION {
        return Err(DbError::Migration(format!(
            "No migration path from schema version {} to {}",
            current_version, SCHEMA_VERSION
        )));
    }

    Ok(())
}

fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> DbResult<()> {
    conn.pragma_update(None, "user_version", version)?;
    Ok(())
}

fn create_initial_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- Consumed documents. The checksum uniqueness backs the duplicate
        -- gate across concurrently running consumers.
        CREATE TABLE IF NOT EXISTS documents (
            id TEXT PRIMARY KEY,
            correspondent TEXT,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            file_type TEXT NOT NULL,
            checksum TEXT NOT NULL UNIQUE,
            created TEXT NOT NULL,
            modified TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_documents_created ON documents(created);
        CREATE INDEX IF NOT EXISTS idx_documents_correspondent ON documents(correspondent);

        -- Operator-defined tags with content match rules.
        CREATE TABLE IF NOT EXISTS tags (
            id TEXT PRIMARY KEY,
            slug TEXT NOT NULL UNIQUE,
            match_text TEXT NOT NULL DEFAULT '',
            algorithm TEXT NOT NULL DEFAULT 'any'
        );

        CREATE TABLE IF NOT EXISTS document_tags (
            document_id TEXT NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
            tag_id TEXT NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
            PRIMARY KEY (document_id, tag_id)
        );

        CREATE INDEX IF NOT EXISTS idx_document_tags_tag ON document_tags(tag_id);
        "#,
    )?;

    Ok(())
}
