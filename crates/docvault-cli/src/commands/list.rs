//! List command implementation.

use anyhow::Result;
use colored::Colorize;

/// List recent documents, newest first.
pub fn run(limit: i64) -> Result<()> {
    let (_, _, db) = super::open_environment()?;

    let documents = db.list_documents(limit)?;
    if documents.is_empty() {
        println!("{}", "No documents archived yet.".yellow());
        return Ok(());
    }

    for doc in documents {
        let tags = db.get_document_tags(&doc.id)?;
        let tag_list = if tags.is_empty() {
            String::new()
        } else {
            format!(
                " [{}]",
                tags.iter().map(|t| t.slug.as_str()).collect::<Vec<_>>().join(", ")
            )
        };

        println!(
            "{}  {}  {}{}",
            doc.id[..8].dimmed(),
            doc.created.format("%Y-%m-%d"),
            doc,
            tag_list.blue()
        );
    }

    Ok(())
}
