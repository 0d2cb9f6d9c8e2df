//! Show command implementation.

use anyhow::Result;
use colored::Colorize;

const CONTENT_PREVIEW_CHARS: usize = 800;

/// Show details of a single document.
pub fn run(id: &str) -> Result<()> {
    let (config, paths, db) = super::open_environment()?;

    let doc = db.get_document(id)?;
    let tags = db.get_document_tags(&doc.id)?;
    let media_root = config.storage.media_path().unwrap_or(paths.media_dir);

    println!("{}: {}", "ID".bold(), doc.id);
    println!("{}: {}", "Title".bold(), doc.title);
    if let Some(correspondent) = &doc.correspondent {
        println!("{}: {}", "Correspondent".bold(), correspondent);
    }
    println!("{}: {}", "Type".bold(), doc.file_type);
    println!("{}: {}", "Created".bold(), doc.created.format("%Y-%m-%d %H:%M"));
    println!("{}: {}", "Checksum".bold(), doc.checksum);

    if !tags.is_empty() {
        let slugs: Vec<&str> = tags.iter().map(|t| t.slug.as_str()).collect();
        println!("{}: {}", "Tags".bold(), slugs.join(", ").blue());
    }

    println!(
        "{}: {}",
        "Artifact".bold(),
        doc.content_artifact(&media_root).display()
    );

    let preview: String = doc.content.chars().take(CONTENT_PREVIEW_CHARS).collect();
    println!("\n{}", preview);
    if doc.content.chars().count() > CONTENT_PREVIEW_CHARS {
        println!("{}", "…".dimmed());
    }

    Ok(())
}
