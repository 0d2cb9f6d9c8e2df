//! Tag command implementations.

use anyhow::{anyhow, Result};
use colored::Colorize;
use docvault_core::{MatchAlgorithm, Tag};

/// List all tags and their match rules.
pub fn list() -> Result<()> {
    let (_, _, db) = super::open_environment()?;

    let tags = db.list_tags()?;
    if tags.is_empty() {
        println!("{}", "No tags defined.".yellow());
        println!("Create one with: docvault tag add <slug> <match-text>");
        return Ok(());
    }

    for tag in tags {
        if tag.match_text.is_empty() {
            println!("{}  (no match rule)", tag.slug.blue());
        } else {
            println!(
                "{}  matches {:?} ({})",
                tag.slug.blue(),
                tag.match_text,
                tag.algorithm
            );
        }
    }

    Ok(())
}

/// Create a tag with a content match rule.
pub fn add(slug: &str, match_text: &str, algorithm: &str) -> Result<()> {
    let algorithm = MatchAlgorithm::from_str(algorithm)
        .ok_or_else(|| anyhow!("unknown match algorithm: {} (use any, all or literal)", algorithm))?;

    if slug.is_empty() || !slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        return Err(anyhow!("tag slugs must be lowercase [a-z0-9-]: {:?}", slug));
    }

    let (_, _, db) = super::open_environment()?;

    if db.find_tag_by_slug(slug)?.is_some() {
        return Err(anyhow!("tag already exists: {}", slug));
    }

    let tag = Tag::new(slug, match_text).with_algorithm(algorithm);
    db.create_tag(&tag)?;

    println!("{} {}", "Created tag:".green(), tag.slug.blue());
    Ok(())
}
