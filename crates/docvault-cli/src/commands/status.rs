//! Status command implementation.

use anyhow::Result;
use colored::Colorize;

/// Show archive statistics and configuration health.
pub fn run() -> Result<()> {
    let (config, paths, db) = super::open_environment()?;

    println!("{}", "docvault status".bold());
    println!("  Documents: {}", db.count_documents()?);
    println!("  Tags:      {}", db.list_tags()?.len());
    println!("  Database:  {}", paths.database_file.display());

    match config.consumption.directory_path() {
        Some(dir) if dir.is_dir() => {
            println!("  Watching:  {} {}", dir.display(), "(ok)".green());
        }
        Some(dir) => {
            println!("  Watching:  {} {}", dir.display(), "(missing!)".red());
        }
        None => {
            println!("  Watching:  {}", "not configured".yellow());
        }
    }

    let media = config.storage.media_path().unwrap_or(paths.media_dir);
    println!("  Media:     {}", media.display());

    if config.security.resolve_passphrase().is_none() {
        println!("  {}", "No passphrase configured; consumption will fail.".red());
    }

    Ok(())
}
