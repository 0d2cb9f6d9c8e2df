//! Init command implementation.

use anyhow::{Context, Result};
use colored::Colorize;
use docvault_config::{AppPaths, Config};
use docvault_db::Database;

/// Create the config file, data directories and database schema.
pub fn run() -> Result<()> {
    let paths = AppPaths::new().context("could not determine application directories")?;

    paths.ensure_dirs()?;

    if paths.config_file.exists() {
        println!(
            "{} {}",
            "Config already exists:".yellow(),
            paths.config_file.display()
        );
    } else {
        Config::create_default_file(&paths.config_file)?;
        println!("{} {}", "Created config:".green(), paths.config_file.display());
    }

    Database::open(&paths.database_file)?;
    println!(
        "{} {}",
        "Database ready:".green(),
        paths.database_file.display()
    );

    println!("\nNext steps:");
    println!("  1. Set consumption.directory in the config file");
    println!("  2. Set security.passphrase (or export DOCVAULT_PASSPHRASE)");
    println!("  3. Run {} to start archiving", "docvault watch".cyan());

    Ok(())
}
