//! Consume command implementation.

use anyhow::Result;
use colored::Colorize;

/// Run a single consumption pass.
pub fn run() -> Result<()> {
    let (config, paths, db) = super::open_environment()?;
    let mut consumer = super::build_consumer(&config, &paths, db)?;

    let consumed = consumer.consume_new_files()?;

    if consumed.is_empty() {
        println!("{}", "Nothing to consume.".yellow());
    } else {
        println!(
            "{} {} document(s) archived",
            "Done:".green(),
            consumed.len()
        );
    }

    Ok(())
}
