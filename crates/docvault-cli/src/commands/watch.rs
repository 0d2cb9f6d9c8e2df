//! Watch command implementation.

use anyhow::Result;
use colored::Colorize;
use std::time::Duration;
use tracing::error;

/// Run consumption passes on a timer until interrupted.
pub fn run(interval_override: Option<u64>) -> Result<()> {
    let (config, paths, db) = super::open_environment()?;

    let interval = Duration::from_secs(
        interval_override.unwrap_or(config.consumption.poll_interval_seconds).max(1),
    );

    // Fatal configuration problems surface here, before the first pass.
    let mut consumer = super::build_consumer(&config, &paths, db)?;

    match config.consumption.directory_path() {
        Some(dir) => println!("{} {}", "Watching:".cyan(), dir.display()),
        None => unreachable!("consumer construction validates the watch directory"),
    }
    println!("Pass interval: {}s. Press Ctrl+C to stop.\n", interval.as_secs());

    loop {
        match consumer.consume_new_files() {
            Ok(consumed) if !consumed.is_empty() => {
                println!("{} {} document(s) archived", "Pass:".green(), consumed.len());
            }
            Ok(_) => {}
            Err(e) => {
                // A store failure aborts the pass; the next pass starts fresh.
                error!("Consumption pass failed: {}", e);
                println!("{} {}", "Pass failed:".red(), e);
            }
        }

        std::thread::sleep(interval);
    }
}
