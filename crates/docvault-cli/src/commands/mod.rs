//! Command implementations and shared setup.

pub mod consume;
pub mod export;
pub mod init;
pub mod list;
pub mod show;
pub mod status;
pub mod tag;
pub mod watch;

use anyhow::{Context, Result};
use colored::Colorize;
use docvault_config::{AppPaths, Config};
use docvault_consume::parsers::{ParserBackend, PdfBackend, TextBackend};
use docvault_consume::{ConsumeObserver, Consumer, ConsumerSettings};
use docvault_core::Document;
use docvault_crypto::PassphraseEncryptor;
use docvault_db::Database;
use std::path::Path;
use std::sync::Arc;

/// Load config, resolve platform paths and open the database.
pub(crate) fn open_environment() -> Result<(Config, AppPaths, Database)> {
    let config = Config::load().unwrap_or_default();
    let paths = AppPaths::new().context("could not determine application directories")?;
    let db = Database::open(&paths.database_file)?;
    Ok((config, paths, db))
}

/// Resolve the artifact passphrase from config or environment.
pub(crate) fn resolve_passphrase(config: &Config) -> Result<String> {
    config.security.resolve_passphrase().context(
        "no passphrase configured; set security.passphrase or the DOCVAULT_PASSPHRASE variable",
    )
}

/// Assemble the full consumption pipeline with the shipped backends.
pub(crate) fn build_consumer(config: &Config, paths: &AppPaths, db: Database) -> Result<Consumer> {
    let passphrase = resolve_passphrase(config)?;
    let settings = ConsumerSettings::from_config(config, paths)?;

    let backends: Vec<Box<dyn ParserBackend>> = vec![Box::new(TextBackend), Box::new(PdfBackend)];
    let observers: Vec<Box<dyn ConsumeObserver>> = vec![Box::new(ConsoleObserver)];

    let consumer = Consumer::new(
        settings,
        db,
        Arc::new(PassphraseEncryptor::new(passphrase)),
        backends,
        observers,
    )?;

    Ok(consumer)
}

/// Prints consumption lifecycle events to the terminal.
struct ConsoleObserver;

impl ConsumeObserver for ConsoleObserver {
    fn consumption_started(&self, path: &Path, _correlation: &str) {
        println!("{} {}", "Consuming:".cyan(), path.display());
    }

    fn consumption_finished(&self, document: &Document, _correlation: &str) {
        println!(
            "{} {} ({})",
            "Archived:".green(),
            document,
            &document.id[..8]
        );
    }
}
