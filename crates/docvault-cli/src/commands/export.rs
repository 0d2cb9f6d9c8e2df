//! Export command implementation.

use anyhow::{Context, Result};
use colored::Colorize;
use docvault_crypto::{Encryptor, PassphraseEncryptor};
use std::path::PathBuf;

/// Decrypt a document's content artifact to a local file.
pub fn run(id: &str, output: Option<&str>) -> Result<()> {
    let (config, paths, db) = super::open_environment()?;

    let doc = db.get_document(id)?;
    let media_root = config.storage.media_path().unwrap_or(paths.media_dir);

    let artifact = doc.content_artifact(&media_root);
    let encrypted = std::fs::read(&artifact)
        .with_context(|| format!("missing content artifact: {}", artifact.display()))?;

    let passphrase = super::resolve_passphrase(&config)?;
    let plaintext = PassphraseEncryptor::new(passphrase).decrypt(&encrypted)?;

    let output = output
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("{}.{}", doc.title, doc.file_type)));
    std::fs::write(&output, plaintext)?;

    println!("{} {}", "Exported:".green(), output.display());
    Ok(())
}
