//! The consumption orchestrator.

use crate::dedup;
use crate::error::{ConsumeError, ConsumeResult};
use crate::notify::ConsumeObserver;
use crate::parsers::ParserBackend;
use crate::select::select_backend;
use crate::stability::StabilityDetector;
use crate::store::DocumentStore;
use chrono::{DateTime, Utc};
use docvault_config::{AppPaths, Config};
use docvault_core::{new_id, Document, FileInfo};
use docvault_crypto::Encryptor;
use docvault_db::Database;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Why a file was skipped without being consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// File name does not follow the consumption grammar.
    NoFilenameMatch,
    /// Identical bytes were already consumed.
    Duplicate,
    /// No registered backend accepts the file.
    NoParser,
}

impl SkipReason {
    /// Structural skips will never succeed for this path and are not
    /// retried; duplicates stay eligible since distinct content may later
    /// arrive under the same name.
    pub fn is_structural(&self) -> bool {
        !matches!(self, SkipReason::Duplicate)
    }
}

/// Result of one per-file consumption attempt.
#[derive(Debug)]
pub enum ConsumeOutcome {
    Consumed(Document),
    Skipped(SkipReason),
    ExtractionFailed,
}

impl ConsumeOutcome {
    pub fn was_consumed(&self) -> bool {
        matches!(self, ConsumeOutcome::Consumed(_))
    }
}

/// Validated settings for a [`Consumer`].
#[derive(Debug, Clone)]
pub struct ConsumerSettings {
    pub watch_dir: PathBuf,
    pub scratch_dir: PathBuf,
    pub media_dir: PathBuf,
    pub settle: Duration,
    pub ignore_patterns: Vec<String>,
}

impl ConsumerSettings {
    /// Build settings from configuration, falling back to platform paths.
    pub fn from_config(config: &Config, paths: &AppPaths) -> ConsumeResult<Self> {
        let watch_dir = config
            .consumption
            .directory_path()
            .ok_or_else(|| ConsumeError::Config("consumption.directory is not set".to_string()))?;

        Ok(Self {
            watch_dir,
            scratch_dir: config
                .consumption
                .scratch_path()
                .unwrap_or_else(|| paths.scratch_dir.clone()),
            media_dir: config
                .storage
                .media_path()
                .unwrap_or_else(|| paths.media_dir.clone()),
            settle: Duration::from_millis(config.consumption.settle_ms),
            ignore_patterns: config.consumption.ignore_patterns.clone(),
        })
    }
}

/// Drives the end-to-end per-file workflow over the watch directory.
///
/// Owns the source file lifecycle: it alone deletes a source file, and only
/// after the document row and both encrypted artifacts exist.
pub struct Consumer {
    watch_dir: PathBuf,
    scratch_dir: PathBuf,
    detector: StabilityDetector,
    store: DocumentStore,
    db: Database,
    backends: Vec<Box<dyn ParserBackend>>,
    observers: Vec<Box<dyn ConsumeObserver>>,
    ignored: HashSet<PathBuf>,
}

impl Consumer {
    /// Validate configuration and assemble the pipeline.
    ///
    /// Fails fatally when the watch directory is missing or when no parser
    /// backend is registered; nothing is consumed in either case.
    pub fn new(
        settings: ConsumerSettings,
        db: Database,
        encryptor: Arc<dyn Encryptor>,
        backends: Vec<Box<dyn ParserBackend>>,
        observers: Vec<Box<dyn ConsumeObserver>>,
    ) -> ConsumeResult<Self> {
        if !settings.watch_dir.is_dir() {
            return Err(ConsumeError::Config(format!(
                "consumption directory does not exist: {}",
                settings.watch_dir.display()
            )));
        }

        if backends.is_empty() {
            return Err(ConsumeError::Config(
                "no parser backends registered, nothing can be consumed".to_string(),
            ));
        }

        fs::create_dir_all(&settings.scratch_dir)?;

        let store = DocumentStore::new(db.clone(), encryptor, settings.media_dir.clone())?;
        let detector = StabilityDetector::new(settings.settle, &settings.ignore_patterns);

        Ok(Self {
            watch_dir: settings.watch_dir,
            scratch_dir: settings.scratch_dir,
            detector,
            store,
            db,
            backends,
            observers,
            ignored: HashSet::new(),
        })
    }

    /// Run one consumption pass: find stable files and consume them strictly
    /// sequentially, oldest first.
    ///
    /// Structural skips and extraction failures mark the path ignored so it
    /// is not retried every cycle; duplicates and successes do not.
    pub fn consume_new_files(&mut self) -> ConsumeResult<Vec<Document>> {
        let ready = self.detector.ready_files(&self.watch_dir, &self.ignored)?;

        let mut consumed = Vec::new();
        for path in ready {
            match self.try_consume_file(&path)? {
                ConsumeOutcome::Consumed(document) => consumed.push(document),
                ConsumeOutcome::Skipped(reason) if reason.is_structural() => {
                    self.ignored.insert(path);
                }
                ConsumeOutcome::Skipped(_) => {}
                ConsumeOutcome::ExtractionFailed => {
                    self.ignored.insert(path);
                }
            }
        }

        Ok(consumed)
    }

    /// Attempt to consume a single file.
    ///
    /// Skips and extraction failures are reported in the outcome; store
    /// failures propagate as errors, with the source file left in place.
    pub fn try_consume_file(&self, path: &Path) -> ConsumeResult<ConsumeOutcome> {
        if FileInfo::from_path(path).is_none() {
            debug!("File name not consumable, skipping {}", path.display());
            return Ok(ConsumeOutcome::Skipped(SkipReason::NoFilenameMatch));
        }

        if dedup::is_duplicate(&self.db, path)? {
            info!("Skipping {} as it appears to be a duplicate", path.display());
            return Ok(ConsumeOutcome::Skipped(SkipReason::Duplicate));
        }

        let Some(backend) = select_backend(&self.backends, path) else {
            error!("No parser backend accepts {}", path.display());
            return Ok(ConsumeOutcome::Skipped(SkipReason::NoParser));
        };

        let correlation = new_id();
        info!(correlation = %correlation, "Consuming {}", path.display());

        for observer in &self.observers {
            observer.consumption_started(path, &correlation);
        }

        let mut extraction = match backend.begin(path, &self.scratch_dir) {
            Ok(extraction) => extraction,
            Err(e) => {
                error!(correlation = %correlation, "EXTRACTION FAILURE for {}: {}", path.display(), e);
                return Ok(ConsumeOutcome::ExtractionFailed);
            }
        };

        let extracted = (|| -> ConsumeResult<(PathBuf, Option<DateTime<Utc>>, String)> {
            let thumbnail = extraction.thumbnail()?;
            let date = extraction.date();
            let text = extraction.text()?;
            Ok((thumbnail, date, text))
        })();

        let (thumbnail, date, text) = match extracted {
            Ok(parts) => parts,
            Err(e) => {
                error!(correlation = %correlation, "EXTRACTION FAILURE for {}: {}", path.display(), e);
                extraction.cleanup();
                return Ok(ConsumeOutcome::ExtractionFailed);
            }
        };

        let document = self.store.store(&text, path, &thumbnail, date)?;

        // Deletion is strictly last: the encrypted copy and the database
        // record exist before the source goes away.
        extraction.cleanup();
        fs::remove_file(path)?;

        info!(correlation = %correlation, "Document {} consumption finished", document);

        for observer in &self.observers {
            observer.consumption_finished(&document, &correlation);
        }

        Ok(ConsumeOutcome::Consumed(document))
    }

    /// Paths excluded from future passes.
    pub fn ignored_paths(&self) -> impl Iterator<Item = &Path> {
        self.ignored.iter().map(PathBuf::as_path)
    }
}
