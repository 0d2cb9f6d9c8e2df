//! Shared test doubles for the pipeline's unit tests.

use crate::error::{ConsumeError, ConsumeResult};
use crate::parsers::{extension_of, Extraction, ParserBackend};
use chrono::{DateTime, Utc};
use docvault_core::new_id;
use docvault_crypto::{CryptoResult, Encryptor};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Identity "encryption" so artifact contents stay assertable in tests.
pub(crate) struct PlainEncryptor;

impl Encryptor for PlainEncryptor {
    fn encrypt(&self, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
        Ok(plaintext.to_vec())
    }

    fn decrypt(&self, data: &[u8]) -> CryptoResult<Vec<u8>> {
        Ok(data.to_vec())
    }
}

/// Scriptable parser backend: fixed extension, weight, and text output.
pub(crate) struct StubBackend {
    name: &'static str,
    ext: &'static str,
    weight: i32,
    text: String,
    fail_text: bool,
    cleanups: Arc<AtomicUsize>,
}

impl StubBackend {
    pub fn new(name: &'static str, ext: &'static str, weight: i32, text: &str) -> Self {
        Self {
            name,
            ext,
            weight,
            text: text.to_string(),
            fail_text: false,
            cleanups: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make `text()` fail, simulating a broken extraction.
    pub fn failing(mut self) -> Self {
        self.fail_text = true;
        self
    }

    /// Number of `cleanup()` calls across all extractions of this backend.
    pub fn cleanup_counter(&self) -> Arc<AtomicUsize> {
        self.cleanups.clone()
    }
}

impl ParserBackend for StubBackend {
    fn name(&self) -> &'static str {
        self.name
    }

    fn probe(&self, path: &Path) -> Option<i32> {
        (extension_of(path) == self.ext).then_some(self.weight)
    }

    fn begin(&self, path: &Path, scratch: &Path) -> ConsumeResult<Box<dyn Extraction>> {
        Ok(Box::new(StubExtraction {
            source: path.to_path_buf(),
            scratch: scratch.to_path_buf(),
            text: self.text.clone(),
            fail_text: self.fail_text,
            cleanups: self.cleanups.clone(),
            preview: None,
        }))
    }
}

struct StubExtraction {
    source: PathBuf,
    scratch: PathBuf,
    text: String,
    fail_text: bool,
    cleanups: Arc<AtomicUsize>,
    preview: Option<PathBuf>,
}

impl Extraction for StubExtraction {
    fn text(&mut self) -> ConsumeResult<String> {
        if self.fail_text {
            return Err(ConsumeError::Extraction {
                path: self.source.clone(),
                message: "stubbed extraction failure".to_string(),
            });
        }
        Ok(self.text.clone())
    }

    fn thumbnail(&mut self) -> ConsumeResult<PathBuf> {
        let path = self.scratch.join(format!("{}.stub-preview", new_id()));
        fs::write(&path, &self.text)?;
        self.preview = Some(path.clone());
        Ok(path)
    }

    fn date(&mut self) -> Option<DateTime<Utc>> {
        None
    }

    fn cleanup(&mut self) {
        self.cleanups.fetch_add(1, Ordering::SeqCst);
        if let Some(preview) = self.preview.take() {
            let _ = fs::remove_file(preview);
        }
    }
}
