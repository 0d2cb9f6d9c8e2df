//! PDF extraction backend.

use super::{extension_of, Extraction, ParserBackend};
use crate::error::{ConsumeError, ConsumeResult};
use chrono::{DateTime, Utc};
use docvault_core::new_id;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const WEIGHT: i32 = 5;
const PREVIEW_CHARS: usize = 500;

/// Backend for PDF documents.
pub struct PdfBackend;

impl ParserBackend for PdfBackend {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn probe(&self, path: &Path) -> Option<i32> {
        (extension_of(path) == "pdf").then_some(WEIGHT)
    }

    fn begin(&self, path: &Path, scratch: &Path) -> ConsumeResult<Box<dyn Extraction>> {
        Ok(Box::new(PdfExtraction {
            source: path.to_path_buf(),
            scratch: scratch.to_path_buf(),
            content: None,
            preview: None,
        }))
    }
}

struct PdfExtraction {
    source: PathBuf,
    scratch: PathBuf,
    content: Option<String>,
    preview: Option<PathBuf>,
}

impl PdfExtraction {
    fn load(&mut self) -> ConsumeResult<()> {
        if self.content.is_none() {
            debug!("Extracting text from {}", self.source.display());
            let raw = pdf_extract::extract_text(&self.source).map_err(|e| {
                ConsumeError::Extraction {
                    path: self.source.clone(),
                    message: format!("PDF text extraction failed: {}", e),
                }
            })?;
            self.content = Some(tidy(&raw));
        }
        Ok(())
    }
}

impl Extraction for PdfExtraction {
    fn text(&mut self) -> ConsumeResult<String> {
        self.load()?;
        Ok(self.content.clone().unwrap_or_default())
    }

    fn thumbnail(&mut self) -> ConsumeResult<PathBuf> {
        self.load()?;
        let snippet: String = self
            .content
            .as_deref()
            .unwrap_or_default()
            .chars()
            .take(PREVIEW_CHARS)
            .collect();

        let path = self.scratch.join(format!("{}.preview.txt", new_id()));
        fs::write(&path, snippet)?;
        self.preview = Some(path.clone());
        Ok(path)
    }

    fn date(&mut self) -> Option<DateTime<Utc>> {
        None
    }

    fn cleanup(&mut self) {
        if let Some(preview) = self.preview.take() {
            let _ = fs::remove_file(preview);
        }
    }
}

/// Normalize extracted PDF text: trim line ends, collapse blank runs, and
/// turn form-feed page breaks into newlines.
fn tidy(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut blank_run = 0;

    let normalized = text.replace('\x0C', "\n");
    for line in normalized.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        lines.push(line);
    }

    lines.join("\n").trim().to_string()
}
