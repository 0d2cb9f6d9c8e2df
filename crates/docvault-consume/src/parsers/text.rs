//! Plain-text extraction backend.

use super::{extension_of, Extraction, ParserBackend};
use crate::error::{ConsumeError, ConsumeResult};
use chrono::{DateTime, Utc};
use docvault_core::new_id;
use std::fs;
use std::path::{Path, PathBuf};

const WEIGHT: i32 = 10;
const PREVIEW_CHARS: usize = 500;

/// Backend for plain-text documents.
pub struct TextBackend;

impl ParserBackend for TextBackend {
    fn name(&self) -> &'static str {
        "text"
    }

    fn probe(&self, path: &Path) -> Option<i32> {
        matches!(extension_of(path).as_str(), "txt" | "md" | "csv" | "log").then_some(WEIGHT)
    }

    fn begin(&self, path: &Path, scratch: &Path) -> ConsumeResult<Box<dyn Extraction>> {
        Ok(Box::new(TextExtraction {
            source: path.to_path_buf(),
            scratch: scratch.to_path_buf(),
            content: None,
            preview: None,
        }))
    }
}

struct TextExtraction {
    source: PathBuf,
    scratch: PathBuf,
    content: Option<String>,
    preview: Option<PathBuf>,
}

impl TextExtraction {
    fn load(&mut self) -> ConsumeResult<()> {
        if self.content.is_none() {
            let text = fs::read_to_string(&self.source).map_err(|e| ConsumeError::Extraction {
                path: self.source.clone(),
                message: format!("not readable as UTF-8 text: {}", e),
            })?;
            self.content = Some(text);
        }
        Ok(())
    }
}

impl Extraction for TextExtraction {
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

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_probe() {
        let backend = TextBackend;
        assert_eq!(backend.probe(Path::new("a.txt")), Some(WEIGHT));
        assert_eq!(backend.probe(Path::new("a.MD")), Some(WEIGHT));
        assert_eq!(backend.probe(Path::new("a.pdf")), None);
        assert_eq!(backend.probe(Path::new("noext")), None);
    }

    #[test]
    fn test_extraction_and_cleanup() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("note.txt");
        fs::write(&source, "a small note").unwrap();

        let mut extraction = TextBackend.begin(&source, dir.path()).unwrap();

        let thumbnail = extraction.thumbnail().unwrap();
        assert_eq!(fs::read_to_string(&thumbnail).unwrap(), "a small note");
        assert!(extraction.date().is_none());
        assert_eq!(extraction.text().unwrap(), "a small note");

        extraction.cleanup();
        assert!(!thumbnail.exists());
        extraction.cleanup(); // idempotent
    }

    #[test]
    fn test_non_utf8_fails_extraction() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("binary.txt");
        fs::write(&source, [0xFF, 0xFE, 0x00]).unwrap();

        let mut extraction = TextBackend.begin(&source, dir.path()).unwrap();
        assert!(matches!(
            extraction.text(),
            Err(ConsumeError::Extraction { .. })
        ));
    }
}
