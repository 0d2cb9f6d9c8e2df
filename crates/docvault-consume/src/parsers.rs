//! Parser backends: capability contracts and the shipped implementations.

mod pdf;
mod text;

pub use pdf::PdfBackend;
pub use text::TextBackend;

use crate::error::ConsumeResult;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// An extraction backend able to claim ownership of a file type.
pub trait ParserBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Probe whether this backend can handle the file.
    ///
    /// `Some(weight)` accepts; higher weights win selection. `None` declines.
    fn probe(&self, path: &Path) -> Option<i32>;

    /// Start an extraction for the file, using `scratch` for temporaries.
    fn begin(&self, path: &Path, scratch: &Path) -> ConsumeResult<Box<dyn Extraction>>;
}

/// One in-flight extraction of a single file.
pub trait Extraction {
    /// Extracted text content.
    fn text(&mut self) -> ConsumeResult<String>;

    /// Path of a generated preview artifact in the scratch directory.
    fn thumbnail(&mut self) -> ConsumeResult<PathBuf>;

    /// Best-effort creation date found in the content.
    fn date(&mut self) -> Option<DateTime<Utc>>;

    /// Release temporary extraction artifacts. Idempotent; always invoked,
    /// whether extraction succeeded or failed.
    fn cleanup(&mut self);
}

pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default()
}
