//! Consumption lifecycle notifications.

use docvault_core::Document;
use std::path::Path;

/// Observer of consumption lifecycle events.
///
/// Delivery is fire-and-forget: the pipeline calls observers inline and does
/// not depend on anything they do. Observers may be absent entirely.
pub trait ConsumeObserver: Send + Sync {
    /// A file passed all gates and extraction is about to begin.
    fn consumption_started(&self, _path: &Path, _correlation: &str) {}

    /// A document was committed and the source file removed.
    fn consumption_finished(&self, _document: &Document, _correlation: &str) {}
}
