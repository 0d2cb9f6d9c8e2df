//! Core domain types for docvault.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Unique identifier for documents.
pub type DocumentId = String;

/// Unique identifier for tags.
pub type TagId = String;

/// Generate a new unique ID.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// A consumed document in the archive.
///
/// Created exactly once during the store step and never mutated afterwards.
/// `checksum` is the SHA-256 of the original file's bytes and is unique
/// across all documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub correspondent: Option<String>,
    pub title: String,
    pub content: String,
    pub file_type: String,
    pub checksum: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Document {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        file_type: impl Into<String>,
        checksum: impl Into<String>,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            id: new_id(),
            correspondent: None,
            title: title.into(),
            content: content.into(),
            file_type: file_type.into(),
            checksum: checksum.into(),
            created,
            modified: created,
        }
    }

    pub fn with_correspondent(mut self, correspondent: impl Into<String>) -> Self {
        self.correspondent = Some(correspondent.into());
        self
    }

    /// Path of the encrypted content artifact under the media directory.
    pub fn content_artifact(&self, media_root: &Path) -> PathBuf {
        media_root
            .join("documents")
            .join(format!("{}.{}.dv", self.id, self.file_type))
    }

    /// Path of the encrypted thumbnail artifact under the media directory.
    pub fn thumbnail_artifact(&self, media_root: &Path) -> PathBuf {
        media_root.join("thumbnails").join(format!("{}.dv", self.id))
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.correspondent {
            Some(c) => write!(f, "{}: {}", c, self.title),
            None => write!(f, "{}", self.title),
        }
    }
}

/// How a tag's match text is evaluated against document content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchAlgorithm {
    /// Any word of the match text appears in the content.
    #[default]
    Any,
    /// Every word of the match text appears in the content.
    All,
    /// The match text appears verbatim (case-insensitive).
    Literal,
}

impl MatchAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchAlgorithm::Any => "any",
            MatchAlgorithm::All => "all",
            MatchAlgorithm::Literal => "literal",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "any" => Some(MatchAlgorithm::Any),
            "all" => Some(MatchAlgorithm::All),
            "literal" => Some(MatchAlgorithm::Literal),
            _ => None,
        }
    }
}

impl std::fmt::Display for MatchAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A shared tag with a content-matching rule.
///
/// Tags are operator-defined and read-only from the consumption pipeline's
/// perspective; the pipeline only associates them with documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub slug: String,
    pub match_text: String,
    pub algorithm: MatchAlgorithm,
}

impl Tag {
    pub fn new(slug: impl Into<String>, match_text: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            slug: slug.into(),
            match_text: match_text.into(),
            algorithm: MatchAlgorithm::Any,
        }
    }

    pub fn with_algorithm(mut self, algorithm: MatchAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Evaluate this tag's rule against extracted text.
    pub fn matches(&self, text: &str) -> bool {
        if self.match_text.is_empty() {
            return false;
        }

        let haystack = text.to_lowercase();

        match self.algorithm {
            MatchAlgorithm::Literal => haystack.contains(&self.match_text.to_lowercase()),
            MatchAlgorithm::Any => self
                .match_text
                .split_whitespace()
                .any(|word| contains_word(&haystack, &word.to_lowercase())),
            MatchAlgorithm::All => self
                .match_text
                .split_whitespace()
                .all(|word| contains_word(&haystack, &word.to_lowercase())),
        }
    }
}

/// Whole-word containment check on an already-lowercased haystack.
fn contains_word(haystack: &str, word: &str) -> bool {
    haystack
        .split(|c: char| !c.is_alphanumeric())
        .any(|w| w == word)
}
