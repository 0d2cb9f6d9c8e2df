//! Filename metadata extraction.
//!
//! Consumable files follow a fixed naming grammar, tried most-specific-first:
//!
//! ```text
//! [YYYYMMDD - ]{correspondent} - {title} - {tag,tag,...}.{ext}
//! [YYYYMMDD - ]{correspondent} - {title}.{ext}
//! [YYYYMMDD - ]{title}.{ext}
//! ```
//!
//! The tag group is restricted to `[a-z0-9\-,]` so multi-word titles never
//! parse as a tag list. Files whose names match none of the patterns are not
//! candidates for consumption at all.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

const DATE: &str = r"(?:(?P<date>\d{8}) - )?";
const EXT: &str = r"(?P<ext>(?i:pdf|jpe?g|png|gif|tiff?|txt|md|csv|log))";

static CORRESPONDENT_TITLE_TAGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^{DATE}(?P<correspondent>.+?) - (?P<title>.+?) - (?P<tags>[a-z0-9\-,]+)\.{EXT}$"
    ))
    .expect("invalid filename pattern")
});

static CORRESPONDENT_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^{DATE}(?P<correspondent>.+?) - (?P<title>.+)\.{EXT}$"
    ))
    .expect("invalid filename pattern")
});

static TITLE_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^{DATE}(?P<title>.+)\.{EXT}$")).expect("invalid filename pattern"));

/// Structured metadata derived from a filename.
///
/// Derived-only and immutable; recomputed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub title: String,
    pub correspondent: Option<String>,
    pub tags: Vec<String>,
    pub extension: String,
    pub created: Option<DateTime<Utc>>,
}

impl FileInfo {
    /// Derive metadata from a file path, or `None` when the name does not
    /// conform to the grammar.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;

        for pattern in [&*CORRESPONDENT_TITLE_TAGS, &*CORRESPONDENT_TITLE, &*TITLE_ONLY] {
            if let Some(caps) = pattern.captures(name) {
                let tags = caps
                    .name("tags")
                    .map(|m| parse_tags(m.as_str()))
                    .unwrap_or_default();

                let mut correspondent = caps
                    .name("correspondent")
                    .map(|m| m.as_str().trim().to_string());
                let mut created = caps.name("date").and_then(|m| parse_date(m.as_str()));

                // "20240315 - Invoice.pdf" has no correspondent, but the
                // date lands in the correspondent slot; reclaim it.
                if created.is_none() {
                    if let Some(date) = correspondent.as_deref().and_then(reclaim_date) {
                        created = Some(date);
                        correspondent = None;
                    }
                }

                return Some(Self {
                    title: caps["title"].trim().to_string(),
                    correspondent,
                    tags,
                    extension: caps["ext"].to_lowercase(),
                    created,
                });
            }
        }

        None
    }
}

fn parse_tags(group: &str) -> Vec<String> {
    let mut tags = Vec::new();
    for tag in group.split(',') {
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(s, "%Y%m%d").ok()?;
    Utc.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).single()
}

fn reclaim_date(correspondent: &str) -> Option<DateTime<Utc>> {
    if correspondent.len() == 8 && correspondent.bytes().all(|b| b.is_ascii_digit()) {
        parse_date(correspondent)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_title_only() {
        let info = FileInfo::from_path(Path::new("/in/Invoice March.pdf")).unwrap();
        assert_eq!(info.title, "Invoice March");
        assert_eq!(info.correspondent, None);
        assert!(info.tags.is_empty());
        assert_eq!(info.extension, "pdf");
        assert_eq!(info.created, None);
    }

    #[test]
    fn test_correspondent_and_title() {
        let info = FileInfo::from_path(Path::new("Acme Corp - Invoice March.pdf")).unwrap();
        assert_eq!(info.correspondent, Some("Acme Corp".to_string()));
        assert_eq!(info.title, "Invoice March");
        assert!(info.tags.is_empty());
    }

    #[test]
    fn test_full_grammar_with_tags() {
        let info =
            FileInfo::from_path(Path::new("Acme Corp - Contract - legal,signed.PDF")).unwrap();
        assert_eq!(info.correspondent, Some("Acme Corp".to_string()));
        assert_eq!(info.title, "Contract");
        assert_eq!(info.tags, vec!["legal", "signed"]);
        assert_eq!(info.extension, "pdf");
    }

    #[test]
    fn test_date_prefix() {
        let info =
            FileInfo::from_path(Path::new("20240315 - Acme Corp - Invoice March.pdf")).unwrap();
        let created = info.created.unwrap();
        assert_eq!((created.year(), created.month(), created.day()), (2024, 3, 15));
        assert_eq!(info.correspondent, Some("Acme Corp".to_string()));
        assert_eq!(info.title, "Invoice March");
    }

    #[test]
    fn test_multi_word_tail_is_title_not_tags() {
        // The tag group charset rejects spaces and uppercase, so the middle
        // separator binds to the correspondent, not a tag list.
        let info = FileInfo::from_path(Path::new("Acme - Letter - Some Reply.pdf")).unwrap();
        assert_eq!(info.correspondent, Some("Acme".to_string()));
        assert_eq!(info.title, "Letter - Some Reply");
        assert!(info.tags.is_empty());
    }

    #[test]
    fn test_duplicate_tags_collapse() {
        let info = FileInfo::from_path(Path::new("A - T - x,y,x.pdf")).unwrap();
        assert_eq!(info.tags, vec!["x", "y"]);
    }

    #[test]
    fn test_unknown_extension_rejected() {
        assert!(FileInfo::from_path(Path::new("archive.zip")).is_none());
        assert!(FileInfo::from_path(Path::new("no-extension")).is_none());
        assert!(FileInfo::from_path(Path::new(".hidden")).is_none());
    }

    #[test]
    fn test_date_prefix_without_correspondent() {
        let info = FileInfo::from_path(Path::new("20240315 - Invoice.pdf")).unwrap();
        let created = info.created.unwrap();
        assert_eq!((created.year(), created.month(), created.day()), (2024, 3, 15));
        assert_eq!(info.correspondent, None);
        assert_eq!(info.title, "Invoice");
    }

    #[test]
    fn test_invalid_embedded_date_ignored() {
        let info = FileInfo::from_path(Path::new("20249999 - Report.pdf")).unwrap();
        assert_eq!(info.created, None);
        assert_eq!(info.title, "Report");
    }
}
