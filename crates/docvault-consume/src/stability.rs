//! File readiness detection.
//!
//! A file is safe to consume only once its modification timestamp has been
//! stable for the settle duration; this guards against picking up a file
//! mid-write, e.g. a large upload still being copied into the directory.

use glob::Pattern;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

/// Decides which files in the watch directory are ready for consumption.
pub struct StabilityDetector {
    settle: Duration,
    ignore_patterns: Vec<Pattern>,
}

impl StabilityDetector {
    pub fn new(settle: Duration, ignore_patterns: &[String]) -> Self {
        let ignore_patterns = ignore_patterns
            .iter()
            .filter_map(|p| match Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("Ignoring invalid file pattern {:?}: {}", p, e);
                    None
                }
            })
            .collect();

        Self {
            settle,
            ignore_patterns,
        }
    }

    /// Regular files in `dir` that are not ignored and whose modification
    /// time survived the settle delay unchanged, ordered oldest to newest.
    ///
    /// Blocks for the settle duration whenever at least one candidate exists.
    pub fn ready_files(
        &self,
        dir: &Path,
        ignored: &HashSet<PathBuf>,
    ) -> std::io::Result<Vec<PathBuf>> {
        let mut candidates: Vec<(PathBuf, SystemTime)> = Vec::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }

            let path = entry.path();
            if ignored.contains(&path) || self.matches_ignore_pattern(&path) {
                continue;
            }

            let mtime = entry.metadata()?.modified()?;
            candidates.push((path, mtime));
        }

        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        candidates.sort_by_key(|(_, mtime)| *mtime);

        std::thread::sleep(self.settle);

        let mut ready = Vec::new();
        for (path, first_mtime) in candidates {
            match fs::metadata(&path).and_then(|m| m.modified()) {
                Ok(mtime) if mtime == first_mtime => ready.push(path),
                Ok(_) => debug!("Still being written, deferring: {}", path.display()),
                Err(_) => debug!("Vanished during settle: {}", path.display()),
            }
        }

        Ok(ready)
    }

    fn matches_ignore_pattern(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return true;
        };
        self.ignore_patterns.iter().any(|p| p.matches(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn detector() -> StabilityDetector {
        StabilityDetector::new(
            Duration::from_millis(10),
            &["*.part".to_string(), ".*".to_string()],
        )
    }

    fn touch(dir: &Path, name: &str, mtime: SystemTime) -> PathBuf {
        let path = dir.join(name);
        let file = File::create(&path).unwrap();
        file.set_modified(mtime).unwrap();
        path
    }

    #[test]
    fn test_oldest_first_ordering() {
        let dir = tempdir().unwrap();
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);

        let newer = touch(dir.path(), "b.pdf", base + Duration::from_secs(60));
        let older = touch(dir.path(), "a.pdf", base);

        let ready = detector().ready_files(dir.path(), &HashSet::new()).unwrap();
        assert_eq!(ready, vec![older, newer]);
    }

    #[test]
    fn test_modified_during_settle_is_deferred() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("upload.pdf");
        File::create(&path).unwrap();

        let detector = StabilityDetector::new(Duration::from_millis(80), &[]);

        // Bump the mtime mid-settle, as a copy-in-progress would.
        let bumper = std::thread::spawn({
            let path = path.clone();
            move || {
                std::thread::sleep(Duration::from_millis(20));
                let file = File::options().write(true).open(&path).unwrap();
                file.set_modified(SystemTime::now() + Duration::from_secs(30))
                    .unwrap();
            }
        });

        let ready = detector.ready_files(dir.path(), &HashSet::new()).unwrap();
        bumper.join().unwrap();

        assert!(ready.is_empty());

        // Unchanged on the next pass, so it becomes eligible again.
        let ready = detector.ready_files(dir.path(), &HashSet::new()).unwrap();
        assert_eq!(ready, vec![path]);
    }

    #[test]
    fn test_ignored_paths_and_patterns_excluded() {
        let dir = tempdir().unwrap();
        let now = SystemTime::now();

        let kept = touch(dir.path(), "doc.pdf", now);
        let listed = touch(dir.path(), "skipme.pdf", now);
        touch(dir.path(), "upload.part", now);
        touch(dir.path(), ".hidden", now);
        fs::create_dir(dir.path().join("subdir")).unwrap();

        let ignored: HashSet<PathBuf> = [listed].into_iter().collect();
        let ready = detector().ready_files(dir.path(), &ignored).unwrap();
        assert_eq!(ready, vec![kept]);
    }

    #[test]
    fn test_empty_directory_short_circuits() {
        let dir = tempdir().unwrap();
        let ready = detector().ready_files(dir.path(), &HashSet::new()).unwrap();
        assert!(ready.is_empty());
    }
}
