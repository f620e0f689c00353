//! Usage scanning over content files.
//!
//! The scanner walks the content root, keeps files matching the ordered
//! content patterns and extracts candidate class tokens from each. Per-file
//! results are cached behind a two-level fingerprint, so repeat scans in the
//! same process only re-read files that changed.
//!
//! Files are read concurrently with `rayon`; the results are merged into the
//! cache in one serialized step after every file is done. A cancelled scan
//! merges nothing.

mod cancellation;
mod extract;
mod fingerprint;
mod types;

pub use cancellation::CancellationToken;
pub use extract::extract_tokens;
pub use fingerprint::{Fingerprint, hash_content};
pub use types::{ScanReport, ScanResult, ScanWarning, TokenSet};

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use parking_lot::Mutex;
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::logging::targets;
use crate::{Error, Result};

#[derive(Debug, Clone)]
struct CachedFile {
    fingerprint: Fingerprint,
    tokens: TokenSet,
}

enum Outcome {
    /// Metadata unchanged; nothing was read.
    Reused(CachedFile),
    /// Read again, but the content hash is unchanged.
    Refreshed(CachedFile),
    /// Read and extracted.
    Extracted(CachedFile),
    Skipped(ScanWarning),
}

/// Scans content files for class-name tokens.
#[derive(Debug)]
pub struct Scanner {
    root: PathBuf,
    patterns: Vec<String>,
    globs: GlobSet,
    cache: Mutex<HashMap<PathBuf, CachedFile>>,
    cancellation: CancellationToken,
}

impl Scanner {
    /// Create a scanner over `root` for the ordered glob `patterns`.
    ///
    /// Patterns are relative to `root`; a leading `./` is ignored and `*`
    /// never crosses a path separator.
    pub fn new<S: AsRef<str>>(root: impl AsRef<Path>, patterns: impl IntoIterator<Item = S>) -> Result<Self> {
        let root = root.as_ref();
        let root = root.canonicalize().map_err(|e| Error::io(root, e))?;

        let mut builder = GlobSetBuilder::new();
        let mut kept = Vec::new();
        for pattern in patterns {
            let pattern = pattern.as_ref().trim();
            let normalized = pattern.strip_prefix("./").unwrap_or(pattern);
            builder.add(GlobBuilder::new(normalized).literal_separator(true).build()?);
            kept.push(pattern.to_string());
        }

        Ok(Self {
            root,
            patterns: kept,
            globs: builder.build()?,
            cache: Mutex::new(HashMap::new()),
            cancellation: CancellationToken::new(),
        })
    }

    /// The canonical content root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The content patterns as given.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// The token checked between files.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Make `path` absolute under the root and canonical where possible.
    /// A path that no longer exists is resolved through its parent.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };

        if let Ok(canonical) = path.canonicalize() {
            return canonical;
        }
        match (path.parent().and_then(|p| p.canonicalize().ok()), path.file_name()) {
            (Some(parent), Some(name)) => parent.join(name),
            _ => path,
        }
    }

    /// Index of the first pattern matching `path`.
    pub fn pattern_index(&self, path: &Path) -> Option<usize> {
        let relative = path.strip_prefix(&self.root).ok()?;
        self.globs.matches(relative).into_iter().min()
    }

    /// Whether `path` is a content file.
    pub fn matches(&self, path: &Path) -> bool {
        self.pattern_index(path).is_some()
    }

    /// Content files ordered by first matching pattern, then by path.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        self.walk().map(|(files, _)| files)
    }

    /// Scan every content file, reusing cached tokens of unchanged files.
    pub fn scan(&self) -> Result<ScanResult> {
        let (files, mut warnings) = self.walk()?;
        let mut result = self.scan_files(&files, false)?;
        warnings.append(&mut result.report.warnings);
        result.report.warnings = warnings;
        Ok(result)
    }

    /// Re-read `paths` regardless of their cached fingerprints.
    pub fn scan_paths(&self, paths: &[PathBuf]) -> Result<ScanResult> {
        let files: Vec<PathBuf> = paths.iter().map(|p| self.resolve_path(p)).collect();
        self.scan_files(&files, true)
    }

    /// Drop the usage record of `path`. Returns whether one existed.
    pub fn forget(&self, path: &Path) -> bool {
        let path = self.resolve_path(path);
        self.cache.lock().remove(&path).is_some()
    }

    /// Drop every usage record.
    pub fn invalidate(&self) {
        self.cache.lock().clear();
    }

    /// Number of files with a usage record.
    pub fn cached_files(&self) -> usize {
        self.cache.lock().len()
    }

    fn walk(&self) -> Result<(Vec<PathBuf>, Vec<ScanWarning>)> {
        let mut found = Vec::new();
        let mut warnings = Vec::new();

        for entry in WalkDir::new(&self.root).follow_links(false) {
            if self.cancellation.is_cancelled() {
                return Err(Error::Cancelled);
            }
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(target: targets::SCANNER, "cannot walk content root: {err}");
                    warnings.push(ScanWarning::Walk {
                        message: err.to_string(),
                    });
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(index) = self.pattern_index(entry.path()) {
                found.push((index, entry.into_path()));
            }
        }

        found.sort();
        tracing::debug!(target: targets::SCANNER, files = found.len(), "discovered content files");
        Ok((found.into_iter().map(|(_, path)| path).collect(), warnings))
    }

    fn scan_files(&self, files: &[PathBuf], force: bool) -> Result<ScanResult> {
        let outcomes: Vec<Option<(PathBuf, Outcome)>> = files
            .par_iter()
            .map(|path| {
                if self.cancellation.is_cancelled() {
                    return None;
                }
                Some((path.clone(), self.scan_file(path, force)))
            })
            .collect();

        if self.cancellation.is_cancelled() {
            tracing::info!(target: targets::SCANNER, "scan cancelled, pending results discarded");
            return Err(Error::Cancelled);
        }

        let mut result = ScanResult::default();
        let mut cache = self.cache.lock();
        for (path, outcome) in outcomes.into_iter().flatten() {
            match outcome {
                Outcome::Reused(entry) => {
                    result.report.files_reused += 1;
                    result.files.push((path, entry.tokens));
                }
                Outcome::Refreshed(entry) => {
                    result.report.files_reused += 1;
                    let tokens = Arc::clone(&entry.tokens);
                    cache.insert(path.clone(), entry);
                    result.files.push((path, tokens));
                }
                Outcome::Extracted(entry) => {
                    result.report.files_scanned += 1;
                    let tokens = Arc::clone(&entry.tokens);
                    cache.insert(path.clone(), entry);
                    result.files.push((path, tokens));
                }
                Outcome::Skipped(warning) => {
                    tracing::warn!(target: targets::SCANNER, "{warning}");
                    result.report.warnings.push(warning);
                }
            }
        }
        drop(cache);

        result.report.tokens = result.distinct_tokens().len();
        tracing::debug!(
            target: targets::SCANNER,
            scanned = result.report.files_scanned,
            reused = result.report.files_reused,
            tokens = result.report.tokens,
            "scan finished"
        );
        Ok(result)
    }

    fn scan_file(&self, path: &Path, force: bool) -> Outcome {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(err) => return Outcome::Skipped(unreadable(path, &err)),
        };

        let cached = self.cache.lock().get(path).cloned();
        if !force {
            if let Some(entry) = &cached {
                if entry.fingerprint.metadata_matches(&metadata) {
                    return Outcome::Reused(entry.clone());
                }
            }
        }

        let content = match fs::read(path) {
            Ok(content) => content,
            Err(err) => return Outcome::Skipped(unreadable(path, &err)),
        };
        let fingerprint = Fingerprint::new(&metadata, &content);
        if let Some(entry) = cached {
            if entry.fingerprint.hash == fingerprint.hash {
                return Outcome::Refreshed(CachedFile {
                    fingerprint,
                    tokens: entry.tokens,
                });
            }
        }

        let tokens = extract_tokens(&String::from_utf8_lossy(&content));
        tracing::trace!(target: targets::SCANNER, path = %path.display(), tokens = tokens.len(), "extracted");
        Outcome::Extracted(CachedFile {
            fingerprint,
            tokens: Arc::new(tokens),
        })
    }
}

fn unreadable(path: &Path, err: &std::io::Error) -> ScanWarning {
    ScanWarning::Unreadable {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn files_ordered_by_pattern_then_path() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/b.vue", "b");
        write(dir.path(), "src/a.vue", "a");
        write(dir.path(), "pages/index.html", "i");
        write(dir.path(), "src/ignored.txt", "x");

        let scanner = Scanner::new(dir.path(), ["./pages/*.html", "src/**/*.vue"]).unwrap();
        let files = scanner.discover().unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(scanner.root()).unwrap().display().to_string())
            .collect();
        assert_eq!(names, vec!["pages/index.html", "src/a.vue", "src/b.vue"]);
    }

    #[test]
    fn star_does_not_cross_directories() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/deep/a.vue", "a");

        let scanner = Scanner::new(dir.path(), ["src/*.vue"]).unwrap();
        assert!(scanner.discover().unwrap().is_empty());
    }

    #[test]
    fn unchanged_files_are_reused() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/a.vue", "<div class=\"badge\">");

        let scanner = Scanner::new(dir.path(), ["src/**/*.vue"]).unwrap();
        let first = scanner.scan().unwrap();
        assert_eq!(first.report().files_scanned, 1);

        let second = scanner.scan().unwrap();
        assert_eq!(second.report().files_scanned, 0);
        assert_eq!(second.report().files_reused, 1);
        assert!(second.distinct_tokens().contains("badge"));
    }

    #[test]
    fn tokens_are_restartable() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/a.vue", "badge card");

        let scanner = Scanner::new(dir.path(), ["src/*.vue"]).unwrap();
        let result = scanner.scan().unwrap();
        let once: Vec<_> = result.tokens().collect();
        let twice: Vec<_> = result.tokens().collect();
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn forced_rescan_picks_up_edits() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "src/a.vue", "badge");

        let scanner = Scanner::new(dir.path(), ["src/*.vue"]).unwrap();
        scanner.scan().unwrap();

        fs::write(&path, "card").unwrap();
        let result = scanner.scan_paths(&[path.clone()]).unwrap();
        assert_eq!(result.report().files_scanned, 1);
        let tokens: Vec<&str> = result.distinct_tokens().into_iter().collect();
        assert_eq!(tokens, vec!["card"]);
    }

    #[test]
    fn forget_removes_usage_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "src/a.vue", "badge");

        let scanner = Scanner::new(dir.path(), ["src/*.vue"]).unwrap();
        scanner.scan().unwrap();
        assert_eq!(scanner.cached_files(), 1);

        fs::remove_file(&path).unwrap();
        assert!(scanner.forget(&path));
        assert_eq!(scanner.cached_files(), 0);
    }

    #[test]
    fn cancelled_scan_commits_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/a.vue", "badge");

        let scanner = Scanner::new(dir.path(), ["src/*.vue"]).unwrap();
        scanner.cancellation().cancel();
        assert!(matches!(scanner.scan(), Err(Error::Cancelled)));
        assert_eq!(scanner.cached_files(), 0);

        scanner.cancellation().reset();
        assert_eq!(scanner.scan().unwrap().report().files_scanned, 1);
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(Scanner::new(dir.path(), ["src/[.vue"]), Err(Error::Glob(_))));
    }

    #[test]
    fn relative_paths_resolve_under_root() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/a.vue", "badge");

        let scanner = Scanner::new(dir.path(), ["src/*.vue"]).unwrap();
        let resolved = scanner.resolve_path(Path::new("src/a.vue"));
        assert!(scanner.matches(&resolved));
        assert!(scanner.matches(&scanner.resolve_path(Path::new("src/gone.vue"))));
    }
}
