//! Scan results and reports.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Tokens found in one file.
pub type TokenSet = Arc<BTreeSet<String>>;

/// A recoverable problem met while scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanWarning {
    /// A content file could not be read; it was skipped.
    Unreadable { path: PathBuf, message: String },
    /// A directory entry could not be walked.
    Walk { message: String },
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable { path, message } => {
                write!(f, "ScannerIOError: skipped '{}': {message}", path.display())
            }
            Self::Walk { message } => write!(f, "ScannerIOError: {message}"),
        }
    }
}

/// Counters for one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Files read and extracted.
    pub files_scanned: usize,
    /// Files whose cached tokens were reused.
    pub files_reused: usize,
    /// Distinct tokens across all files.
    pub tokens: usize,
    /// Files skipped and other recoverable problems.
    pub warnings: Vec<ScanWarning>,
}

/// The `(path, tokens)` records of one scan, in discovery order.
///
/// Iteration borrows the result, so [`tokens`](Self::tokens) can be walked
/// any number of times.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub(crate) files: Vec<(PathBuf, TokenSet)>,
    pub(crate) report: ScanReport,
}

impl ScanResult {
    /// Every `(path, token)` pair.
    pub fn tokens(&self) -> impl Iterator<Item = (&Path, &str)> + '_ {
        self.files
            .iter()
            .flat_map(|(path, tokens)| tokens.iter().map(move |t| (path.as_path(), t.as_str())))
    }

    /// Distinct tokens across all files, sorted.
    pub fn distinct_tokens(&self) -> BTreeSet<&str> {
        self.files
            .iter()
            .flat_map(|(_, tokens)| tokens.iter().map(String::as_str))
            .collect()
    }

    /// Scanned files in discovery order.
    pub fn files(&self) -> impl Iterator<Item = &Path> + '_ {
        self.files.iter().map(|(path, _)| path.as_path())
    }

    /// Tokens found in `path`.
    pub fn tokens_in(&self, path: &Path) -> Option<&BTreeSet<String>> {
        self.files
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, tokens)| tokens.as_ref())
    }

    pub fn report(&self) -> &ScanReport {
        &self.report
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
