//! Debounced file watching over the content root.

use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{DebouncedEvent, DebouncedEventKind, Debouncer, new_debouncer};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

use crate::adapter::{BuildAdapter, FileChange};
use crate::logging::targets;
use crate::{Error, Result};

/// A changed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

/// Type of file change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// File was created or modified.
    Modified,
    /// File was removed.
    Removed,
}

type EventResult = std::result::Result<Vec<DebouncedEvent>, notify::Error>;

/// Watches content directories and config files.
///
/// # Example
///
/// ```ignore
/// let mut watcher = ContentWatcher::new()?;
/// watcher.watch_dir(adapter.scanner().root())?;
///
/// // In the host's event loop:
/// let changes = watcher.poll();
/// if !changes.is_empty() {
///     watcher.apply_changes(&mut adapter, &changes)?;
/// }
/// ```
pub struct ContentWatcher {
    debouncer: Debouncer<RecommendedWatcher>,
    rx: Receiver<EventResult>,
    watched: HashSet<PathBuf>,
}

impl ContentWatcher {
    pub fn new() -> Result<Self> {
        Self::with_debounce(Duration::from_millis(100))
    }

    /// Create a watcher that coalesces events within `timeout`.
    pub fn with_debounce(timeout: Duration) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let debouncer = new_debouncer(timeout, tx).map_err(|e| Error::HotReload(e.to_string()))?;

        Ok(Self {
            debouncer,
            rx,
            watched: HashSet::new(),
        })
    }

    /// Watch a directory recursively.
    pub fn watch_dir(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.watch(path.as_ref(), RecursiveMode::Recursive)
    }

    /// Watch a single file, such as the config entry.
    pub fn watch_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.watch(path.as_ref(), RecursiveMode::NonRecursive)
    }

    /// Watch everything `adapter` depends on: the content root and its
    /// config files.
    pub fn watch_adapter(&mut self, adapter: &BuildAdapter) -> Result<()> {
        self.watch_dir(adapter.scanner().root())?;
        for config in adapter.config_paths() {
            self.watch_file(adapter.scanner().resolve_path(config))?;
        }
        Ok(())
    }

    /// Stop watching a path.
    pub fn unwatch(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let Ok(path) = path.as_ref().canonicalize() else {
            return Ok(());
        };

        if self.watched.remove(&path) {
            let _ = self.debouncer.watcher().unwatch(&path);
            tracing::info!(target: targets::HOT_RELOAD, "Stopped watching: {}", path.display());
        }
        Ok(())
    }

    /// Poll for changes, de-duplicated and sorted by path.
    pub fn poll(&mut self) -> Vec<ContentChangeEvent> {
        let mut changes = vec![];

        loop {
            match self.rx.try_recv() {
                Ok(Ok(events)) => {
                    for event in events {
                        if event.kind != DebouncedEventKind::Any {
                            continue;
                        }
                        let kind = if event.path.exists() {
                            ChangeKind::Modified
                        } else {
                            ChangeKind::Removed
                        };
                        changes.push(ContentChangeEvent { path: event.path, kind });
                    }
                }
                Ok(Err(e)) => {
                    tracing::warn!(target: targets::HOT_RELOAD, "File watcher error: {}", e);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::error!(target: targets::HOT_RELOAD, "File watcher disconnected");
                    break;
                }
            }
        }

        changes.sort_by(|a, b| a.path.cmp(&b.path));
        changes.dedup_by(|a, b| a.path == b.path);
        changes
    }

    /// Forward each change to `adapter`. A failed change is logged and the
    /// remaining changes are still applied; the first error is returned.
    pub fn apply_changes(
        &self,
        adapter: &mut BuildAdapter,
        changes: &[ContentChangeEvent],
    ) -> Result<Vec<FileChange>> {
        let mut outcomes = Vec::with_capacity(changes.len());
        let mut first_error = None;

        for change in changes {
            match adapter.on_file_changed(&change.path) {
                Ok(outcome) => {
                    tracing::debug!(target: targets::HOT_RELOAD, path = %change.path.display(), ?outcome, "applied change");
                    outcomes.push(outcome);
                }
                Err(e) => {
                    tracing::error!(target: targets::HOT_RELOAD, "Failed to apply change to {}: {}", change.path.display(), e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(outcomes),
        }
    }

    /// Number of watched paths.
    pub fn watched_count(&self) -> usize {
        self.watched.len()
    }

    fn watch(&mut self, path: &Path, mode: RecursiveMode) -> Result<()> {
        let path = path.canonicalize().map_err(|e| Error::io(path, e))?;
        if self.watched.contains(&path) {
            return Ok(());
        }

        self.debouncer
            .watcher()
            .watch(&path, mode)
            .map_err(|e| Error::HotReload(e.to_string()))?;
        tracing::info!(target: targets::HOT_RELOAD, "Watching: {}", path.display());
        self.watched.insert(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use tempfile::tempdir;

    use crate::{BuildConfig, FnConfig};

    #[test]
    fn watch_dir_and_file() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("styleframe.toml");
        fs::write(&config, "content = []").unwrap();

        let mut watcher = ContentWatcher::new().unwrap();
        watcher.watch_dir(dir.path()).unwrap();
        watcher.watch_file(&config).unwrap();
        watcher.watch_dir(dir.path()).unwrap();
        assert_eq!(watcher.watched_count(), 2);

        watcher.unwatch(&config).unwrap();
        assert_eq!(watcher.watched_count(), 1);
    }

    #[test]
    fn watching_missing_path_fails() {
        let dir = tempdir().unwrap();
        let mut watcher = ContentWatcher::new().unwrap();
        assert!(watcher.watch_dir(dir.path().join("missing")).is_err());
    }

    #[test]
    fn watch_adapter_includes_entry_source() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/App.vue"), "badge").unwrap();
        let source = dir.path().join("styleframe.config.ts");
        fs::write(&source, "export default {}").unwrap();

        let config = BuildConfig::default().with_root(dir.path()).with_content(["src/**/*.vue"]);
        let mut adapter = BuildAdapter::new(config).unwrap();
        adapter.compile(FnConfig::new("app", |_| Ok(())).with_source_path(&source)).unwrap();

        let mut watcher = ContentWatcher::new().unwrap();
        watcher.watch_adapter(&adapter).unwrap();
        assert_eq!(watcher.watched_count(), 2);
    }
}
