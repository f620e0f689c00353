//! Build sessions: cold compiles, incremental commits and output delivery.

use std::fs;
use std::path::{Path, PathBuf};

use styleframe_core::{EmitMode, Styleframe};

use super::entry::ConfigEntry;
use super::virtual_module::VirtualModule;
use crate::compiler::{CommitReport, IncrementalCompiler, SessionCache};
use crate::config::BuildConfig;
use crate::logging::targets;
use crate::scanner::{CancellationToken, ScanReport, Scanner, hash_content};
use crate::{Error, Result};

/// What [`BuildAdapter::on_file_changed`] did with a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    /// The config changed; the session was rebuilt from scratch.
    ColdRebuild,
    /// A content file was re-scanned and its tokens committed.
    Incremental(CommitReport),
    /// A content file vanished; its usage record was dropped and its rules
    /// kept.
    Removed,
    /// The path is not part of the build, or nothing changed.
    Ignored,
}

struct Session {
    instance: Styleframe,
    compiler: IncrementalCompiler,
    css: String,
    config_hash: Option<u64>,
}

/// Drives one engine instance per build session for a host bundler.
///
/// # Example
///
/// ```no_run
/// use styleframe_build::{BuildAdapter, BuildConfig, FnConfig};
///
/// let config = BuildConfig::default().with_content(["./src/**/*.vue"]);
/// let mut adapter = BuildAdapter::new(config).unwrap();
///
/// let css = adapter
///     .compile(FnConfig::new("app", |sf| {
///         sf.selector(".h1", [("color", "blue")])?;
///         Ok(())
///     }))
///     .unwrap();
///
/// // Later, from the host's watcher:
/// adapter.on_file_changed("src/App.vue").unwrap();
/// ```
pub struct BuildAdapter {
    config: BuildConfig,
    scanner: Scanner,
    entry: Option<Box<dyn ConfigEntry>>,
    session: Option<Session>,
    last_scan: Option<ScanReport>,
}

impl BuildAdapter {
    /// Create an adapter for `config`. No compile happens yet.
    pub fn new(config: BuildConfig) -> Result<Self> {
        let scanner = Scanner::new(&config.root, &config.content)?;
        Ok(Self {
            config,
            scanner,
            entry: None,
            session: None,
            last_scan: None,
        })
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    /// Files whose change forces a cold rebuild: the configured config path
    /// and the source file of the session entry.
    pub fn config_paths(&self) -> Vec<&Path> {
        let entry_path = self.entry.as_ref().and_then(|e| e.source_path());
        self.config.config_path.as_deref().into_iter().chain(entry_path).collect()
    }

    /// A handle that cancels the running scan. The flag is cleared once the
    /// cancelled call returns.
    pub fn cancellation(&self) -> CancellationToken {
        self.scanner.cancellation().clone()
    }

    /// Cold-compile `entry` and make it the session config.
    ///
    /// The previous session is replaced only if the compile succeeds.
    pub fn compile(&mut self, entry: impl ConfigEntry + 'static) -> Result<String> {
        let entry: Box<dyn ConfigEntry> = Box::new(entry);
        let session = self.cold_session(entry.as_ref())?;
        let css = session.css.clone();
        self.entry = Some(entry);
        self.session = Some(session);
        Ok(css)
    }

    /// Cold-rebuild the current entry: a fresh instance and an empty session
    /// cache. Rules for tokens no longer in content disappear here and only
    /// here.
    pub fn rebuild(&mut self) -> Result<String> {
        let entry = self.entry.take().ok_or(Error::NoSession)?;
        let result = self.cold_session(entry.as_ref());
        self.entry = Some(entry);

        let session = result?;
        let css = session.css.clone();
        self.session = Some(session);
        Ok(css)
    }

    /// React to a changed path.
    ///
    /// The config file triggers a cold rebuild when its content changed. A
    /// content file is re-read and its tokens committed on top of the session
    /// cache. A vanished content file drops only its usage record.
    pub fn on_file_changed(&mut self, path: impl AsRef<Path>) -> Result<FileChange> {
        if self.session.is_none() {
            return Err(Error::NoSession);
        }
        let path = self.scanner.resolve_path(path.as_ref());

        if self.is_config_path(&path) {
            let current = config_hash(Some(path.as_path()));
            let previous = self.session.as_ref().and_then(|s| s.config_hash);
            if current.is_some() && current == previous {
                tracing::debug!(target: targets::ADAPTER, "config unchanged, rebuild skipped");
                return Ok(FileChange::Ignored);
            }
            tracing::info!(target: targets::ADAPTER, path = %path.display(), "config changed, cold rebuild");
            self.rebuild()?;
            return Ok(FileChange::ColdRebuild);
        }

        if !self.scanner.matches(&path) {
            return Ok(FileChange::Ignored);
        }

        if !path.exists() {
            self.scanner.forget(&path);
            tracing::info!(target: targets::ADAPTER, path = %path.display(), "content file removed, rules kept");
            return Ok(FileChange::Removed);
        }

        if self.config.effective_mode() == EmitMode::Eager {
            return Ok(FileChange::Ignored);
        }

        let scan = self.guard_cancelled(|scanner| scanner.scan_paths(std::slice::from_ref(&path)))?;
        let session = self.session.as_mut().ok_or(Error::NoSession)?;
        let report = session.compiler.commit(&mut session.instance, &scan)?;
        if report.changed() {
            session.css = session.instance.serialize()?;
        }
        log_scan(scan.report());
        self.last_scan = Some(scan.report().clone());

        tracing::debug!(target: targets::ADAPTER, path = %path.display(), new = report.new_entries, "incremental commit");
        Ok(FileChange::Incremental(report))
    }

    /// The live instance and its exports.
    pub fn resolve_virtual_module(&self) -> Result<VirtualModule<'_>> {
        self.session
            .as_ref()
            .map(|s| VirtualModule::new(&s.instance))
            .ok_or(Error::NoSession)
    }

    /// The CSS of the current session.
    pub fn css(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.css.as_str())
    }

    /// The session cache of the current session.
    pub fn session_cache(&self) -> Option<&SessionCache> {
        self.session.as_ref().map(|s| s.compiler.cache())
    }

    /// The report of the most recent scan.
    pub fn last_scan(&self) -> Option<&ScanReport> {
        self.last_scan.as_ref()
    }

    /// Write the current CSS to the configured output. Returns the path
    /// written, or `None` when no output is configured.
    pub fn write_output(&self) -> Result<Option<PathBuf>> {
        let css = self.css().ok_or(Error::NoSession)?;
        let Some(output) = &self.config.output else {
            return Ok(None);
        };

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        fs::write(output, css).map_err(|e| Error::io(output, e))?;
        tracing::info!(target: targets::ADAPTER, path = %output.display(), bytes = css.len(), "wrote CSS");
        Ok(Some(output.clone()))
    }

    fn cold_session(&mut self, entry: &dyn ConfigEntry) -> Result<Session> {
        let mode = self.config.effective_mode();
        tracing::info!(target: targets::ADAPTER, config = entry.name(), ?mode, "cold compile");

        let mut instance = entry.evaluate(mode)?;
        let mut compiler = IncrementalCompiler::new();
        if mode == EmitMode::OnDemand {
            let scan = self.guard_cancelled(Scanner::scan)?;
            compiler.commit(&mut instance, &scan)?;
            log_scan(scan.report());
            self.last_scan = Some(scan.report().clone());
        }

        let css = instance.serialize()?;
        for warning in instance.warnings() {
            tracing::warn!(target: targets::ADAPTER, config = entry.name(), "{warning}");
        }

        let config_path = self.config.config_path.clone().or_else(|| entry.source_path().map(Path::to_path_buf));
        Ok(Session {
            instance,
            compiler,
            css,
            config_hash: config_hash(config_path.as_deref()),
        })
    }

    fn guard_cancelled<T>(&self, scan: impl FnOnce(&Scanner) -> Result<T>) -> Result<T> {
        let result = scan(&self.scanner);
        if matches!(result, Err(Error::Cancelled)) {
            self.scanner.cancellation().reset();
        }
        result
    }

    fn is_config_path(&self, path: &Path) -> bool {
        self.config_paths()
            .into_iter()
            .any(|candidate| self.scanner.resolve_path(candidate) == path)
    }
}

impl std::fmt::Debug for BuildAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildAdapter")
            .field("config", &self.config)
            .field("compiled", &self.session.is_some())
            .finish_non_exhaustive()
    }
}

fn config_hash(path: Option<&Path>) -> Option<u64> {
    let content = fs::read(path?).ok()?;
    Some(hash_content(&content))
}

fn log_scan(report: &ScanReport) {
    for warning in &report.warnings {
        tracing::warn!(target: targets::ADAPTER, "{warning}");
    }
}
