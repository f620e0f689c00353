//! Build configuration loaded from TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use styleframe_core::EmitMode;

use crate::{Error, Result};

/// When the compiler generates utility and recipe classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Emit every class at registration.
    Eager,
    /// Emit only classes found in content.
    OnDemand,
}

impl From<Mode> for EmitMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Eager => EmitMode::Eager,
            Mode::OnDemand => EmitMode::OnDemand,
        }
    }
}

/// Settings of one build.
///
/// # Example
///
/// ```
/// use styleframe_build::BuildConfig;
///
/// let config = BuildConfig::from_toml_str(r#"
///     content = ["./src/**/*.vue"]
///     output = "dist/styles.css"
/// "#).unwrap();
///
/// assert_eq!(config.content, vec!["./src/**/*.vue"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct BuildConfig {
    /// Ordered glob patterns of content files.
    pub content: Vec<String>,
    /// Directory the patterns are relative to.
    pub root: PathBuf,
    /// Where [`write_output`](crate::BuildAdapter::write_output) puts the CSS.
    pub output: Option<PathBuf>,
    /// Emit mode; see [`effective_mode`](Self::effective_mode).
    pub mode: Option<Mode>,
    /// The config entry file. A change to it forces a cold rebuild.
    pub config_path: Option<PathBuf>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            root: PathBuf::from("."),
            output: None,
            mode: None,
            config_path: None,
        }
    }
}

impl BuildConfig {
    /// Parse a config from TOML text. Paths stay as written.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::config("<inline>", e.to_string()))
    }

    /// Load a config file. Relative paths are resolved against its directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let mut config: Self = toml::from_str(&text).map_err(|e| Error::config(path, e.to_string()))?;

        let base = path.parent().unwrap_or(Path::new("."));
        config.root = base.join(&config.root);
        config.output = config.output.map(|p| base.join(p));
        config.config_path = config.config_path.map(|p| base.join(p));

        tracing::debug!(
            target: crate::logging::targets::ADAPTER,
            path = %path.display(),
            patterns = config.content.len(),
            "loaded build config"
        );
        Ok(config)
    }

    /// The configured mode, or on-demand when content patterns are given and
    /// eager otherwise.
    pub fn effective_mode(&self) -> EmitMode {
        match self.mode {
            Some(mode) => mode.into(),
            None if self.content.is_empty() => EmitMode::Eager,
            None => EmitMode::OnDemand,
        }
    }

    /// Builder-style content patterns.
    pub fn with_content<S: Into<String>>(mut self, patterns: impl IntoIterator<Item = S>) -> Self {
        self.content = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style root directory.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Builder-style output path.
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Builder-style mode.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Builder-style config entry path.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }
}
