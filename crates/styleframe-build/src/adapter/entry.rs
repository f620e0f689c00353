//! Config entry points.

use std::fmt;
use std::path::{Path, PathBuf};

use styleframe_core::{EmitMode, Styleframe};

/// Something that evaluates to a populated engine instance.
///
/// Every evaluation must start from scratch; the adapter calls it again for
/// each cold rebuild.
pub trait ConfigEntry: Send {
    /// Config name, used in error reports.
    fn name(&self) -> &str;

    /// The file the config was loaded from, if any.
    fn source_path(&self) -> Option<&Path> {
        None
    }

    /// Build a fresh instance in `mode`.
    fn evaluate(&self, mode: EmitMode) -> styleframe_core::Result<Styleframe>;
}

/// A config entry backed by a closure that populates the instance.
///
/// # Example
///
/// ```
/// use styleframe_build::{ConfigEntry, FnConfig};
/// use styleframe_core::EmitMode;
///
/// let entry = FnConfig::new("theme", |sf| {
///     sf.declare("primary", "blue");
///     Ok(())
/// });
/// let sf = entry.evaluate(EmitMode::Eager).unwrap();
/// assert_eq!(sf.name(), "theme");
/// ```
pub struct FnConfig<F> {
    name: String,
    source_path: Option<PathBuf>,
    build: F,
}

impl<F> FnConfig<F>
where
    F: Fn(&mut Styleframe) -> styleframe_core::Result<()> + Send,
{
    pub fn new(name: impl Into<String>, build: F) -> Self {
        Self {
            name: name.into(),
            source_path: None,
            build,
        }
    }

    /// Record the file this config comes from.
    pub fn with_source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }
}

impl<F> ConfigEntry for FnConfig<F>
where
    F: Fn(&mut Styleframe) -> styleframe_core::Result<()> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    fn evaluate(&self, mode: EmitMode) -> styleframe_core::Result<Styleframe> {
        let mut instance = Styleframe::new(self.name.clone()).with_mode(mode);
        (self.build)(&mut instance)?;
        Ok(instance)
    }
}

impl<F> fmt::Debug for FnConfig<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnConfig")
            .field("name", &self.name)
            .field("source_path", &self.source_path)
            .finish_non_exhaustive()
    }
}
