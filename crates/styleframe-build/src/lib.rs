//! Build pipeline for Styleframe.
//!
//! This crate connects a Styleframe config to a host bundler:
//!
//! - **Scanner**: finds class-name tokens in content files, with a per-file
//!   fingerprint cache
//! - **Incremental compiler**: commits discovered tokens to the engine through
//!   a monotonic session cache
//! - **Build adapter**: cold compiles, file-change handling, the virtual
//!   module and CSS output
//!
//! # Example
//!
//! ```
//! use styleframe_build::{BuildAdapter, BuildConfig, FnConfig};
//! use styleframe_core::prelude::*;
//!
//! let dir = tempfile::tempdir().unwrap();
//! std::fs::create_dir(dir.path().join("src")).unwrap();
//! std::fs::write(dir.path().join("src/App.vue"), r#"<span class="badge">1</span>"#).unwrap();
//!
//! let config = BuildConfig::default()
//!     .with_root(dir.path())
//!     .with_content(["./src/**/*.vue"]);
//! let mut adapter = BuildAdapter::new(config).unwrap();
//!
//! let css = adapter
//!     .compile(FnConfig::new("app", |sf| {
//!         sf.recipe(RecipeDefinition::new("badge").base(DeclarationBlock::new().with("display", "inline-flex")))?;
//!         sf.recipe(RecipeDefinition::new("card").base(DeclarationBlock::new().with("padding", "1rem")))?;
//!         Ok(())
//!     }))
//!     .unwrap();
//!
//! assert!(css.contains(".badge { display: inline-flex; }"));
//! assert!(!css.contains(".card"));
//! ```

pub mod adapter;
pub mod compiler;
pub mod config;
pub mod logging;
pub mod scanner;

#[cfg(feature = "hot-reload")]
pub mod hot_reload;

mod error;

pub use adapter::{BuildAdapter, ConfigEntry, FileChange, FnConfig, ModuleManifest, VirtualModule};
pub use compiler::{CommitReport, IncrementalCompiler, SessionCache};
pub use config::{BuildConfig, Mode};
pub use error::{Error, Result};
pub use scanner::{CancellationToken, ScanReport, ScanResult, ScanWarning, Scanner};

#[cfg(feature = "hot-reload")]
pub use hot_reload::{ChangeKind, ContentChangeEvent, ContentWatcher};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::{BuildAdapter, BuildConfig, ConfigEntry, FileChange, FnConfig, Mode, Scanner};
    pub use crate::{CommitReport, IncrementalCompiler, SessionCache};
}
