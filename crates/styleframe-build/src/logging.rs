//! Tracing targets used by the Styleframe build pipeline.
//!
//! ```ignore
//! RUST_LOG=styleframe_build::scanner=debug,styleframe_build::adapter=info
//! ```

/// Target names for log filtering.
pub mod targets {
    /// Content discovery and token extraction.
    pub const SCANNER: &str = "styleframe_build::scanner";
    /// Session cache commits.
    pub const COMPILER: &str = "styleframe_build::compiler";
    /// Build adapter lifecycle.
    pub const ADAPTER: &str = "styleframe_build::adapter";
    /// Content watching.
    pub const HOT_RELOAD: &str = "styleframe_build::hot_reload";
}
