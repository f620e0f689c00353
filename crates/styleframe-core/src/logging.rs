//! Tracing targets used by the Styleframe core.
//!
//! Styleframe uses the `tracing` crate for instrumentation and never installs
//! a subscriber itself. Filter per subsystem with these targets:
//!
//! ```ignore
//! RUST_LOG=styleframe_core::tree=warn,styleframe_core::serialize=debug
//! ```

/// Target names for log filtering.
pub mod targets {
    /// Token graph declarations and resolution.
    pub const TOKENS: &str = "styleframe_core::tokens";
    /// Document tree construction and selector merging.
    pub const TREE: &str = "styleframe_core::tree";
    /// Utility and recipe generators.
    pub const GENERATOR: &str = "styleframe_core::generator";
    /// Raw CSS parsing.
    pub const PARSER: &str = "styleframe_core::parser";
    /// CSS serialization.
    pub const SERIALIZE: &str = "styleframe_core::serialize";
}
