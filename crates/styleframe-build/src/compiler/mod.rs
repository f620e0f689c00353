//! Incremental on-demand compilation.

mod cache;
mod incremental;

pub use cache::SessionCache;
pub use incremental::{CommitReport, IncrementalCompiler};
