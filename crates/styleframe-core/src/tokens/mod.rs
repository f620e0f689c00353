//! Design tokens: scoped variables and lazy reference resolution.

mod graph;

pub use graph::{ResolveError, TokenGraph, Variable};
