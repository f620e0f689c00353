//! CSS emission.
//!
//! The serializer walks the document tree in insertion order, resolves every
//! reference through the token graph and writes nested `@media` and
//! `@keyframes` blocks. Output depends only on the tree, so serializing an
//! unchanged tree twice yields identical bytes.

mod selector;
mod writer;

pub use selector::{nest, split_list};

use crate::tokens::TokenGraph;
use crate::tree::Document;
use crate::Result;

/// Output formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Indentation for each block level.
    pub indent: String,
    /// Put a blank line between top-level rules.
    pub newline_between_rules: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            newline_between_rules: false,
        }
    }
}

/// Serialize `document`, resolving references against `tokens`.
///
/// `config` names the config in error reports.
pub fn serialize(document: &Document, tokens: &TokenGraph, config: &str, options: &SerializeOptions) -> Result<String> {
    let css = writer::CssWriter::new(document, tokens, config, options).write()?;
    tracing::debug!(target: crate::logging::targets::SERIALIZE, bytes = css.len(), "serialized document");
    Ok(css)
}
