//! Recoverable conditions reported while building a document.

use std::fmt;

/// A non-fatal problem. Compilation continues with best-effort output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A merged selector received a second, different value for a property.
    /// The later value wins.
    DuplicateSelectorConflict { selector: String, property: String },
    /// A compound variant repeats the key set of an earlier one and was ignored.
    DuplicateCompoundVariant { recipe: String, class: String },
    /// A raw declaration could not be parsed and was skipped.
    MalformedDeclaration { text: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateSelectorConflict { selector, property } => {
                write!(f, "'{property}' redeclared on '{selector}', later value wins")
            }
            Self::DuplicateCompoundVariant { recipe, class } => {
                write!(f, "duplicate compound variant '{class}' in recipe '{recipe}' ignored")
            }
            Self::MalformedDeclaration { text } => {
                write!(f, "skipped malformed declaration '{text}'")
            }
        }
    }
}
