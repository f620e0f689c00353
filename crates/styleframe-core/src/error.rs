//! Error types for the Styleframe core.

use crate::tokens::ResolveError;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort the current compile.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A reference names a variable that is not declared in any visible scope.
    #[error("Unresolved reference '{name}' in config '{config}' at {path}")]
    UnresolvedReference {
        name: String,
        config: String,
        path: String,
    },

    /// Variables reference each other in a loop.
    #[error("Cyclic reference in config '{config}' at {path}: {}", .chain.join(" -> "))]
    CyclicReference {
        chain: Vec<String>,
        config: String,
        path: String,
    },

    /// A recipe was resolved with a dimension or option it does not declare.
    #[error("Invalid variant combination for recipe '{recipe}': {}", describe_variant(.dimension, .option.as_deref()))]
    InvalidVariantCombination {
        recipe: String,
        dimension: String,
        option: Option<String>,
    },

    /// A utility or recipe definition is malformed.
    #[error("Invalid {what} definition: {message}")]
    InvalidDefinition { what: String, message: String },

    /// A container handle does not belong to this document.
    #[error("Unknown container: {0}")]
    UnknownContainer(String),

    /// A generator handle does not belong to this instance.
    #[error("Unknown generator #{0}")]
    UnknownGenerator(usize),

    /// Raw CSS could not be parsed.
    #[error("CSS parse error at line {line}, column {column}: {message}")]
    Parse {
        message: String,
        line: u32,
        column: u32,
    },
}

fn describe_variant(dimension: &str, option: Option<&str>) -> String {
    match option {
        Some(option) => format!("unknown option '{option}' for dimension '{dimension}'"),
        None => format!("unknown dimension '{dimension}'"),
    }
}

impl Error {
    /// Attach config name and declaration path to a resolution failure.
    pub fn from_resolve(err: ResolveError, config: impl Into<String>, path: impl Into<String>) -> Self {
        match err {
            ResolveError::Unresolved(name) => Self::UnresolvedReference {
                name,
                config: config.into(),
                path: path.into(),
            },
            ResolveError::Cycle(chain) => Self::CyclicReference {
                chain,
                config: config.into(),
                path: path.into(),
            },
        }
    }

    /// Create an invalid definition error.
    pub fn invalid_definition(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            what: what.into(),
            message: message.into(),
        }
    }

    /// Create an unknown dimension error.
    pub fn unknown_dimension(recipe: impl Into<String>, dimension: impl Into<String>) -> Self {
        Self::InvalidVariantCombination {
            recipe: recipe.into(),
            dimension: dimension.into(),
            option: None,
        }
    }

    /// Create an unknown option error.
    pub fn unknown_option(
        recipe: impl Into<String>,
        dimension: impl Into<String>,
        option: impl Into<String>,
    ) -> Self {
        Self::InvalidVariantCombination {
            recipe: recipe.into(),
            dimension: dimension.into(),
            option: Some(option.into()),
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self::Parse {
            message: message.into(),
            line,
            column,
        }
    }
}
