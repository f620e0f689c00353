//! Declaration values: literals, lazy references and composites.

use std::fmt;

/// A lazy, name-based pointer into the token graph.
///
/// Creating a reference never touches the graph; the name is looked up only
/// when the document is serialized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Reference {
    name: String,
}

impl Reference {
    /// Create a reference to the variable `name`. A leading `--` is ignored.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let name = match name.strip_prefix("--") {
            Some(stripped) => stripped.to_string(),
            None => name,
        };
        Self { name }
    }

    /// The referenced variable name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ref({})", self.name)
    }
}

/// Create a [`Reference`] to a variable by name.
pub fn reference(name: impl Into<String>) -> Reference {
    Reference::new(name)
}

/// One piece of a composite value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Literal text, emitted verbatim.
    Text(String),
    /// A reference, replaced by the resolved variable value.
    Ref(Reference),
}

impl From<&str> for Fragment {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Fragment {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Reference> for Fragment {
    fn from(reference: Reference) -> Self {
        Self::Ref(reference)
    }
}

impl From<&Reference> for Fragment {
    fn from(reference: &Reference) -> Self {
        Self::Ref(reference.clone())
    }
}

/// An ordered sequence of literal fragments and references.
///
/// Interpolation order is preserved; the composite resolves to the
/// concatenation of its resolved fragments.
///
/// # Example
///
/// ```
/// use styleframe_core::{Fragment, css, reference};
///
/// let border = css([Fragment::from("1px solid "), Fragment::from(reference("color--border"))]);
/// assert_eq!(border.fragments().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Composite {
    fragments: Vec<Fragment>,
}

impl Composite {
    /// Create an empty composite.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append literal text.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.fragments.push(Fragment::Text(text.into()));
        self
    }

    /// Append a reference.
    pub fn reference(mut self, reference: Reference) -> Self {
        self.fragments.push(Fragment::Ref(reference));
        self
    }

    /// Append any fragment.
    pub fn push(&mut self, fragment: impl Into<Fragment>) {
        self.fragments.push(fragment.into());
    }

    /// The fragments in interpolation order.
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Whether the composite has no fragments.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

impl FromIterator<Fragment> for Composite {
    fn from_iter<I: IntoIterator<Item = Fragment>>(iter: I) -> Self {
        Self {
            fragments: iter.into_iter().collect(),
        }
    }
}

/// Build a composite value from fragments.
pub fn css(fragments: impl IntoIterator<Item = Fragment>) -> Composite {
    fragments.into_iter().collect()
}

/// The value of a declaration or variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Literal CSS text.
    Literal(String),
    /// A reference to a variable.
    Ref(Reference),
    /// Interpolated text and references.
    Composite(Composite),
}

impl Value {
    /// Create a literal value.
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    /// The literal text, if this is a literal.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(text) => Some(text),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Literal(String::new())
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Literal(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Literal(text)
    }
}

impl From<&String> for Value {
    fn from(text: &String) -> Self {
        Self::Literal(text.clone())
    }
}

impl From<Reference> for Value {
    fn from(reference: Reference) -> Self {
        Self::Ref(reference)
    }
}

impl From<&Reference> for Value {
    fn from(reference: &Reference) -> Self {
        Self::Ref(reference.clone())
    }
}

impl From<Composite> for Value {
    fn from(composite: Composite) -> Self {
        Self::Composite(composite)
    }
}

impl From<&Value> for Value {
    fn from(value: &Value) -> Self {
        value.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_strips_custom_property_prefix() {
        assert_eq!(reference("--color--primary").name(), "color--primary");
        assert_eq!(reference("color--primary").name(), "color--primary");
    }

    #[test]
    fn composite_preserves_interpolation_order() {
        let value = Composite::new()
            .text("0 0 ")
            .reference(reference("shadow-blur"))
            .text(" ")
            .reference(reference("shadow-color"));

        let kinds: Vec<bool> = value
            .fragments()
            .iter()
            .map(|f| matches!(f, Fragment::Ref(_)))
            .collect();
        assert_eq!(kinds, vec![false, true, false, true]);
    }

    #[test]
    fn conversions() {
        assert_eq!(Value::from("red").as_literal(), Some("red"));
        assert!(matches!(Value::from(reference("x")), Value::Ref(_)));
    }
}
