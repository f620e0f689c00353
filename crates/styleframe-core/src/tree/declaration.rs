//! Ordered declaration blocks.

use crate::value::Value;

/// A single `property: value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Normalized (kebab-case) property name.
    pub property: String,
    /// The value, resolved at serialization time.
    pub value: Value,
}

/// Outcome of setting a property on a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetOutcome {
    /// The property was not present before.
    Inserted,
    /// The property was present with the same value.
    Unchanged,
    /// The property was present with a different value, which was replaced.
    Overridden(Value),
}

/// Declarations in insertion order with last-write-wins per property.
///
/// Redeclaring a property replaces its value in place, so a property keeps
/// the position of its first declaration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeclarationBlock {
    entries: Vec<Declaration>,
}

impl DeclarationBlock {
    /// Create an empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, property: impl AsRef<str>, value: impl Into<Value>) -> Self {
        self.set(property, value);
        self
    }

    /// Set a property.
    pub fn set(&mut self, property: impl AsRef<str>, value: impl Into<Value>) -> SetOutcome {
        let property = normalize_property(property.as_ref());
        let value = value.into();

        match self.entries.iter_mut().find(|d| d.property == property) {
            Some(existing) if existing.value == value => SetOutcome::Unchanged,
            Some(existing) => SetOutcome::Overridden(std::mem::replace(&mut existing.value, value)),
            None => {
                self.entries.push(Declaration { property, value });
                SetOutcome::Inserted
            }
        }
    }

    /// Merge another block into this one. Returns the properties whose value
    /// changed.
    pub fn merge(&mut self, other: DeclarationBlock) -> Vec<String> {
        let mut overridden = vec![];
        for declaration in other.entries {
            let property = declaration.property.clone();
            if let SetOutcome::Overridden(_) = self.set(&property, declaration.value) {
                overridden.push(property);
            }
        }
        overridden
    }

    /// Get a property value.
    pub fn get(&self, property: &str) -> Option<&Value> {
        let property = normalize_property(property);
        self.entries
            .iter()
            .find(|d| d.property == property)
            .map(|d| &d.value)
    }

    /// Iterate declarations in order.
    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.entries.iter()
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the block is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<P: AsRef<str>, V: Into<Value>> FromIterator<(P, V)> for DeclarationBlock {
    fn from_iter<I: IntoIterator<Item = (P, V)>>(iter: I) -> Self {
        let mut block = Self::new();
        for (property, value) in iter {
            block.set(property, value);
        }
        block
    }
}

/// Normalize a property name to kebab-case.
///
/// Custom properties (`--x`) are kept verbatim; `backgroundColor` becomes
/// `background-color`.
pub fn normalize_property(name: &str) -> String {
    let name = name.trim();
    if name.starts_with("--") || !name.chars().any(|c| c.is_ascii_uppercase()) {
        return name.to_string();
    }

    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_declaration_overrides_in_place() {
        let mut block = DeclarationBlock::new()
            .with("color", "red")
            .with("padding", "4px");

        let outcome = block.set("color", "blue");
        assert_eq!(outcome, SetOutcome::Overridden(Value::from("red")));

        let props: Vec<&str> = block.iter().map(|d| d.property.as_str()).collect();
        assert_eq!(props, vec!["color", "padding"]);
        assert_eq!(block.get("color"), Some(&Value::from("blue")));
    }

    #[test]
    fn identical_value_is_unchanged() {
        let mut block = DeclarationBlock::new().with("color", "red");
        assert_eq!(block.set("color", "red"), SetOutcome::Unchanged);
    }

    #[test]
    fn merge_reports_overrides_only() {
        let mut block = DeclarationBlock::new().with("color", "red").with("margin", "0");
        let other = DeclarationBlock::new()
            .with("color", "blue")
            .with("margin", "0")
            .with("display", "flex");

        assert_eq!(block.merge(other), vec!["color".to_string()]);
        assert_eq!(block.len(), 3);
    }

    #[test]
    fn property_names_are_normalized() {
        assert_eq!(normalize_property("backgroundColor"), "background-color");
        assert_eq!(normalize_property("border-top-width"), "border-top-width");
        assert_eq!(normalize_property("--tokenName"), "--tokenName");

        let block = DeclarationBlock::new().with("fontSize", "12px");
        assert!(block.get("font-size").is_some());
    }
}
