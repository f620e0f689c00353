//! Utility definitions and registration handles.

use std::fmt;
use std::sync::Arc;

use super::{ValueTable, class_name};
use crate::generator::GeneratorId;
use crate::instance::Styleframe;
use crate::tree::{ContainerId, DeclarationBlock};
use crate::value::Value;
use crate::Result;

/// The entry a style function is invoked with.
#[derive(Debug, Clone, Copy)]
pub struct UtilityValue<'a> {
    /// The suffix being generated.
    pub key: &'a str,
    /// The table value for that suffix.
    pub value: &'a Value,
}

/// Maps a table entry to the declarations of its selector.
pub type StyleFn = Arc<dyn Fn(&UtilityValue<'_>) -> DeclarationBlock + Send + Sync>;

/// A single-property, table-driven class generator.
///
/// Immutable once registered with a [`Styleframe`].
///
/// # Example
///
/// ```
/// use styleframe_core::prelude::*;
///
/// let margin = UtilityDefinition::new("margin", |v: &UtilityValue<'_>| {
///     DeclarationBlock::new().with("margin", v.value)
/// })
/// .with_defaults(ValueTable::new().with("sm", "4px").with("md", "8px"));
///
/// assert_eq!(margin.class_name("sm"), "margin:sm");
/// ```
#[derive(Clone)]
pub struct UtilityDefinition {
    name: String,
    prefix: String,
    defaults: ValueTable,
    style_fn: StyleFn,
}

impl UtilityDefinition {
    /// Create a utility whose class prefix is its name.
    pub fn new<F>(name: impl Into<String>, style_fn: F) -> Self
    where
        F: Fn(&UtilityValue<'_>) -> DeclarationBlock + Send + Sync + 'static,
    {
        let name = name.into();
        Self {
            prefix: name.clone(),
            name,
            defaults: ValueTable::new(),
            style_fn: Arc::new(style_fn),
        }
    }

    /// Create a utility that sets a single property to the table value.
    pub fn property(name: impl Into<String>, property: impl Into<String>) -> Self {
        let property = property.into();
        Self::new(name, move |v: &UtilityValue<'_>| {
            DeclarationBlock::new().with(&property, v.value)
        })
    }

    /// Set the table used when `use` is called without a config.
    pub fn with_defaults(mut self, defaults: ValueTable) -> Self {
        self.defaults = defaults;
        self
    }

    /// Override the class name prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// The utility name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The class name prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The default value table.
    pub fn defaults(&self) -> &ValueTable {
        &self.defaults
    }

    /// The class generated for `suffix`.
    pub fn class_name(&self, suffix: &str) -> String {
        class_name(&self.prefix, suffix)
    }

    /// Declarations of the selector for one table entry.
    pub fn declarations(&self, key: &str, value: &Value) -> DeclarationBlock {
        (self.style_fn)(&UtilityValue { key, value })
    }
}

impl fmt::Debug for UtilityDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UtilityDefinition")
            .field("name", &self.name)
            .field("prefix", &self.prefix)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

/// Handle returned by registering a utility; calling [`apply`](Self::apply)
/// is the `use(s, config?)` registration function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtilityHandle(pub(crate) GeneratorId);

impl UtilityHandle {
    /// The generator identity.
    pub fn id(self) -> GeneratorId {
        self.0
    }

    /// Apply the utility with `config`, or its defaults when `None`.
    pub fn apply(self, sf: &mut Styleframe, config: Option<&ValueTable>) -> Result<UtilityBindings> {
        sf.use_utility(self, config)
    }
}

/// One generated class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtilityBinding {
    /// The table suffix.
    pub suffix: String,
    /// The generated class name.
    pub class_name: String,
    /// The emitted selector; `None` until generated in on-demand mode.
    pub container: Option<ContainerId>,
}

/// The suffix → class bindings produced by one `use` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UtilityBindings {
    entries: Vec<UtilityBinding>,
}

impl UtilityBindings {
    pub(crate) fn push(&mut self, binding: UtilityBinding) {
        self.entries.push(binding);
    }

    /// The binding for `suffix`.
    pub fn get(&self, suffix: &str) -> Option<&UtilityBinding> {
        self.entries.iter().find(|b| b.suffix == suffix)
    }

    /// Iterate bindings in table order.
    pub fn iter(&self) -> impl Iterator<Item = &UtilityBinding> {
        self.entries.iter()
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no binding was produced.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
