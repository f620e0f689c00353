//! Recipe definitions as written by a config.

use crate::tree::DeclarationBlock;

/// One variant dimension and its options, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDimension {
    /// Dimension name, e.g. `size`.
    pub name: String,
    /// `(option, styles)` pairs, e.g. `("sm", …)`.
    pub options: Vec<(String, DeclarationBlock)>,
}

/// Styles applied only when every listed `(dimension, option)` is selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundVariant {
    /// The keys that must all be selected.
    pub keys: Vec<(String, String)>,
    /// Styles of the compound class.
    pub styles: DeclarationBlock,
}

/// A base style plus enumerated variant dimensions and compound overrides.
///
/// # Example
///
/// ```
/// use styleframe_core::prelude::*;
///
/// let button = RecipeDefinition::new("button")
///     .base(DeclarationBlock::new().with("display", "inline-block"))
///     .variant("size", [
///         ("sm", DeclarationBlock::new().with("padding", "2px 4px")),
///         ("lg", DeclarationBlock::new().with("padding", "8px 16px")),
///     ])
///     .compound([("size", "lg")], DeclarationBlock::new().with("font-weight", "600"));
///
/// assert_eq!(button.variants.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipeDefinition {
    /// Recipe name; also the base class.
    pub name: String,
    /// Base declarations.
    pub base: DeclarationBlock,
    /// Variant dimensions.
    pub variants: Vec<VariantDimension>,
    /// Compound variants, in declaration order.
    pub compound_variants: Vec<CompoundVariant>,
    /// Options applied for dimensions the caller does not select.
    pub default_variants: Vec<(String, String)>,
}

impl RecipeDefinition {
    /// Start a recipe.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the base declarations.
    pub fn base(mut self, base: DeclarationBlock) -> Self {
        self.base = base;
        self
    }

    /// Add a variant dimension.
    pub fn variant<N, O, S>(mut self, name: N, options: O) -> Self
    where
        N: Into<String>,
        O: IntoIterator<Item = (S, DeclarationBlock)>,
        S: Into<String>,
    {
        self.variants.push(VariantDimension {
            name: name.into(),
            options: options.into_iter().map(|(o, styles)| (o.into(), styles)).collect(),
        });
        self
    }

    /// Add a compound variant.
    pub fn compound<K, D, P>(mut self, keys: K, styles: DeclarationBlock) -> Self
    where
        K: IntoIterator<Item = (D, P)>,
        D: Into<String>,
        P: Into<String>,
    {
        self.compound_variants.push(CompoundVariant {
            keys: keys.into_iter().map(|(d, o)| (d.into(), o.into())).collect(),
            styles,
        });
        self
    }

    /// Set the default option for a dimension.
    pub fn default_variant(mut self, dimension: impl Into<String>, option: impl Into<String>) -> Self {
        let dimension = dimension.into();
        let option = option.into();
        match self.default_variants.iter_mut().find(|(d, _)| *d == dimension) {
            Some(entry) => entry.1 = option,
            None => self.default_variants.push((dimension, option)),
        }
        self
    }
}
