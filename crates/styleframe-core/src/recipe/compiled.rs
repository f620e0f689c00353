//! Compiled recipes: a tagged-variant decision table.

use super::RecipeDefinition;
use crate::logging::targets;
use crate::tree::DeclarationBlock;
use crate::warning::Warning;
use crate::{Error, Result};

/// One option of a dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeOption {
    /// Option name.
    pub name: String,
    /// Class applied when the option is selected.
    pub class_name: String,
    /// Styles of that class.
    pub styles: DeclarationBlock,
}

/// A variant dimension with its enumerated options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    /// Dimension name.
    pub name: String,
    /// Options in declaration order.
    pub options: Vec<RecipeOption>,
}

/// An exact-match compound rule, keys as `(dimension, option)` indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundRule {
    /// Required selections, sorted by dimension index.
    pub keys: Vec<(usize, usize)>,
    /// Class applied on a full match.
    pub class_name: String,
    /// Styles of that class.
    pub styles: DeclarationBlock,
}

/// A class a recipe can emit, with its position in emission order.
#[derive(Debug, Clone, Copy)]
pub struct RecipeClass<'a> {
    /// Position in emission order.
    pub ordinal: usize,
    /// The class name.
    pub class_name: &'a str,
    /// Its declarations.
    pub styles: &'a DeclarationBlock,
}

/// A compiled recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    name: String,
    base: DeclarationBlock,
    dimensions: Vec<Dimension>,
    compounds: Vec<CompoundRule>,
    defaults: Vec<Option<usize>>,
}

impl Recipe {
    /// Validate a definition and build its decision table.
    ///
    /// A compound variant repeating the key set of an earlier one is ignored
    /// and reported as a warning.
    pub fn compile(def: RecipeDefinition) -> Result<(Self, Vec<Warning>)> {
        let name = def.name.trim().to_string();
        if name.is_empty() {
            return Err(Error::invalid_definition("recipe", "name must not be empty"));
        }

        let mut dimensions: Vec<Dimension> = Vec::with_capacity(def.variants.len());
        for variant in def.variants {
            if dimensions.iter().any(|d| d.name == variant.name) {
                return Err(Error::invalid_definition(
                    "recipe",
                    format!("'{name}' declares dimension '{}' twice", variant.name),
                ));
            }

            let mut options: Vec<RecipeOption> = Vec::with_capacity(variant.options.len());
            for (option, styles) in variant.options {
                if options.iter().any(|o| o.name == option) {
                    return Err(Error::invalid_definition(
                        "recipe",
                        format!("'{name}' declares option '{option}' of '{}' twice", variant.name),
                    ));
                }
                options.push(RecipeOption {
                    class_name: format!("{name}--{}-{option}", variant.name),
                    name: option,
                    styles,
                });
            }

            dimensions.push(Dimension {
                name: variant.name,
                options,
            });
        }

        let mut recipe = Self {
            defaults: vec![None; dimensions.len()],
            name,
            base: def.base,
            dimensions,
            compounds: vec![],
        };

        for (dimension, option) in &def.default_variants {
            let (d, o) = recipe
                .locate(dimension, option)
                .map_err(|e| Error::invalid_definition("recipe", format!("default variant: {e}")))?;
            recipe.defaults[d] = Some(o);
        }

        let mut warnings = vec![];
        for compound in def.compound_variants {
            if compound.keys.is_empty() {
                return Err(Error::invalid_definition(
                    "recipe",
                    format!("'{}' has a compound variant without keys", recipe.name),
                ));
            }

            let mut keys = Vec::with_capacity(compound.keys.len());
            for (dimension, option) in &compound.keys {
                let key = recipe
                    .locate(dimension, option)
                    .map_err(|e| Error::invalid_definition("recipe", format!("compound variant: {e}")))?;
                if keys.iter().any(|(d, _)| *d == key.0) {
                    return Err(Error::invalid_definition(
                        "recipe",
                        format!("compound variant lists dimension '{dimension}' twice"),
                    ));
                }
                keys.push(key);
            }
            keys.sort_unstable();

            let class_name = recipe.compound_class(&keys);
            if recipe.compounds.iter().any(|c| c.keys == keys) {
                tracing::warn!(
                    target: targets::GENERATOR,
                    recipe = %recipe.name,
                    class = %class_name,
                    "duplicate compound variant ignored"
                );
                warnings.push(Warning::DuplicateCompoundVariant {
                    recipe: recipe.name.clone(),
                    class: class_name,
                });
                continue;
            }

            recipe.compounds.push(CompoundRule {
                keys,
                class_name,
                styles: compound.styles,
            });
        }

        Ok((recipe, warnings))
    }

    /// The recipe name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The base class, always first in a resolved class list.
    pub fn base_class(&self) -> &str {
        &self.name
    }

    /// Base declarations.
    pub fn base(&self) -> &DeclarationBlock {
        &self.base
    }

    /// Dimensions in declaration order.
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Compound rules in declaration order.
    pub fn compounds(&self) -> &[CompoundRule] {
        &self.compounds
    }

    /// The default option of each dimension, by index.
    pub fn defaults(&self) -> &[Option<usize>] {
        &self.defaults
    }

    /// Resolve a selection to the ordered class list.
    ///
    /// The base class comes first, then every fully matched compound class in
    /// declaration order, then the selected option class of each dimension in
    /// dimension order. Unselected dimensions fall back to their default.
    /// Selecting a dimension twice keeps the later option.
    pub fn resolve<D, O>(&self, selection: impl IntoIterator<Item = (D, O)>) -> Result<Vec<String>>
    where
        D: AsRef<str>,
        O: AsRef<str>,
    {
        let mut chosen = self.defaults.clone();
        for (dimension, option) in selection {
            let (d, o) = self.locate(dimension.as_ref(), option.as_ref())?;
            chosen[d] = Some(o);
        }

        let mut classes = vec![self.name.clone()];
        for compound in &self.compounds {
            if compound.keys.iter().all(|&(d, o)| chosen[d] == Some(o)) {
                classes.push(compound.class_name.clone());
            }
        }
        for (dimension, choice) in self.dimensions.iter().zip(&chosen) {
            if let Some(o) = choice {
                classes.push(dimension.options[*o].class_name.clone());
            }
        }
        Ok(classes)
    }

    /// Every class the recipe can emit, in emission order: base, options in
    /// dimension/option order, then compounds.
    pub fn classes(&self) -> Vec<RecipeClass<'_>> {
        let mut out = vec![RecipeClass {
            ordinal: 0,
            class_name: &self.name,
            styles: &self.base,
        }];

        let options = self.dimensions.iter().flat_map(|d| d.options.iter());
        for option in options {
            out.push(RecipeClass {
                ordinal: out.len(),
                class_name: &option.class_name,
                styles: &option.styles,
            });
        }
        for compound in &self.compounds {
            out.push(RecipeClass {
                ordinal: out.len(),
                class_name: &compound.class_name,
                styles: &compound.styles,
            });
        }
        out
    }

    fn locate(&self, dimension: &str, option: &str) -> Result<(usize, usize)> {
        let d = self
            .dimensions
            .iter()
            .position(|dim| dim.name == dimension)
            .ok_or_else(|| Error::unknown_dimension(&self.name, dimension))?;
        let o = self.dimensions[d]
            .options
            .iter()
            .position(|opt| opt.name == option)
            .ok_or_else(|| Error::unknown_option(&self.name, dimension, option))?;
        Ok((d, o))
    }

    fn compound_class(&self, keys: &[(usize, usize)]) -> String {
        let mut class = self.name.clone();
        for &(d, o) in keys {
            let dimension = &self.dimensions[d];
            class.push_str(&format!("--{}-{}", dimension.name, dimension.options[o].name));
        }
        class
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styles(property: &str, value: &str) -> DeclarationBlock {
        DeclarationBlock::new().with(property, value)
    }

    fn button() -> RecipeDefinition {
        RecipeDefinition::new("button")
            .base(styles("display", "inline-block"))
            .variant("size", [("sm", styles("padding", "2px")), ("lg", styles("padding", "8px"))])
            .variant(
                "tone",
                [("primary", styles("color", "blue")), ("secondary", styles("color", "gray"))],
            )
            .compound([("size", "lg"), ("tone", "primary")], styles("font-weight", "700"))
    }

    #[test]
    fn no_selection_yields_base_only() {
        let (recipe, _) = Recipe::compile(button()).unwrap();
        let classes = recipe.resolve(Vec::<(&str, &str)>::new()).unwrap();
        assert_eq!(classes, vec!["button"]);
    }

    #[test]
    fn compound_requires_every_key() {
        let (recipe, _) = Recipe::compile(button()).unwrap();

        let both = recipe.resolve([("size", "lg"), ("tone", "primary")]).unwrap();
        assert_eq!(
            both,
            vec![
                "button",
                "button--size-lg--tone-primary",
                "button--size-lg",
                "button--tone-primary",
            ]
        );

        let one = recipe.resolve([("size", "lg")]).unwrap();
        assert_eq!(one, vec!["button", "button--size-lg"]);
    }

    #[test]
    fn selection_order_does_not_matter() {
        let (recipe, _) = Recipe::compile(button()).unwrap();
        let a = recipe.resolve([("tone", "primary"), ("size", "lg")]).unwrap();
        let b = recipe.resolve([("size", "lg"), ("tone", "primary")]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_dimension_or_option_fails() {
        let (recipe, _) = Recipe::compile(button()).unwrap();

        assert_eq!(
            recipe.resolve([("shape", "round")]).unwrap_err(),
            Error::unknown_dimension("button", "shape")
        );
        assert_eq!(
            recipe.resolve([("size", "xl")]).unwrap_err(),
            Error::unknown_option("button", "size", "xl")
        );
    }

    #[test]
    fn duplicate_compound_keeps_first() {
        let def = button().compound([("tone", "primary"), ("size", "lg")], styles("font-weight", "900"));
        let (recipe, warnings) = Recipe::compile(def).unwrap();

        assert_eq!(recipe.compounds().len(), 1);
        assert_eq!(
            recipe.compounds()[0].styles.get("font-weight"),
            Some(&crate::Value::from("700"))
        );
        assert_eq!(
            warnings,
            vec![Warning::DuplicateCompoundVariant {
                recipe: "button".into(),
                class: "button--size-lg--tone-primary".into(),
            }]
        );
    }

    #[test]
    fn defaults_apply_until_overridden() {
        let def = button().default_variant("size", "sm");
        let (recipe, _) = Recipe::compile(def).unwrap();

        assert_eq!(
            recipe.resolve(Vec::<(&str, &str)>::new()).unwrap(),
            vec!["button", "button--size-sm"]
        );
        assert_eq!(
            recipe.resolve([("size", "lg")]).unwrap(),
            vec!["button", "button--size-lg"]
        );
    }

    #[test]
    fn invalid_definitions_are_rejected() {
        let unknown_default = button().default_variant("shape", "round");
        assert!(matches!(
            Recipe::compile(unknown_default),
            Err(Error::InvalidDefinition { .. })
        ));

        let bad_compound = button().compound([("size", "xl")], DeclarationBlock::new());
        assert!(matches!(
            Recipe::compile(bad_compound),
            Err(Error::InvalidDefinition { .. })
        ));

        let twice = button().compound([("size", "sm"), ("size", "lg")], DeclarationBlock::new());
        assert!(matches!(Recipe::compile(twice), Err(Error::InvalidDefinition { .. })));
    }

    #[test]
    fn classes_in_emission_order() {
        let (recipe, _) = Recipe::compile(button()).unwrap();
        let names: Vec<&str> = recipe.classes().iter().map(|c| c.class_name).collect();
        assert_eq!(
            names,
            vec![
                "button",
                "button--size-sm",
                "button--size-lg",
                "button--tone-primary",
                "button--tone-secondary",
                "button--size-lg--tone-primary",
            ]
        );
        let ordinals: Vec<usize> = recipe.classes().iter().map(|c| c.ordinal).collect();
        assert_eq!(ordinals, vec![0, 1, 2, 3, 4, 5]);
    }
}
