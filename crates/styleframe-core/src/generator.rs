//! Registered class generators and the selectors they emit.

use std::collections::HashMap;

use crate::logging::targets;
use crate::recipe::Recipe;
use crate::tree::{ContainerId, Document, SlotId};
use crate::utility::{UtilityDefinition, ValueTable};
use crate::value::Value;
use crate::{Error, Result};

/// Identity of a registered utility or recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeneratorId(pub(crate) usize);

impl GeneratorId {
    /// Registration index within its instance.
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Generator {
    Utility {
        definition: UtilityDefinition,
        /// Every entry applied so far, in first-application order.
        table: ValueTable,
        slot: SlotId,
    },
    Recipe {
        recipe: Recipe,
        slot: SlotId,
    },
}

impl Generator {
    pub(crate) fn name(&self) -> &str {
        match self {
            Self::Utility { definition, .. } => definition.name(),
            Self::Recipe { recipe, .. } => recipe.name(),
        }
    }

    /// Emit the selectors `token` stands for. Unknown tokens emit nothing.
    ///
    /// A utility token emits its single class. Any class of a recipe emits
    /// the whole recipe, since variant classes are usually computed at
    /// runtime and never appear literally in content.
    pub(crate) fn generate(&self, document: &mut Document, token: &str) -> Result<Vec<ContainerId>> {
        match self {
            Self::Utility { definition, table, slot } => {
                let entry = table
                    .iter()
                    .enumerate()
                    .find(|(_, (key, _))| definition.class_name(key) == token);

                match entry {
                    Some((ordinal, (key, value))) => {
                        let id = emit_utility(document, definition, *slot, ordinal, key, value)?;
                        Ok(vec![id])
                    }
                    None => Ok(vec![]),
                }
            }
            Self::Recipe { recipe, slot } => {
                if recipe.classes().iter().any(|c| c.class_name == token) {
                    emit_recipe(document, recipe, *slot)
                } else {
                    Ok(vec![])
                }
            }
        }
    }
}

/// Emit the selector for one utility table entry.
pub(crate) fn emit_utility(
    document: &mut Document,
    definition: &UtilityDefinition,
    slot: SlotId,
    ordinal: usize,
    key: &str,
    value: &Value,
) -> Result<ContainerId> {
    let class = definition.class_name(key);
    let selector = class_selector(&class)?;
    tracing::debug!(target: targets::GENERATOR, utility = definition.name(), class = %class, "emit utility class");
    document.slot_selector(slot, ordinal, selector, definition.declarations(key, value))
}

/// Emit every selector of a recipe.
pub(crate) fn emit_recipe(document: &mut Document, recipe: &Recipe, slot: SlotId) -> Result<Vec<ContainerId>> {
    let mut ids = vec![];
    for class in recipe.classes() {
        let selector = class_selector(class.class_name)?;
        ids.push(document.slot_selector(slot, class.ordinal, selector, class.styles.clone())?);
    }
    tracing::debug!(target: targets::GENERATOR, recipe = recipe.name(), classes = ids.len(), "emit recipe");
    Ok(ids)
}

/// The selector text for a class name, escaped as a CSS identifier.
pub fn class_selector(class: &str) -> Result<String> {
    let mut selector = String::from(".");
    cssparser::serialize_identifier(class, &mut selector)
        .map_err(|_| Error::invalid_definition("class", format!("cannot serialize '{class}'")))?;
    Ok(selector)
}

pub(crate) fn index_token(index: &mut HashMap<String, Vec<GeneratorId>>, class: String, id: GeneratorId) {
    let ids = index.entry(class).or_default();
    if !ids.contains(&id) {
        ids.push(id);
    }
}
