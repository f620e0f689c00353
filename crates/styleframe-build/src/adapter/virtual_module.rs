//! The virtual module handed to the host's module graph.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use styleframe_core::{Export, Styleframe};

use crate::Result;

/// The live instance of a session plus its named exports.
#[derive(Debug, Clone, Copy)]
pub struct VirtualModule<'a> {
    instance: &'a Styleframe,
}

impl<'a> VirtualModule<'a> {
    pub(crate) fn new(instance: &'a Styleframe) -> Self {
        Self { instance }
    }

    /// The shared engine instance.
    pub fn instance(&self) -> &'a Styleframe {
        self.instance
    }

    /// Named exports in declaration order.
    pub fn exports(&self) -> &'a [(String, Export)] {
        self.instance.exports()
    }

    /// The export named `name`.
    pub fn get(&self, name: &str) -> Option<&'a Export> {
        self.exports().iter().find(|(n, _)| n == name).map(|(_, e)| e)
    }

    /// A serializable description of the exports for the host runtime.
    ///
    /// Variable exports carry their value resolved against the root scope,
    /// or `None` when it does not resolve.
    pub fn manifest(&self) -> ModuleManifest {
        let instance = self.instance;
        let exports = self
            .exports()
            .iter()
            .filter_map(|(name, export)| describe(instance, name, export))
            .collect();

        ModuleManifest {
            name: instance.name().to_string(),
            exports,
        }
    }

    /// The manifest as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.manifest())?)
    }
}

fn describe(instance: &Styleframe, name: &str, export: &Export) -> Option<ManifestExport> {
    let name = name.to_string();
    let entry = match export {
        Export::Selector(id) => ManifestExport::Selector {
            name,
            selector: instance.document().get(*id)?.kind().to_string(),
        },
        Export::Variable(reference) => ManifestExport::Variable {
            name,
            variable: reference.name().to_string(),
            value: instance
                .tokens()
                .resolve(reference, &[instance.root()])
                .ok(),
        },
        Export::Utility(handle) => ManifestExport::Utility {
            name,
            classes: instance
                .utility_classes(*handle)
                .into_iter()
                .map(|(suffix, class)| ManifestClass { key: suffix, class })
                .collect(),
        },
        Export::Recipe(handle) => {
            let recipe = instance.compiled_recipe(*handle)?;
            let variants = recipe
                .dimensions()
                .iter()
                .map(|dimension| ManifestDimension {
                    name: dimension.name.clone(),
                    options: dimension
                        .options
                        .iter()
                        .map(|option| ManifestClass {
                            key: option.name.clone(),
                            class: option.class_name.clone(),
                        })
                        .collect(),
                })
                .collect();
            let defaults = recipe
                .dimensions()
                .iter()
                .zip(recipe.defaults())
                .filter_map(|(dimension, default)| {
                    default.map(|o| (dimension.name.clone(), dimension.options[o].name.clone()))
                })
                .collect();

            ManifestExport::Recipe {
                name,
                base: recipe.base_class().to_string(),
                variants,
                compounds: recipe.compounds().iter().map(|c| c.class_name.clone()).collect(),
                defaults,
            }
        }
    };
    Some(entry)
}

/// Serializable form of a [`VirtualModule`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleManifest {
    /// Config name.
    pub name: String,
    /// Exports in declaration order.
    pub exports: Vec<ManifestExport>,
}

/// One described export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ManifestExport {
    Selector {
        name: String,
        selector: String,
    },
    Variable {
        name: String,
        variable: String,
        value: Option<String>,
    },
    Utility {
        name: String,
        classes: Vec<ManifestClass>,
    },
    Recipe {
        name: String,
        base: String,
        variants: Vec<ManifestDimension>,
        compounds: Vec<String>,
        defaults: BTreeMap<String, String>,
    },
}

/// A key and the class it maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestClass {
    pub key: String,
    pub class: String,
}

/// A recipe dimension and its option classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestDimension {
    pub name: String,
    pub options: Vec<ManifestClass>,
}
