//! Multi-variant recipes compiled into class-resolution functions.

mod compiled;
mod definition;

pub use compiled::{CompoundRule, Dimension, Recipe, RecipeClass, RecipeOption};
pub use definition::{CompoundVariant, RecipeDefinition, VariantDimension};

use crate::generator::GeneratorId;
use crate::instance::Styleframe;
use crate::Result;

/// Handle to a recipe registered with a [`Styleframe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecipeHandle(pub(crate) GeneratorId);

impl RecipeHandle {
    /// The generator identity.
    pub fn id(self) -> GeneratorId {
        self.0
    }

    /// Resolve a selection to the ordered class list.
    pub fn resolve<D, O>(
        self,
        sf: &Styleframe,
        selection: impl IntoIterator<Item = (D, O)>,
    ) -> Result<Vec<String>>
    where
        D: AsRef<str>,
        O: AsRef<str>,
    {
        sf.resolve_recipe(self, selection)
    }
}
