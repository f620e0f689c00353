//! The engine instance a config populates.

use std::collections::HashMap;

use crate::generator::{self, Generator, GeneratorId};
use crate::logging::targets;
use crate::parser::parse_declarations;
use crate::recipe::{Recipe, RecipeDefinition, RecipeHandle};
use crate::serialize::{self, SerializeOptions};
use crate::tokens::TokenGraph;
use crate::tree::{ContainerId, DeclarationBlock, Document};
use crate::utility::{UtilityBinding, UtilityBindings, UtilityDefinition, UtilityHandle, UtilityValue, ValueTable};
use crate::value::{Reference, Value};
use crate::warning::Warning;
use crate::{Error, Result};

/// When generators create their selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmitMode {
    /// Every class is emitted at registration.
    #[default]
    Eager,
    /// Classes are emitted only when a scanned token asks for them.
    OnDemand,
}

/// A named export a config declares for the virtual module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Export {
    Selector(ContainerId),
    Recipe(RecipeHandle),
    Utility(UtilityHandle),
    Variable(Reference),
}

/// A token graph, a document tree and the generators registered against them.
#[derive(Debug)]
pub struct Styleframe {
    name: String,
    mode: EmitMode,
    tokens: TokenGraph,
    document: Document,
    generators: Vec<Generator>,
    token_index: HashMap<String, Vec<GeneratorId>>,
    exports: Vec<(String, Export)>,
    warnings: Vec<Warning>,
}

impl Styleframe {
    /// Create an empty instance. `name` identifies the config in error reports.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: EmitMode::default(),
            tokens: TokenGraph::new(),
            document: Document::new(),
            generators: Vec::new(),
            token_index: HashMap::new(),
            exports: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Builder-style [`set_mode`](Self::set_mode).
    pub fn with_mode(mut self, mode: EmitMode) -> Self {
        self.mode = mode;
        self
    }

    /// Change the emit mode for generators registered from now on.
    pub fn set_mode(&mut self, mode: EmitMode) {
        self.mode = mode;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> EmitMode {
        self.mode
    }

    /// The root container.
    pub fn root(&self) -> ContainerId {
        self.document.root()
    }

    pub fn tokens(&self) -> &TokenGraph {
        &self.tokens
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    // -------------------------------------------------------------------------
    // Tokens
    // -------------------------------------------------------------------------

    /// Declare a variable on the root scope.
    pub fn declare(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Reference {
        let root = self.document.root();
        self.tokens.declare(root, name, value)
    }

    /// Declare a variable on `scope`, visible to that container and its
    /// descendants.
    pub fn declare_in(
        &mut self,
        scope: ContainerId,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Reference> {
        if !self.document.contains(scope) {
            return Err(Error::UnknownContainer(format!("{scope:?}")));
        }
        Ok(self.tokens.declare(scope, name, value))
    }

    /// A lazy reference to `name`. The graph is not consulted.
    pub fn reference(&self, name: impl Into<String>) -> Reference {
        Reference::new(name)
    }

    // -------------------------------------------------------------------------
    // Document
    // -------------------------------------------------------------------------

    /// Create or merge a selector on the root.
    pub fn selector<P, V>(
        &mut self,
        text: impl Into<String>,
        declarations: impl IntoIterator<Item = (P, V)>,
    ) -> Result<ContainerId>
    where
        P: AsRef<str>,
        V: Into<Value>,
    {
        let root = self.document.root();
        self.document.selector(root, text, declarations)
    }

    /// Create or merge a selector under `parent`.
    pub fn selector_in<P, V>(
        &mut self,
        parent: ContainerId,
        text: impl Into<String>,
        declarations: impl IntoIterator<Item = (P, V)>,
    ) -> Result<ContainerId>
    where
        P: AsRef<str>,
        V: Into<Value>,
    {
        self.document.selector(parent, text, declarations)
    }

    /// Create or merge a selector whose body is CSS declaration text.
    /// Malformed declarations are skipped with a warning.
    pub fn selector_css(&mut self, parent: ContainerId, text: impl Into<String>, css: &str) -> Result<ContainerId> {
        let (block, warnings) = parse_declarations(css);
        for warning in &warnings {
            tracing::warn!(target: targets::PARSER, "{warning}");
        }
        self.warnings.extend(warnings);
        self.document.selector_block(parent, text, block)
    }

    /// Create an `@media` block under `parent`.
    pub fn media(&mut self, parent: ContainerId, query: impl Into<String>) -> Result<ContainerId> {
        self.document.media(parent, query)
    }

    /// Create an `@keyframes` block on the root.
    pub fn keyframes(&mut self, name: impl Into<String>) -> Result<ContainerId> {
        let root = self.document.root();
        self.document.keyframes(root, name)
    }

    /// Append verbatim CSS to `scope`.
    pub fn raw(&mut self, scope: ContainerId, css: impl Into<String>) -> Result<()> {
        self.document.raw(scope, css)
    }

    // -------------------------------------------------------------------------
    // Generators
    // -------------------------------------------------------------------------

    /// Register a utility built from `style_fn`, returning the `use` handle.
    pub fn create_use_utility<F>(
        &mut self,
        name: impl Into<String>,
        style_fn: F,
        defaults: ValueTable,
    ) -> Result<UtilityHandle>
    where
        F: Fn(&UtilityValue<'_>) -> DeclarationBlock + Send + Sync + 'static,
    {
        self.register_utility(UtilityDefinition::new(name, style_fn).with_defaults(defaults))
    }

    /// Register a prepared utility definition.
    pub fn register_utility(&mut self, definition: UtilityDefinition) -> Result<UtilityHandle> {
        if definition.name().is_empty() {
            return Err(Error::invalid_definition("utility", "name must not be empty"));
        }
        self.ensure_unique(definition.name())?;

        let root = self.document.root();
        let slot = self.document.reserve_slot(root)?;
        let id = GeneratorId(self.generators.len());
        tracing::debug!(target: targets::GENERATOR, utility = definition.name(), "utility registered");

        self.generators.push(Generator::Utility {
            definition,
            table: ValueTable::new(),
            slot,
        });
        Ok(UtilityHandle(id))
    }

    /// Apply a utility with `config`, or its defaults.
    ///
    /// Every entry joins the utility's table, so repeated calls with the same
    /// config are idempotent and new suffixes extend the table in order.
    pub fn use_utility(&mut self, handle: UtilityHandle, config: Option<&ValueTable>) -> Result<UtilityBindings> {
        let id = handle.0;
        let eager = self.mode == EmitMode::Eager;
        let Some(Generator::Utility { definition, table, slot }) = self.generators.get_mut(id.0) else {
            return Err(Error::UnknownGenerator(id.0));
        };

        let config = config.unwrap_or(definition.defaults()).clone();
        let mut bindings = UtilityBindings::default();
        for (key, value) in config.iter() {
            let ordinal = table.upsert(key, value.clone());
            let class_name = definition.class_name(key);
            let container = if eager {
                Some(generator::emit_utility(&mut self.document, definition, *slot, ordinal, key, value)?)
            } else {
                None
            };

            generator::index_token(&mut self.token_index, class_name.clone(), id);
            bindings.push(UtilityBinding {
                suffix: key.to_string(),
                class_name,
                container,
            });
        }
        Ok(bindings)
    }

    /// Compile and register a recipe.
    pub fn recipe(&mut self, definition: RecipeDefinition) -> Result<RecipeHandle> {
        let (recipe, warnings) = Recipe::compile(definition)?;
        self.ensure_unique(recipe.name())?;
        for warning in &warnings {
            tracing::warn!(target: targets::GENERATOR, "{warning}");
        }
        self.warnings.extend(warnings);

        let root = self.document.root();
        let slot = self.document.reserve_slot(root)?;
        let id = GeneratorId(self.generators.len());
        for class in recipe.classes() {
            generator::index_token(&mut self.token_index, class.class_name.to_string(), id);
        }
        if self.mode == EmitMode::Eager {
            generator::emit_recipe(&mut self.document, &recipe, slot)?;
        }

        tracing::debug!(target: targets::GENERATOR, recipe = recipe.name(), "recipe registered");
        self.generators.push(Generator::Recipe { recipe, slot });
        Ok(RecipeHandle(id))
    }

    /// Resolve a recipe selection to its ordered class list.
    pub fn resolve_recipe<D, O>(
        &self,
        handle: RecipeHandle,
        selection: impl IntoIterator<Item = (D, O)>,
    ) -> Result<Vec<String>>
    where
        D: AsRef<str>,
        O: AsRef<str>,
    {
        self.compiled_recipe(handle)
            .ok_or(Error::UnknownGenerator(handle.0.0))?
            .resolve(selection)
    }

    /// The compiled form of a registered recipe.
    pub fn compiled_recipe(&self, handle: RecipeHandle) -> Option<&Recipe> {
        match self.generators.get(handle.0.0) {
            Some(Generator::Recipe { recipe, .. }) => Some(recipe),
            _ => None,
        }
    }

    /// The definition of a registered utility.
    pub fn utility_definition(&self, handle: UtilityHandle) -> Option<&UtilityDefinition> {
        match self.generators.get(handle.0.0) {
            Some(Generator::Utility { definition, .. }) => Some(definition),
            _ => None,
        }
    }

    /// `(suffix, class)` pairs of every entry a utility has been applied with.
    pub fn utility_classes(&self, handle: UtilityHandle) -> Vec<(String, String)> {
        match self.generators.get(handle.0.0) {
            Some(Generator::Utility { definition, table, .. }) => table
                .iter()
                .map(|(key, _)| (key.to_string(), definition.class_name(key)))
                .collect(),
            _ => vec![],
        }
    }

    /// Number of registered generators.
    pub fn generator_count(&self) -> usize {
        self.generators.len()
    }

    /// The name of a registered generator.
    pub fn generator_name(&self, id: GeneratorId) -> Option<&str> {
        self.generators.get(id.0).map(Generator::name)
    }

    /// Generators that can produce a class named `token`.
    pub fn generators_for(&self, token: &str) -> &[GeneratorId] {
        self.token_index.get(token).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Emit the selectors `id` produces for `token`.
    ///
    /// Generation is idempotent: calling it again merges into the same
    /// selectors.
    pub fn generate(&mut self, id: GeneratorId, token: &str) -> Result<Vec<ContainerId>> {
        let generator = self.generators.get(id.0).ok_or(Error::UnknownGenerator(id.0))?;
        generator.generate(&mut self.document, token)
    }

    // -------------------------------------------------------------------------
    // Exports
    // -------------------------------------------------------------------------

    /// Declare a named export. Re-exporting a name replaces it in place.
    pub fn export(&mut self, name: impl Into<String>, export: Export) {
        let name = name.into();
        match self.exports.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = export,
            None => self.exports.push((name, export)),
        }
    }

    /// Named exports in declaration order.
    pub fn exports(&self) -> &[(String, Export)] {
        &self.exports
    }

    // -------------------------------------------------------------------------
    // Output
    // -------------------------------------------------------------------------

    /// Serialize with default options.
    pub fn serialize(&self) -> Result<String> {
        self.serialize_with(&SerializeOptions::default())
    }

    pub fn serialize_with(&self, options: &SerializeOptions) -> Result<String> {
        serialize::serialize(&self.document, &self.tokens, &self.name, options)
    }

    /// Every warning recorded so far.
    pub fn warnings(&self) -> impl Iterator<Item = &Warning> {
        self.warnings.iter().chain(self.document.warnings())
    }

    /// Drain recorded warnings.
    pub fn take_warnings(&mut self) -> Vec<Warning> {
        let mut warnings = std::mem::take(&mut self.warnings);
        warnings.extend(self.document.take_warnings());
        warnings
    }

    fn ensure_unique(&self, name: &str) -> Result<()> {
        if self.generators.iter().any(|g| g.name() == name) {
            return Err(Error::invalid_definition(name, "a generator with this name is already registered"));
        }
        Ok(())
    }
}
