//! The container hierarchy populated by a config.

use std::collections::{BTreeMap, HashMap};

use slotmap::SlotMap;

use super::{Child, Container, ContainerId, ContainerKind, DeclarationBlock, SlotId};
use crate::logging::targets;
use crate::warning::Warning;
use crate::{Error, Result};

#[derive(Debug, Clone)]
struct Slot {
    parent: ContainerId,
    entries: BTreeMap<usize, ContainerId>,
}

/// An ordered tree of containers rooted at a single [`ContainerKind::Root`].
///
/// Selectors with identical text under the same parent are merged: their
/// declarations combine and later values override earlier ones. Generated
/// selectors placed in a slot count as children of the slot's parent.
///
/// # Example
///
/// ```
/// use styleframe_core::tree::Document;
///
/// let mut doc = Document::new();
/// let root = doc.root();
/// let a = doc.selector(root, ".a", [("color", "red")]).unwrap();
/// let b = doc.selector(root, ".a", [("padding", "4px")]).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(doc.get(a).unwrap().declarations().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    containers: SlotMap<ContainerId, Container>,
    root: ContainerId,
    selector_index: HashMap<(ContainerId, String), ContainerId>,
    slots: Vec<Slot>,
    warnings: Vec<Warning>,
}

impl Document {
    /// Create a document holding only the root container.
    pub fn new() -> Self {
        let mut containers = SlotMap::with_key();
        let root = containers.insert(Container::new(ContainerKind::Root));
        Self {
            containers,
            root,
            selector_index: HashMap::new(),
            slots: vec![],
            warnings: vec![],
        }
    }

    /// The root container.
    pub fn root(&self) -> ContainerId {
        self.root
    }

    /// Get a container.
    pub fn get(&self, id: ContainerId) -> Option<&Container> {
        self.containers.get(id)
    }

    /// Whether the handle belongs to this document.
    pub fn contains(&self, id: ContainerId) -> bool {
        self.containers.contains_key(id)
    }

    /// Number of containers, including the root.
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    /// Whether the document holds only the root.
    pub fn is_empty(&self) -> bool {
        self.containers.len() == 1
    }

    /// Create a selector under `parent`, or merge into the existing one with
    /// identical selector text.
    pub fn selector<P, V>(
        &mut self,
        parent: ContainerId,
        text: impl Into<String>,
        declarations: impl IntoIterator<Item = (P, V)>,
    ) -> Result<ContainerId>
    where
        P: AsRef<str>,
        V: Into<crate::Value>,
    {
        self.selector_block(parent, text, declarations.into_iter().collect())
    }

    /// Like [`selector`](Self::selector) with a prepared block.
    pub fn selector_block(
        &mut self,
        parent: ContainerId,
        text: impl Into<String>,
        declarations: DeclarationBlock,
    ) -> Result<ContainerId> {
        self.ensure(parent)?;
        let text = text.into().trim().to_string();

        let key = (parent, text.clone());
        if let Some(&existing) = self.selector_index.get(&key) {
            self.merge_into(existing, declarations)?;
            return Ok(existing);
        }

        let id = self.insert(ContainerKind::Selector(text), declarations);
        self.push_child(parent, Child::Container(id))?;
        self.selector_index.insert(key, id);
        tracing::trace!(target: targets::TREE, "selector created");
        Ok(id)
    }

    /// Create an `@media` block under `parent`.
    pub fn media(&mut self, parent: ContainerId, query: impl Into<String>) -> Result<ContainerId> {
        self.nested(parent, ContainerKind::MediaQuery(query.into().trim().to_string()))
    }

    /// Create an `@keyframes` block under `parent`.
    pub fn keyframes(&mut self, parent: ContainerId, name: impl Into<String>) -> Result<ContainerId> {
        self.nested(parent, ContainerKind::Keyframes(name.into().trim().to_string()))
    }

    /// Append a verbatim CSS fragment to `parent`.
    pub fn raw(&mut self, parent: ContainerId, css: impl Into<String>) -> Result<()> {
        self.push_child(parent, Child::Raw(css.into()))
    }

    /// Merge declarations into an existing container.
    pub fn merge_into(&mut self, id: ContainerId, declarations: DeclarationBlock) -> Result<()> {
        let container = self
            .containers
            .get_mut(id)
            .ok_or_else(|| Error::UnknownContainer(format!("{id:?}")))?;

        let overridden = container.declarations.merge(declarations);
        if overridden.is_empty() {
            return Ok(());
        }

        let selector = container.kind.to_string();
        for property in overridden {
            tracing::warn!(
                target: targets::TREE,
                selector = %selector,
                property = %property,
                "duplicate selector conflict, later declaration wins"
            );
            self.warnings.push(Warning::DuplicateSelectorConflict {
                selector: selector.clone(),
                property,
            });
        }
        Ok(())
    }

    /// Find the selector with `text` directly under `parent`.
    pub fn find_selector(&self, parent: ContainerId, text: &str) -> Option<ContainerId> {
        self.selector_index
            .get(&(parent, text.trim().to_string()))
            .copied()
    }

    /// Reserve an output slot at the current end of `parent`'s body.
    ///
    /// Selectors placed in the slot are emitted in ordinal order, whatever
    /// order they were created in.
    pub fn reserve_slot(&mut self, parent: ContainerId) -> Result<SlotId> {
        let slot = SlotId(self.slots.len());
        self.push_child(parent, Child::Slot(slot))?;
        self.slots.push(Slot {
            parent,
            entries: BTreeMap::new(),
        });
        Ok(slot)
    }

    /// Create or merge the selector at `ordinal` within `slot`.
    ///
    /// A selector with the same text already under the slot's parent absorbs
    /// the declarations instead, so user rules and generated rules merge.
    pub fn slot_selector(
        &mut self,
        slot: SlotId,
        ordinal: usize,
        text: impl Into<String>,
        declarations: DeclarationBlock,
    ) -> Result<ContainerId> {
        let text = text.into().trim().to_string();
        let entry = self
            .slots
            .get(slot.0)
            .ok_or_else(|| Error::UnknownContainer(format!("{slot:?}")))?;
        let key = (entry.parent, text);

        let existing = entry
            .entries
            .get(&ordinal)
            .copied()
            .or_else(|| self.selector_index.get(&key).copied());
        if let Some(id) = existing {
            self.merge_into(id, declarations)?;
            return Ok(id);
        }

        let id = self.insert(ContainerKind::Selector(key.1.clone()), declarations);
        self.slots[slot.0].entries.insert(ordinal, id);
        self.selector_index.insert(key, id);
        Ok(id)
    }

    /// Containers in `slot`, in ordinal order.
    pub fn slot_entries(&self, slot: SlotId) -> impl Iterator<Item = ContainerId> + '_ {
        self.slots
            .get(slot.0)
            .into_iter()
            .flat_map(|s| s.entries.values().copied())
    }

    /// The container a slot was reserved in.
    pub fn slot_parent(&self, slot: SlotId) -> Option<ContainerId> {
        self.slots.get(slot.0).map(|s| s.parent)
    }

    /// Warnings recorded so far.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Drain recorded warnings.
    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }

    fn nested(&mut self, parent: ContainerId, kind: ContainerKind) -> Result<ContainerId> {
        self.ensure(parent)?;
        let id = self.insert(kind, DeclarationBlock::new());
        self.push_child(parent, Child::Container(id))?;
        Ok(id)
    }

    fn insert(&mut self, kind: ContainerKind, declarations: DeclarationBlock) -> ContainerId {
        let mut container = Container::new(kind);
        container.declarations = declarations;
        self.containers.insert(container)
    }

    fn push_child(&mut self, parent: ContainerId, child: Child) -> Result<()> {
        self.containers
            .get_mut(parent)
            .map(|p| p.children.push(child))
            .ok_or_else(|| Error::UnknownContainer(format!("{parent:?}")))
    }

    fn ensure(&self, id: ContainerId) -> Result<()> {
        if self.containers.contains_key(id) {
            Ok(())
        } else {
            Err(Error::UnknownContainer(format!("{id:?}")))
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
