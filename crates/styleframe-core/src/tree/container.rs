//! Container nodes of the document tree.

use std::fmt;

use slotmap::new_key_type;

use super::DeclarationBlock;

new_key_type! {
    /// A handle to a container in a [`Document`](super::Document).
    ///
    /// Handles are also the scope keys of the token graph.
    pub struct ContainerId;
}

/// A reserved, ordinal-keyed output position for one generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub(crate) usize);

/// The kind of a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerKind {
    /// The document root.
    Root,
    /// A rule with selector text, e.g. `.button:hover`.
    Selector(String),
    /// An `@media` block with its query, e.g. `(min-width: 640px)`.
    MediaQuery(String),
    /// An `@keyframes` block with its name.
    Keyframes(String),
}

impl ContainerKind {
    /// The selector text, for selector containers.
    pub fn selector_text(&self) -> Option<&str> {
        match self {
            Self::Selector(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, ":root"),
            Self::Selector(text) => write!(f, "{text}"),
            Self::MediaQuery(query) => write!(f, "@media {query}"),
            Self::Keyframes(name) => write!(f, "@keyframes {name}"),
        }
    }
}

/// An entry in a container's ordered body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    /// A nested container.
    Container(ContainerId),
    /// A verbatim CSS fragment.
    Raw(String),
    /// A generator output slot, expanded in ordinal order at serialization.
    Slot(SlotId),
}

/// A node of the document tree. Parents own their children; there are no
/// back-pointers.
#[derive(Debug, Clone)]
pub struct Container {
    pub(crate) kind: ContainerKind,
    pub(crate) declarations: DeclarationBlock,
    pub(crate) children: Vec<Child>,
}

impl Container {
    pub(crate) fn new(kind: ContainerKind) -> Self {
        Self {
            kind,
            declarations: DeclarationBlock::new(),
            children: vec![],
        }
    }

    /// The container kind.
    pub fn kind(&self) -> &ContainerKind {
        &self.kind
    }

    /// Declarations owned directly by this container.
    pub fn declarations(&self) -> &DeclarationBlock {
        &self.declarations
    }

    /// Body entries in insertion order.
    pub fn children(&self) -> &[Child] {
        &self.children
    }
}
