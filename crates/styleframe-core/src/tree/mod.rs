//! Document tree: root, selector, media and keyframes containers.

mod container;
mod declaration;
mod document;

pub use container::{Child, Container, ContainerId, ContainerKind, SlotId};
pub use declaration::{Declaration, DeclarationBlock, SetOutcome, normalize_property};
pub use document::Document;
