//! Declarative CSS authoring engine for Styleframe.
//!
//! This crate holds the in-memory model that a Styleframe config populates
//! and the compiler that turns it into CSS text:
//!
//! - **Tokens**: named variables with lazy, name-based references
//! - **Document tree**: root, selector, media and keyframes containers
//! - **Utilities**: table-driven single-property class generators
//! - **Recipes**: base + variant + compound-variant class resolution
//! - **Serializer**: deterministic CSS emission with reference resolution
//!
//! # Example
//!
//! ```
//! use styleframe_core::prelude::*;
//!
//! let mut sf = Styleframe::new("app");
//! let primary = sf.declare("color--primary", "blue");
//! sf.selector(".h1", [("color", primary)]).unwrap();
//!
//! let css = sf.serialize().unwrap();
//! assert!(css.contains(".h1 { color: blue; }"));
//! ```

pub mod tokens;
pub mod tree;
pub mod parser;
pub mod utility;
pub mod recipe;
pub mod serialize;
pub mod logging;

mod error;
mod generator;
mod instance;
mod value;
mod warning;

pub use error::{Error, Result};
pub use generator::GeneratorId;
pub use instance::{EmitMode, Export, Styleframe};
pub use value::{Composite, Fragment, Reference, Value, css, reference};
pub use warning::Warning;

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::{Composite, EmitMode, Export, Fragment, Reference, Styleframe, Value, Warning};
    pub use crate::{css, reference};
    pub use crate::tokens::{TokenGraph, Variable};
    pub use crate::tree::{ContainerId, ContainerKind, DeclarationBlock, Document};
    pub use crate::utility::{UtilityBindings, UtilityDefinition, UtilityHandle, UtilityValue, ValueTable};
    pub use crate::recipe::{Recipe, RecipeDefinition, RecipeHandle};
    pub use crate::serialize::SerializeOptions;
}
