//! CSS parsing module.

mod declarations;

pub use declarations::parse_declarations;
