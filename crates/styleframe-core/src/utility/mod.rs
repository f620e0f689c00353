//! Table-driven single-property class generators.
//!
//! A [`UtilityDefinition`] pairs a style function with a value table. Applying
//! it produces one selector per table entry, named from the class prefix and
//! the entry's suffix:
//!
//! | suffix    | class        |
//! |-----------|--------------|
//! | `default` | `margin`     |
//! | `sm`      | `margin:sm`  |

mod definition;
mod table;

pub use definition::{StyleFn, UtilityBindings, UtilityBinding, UtilityDefinition, UtilityHandle, UtilityValue};
pub use table::ValueTable;

/// The suffix whose class name is the bare prefix.
pub const DEFAULT_KEY: &str = "default";

/// Build the class name for `suffix` under `prefix`.
pub fn class_name(prefix: &str, suffix: &str) -> String {
    if suffix == DEFAULT_KEY {
        prefix.to_string()
    } else {
        format!("{prefix}:{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_names() {
        assert_eq!(class_name("margin", "default"), "margin");
        assert_eq!(class_name("margin", "sm"), "margin:sm");
        assert_eq!(class_name("w", "1/2"), "w:1/2");
    }
}
