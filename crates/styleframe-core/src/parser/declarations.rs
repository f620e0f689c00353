//! Raw declaration-list parsing using the `cssparser` crate.

use cssparser::{Delimiter, ParseError as CssParseError, Parser, ParserInput};

use crate::logging::targets;
use crate::tree::DeclarationBlock;
use crate::warning::Warning;

/// Parse a declaration list such as `color: red; padding: 4px 8px`.
///
/// Values are kept as literal text. Declarations that fail to parse are
/// skipped, logged, and reported as [`Warning::MalformedDeclaration`];
/// parsing continues after the next `;`.
///
/// # Example
///
/// ```
/// use styleframe_core::parser::parse_declarations;
///
/// let (block, warnings) = parse_declarations("color: red; margin: 0 auto;");
/// assert_eq!(block.len(), 2);
/// assert!(warnings.is_empty());
/// ```
pub fn parse_declarations(css: &str) -> (DeclarationBlock, Vec<Warning>) {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut block = DeclarationBlock::new();
    let mut warnings = vec![];

    loop {
        parser.skip_whitespace();
        if parser.is_exhausted() {
            break;
        }

        let start = parser.position();
        let parsed = parser.parse_until_after(Delimiter::Semicolon, parse_declaration);

        match parsed {
            Ok((property, value)) => {
                block.set(property, value);
            }
            Err(e) => {
                let text = parser
                    .slice_from(start)
                    .trim()
                    .trim_end_matches(';')
                    .trim()
                    .to_string();
                tracing::warn!(target: targets::PARSER, "skipping declaration '{}': {:?}", text, e);
                warnings.push(Warning::MalformedDeclaration { text });
            }
        }
    }

    (block, warnings)
}

/// Parse `ident : value` up to the end of the current delimited block.
fn parse_declaration<'i>(
    parser: &mut Parser<'i, '_>,
) -> std::result::Result<(String, String), CssParseError<'i, ()>> {
    let property = parser.expect_ident()?.to_string();
    parser.expect_colon()?;
    parser.skip_whitespace();

    let start = parser.position();
    while parser.next().is_ok() {}
    let value = parser.slice_from(start).trim();

    if value.is_empty() {
        return Err(parser.new_custom_error(()));
    }
    Ok((property, value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn parses_in_order() {
        let (block, warnings) =
            parse_declarations("display: flex; gap: 4px; --brand: #ff0066");
        assert!(warnings.is_empty());

        let props: Vec<&str> = block.iter().map(|d| d.property.as_str()).collect();
        assert_eq!(props, vec!["display", "gap", "--brand"]);
        assert_eq!(block.get("--brand"), Some(&Value::from("#ff0066")));
    }

    #[test]
    fn keeps_function_values_verbatim() {
        let (block, _) = parse_declarations("box-shadow: 0 1px 2px rgba(0, 0, 0, 0.2);");
        assert_eq!(
            block.get("box-shadow"),
            Some(&Value::from("0 1px 2px rgba(0, 0, 0, 0.2)"))
        );
    }

    #[test]
    fn skips_malformed_and_continues() {
        let (block, warnings) = parse_declarations("color red; margin: 0; padding:;");
        assert_eq!(block.len(), 1);
        assert_eq!(block.get("margin"), Some(&Value::from("0")));
        assert_eq!(warnings.len(), 2);
        assert_eq!(
            warnings[0],
            Warning::MalformedDeclaration { text: "color red".into() }
        );
    }
}
