//! Selector list splitting and nesting.

/// Split a selector list on top-level commas.
///
/// Commas inside parentheses or brackets (`:is(a, b)`, `[data-x="a,b"]`)
/// do not split.
pub fn split_list(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(text[start..i].trim().to_string());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim().to_string());
    parts.retain(|p| !p.is_empty());
    parts
}

/// The full selectors of `text` nested in `parents`.
///
/// `&` is replaced with each parent; otherwise the child is joined as a
/// descendant. Lists expand as a cartesian product, parents outermost.
pub fn nest(parents: Option<&[String]>, text: &str) -> Vec<String> {
    let own = split_list(text);
    let Some(parents) = parents else {
        return own;
    };

    let mut out = Vec::with_capacity(parents.len() * own.len());
    for parent in parents {
        for child in &own {
            if child.contains('&') {
                out.push(child.replace('&', parent));
            } else {
                out.push(format!("{parent} {child}"));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_respects_parentheses() {
        assert_eq!(split_list(".a, .b"), vec![".a", ".b"]);
        assert_eq!(split_list(":is(.a, .b) .c"), vec![":is(.a, .b) .c"]);
        assert_eq!(split_list("[data-x=\"a,b\"]"), vec!["[data-x=\"a,b\"]"]);
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn ampersand_and_descendant_nesting() {
        let parents = vec![".btn".to_string()];
        assert_eq!(nest(Some(&parents), "&:hover"), vec![".btn:hover"]);
        assert_eq!(nest(Some(&parents), ".icon"), vec![".btn .icon"]);
        assert_eq!(nest(None, ".btn"), vec![".btn"]);
    }

    #[test]
    fn lists_expand_as_product() {
        let parents = vec![".a".to_string(), ".b".to_string()];
        assert_eq!(
            nest(Some(&parents), "&:hover, .x"),
            vec![".a:hover", ".a .x", ".b:hover", ".b .x"]
        );
    }
}
