//! Class-name token extraction.
//!
//! Extraction over-approximates: any word-like run that could be a class
//! name is a token. Generators ignore tokens they cannot produce.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

static TOKEN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"[A-Za-z0-9_:/.%@-]+").ok());

/// Extract the distinct candidate class tokens of `content`, sorted.
pub fn extract_tokens(content: &str) -> BTreeSet<String> {
    let mut tokens = BTreeSet::new();
    let Some(pattern) = TOKEN.as_ref() else {
        return tokens;
    };

    for found in pattern.find_iter(content) {
        let run = found.as_str();
        let token = trim(run);
        insert(&mut tokens, token);
        // Negative utilities such as `-m:sm` keep their leading `-`.
        insert(&mut tokens, trim_end(run.trim_start_matches([':', '.'])));
        // `obj.badge` and `button.lg` also name their pieces.
        if token.contains('.') {
            for piece in token.split('.') {
                insert(&mut tokens, trim(piece));
            }
        }
        // `class:badge` and `md:m:sm` also name every suffix.
        for (at, _) in token.match_indices(':') {
            insert(&mut tokens, trim(&token[at + 1..]));
        }
    }
    tokens
}

fn trim(token: &str) -> &str {
    trim_end(token.trim_start_matches([':', '.', '-']))
}

fn trim_end(token: &str) -> &str {
    token.trim_end_matches([':', '.', '-', '/'])
}

fn insert(tokens: &mut BTreeSet<String>, token: &str) {
    if token.chars().any(|c| c.is_ascii_alphabetic()) && !tokens.contains(token) {
        tokens.insert(token.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(content: &str) -> Vec<String> {
        extract_tokens(content).into_iter().collect()
    }

    #[test]
    fn template_classes() {
        let found = tokens(r#"<span class="badge m:sm button--size-lg">1</span>"#);
        for expected in ["badge", "m:sm", "button--size-lg", "span", "class"] {
            assert!(found.iter().any(|t| t == expected), "missing {expected}: {found:?}");
        }
        assert!(!found.iter().any(|t| t == "1"));
    }

    #[test]
    fn punctuation_is_trimmed() {
        assert_eq!(tokens("'badge:' .card- --"), vec!["badge", "card"]);
    }

    #[test]
    fn dotted_tokens_contribute_pieces() {
        let found = tokens("styles.badge");
        assert_eq!(found, vec!["badge", "styles", "styles.badge"]);
    }

    #[test]
    fn fractions_and_percentages() {
        let found = tokens("w:1/2 h:50%");
        assert_eq!(found, vec!["h:50%", "w:1/2"]);
    }

    #[test]
    fn directive_prefixes_name_their_class() {
        let found = tokens("<div class:badge={on}>");
        assert!(found.iter().any(|t| t == "badge"), "{found:?}");
        assert!(found.iter().any(|t| t == "class:badge"));
    }

    #[test]
    fn self_closing_unquoted_class() {
        let found = tokens("<Badge class=badge/>");
        assert!(found.iter().any(|t| t == "badge"), "{found:?}");
        assert!(!found.iter().any(|t| t == "badge/"));
    }

    #[test]
    fn negative_utilities_keep_their_sign() {
        let found = tokens(r#"<div class="-m:sm">"#);
        for expected in ["-m:sm", "m:sm", "sm"] {
            assert!(found.iter().any(|t| t == expected), "missing {expected}: {found:?}");
        }
    }
}
