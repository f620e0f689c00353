//! Scoped variable storage.

use std::collections::HashMap;

use crate::logging::targets;
use crate::tree::ContainerId;
use crate::value::{Fragment, Reference, Value};

/// A named variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    /// Name, unique within its scope.
    pub name: String,
    /// Literal or composite value.
    pub value: Value,
}

/// Why a reference could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// No visible scope declares the name.
    #[error("unresolved reference '{0}'")]
    Unresolved(String),
    /// Following the references leads back to a variable already being resolved.
    #[error("cyclic reference: {}", .0.join(" -> "))]
    Cycle(Vec<String>),
}

/// Variables of a single scope, in declaration order.
#[derive(Debug, Clone, Default)]
struct Scope {
    variables: Vec<Variable>,
    index: HashMap<String, usize>,
}

impl Scope {
    fn declare(&mut self, name: String, value: Value) -> Option<Value> {
        match self.index.get(&name) {
            Some(&slot) => Some(std::mem::replace(&mut self.variables[slot].value, value)),
            None => {
                self.index.insert(name.clone(), self.variables.len());
                self.variables.push(Variable { name, value });
                None
            }
        }
    }

    fn get(&self, name: &str) -> Option<&Variable> {
        self.index.get(name).map(|&slot| &self.variables[slot])
    }
}

/// The mapping of variable names to values, keyed by container scope.
///
/// Every container of the document tree may act as a scope. Lookups walk a
/// scope chain from the innermost scope outward; the chain is supplied by
/// the caller (the serializer tracks it while walking the tree), so the
/// graph itself stores no parent links.
#[derive(Debug, Clone, Default)]
pub struct TokenGraph {
    scopes: HashMap<ContainerId, Scope>,
    count: usize,
}

impl TokenGraph {
    /// Create an empty token graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or override a variable in `scope`.
    ///
    /// Redeclaring an existing name replaces its value (last write wins) and
    /// keeps its original declaration position.
    pub fn declare(&mut self, scope: ContainerId, name: impl Into<String>, value: impl Into<Value>) -> Reference {
        let reference = Reference::new(name);
        let previous = self
            .scopes
            .entry(scope)
            .or_default()
            .declare(reference.name().to_string(), value.into());

        match previous {
            Some(_) => tracing::debug!(target: targets::TOKENS, name = reference.name(), "variable redeclared"),
            None => self.count += 1,
        }
        reference
    }

    /// Look up a variable declared directly in `scope`.
    pub fn get(&self, scope: ContainerId, name: &str) -> Option<&Variable> {
        let name = name.strip_prefix("--").unwrap_or(name);
        self.scopes.get(&scope).and_then(|s| s.get(name))
    }

    /// Whether `scope` declares `name`.
    pub fn contains(&self, scope: ContainerId, name: &str) -> bool {
        self.get(scope, name).is_some()
    }

    /// Variables declared in `scope`, in declaration order.
    pub fn variables(&self, scope: ContainerId) -> impl Iterator<Item = &Variable> {
        self.scopes
            .get(&scope)
            .into_iter()
            .flat_map(|s| s.variables.iter())
    }

    /// Total number of declared variables across all scopes.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether no variable has been declared.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Resolve a reference against a scope chain (outermost first).
    pub fn resolve(&self, reference: &Reference, chain: &[ContainerId]) -> Result<String, ResolveError> {
        let mut visiting = Vec::new();
        self.resolve_reference(reference, chain, &mut visiting)
    }

    /// Resolve any value to CSS text against a scope chain (outermost first).
    pub fn resolve_value(&self, value: &Value, chain: &[ContainerId]) -> Result<String, ResolveError> {
        let mut visiting = Vec::new();
        self.resolve_in(value, chain, &mut visiting)
    }

    fn resolve_in(
        &self,
        value: &Value,
        chain: &[ContainerId],
        visiting: &mut Vec<(String, usize)>,
    ) -> Result<String, ResolveError> {
        match value {
            Value::Literal(text) => Ok(text.clone()),
            Value::Ref(reference) => self.resolve_reference(reference, chain, visiting),
            Value::Composite(composite) => {
                let mut out = String::new();
                for fragment in composite.fragments() {
                    match fragment {
                        Fragment::Text(text) => out.push_str(text),
                        Fragment::Ref(reference) => {
                            out.push_str(&self.resolve_reference(reference, chain, visiting)?)
                        }
                    }
                }
                Ok(out)
            }
        }
    }

    fn resolve_reference(
        &self,
        reference: &Reference,
        chain: &[ContainerId],
        visiting: &mut Vec<(String, usize)>,
    ) -> Result<String, ResolveError> {
        let name = reference.name();

        // Innermost scope first. A declaration that is already being resolved
        // is skipped, so a shadowing variable can build on the outer one.
        let found = chain.iter().enumerate().rev().find_map(|(depth, scope)| {
            if visiting.iter().any(|(n, d)| n == name && *d == depth) {
                return None;
            }
            self.scopes
                .get(scope)
                .and_then(|s| s.get(name))
                .map(|variable| (depth, variable))
        });

        let Some((depth, variable)) = found else {
            if visiting.iter().any(|(n, _)| n == name) {
                let mut cycle: Vec<String> = visiting.iter().map(|(n, _)| n.clone()).collect();
                cycle.push(name.to_string());
                return Err(ResolveError::Cycle(cycle));
            }
            return Err(ResolveError::Unresolved(name.to_string()));
        };

        // A variable's own references see only its scope and the ones enclosing it.
        visiting.push((name.to_string(), depth));
        let resolved = self.resolve_in(&variable.value, &chain[..=depth], visiting);
        visiting.pop();

        tracing::trace!(target: targets::TOKENS, name, "resolved reference");
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Document;
    use crate::value::{Composite, reference};

    #[test]
    fn declare_and_resolve() {
        let doc = Document::new();
        let root = doc.root();
        let mut tokens = TokenGraph::new();
        tokens.declare(root, "color--primary", "blue");

        let resolved = tokens.resolve(&reference("color--primary"), &[root]);
        assert_eq!(resolved, Ok("blue".to_string()));
    }

    #[test]
    fn redeclaration_last_write_wins() {
        let doc = Document::new();
        let root = doc.root();
        let mut tokens = TokenGraph::new();
        tokens.declare(root, "spacing", "4px");
        tokens.declare(root, "radius", "2px");
        tokens.declare(root, "spacing", "8px");

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens.resolve(&reference("spacing"), &[root]).unwrap(), "8px");

        let names: Vec<&str> = tokens.variables(root).map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["spacing", "radius"]);
    }

    #[test]
    fn missing_name_fails() {
        let doc = Document::new();
        let tokens = TokenGraph::new();
        let err = tokens.resolve(&reference("nope"), &[doc.root()]).unwrap_err();
        assert_eq!(err, ResolveError::Unresolved("nope".into()));
    }

    #[test]
    fn forward_reference_resolves_at_resolution_time() {
        let doc = Document::new();
        let root = doc.root();
        let mut tokens = TokenGraph::new();

        let border = Composite::new().text("1px solid ").reference(reference("color--border"));
        tokens.declare(root, "border", border);
        tokens.declare(root, "color--border", "#ccc");

        assert_eq!(
            tokens.resolve(&reference("border"), &[root]).unwrap(),
            "1px solid #ccc"
        );
    }

    #[test]
    fn inner_scope_shadows_outer() {
        let mut doc = Document::new();
        let root = doc.root();
        let card = doc.selector(root, ".card", Vec::<(&str, &str)>::new()).unwrap();

        let mut tokens = TokenGraph::new();
        tokens.declare(root, "gap", "4px");
        tokens.declare(card, "gap", "12px");

        assert_eq!(tokens.resolve(&reference("gap"), &[root]).unwrap(), "4px");
        assert_eq!(tokens.resolve(&reference("gap"), &[root, card]).unwrap(), "12px");
    }

    #[test]
    fn shadowing_variable_may_reference_outer_name() {
        let mut doc = Document::new();
        let root = doc.root();
        let card = doc.selector(root, ".card", Vec::<(&str, &str)>::new()).unwrap();

        let mut tokens = TokenGraph::new();
        tokens.declare(root, "gap", "4px");
        tokens.declare(card, "inner-gap", reference("gap"));
        tokens.declare(card, "gap", Composite::new().reference(reference("inner-gap")).text(" 2px"));

        assert_eq!(
            tokens.resolve(&reference("gap"), &[root, card]).unwrap(),
            "4px 2px"
        );
    }

    #[test]
    fn cycles_are_detected() {
        let doc = Document::new();
        let root = doc.root();
        let mut tokens = TokenGraph::new();
        tokens.declare(root, "a", reference("b"));
        tokens.declare(root, "b", reference("a"));

        let err = tokens.resolve(&reference("a"), &[root]).unwrap_err();
        assert_eq!(err, ResolveError::Cycle(vec!["a".into(), "b".into(), "a".into()]));
    }
}
