//! The depth-first CSS writer.

use super::selector::nest;
use super::SerializeOptions;
use crate::logging::targets;
use crate::tokens::TokenGraph;
use crate::tree::{Child, Container, ContainerId, ContainerKind, DeclarationBlock, Document};
use crate::{Error, Result};

pub(crate) struct CssWriter<'a> {
    document: &'a Document,
    tokens: &'a TokenGraph,
    config: &'a str,
    options: &'a SerializeOptions,
    /// Containers being written, outermost first. Also the scope chain.
    scopes: Vec<ContainerId>,
    /// Labels of `scopes`, for error reports.
    path: Vec<String>,
}

impl<'a> CssWriter<'a> {
    pub(crate) fn new(
        document: &'a Document,
        tokens: &'a TokenGraph,
        config: &'a str,
        options: &'a SerializeOptions,
    ) -> Self {
        Self {
            document,
            tokens,
            config,
            options,
            scopes: Vec::new(),
            path: Vec::new(),
        }
    }

    pub(crate) fn write(mut self) -> Result<String> {
        let mut out = String::new();
        self.container(self.document.root(), None, 0, &mut out)?;
        Ok(out)
    }

    fn container(&mut self, id: ContainerId, context: Option<&[String]>, depth: usize, out: &mut String) -> Result<()> {
        let document = self.document;
        let node = document
            .get(id)
            .ok_or_else(|| Error::UnknownContainer(format!("{id:?}")))?;

        self.scopes.push(id);
        self.path.push(node.kind().to_string());
        let result = self.body(node, context, depth, out);
        self.scopes.pop();
        self.path.pop();
        result
    }

    fn body(&mut self, node: &'a Container, context: Option<&[String]>, depth: usize, out: &mut String) -> Result<()> {
        match node.kind() {
            ContainerKind::Root => {
                self.rule(&[":root".to_string()], node.declarations(), &[], depth, out)?;
                self.children(node, None, depth, out)
            }
            ContainerKind::Selector(text) => {
                let selectors = nest(context, text);
                // Raw fragments of a rule belong inside its body.
                let raws: Vec<&str> = node
                    .children()
                    .iter()
                    .filter_map(|child| match child {
                        Child::Raw(css) => Some(css.as_str()),
                        _ => None,
                    })
                    .collect();
                self.rule(&selectors, node.declarations(), &raws, depth, out)?;
                self.children(node, Some(selectors.as_slice()), depth, out)
            }
            ContainerKind::MediaQuery(query) => {
                let mut inner = String::new();
                let selectors = context.map(<[String]>::to_vec).unwrap_or_else(|| vec![":root".to_string()]);
                self.rule(&selectors, node.declarations(), &[], depth + 1, &mut inner)?;
                self.children(node, context, depth + 1, &mut inner)?;
                self.block(&format!("@media {query}"), &inner, depth, out);
                Ok(())
            }
            ContainerKind::Keyframes(name) => {
                // Keyframe steps are never prefixed.
                let mut inner = String::new();
                self.children(node, None, depth + 1, &mut inner)?;
                self.block(&format!("@keyframes {name}"), &inner, depth, out);
                Ok(())
            }
        }
    }

    fn children(&mut self, node: &'a Container, context: Option<&[String]>, depth: usize, out: &mut String) -> Result<()> {
        let document = self.document;
        let in_rule = matches!(node.kind(), ContainerKind::Selector(_));
        for child in node.children() {
            match child {
                Child::Container(id) => self.container(*id, context, depth, out)?,
                Child::Raw(_) if in_rule => {}
                Child::Raw(css) => self.raw(css, depth, out),
                Child::Slot(slot) => {
                    for id in document.slot_entries(*slot) {
                        self.container(id, context, depth, out)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn rule(
        &self,
        selectors: &[String],
        declarations: &DeclarationBlock,
        raws: &[&str],
        depth: usize,
        out: &mut String,
    ) -> Result<()> {
        let raws: Vec<String> = raws.iter().map(|css| inline(css)).filter(|css| !css.is_empty()).collect();
        if (declarations.is_empty() && raws.is_empty()) || selectors.is_empty() {
            return Ok(());
        }

        let indent = self.options.indent.repeat(depth);
        let mut body = String::new();
        for declaration in declarations.iter() {
            let value = self
                .tokens
                .resolve_value(&declaration.value, &self.scopes)
                .map_err(|err| {
                    let mut path = self.path.clone();
                    path.push(declaration.property.clone());
                    tracing::error!(target: targets::SERIALIZE, path = %path.join(" > "), "{err}");
                    Error::from_resolve(err, self.config, path.join(" > "))
                })?;
            body.push_str(&format!(" {}: {};", declaration.property, value));
        }
        for css in &raws {
            body.push(' ');
            body.push_str(css);
        }

        self.separate(depth, out);
        out.push_str(&format!("{indent}{} {{{body} }}\n", selectors.join(", ")));
        Ok(())
    }

    fn block(&self, header: &str, inner: &str, depth: usize, out: &mut String) {
        if inner.is_empty() {
            return;
        }
        let indent = self.options.indent.repeat(depth);
        self.separate(depth, out);
        out.push_str(&format!("{indent}{header} {{\n{inner}{indent}}}\n"));
    }

    fn raw(&self, css: &str, depth: usize, out: &mut String) {
        let indent = self.options.indent.repeat(depth);
        let lines: Vec<&str> = css.lines().map(str::trim_end).filter(|l| !l.trim().is_empty()).collect();
        if lines.is_empty() {
            return;
        }
        self.separate(depth, out);
        for line in lines {
            out.push_str(&indent);
            out.push_str(line.trim_start());
            out.push('\n');
        }
    }

    fn separate(&self, depth: usize, out: &mut String) {
        if depth == 0 && self.options.newline_between_rules && !out.is_empty() {
            out.push('\n');
        }
    }
}

/// Collapse a raw fragment onto one line.
fn inline(css: &str) -> String {
    css.split_whitespace().collect::<Vec<_>>().join(" ")
}
