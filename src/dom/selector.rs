//! Selector queries scoped to a node
//!
//! [`CssSelector`] hands parsing and matching to `scraper`, so the full CSS
//! selector grammar it supports works here: combinators (`>`, `+`, `~`),
//! attribute operators (`^=`, `~=`, ...), `:not(..)`, `:first-child` and
//! the other structural pseudo-classes.
//!
//! A query only sees the scope's subtree: the children of the scope are
//! copied into a fresh `scraper` fragment, so the scope itself never matches
//! and no compound of the selector can match above it.

use html5ever::tendril::StrTendril;
use html5ever::{Attribute, LocalName, Namespace, QualName};
use scraper::node::{Element, Text};
use scraper::{ElementRef, Html, Node, Selector};

use super::{Dom, DomNode, NodeId, NodeKind};
use crate::error::{Error, Result};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Resolves a selector string to nodes below a scope, in document order.
pub trait SelectorEngine {
    fn select(&self, dom: &Dom, selector: &str, scope: NodeId) -> Result<Vec<NodeId>>;
}

/// Built-in engine backed by `scraper`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CssSelector;

impl SelectorEngine for CssSelector {
    fn select(&self, dom: &Dom, selector: &str, scope: NodeId) -> Result<Vec<NodeId>> {
        let parsed = Selector::parse(selector).map_err(|e| Error::InvalidSelector {
            selector: selector.to_string(),
            reason: e.to_string(),
        })?;
        if !dom.contains(scope) {
            return Err(Error::invalid(format!("scope {scope:?} is not a node of this tree")));
        }

        let (fragment, origin) = mirror(dom, scope);
        // Fragment nodes sit in insertion order, which is `origin` order after
        // the fragment root.
        Ok(fragment
            .tree
            .nodes()
            .skip(1)
            .zip(origin)
            .filter_map(|(node, id)| {
                ElementRef::wrap(node)
                    .filter(|element| parsed.matches(element))
                    .map(|_| id)
            })
            .collect())
    }
}

/// Copy everything below `scope` into a new fragment, in document order.
fn mirror(dom: &Dom, scope: NodeId) -> (Html, Vec<NodeId>) {
    let mut fragment = Html::new_fragment();
    let mut origin = Vec::new();
    let root = fragment.tree.root().id();
    let mut stack: Vec<_> = dom
        .children(scope)
        .iter()
        .rev()
        .map(|child| (root, *child))
        .collect();
    while let Some((parent, id)) = stack.pop() {
        let Some(node) = dom.get(id) else {
            continue;
        };
        let copy = fragment.tree.orphan(to_scraper(node)).id();
        if let Some(mut parent) = fragment.tree.get_mut(parent) {
            parent.append_id(copy);
        }
        origin.push(id);
        stack.extend(dom.children(id).iter().rev().map(|child| (copy, *child)));
    }
    (fragment, origin)
}

fn to_scraper(node: &DomNode) -> Node {
    match &node.kind {
        NodeKind::Element { tag } => {
            let attrs = node
                .attrs
                .iter()
                .map(|(name, value)| Attribute {
                    name: QualName::new(None, Namespace::from(""), LocalName::from(name.to_ascii_lowercase())),
                    value: StrTendril::from_slice(value),
                })
                .collect();
            let name = QualName::new(
                None,
                Namespace::from(HTML_NAMESPACE),
                LocalName::from(tag.to_ascii_lowercase()),
            );
            Node::Element(Element::new(name, attrs))
        }
        NodeKind::Text(text) => Node::Text(Text {
            text: StrTendril::from_slice(text),
        }),
    }
}
