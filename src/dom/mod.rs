//! Retained node tree that mounted components render into
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Element nodes
//! carry a tag, attributes (`id` and `class` included) and event listeners;
//! text nodes carry only text. Every tree stamps its handles, so a handle from
//! another tree (or from before a re-render) is never resolved against this one.

pub mod event;
pub mod selector;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

pub use event::{EventData, EventTable, Handler, SimulatedEvent, SyntheticEvent};
pub use selector::{CssSelector, SelectorEngine};

static NEXT_TREE: AtomicU64 = AtomicU64::new(1);

/// Handle to a node of one [`Dom`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    tree: u64,
    index: usize,
}

impl NodeId {
    /// Position in the tree's arena, which is also creation order.
    pub fn index(self) -> usize {
        self.index
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Element { tag: String },
    Text(String),
}

pub struct DomNode {
    pub kind: NodeKind,
    pub attrs: BTreeMap<String, String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    listeners: Vec<(String, Handler)>,
}

impl fmt::Debug for DomNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomNode")
            .field("kind", &self.kind)
            .field("attrs", &self.attrs)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl DomNode {
    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.iter().filter(|(name, _)| name == event).count()
    }
}

/// Arena of nodes; a tree per mounted component root.
pub struct Dom {
    tree: u64,
    nodes: Vec<DomNode>,
}

impl fmt::Debug for Dom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dom")
            .field("tree", &self.tree)
            .field("nodes", &self.nodes)
            .finish()
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    pub fn new() -> Self {
        Self {
            tree: NEXT_TREE.fetch_add(1, Ordering::Relaxed),
            nodes: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append an element under `parent`, or as a new root when `parent` is
    /// `None` or not a node of this tree.
    pub fn append_element(
        &mut self,
        parent: Option<NodeId>,
        tag: impl Into<String>,
        attrs: BTreeMap<String, String>,
        listeners: Vec<(String, Handler)>,
    ) -> NodeId {
        self.push(
            parent,
            NodeKind::Element { tag: tag.into() },
            attrs,
            listeners,
        )
    }

    pub fn append_text(&mut self, parent: Option<NodeId>, text: impl Into<String>) -> NodeId {
        self.push(parent, NodeKind::Text(text.into()), BTreeMap::new(), Vec::new())
    }

    fn push(
        &mut self,
        parent: Option<NodeId>,
        kind: NodeKind,
        attrs: BTreeMap<String, String>,
        listeners: Vec<(String, Handler)>,
    ) -> NodeId {
        let id = NodeId {
            tree: self.tree,
            index: self.nodes.len(),
        };
        let parent = parent.filter(|parent| self.contains(*parent));
        if let Some(parent) = parent {
            self.nodes[parent.index].children.push(id);
        }
        self.nodes.push(DomNode {
            kind,
            attrs,
            parent,
            children: Vec::new(),
            listeners,
        });
        id
    }

    /// Whether `id` was handed out by this tree.
    pub fn contains(&self, id: NodeId) -> bool {
        id.tree == self.tree && id.index < self.nodes.len()
    }

    /// `None` for a handle of another tree.
    pub fn get(&self, id: NodeId) -> Option<&DomNode> {
        if id.tree != self.tree {
            return None;
        }
        self.nodes.get(id.index)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |node| node.children.as_slice())
    }

    /// All descendants of `id` in document order, `id` itself excluded.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    pub fn is_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Concatenated text of `id` and everything below it.
    pub fn text_content(&self, id: NodeId) -> Option<String> {
        self.get(id)?;
        Some(self.text_lines(id).concat())
    }

    /// Text nodes under `id`, one entry each, in document order.
    pub fn text_lines(&self, id: NodeId) -> Vec<&str> {
        if !self.contains(id) {
            return Vec::new();
        }
        std::iter::once(id)
            .chain(self.descendants(id))
            .filter_map(|node| match &self.nodes[node.index].kind {
                NodeKind::Text(text) => Some(text.as_str()),
                NodeKind::Element { .. } => None,
            })
            .collect()
    }

    /// Deliver `event` to `target`, bubbling to ancestors when the event does.
    ///
    /// Returns how many handlers ran, or `None` when `target` is not a node
    /// of this tree.
    pub fn dispatch_event(&self, target: NodeId, event: &SimulatedEvent, data: EventData) -> Option<usize> {
        self.get(target)?;
        let synthetic = SyntheticEvent::new(event.name.clone(), target, data);
        let mut invoked = 0;
        let mut current = Some(target);
        while let Some(node) = current {
            synthetic.set_current_target(node);
            for (name, handler) in &self.nodes[node.index].listeners {
                if *name == event.name {
                    handler(&synthetic);
                    invoked += 1;
                }
            }
            if !event.bubbles || synthetic.is_propagation_stopped() {
                break;
            }
            current = self.parent(node);
        }
        tracing::trace!(event = %event.name, target = target.index, invoked, "event dispatched");
        Some(invoked)
    }
}
