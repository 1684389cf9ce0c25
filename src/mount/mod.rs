//! Mount components into a [`Dom`] and query / poke the result
//!
//! A [`TestCase`] owns the node tree of one mounted component. Queries are
//! scoped to the component root unless a node is given; events go through
//! an [`EventTable`] so unknown names fail loudly instead of doing nothing.
//!
//! The tree is rendered once, at mount. Handlers change component state, not
//! nodes: read that state through [`TestCase::instance`] and `downcast`, or
//! call [`TestCase::rerender`] to render the tree again from the same
//! instances. Node handles taken before a re-render are rejected afterwards.
//!
//! ```ignore
//! let mut case = mount::create_from_class(&ComponentType::class::<Counter>(), Props::new())?;
//! let button = case.first("button.increment")?.unwrap();
//! case.trigger_on("click", button)?;
//! assert_eq!(case.instance().downcast::<Counter>().unwrap().count(), 1);
//!
//! case.rerender();
//! assert_eq!(case.text(case.first(".count")?.unwrap())?, "1");
//! ```

pub mod component;

use std::rc::Rc;

use ratatui::widgets::Paragraph;
use tui_dispatch::testing::RenderHarness;

use crate::dom::{CssSelector, Dom, DomNode, EventData, EventTable, NodeId, SelectorEngine};
use crate::error::{Error, Result};

pub use component::{el, text, Component, ComponentType, Element, ElementNode, Instance, Node, Props};
use component::TypeKind;

/// The shapes `create` accepts.
#[derive(Clone, Debug)]
pub enum Mountable {
    /// Pre-built element; must go through `create_from_element`
    Element(Element),
    /// Stateful component type with props
    Class(ComponentType, Props),
    /// Stateless render function with props
    Function(ComponentType, Props),
}

impl Mountable {
    /// Pick `Class` or `Function` from the descriptor itself.
    pub fn component(ty: ComponentType, props: Props) -> Self {
        if ty.is_class() {
            Mountable::Class(ty, props)
        } else {
            Mountable::Function(ty, props)
        }
    }
}

/// Mounts components with a given event table and selector engine.
#[derive(Clone)]
pub struct TestCaseFactory {
    events: EventTable,
    selector: Rc<dyn SelectorEngine>,
}

impl Default for TestCaseFactory {
    fn default() -> Self {
        Self {
            events: EventTable::standard(),
            selector: Rc::new(CssSelector),
        }
    }
}

impl TestCaseFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(mut self, events: EventTable) -> Self {
        self.events = events;
        self
    }

    pub fn with_selector(mut self, selector: impl SelectorEngine + 'static) -> Self {
        self.selector = Rc::new(selector);
        self
    }

    /// Mount a pre-built element of a stateful type.
    pub fn create_from_element(&self, element: Element) -> Result<TestCase> {
        if element.ty().is_stateless() {
            return Err(Error::invalid(format!(
                "create_from_element expects an element of a component class, but `{}` is a stateless function",
                element.ty().name()
            )));
        }
        Ok(self.mount(element))
    }

    pub fn create_from_class(&self, ty: &ComponentType, props: Props) -> Result<TestCase> {
        if ty.is_stateless() {
            return Err(Error::invalid(format!(
                "create_from_class expects a component class, but `{}` is a stateless function",
                ty.name()
            )));
        }
        self.create_from_element(Element::new(ty.clone(), props))
    }

    /// Mount a stateless render function behind a stateful adapter, so the
    /// result can be queried like any class.
    pub fn create_from_function(&self, ty: &ComponentType, props: Props) -> Result<TestCase> {
        let TypeKind::Stateless(render) = &ty.kind else {
            return Err(Error::invalid(format!(
                "create_from_function expects a stateless function, but `{}` is a component class",
                ty.name()
            )));
        };
        let adapter = ComponentType::adapter(ty.name().to_string(), Rc::clone(render));
        self.create_from_class(&adapter, props)
    }

    /// Mount `element` inside an anonymous container class.
    ///
    /// Works for elements of either kind; the container is the root instance.
    pub fn create_from_element_with_wrapper(&self, element: Element) -> Result<TestCase> {
        let name = format!("Wrapper({})", element.ty().name());
        let wrapped = element.clone();
        let wrapper = ComponentType::adapter(name, Rc::new(move |_: &Props| Node::Component(wrapped.clone())));
        self.create_from_element(Element::new(wrapper, element.props().clone()))
    }

    pub fn create(&self, input: Mountable) -> Result<TestCase> {
        match input {
            Mountable::Class(ty, props) => self.create_from_class(&ty, props),
            Mountable::Function(ty, props) => self.create_from_function(&ty, props),
            Mountable::Element(element) => Err(Error::invalid(format!(
                "create expects a component class or stateless function, got an element of `{}`; use create_from_element",
                element.ty().name()
            ))),
        }
    }

    fn mount(&self, element: Element) -> TestCase {
        let (dom, root, instances) = Mounter::render(&element, Vec::new());
        tracing::debug!(
            component = element.ty().name(),
            nodes = dom.len(),
            instances = instances.len(),
            "mounted"
        );
        TestCase {
            element,
            dom,
            root,
            instances,
            events: self.events.clone(),
            selector: Rc::clone(&self.selector),
        }
    }
}

struct Mounter {
    dom: Dom,
    /// One slot per stateful instance, reserved in tree order before its
    /// subtree is mounted, so an outer component precedes the inner one
    /// rendering its root.
    instances: Vec<Option<Instance>>,
    /// Instances of the previous render, reused slot by slot.
    previous: Vec<Instance>,
}

impl Mounter {
    fn render(element: &Element, previous: Vec<Instance>) -> (Dom, NodeId, Vec<Instance>) {
        let mut mounter = Mounter {
            dom: Dom::new(),
            instances: Vec::new(),
            previous,
        };
        let root = mounter.mount_element(element, None);
        let instances = mounter.instances.into_iter().flatten().collect();
        (mounter.dom, root, instances)
    }

    fn mount_element(&mut self, element: &Element, parent: Option<NodeId>) -> NodeId {
        match &element.ty().kind {
            TypeKind::Class { construct, .. } => {
                let slot = self.instances.len();
                self.instances.push(None);
                let object = match self.previous.get(slot) {
                    Some(previous)
                        if previous.ty().same_type(element.ty()) && previous.ty().name() == element.ty().name() =>
                    {
                        Rc::clone(&previous.object)
                    }
                    _ => construct(element.props()),
                };
                let root = self.mount_node(object.render(element.props()), parent);
                self.instances[slot] = Some(Instance {
                    ty: element.ty().clone(),
                    props: element.props().clone(),
                    object,
                    root,
                });
                root
            }
            // Stateless output is inlined; no instance is kept for it.
            TypeKind::Stateless(render) => self.mount_node(render(element.props()), parent),
        }
    }

    fn mount_node(&mut self, node: Node, parent: Option<NodeId>) -> NodeId {
        match node {
            Node::Text(content) => self.dom.append_text(parent, content),
            Node::Element(element) => {
                let id = self
                    .dom
                    .append_element(parent, element.tag, element.attrs, element.listeners);
                for child in element.children {
                    self.mount_node(child, Some(id));
                }
                id
            }
            Node::Component(element) => self.mount_element(&element, parent),
        }
    }
}

/// One mounted component: its node tree, root node and instances.
pub struct TestCase {
    element: Element,
    dom: Dom,
    root: NodeId,
    /// Stateful instances in tree order; the mounted component is first.
    instances: Vec<Instance>,
    events: EventTable,
    selector: Rc<dyn SelectorEngine>,
}

impl TestCase {
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The mounted component's instance
    pub fn instance(&self) -> &Instance {
        &self.instances[0]
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn node(&self, id: NodeId) -> Result<&DomNode> {
        self.dom.get(id).ok_or_else(|| foreign_node(id))
    }

    pub fn text(&self, id: NodeId) -> Result<String> {
        self.dom.text_content(id).ok_or_else(|| foreign_node(id))
    }

    /// Render the tree again from the mounted instances.
    ///
    /// Instances are matched to the new tree by position and kept when the
    /// type there is unchanged, so state set by handlers shows up in the new
    /// nodes. Every earlier [`NodeId`] of this case becomes invalid.
    pub fn rerender(&mut self) {
        let previous = std::mem::take(&mut self.instances);
        let (dom, root, instances) = Mounter::render(&self.element, previous);
        tracing::debug!(component = self.element.ty().name(), nodes = dom.len(), "re-rendered");
        self.dom = dom;
        self.root = root;
        self.instances = instances;
    }

    /// Simulate `event` on the root node.
    pub fn trigger(&self, event: &str) -> Result<usize> {
        self.trigger_with(event, self.root, EventData::None)
    }

    pub fn trigger_on(&self, event: &str, node: NodeId) -> Result<usize> {
        self.trigger_with(event, node, EventData::None)
    }

    /// Simulate `event` on `node` with a payload. Returns how many handlers ran.
    pub fn trigger_with(&self, event: &str, node: NodeId, data: EventData) -> Result<usize> {
        let simulated = self
            .events
            .get(event)
            .ok_or_else(|| Error::UnsupportedEvent(event.to_string()))?;
        tracing::debug!(event, node = node.index(), "trigger");
        self.dom
            .dispatch_event(node, simulated, data)
            .ok_or_else(|| foreign_node(node))
    }

    /// All nodes under the root matching `selector`, in document order.
    pub fn find(&self, selector: &str) -> Result<Vec<NodeId>> {
        self.find_in(selector, self.root)
    }

    pub fn find_in(&self, selector: &str, node: NodeId) -> Result<Vec<NodeId>> {
        if !self.dom.contains(node) {
            return Err(foreign_node(node));
        }
        self.selector.select(&self.dom, selector, node)
    }

    /// First match under the root, `None` when nothing matches.
    pub fn first(&self, selector: &str) -> Result<Option<NodeId>> {
        self.first_in(selector, self.root)
    }

    pub fn first_in(&self, selector: &str, node: NodeId) -> Result<Option<NodeId>> {
        Ok(self.find_in(selector, node)?.into_iter().next())
    }

    /// Mounted instances of a component class, in tree order.
    pub fn find_components(&self, ty: &ComponentType) -> Result<Vec<Instance>> {
        if ty.is_stateless() {
            return Err(Error::invalid(format!(
                "find_components expects a component class, but `{}` is a stateless function; stateless components keep no instances",
                ty.name()
            )));
        }
        Ok(self
            .instances
            .iter()
            .filter(|instance| instance.ty().same_type(ty))
            .cloned()
            .collect())
    }

    pub fn first_component(&self, ty: &ComponentType) -> Result<Option<Instance>> {
        Ok(self.find_components(ty)?.into_iter().next())
    }

    /// Render the tree's text nodes, one per line, to a plain-text screen.
    pub fn render_plain(&self, width: u16, height: u16) -> String {
        let content = self.dom.text_lines(self.root).join("\n");
        let mut render = RenderHarness::new(width, height);
        render.render_to_string_plain(|frame| {
            frame.render_widget(Paragraph::new(content.as_str()), frame.area());
        })
    }
}

fn foreign_node(node: NodeId) -> Error {
    Error::invalid(format!(
        "{node:?} is not a node of this test case; node handles expire when a case is re-rendered"
    ))
}

pub fn create_from_element(element: Element) -> Result<TestCase> {
    TestCaseFactory::default().create_from_element(element)
}

pub fn create_from_class(ty: &ComponentType, props: Props) -> Result<TestCase> {
    TestCaseFactory::default().create_from_class(ty, props)
}

pub fn create_from_function(ty: &ComponentType, props: Props) -> Result<TestCase> {
    TestCaseFactory::default().create_from_function(ty, props)
}

pub fn create_from_element_with_wrapper(element: Element) -> Result<TestCase> {
    TestCaseFactory::default().create_from_element_with_wrapper(element)
}

pub fn create(input: Mountable) -> Result<TestCase> {
    TestCaseFactory::default().create(input)
}
