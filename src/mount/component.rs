//! Component model: what gets mounted and what it renders

use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::dom::{Handler, SyntheticEvent};

/// Props passed to components, as a JSON object.
pub type Props = Map<String, Value>;

/// What a component renders.
pub enum Node {
    Element(ElementNode),
    Text(String),
    /// A nested component, mounted in place
    Component(Element),
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Element(element) => fmt::Debug::fmt(element, f),
            Node::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Node::Component(element) => fmt::Debug::fmt(element, f),
        }
    }
}

impl From<ElementNode> for Node {
    fn from(element: ElementNode) -> Self {
        Node::Element(element)
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Component(element)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

/// Start an element node: `el("button").class("primary").on("click", ..)`.
pub fn el(tag: impl Into<String>) -> ElementNode {
    ElementNode {
        tag: tag.into(),
        attrs: BTreeMap::new(),
        listeners: Vec::new(),
        children: Vec::new(),
    }
}

pub fn text(text: impl Into<String>) -> Node {
    Node::Text(text.into())
}

pub struct ElementNode {
    pub(crate) tag: String,
    pub(crate) attrs: BTreeMap<String, String>,
    pub(crate) listeners: Vec<(String, Handler)>,
    pub(crate) children: Vec<Node>,
}

impl fmt::Debug for ElementNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementNode")
            .field("tag", &self.tag)
            .field("attrs", &self.attrs)
            .field("listeners", &self.listeners.len())
            .field("children", &self.children)
            .finish()
    }
}

impl ElementNode {
    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    /// Add one or more space-separated classes.
    pub fn class(mut self, class: impl AsRef<str>) -> Self {
        let entry = self.attrs.entry("class".to_string()).or_default();
        for name in class.as_ref().split_whitespace() {
            if !entry.is_empty() {
                entry.push(' ');
            }
            entry.push_str(name);
        }
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Listen for a simulated event by its canonical name (`click`, `keyDown`, ...).
    pub fn on(mut self, event: impl Into<String>, handler: impl Fn(&SyntheticEvent) + 'static) -> Self {
        let handler: Handler = Rc::new(handler);
        self.listeners.push((event.into(), handler));
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<N: Into<Node>>(mut self, children: impl IntoIterator<Item = N>) -> Self {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn text(self, content: impl Into<String>) -> Self {
        self.child(Node::Text(content.into()))
    }
}

/// A stateful component type; its instances stay queryable after mounting.
pub trait Component: 'static {
    fn new(props: &Props) -> Self
    where
        Self: Sized;

    fn render(&self, props: &Props) -> Node;
}

/// A mounted, renderable instance behind a type-erased handle.
pub(crate) trait Instantiated {
    fn render(&self, props: &Props) -> Node;
    fn into_any(self: Rc<Self>) -> Rc<dyn Any>;
}

impl<T: Component> Instantiated for T {
    fn render(&self, props: &Props) -> Node {
        Component::render(self, props)
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

/// Stateful stand-in for a render function or a wrapped element.
pub(crate) struct RenderAdapter {
    render: Rc<dyn Fn(&Props) -> Node>,
}

impl Instantiated for RenderAdapter {
    fn render(&self, props: &Props) -> Node {
        (self.render)(props)
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

type Construct = Rc<dyn Fn(&Props) -> Rc<dyn Instantiated>>;

#[derive(Clone)]
pub(crate) enum TypeKind {
    Class { type_id: TypeId, construct: Construct },
    Stateless(Rc<dyn Fn(&Props) -> Node>),
}

/// Descriptor of a component type: a stateful class or a stateless render function.
#[derive(Clone)]
pub struct ComponentType {
    name: String,
    pub(crate) kind: TypeKind,
}

impl ComponentType {
    pub fn class<T: Component>() -> Self {
        let construct: Construct =
            Rc::new(|props: &Props| -> Rc<dyn Instantiated> { Rc::new(T::new(props)) });
        Self {
            name: short_type_name(std::any::type_name::<T>()),
            kind: TypeKind::Class {
                type_id: TypeId::of::<T>(),
                construct,
            },
        }
    }

    pub fn stateless(name: impl Into<String>, render: impl Fn(&Props) -> Node + 'static) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Stateless(Rc::new(render)),
        }
    }

    /// Class that renders `render` on behalf of a stateless type.
    pub(crate) fn adapter(name: String, render: Rc<dyn Fn(&Props) -> Node>) -> Self {
        let construct: Construct = Rc::new(move |_: &Props| -> Rc<dyn Instantiated> {
            Rc::new(RenderAdapter {
                render: Rc::clone(&render),
            })
        });
        Self {
            name,
            kind: TypeKind::Class {
                type_id: TypeId::of::<RenderAdapter>(),
                construct,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_class(&self) -> bool {
        matches!(self.kind, TypeKind::Class { .. })
    }

    pub fn is_stateless(&self) -> bool {
        matches!(self.kind, TypeKind::Stateless(_))
    }

    pub(crate) fn same_type(&self, other: &ComponentType) -> bool {
        match (&self.kind, &other.kind) {
            (TypeKind::Class { type_id: a, .. }, TypeKind::Class { type_id: b, .. }) => a == b,
            (TypeKind::Stateless(a), TypeKind::Stateless(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_class() { "class" } else { "stateless" };
        write!(f, "ComponentType({} {})", kind, self.name)
    }
}

fn short_type_name(full: &str) -> String {
    full.rsplit("::").next().unwrap_or(full).to_string()
}

/// A component type together with its props, ready to mount.
#[derive(Clone, Debug)]
pub struct Element {
    ty: ComponentType,
    props: Props,
}

impl Element {
    pub fn new(ty: ComponentType, props: Props) -> Self {
        Self { ty, props }
    }

    pub fn of<T: Component>(props: Props) -> Self {
        Self::new(ComponentType::class::<T>(), props)
    }

    pub fn ty(&self) -> &ComponentType {
        &self.ty
    }

    pub fn props(&self) -> &Props {
        &self.props
    }
}

/// Handle to a mounted stateful component.
#[derive(Clone)]
pub struct Instance {
    pub(crate) ty: ComponentType,
    pub(crate) props: Props,
    pub(crate) object: Rc<dyn Instantiated>,
    pub(crate) root: crate::dom::NodeId,
}

impl Instance {
    pub fn ty(&self) -> &ComponentType {
        &self.ty
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    /// Root node this instance rendered
    pub fn root(&self) -> crate::dom::NodeId {
        self.root
    }

    /// The concrete component, when it is a `T`.
    pub fn downcast<T: Component>(&self) -> Option<Rc<T>> {
        Rc::clone(&self.object).into_any().downcast::<T>().ok()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("ty", &self.ty)
            .field("props", &self.props)
            .field("root", &self.root)
            .finish()
    }
}
