//! Simulated events: the table of supported names and the event handlers see

use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crossterm::event::KeyEvent;
use serde_json::Value;

use super::NodeId;

/// Listener attached to a node.
pub type Handler = Rc<dyn Fn(&SyntheticEvent)>;

/// Payload carried by a triggered event.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum EventData {
    #[default]
    None,
    /// Key press, e.g. built with `tui_dispatch::testing::key("ctrl+s")`
    Key(KeyEvent),
    /// New value of an input, for `change` / `input`
    Value(String),
    Json(Value),
}

/// What handlers receive.
#[derive(Debug)]
pub struct SyntheticEvent {
    name: String,
    target: NodeId,
    current_target: Cell<NodeId>,
    data: EventData,
    propagation_stopped: Cell<bool>,
}

impl SyntheticEvent {
    pub(crate) fn new(name: String, target: NodeId, data: EventData) -> Self {
        Self {
            name,
            target,
            current_target: Cell::new(target),
            data,
            propagation_stopped: Cell::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Node the event was triggered on
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Node whose listener is running
    pub fn current_target(&self) -> NodeId {
        self.current_target.get()
    }

    pub(crate) fn set_current_target(&self, node: NodeId) {
        self.current_target.set(node);
    }

    pub fn data(&self) -> &EventData {
        &self.data
    }

    pub fn key(&self) -> Option<&KeyEvent> {
        match &self.data {
            EventData::Key(key) => Some(key),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<&str> {
        match &self.data {
            EventData::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}

/// A supported event: its canonical name and whether it bubbles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulatedEvent {
    pub name: String,
    pub bubbles: bool,
}

impl SimulatedEvent {
    pub fn bubbling(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bubbles: true,
        }
    }

    pub fn direct(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bubbles: false,
        }
    }
}

const BUBBLING: &[&str] = &[
    "click",
    "doubleClick",
    "contextMenu",
    "mouseDown",
    "mouseUp",
    "mouseMove",
    "keyDown",
    "keyUp",
    "keyPress",
    "change",
    "input",
    "submit",
    "focus",
    "blur",
    "scroll",
    "wheel",
    "paste",
    "copy",
    "cut",
];

const DIRECT: &[&str] = &["mouseEnter", "mouseLeave"];

/// Lookup table from event name to the simulation used for it.
#[derive(Clone, Debug, Default)]
pub struct EventTable {
    events: BTreeMap<String, SimulatedEvent>,
}

impl EventTable {
    /// Empty table; every trigger fails until events are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// The canonical UI events.
    pub fn standard() -> Self {
        let bubbling = BUBBLING.iter().map(|name| SimulatedEvent::bubbling(*name));
        let direct = DIRECT.iter().map(|name| SimulatedEvent::direct(*name));
        bubbling.chain(direct).fold(Self::new(), Self::with)
    }

    pub fn with(mut self, event: SimulatedEvent) -> Self {
        self.events.insert(event.name.clone(), event);
        self
    }

    pub fn get(&self, name: &str) -> Option<&SimulatedEvent> {
        self.events.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.events.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.events.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;
    use tui_dispatch::testing::key;

    #[test]
    fn test_standard_table() {
        let table = EventTable::standard();
        assert!(table.get("click").unwrap().bubbles);
        assert!(!table.get("mouseEnter").unwrap().bubbles);
        assert!(table.get("explode").is_none());
        assert!(table.names().any(|name| name == "submit"));
    }

    #[test]
    fn test_key_payload_accessors() {
        let mut dom = crate::dom::Dom::new();
        let input = dom.append_element(None, "input", Default::default(), Vec::new());
        let event = SyntheticEvent::new("keyDown".into(), input, EventData::Key(key("enter")));
        assert_eq!(event.target(), input);
        assert_eq!(event.key().unwrap().code, KeyCode::Enter);
        assert_eq!(event.value(), None);
    }
}
