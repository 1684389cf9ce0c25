//! Mount, query and event tests against rendered component trees

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crossterm::event::KeyCode;
use dispatch_testkit::dom::{EventTable, SimulatedEvent};
use dispatch_testkit::mount::{self, Mountable, TestCaseFactory};
use dispatch_testkit::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use tui_dispatch::testing::key;

/// Counter with an increment button; clicks are tallied outside the tree.
struct Counter {
    clicks: Rc<Cell<u32>>,
}

impl Component for Counter {
    fn new(_props: &Props) -> Self {
        Counter {
            clicks: Rc::new(Cell::new(0)),
        }
    }

    fn render(&self, props: &Props) -> Node {
        let clicks = Rc::clone(&self.clicks);
        let label = props.get("label").and_then(|v| v.as_str()).unwrap_or("Counter");
        el("div")
            .class("counter")
            .child(el("h2").class("title").text(label))
            .child(el("span").class("count").text(self.clicks.get().to_string()))
            .child(
                el("button")
                    .class("increment")
                    .attr("type", "button")
                    .on("click", move |_| clicks.set(clicks.get() + 1))
                    .text("+"),
            )
            .into()
    }
}

struct Menu {
    keys: Rc<RefCell<Vec<KeyCode>>>,
}

impl Component for Menu {
    fn new(_props: &Props) -> Self {
        Menu {
            keys: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn render(&self, _props: &Props) -> Node {
        let keys = Rc::clone(&self.keys);
        el("nav")
            .on("keyDown", move |event| {
                if let Some(key) = event.key() {
                    keys.borrow_mut().push(key.code);
                }
            })
            .child(
                el("ul")
                    .class("primary")
                    .child(el("li").text("Home"))
                    .child(el("li").text("Inbox")),
            )
            .child(el("ul").class("secondary").child(el("li").text("Settings")))
            .child(Element::of::<Counter>(Props::new()))
            .into()
    }
}

fn label(text: &str) -> ComponentType {
    let text = text.to_string();
    ComponentType::stateless("Label", move |props: &Props| {
        let suffix = props.get("suffix").and_then(|v| v.as_str()).unwrap_or("");
        el("span").class("label").text(format!("{text}{suffix}")).into()
    })
}

#[test]
fn test_click_runs_handler_once() {
    let case = mount::create_from_class(&ComponentType::class::<Counter>(), Props::new()).unwrap();
    let button = case.first("button.increment").unwrap().expect("no increment button");

    assert_eq!(case.trigger_on("click", button).unwrap(), 1);

    let counter = case.instance().downcast::<Counter>().unwrap();
    assert_eq!(counter.clicks.get(), 1);
}

#[test]
fn test_unknown_event_is_rejected() {
    let case = mount::create_from_class(&ComponentType::class::<Counter>(), Props::new()).unwrap();
    let err = case.trigger("explode").unwrap_err();
    assert!(matches!(err, Error::UnsupportedEvent(_)));
    assert!(err.to_string().contains("explode"));
}

#[test]
fn test_click_bubbles_to_ancestor_handlers() {
    let outer = Rc::new(Cell::new(0));
    let seen = Rc::clone(&outer);
    let ty = ComponentType::stateless("Card", move |_: &Props| {
        let seen = Rc::clone(&seen);
        el("article")
            .on("click", move |_| seen.set(seen.get() + 1))
            .child(el("button").text("open"))
            .into()
    });
    let case = mount::create_from_function(&ty, Props::new()).unwrap();
    let button = case.first("button").unwrap().unwrap();

    // No listener on the button itself; the article's runs on the way up.
    assert_eq!(case.trigger_on("click", button).unwrap(), 1);
    assert_eq!(outer.get(), 1);
    assert_eq!(case.trigger_on("mouseEnter", button).unwrap(), 0);
}

#[test]
fn test_find_is_scoped_to_node() {
    let case = mount::create_from_class(&ComponentType::class::<Menu>(), Props::new()).unwrap();
    assert_eq!(case.find("li").unwrap().len(), 3);

    let primary = case.first("ul.primary").unwrap().unwrap();
    let items = case.find_in("li", primary).unwrap();
    let labels: Vec<String> = items.iter().map(|id| case.text(*id).unwrap()).collect();
    assert_eq!(labels, vec!["Home", "Inbox"]);

    assert_eq!(case.first_in("button", primary).unwrap(), None);
    assert!(matches!(case.find("li:hover"), Err(Error::InvalidSelector { .. })));
}

#[test]
fn test_structural_selectors() {
    let case = mount::create_from_class(&ComponentType::class::<Menu>(), Props::new()).unwrap();
    let labels = |selector: &str| -> Vec<String> {
        case.find(selector)
            .unwrap()
            .into_iter()
            .map(|id| case.text(id).unwrap())
            .collect()
    };

    assert_eq!(labels("ul.primary li:first-child"), vec!["Home"]);
    assert_eq!(labels("li + li"), vec!["Inbox"]);
    assert_eq!(labels("ul:not(.primary) li"), vec!["Settings"]);
    assert_eq!(labels("ul ~ div h2"), vec!["Counter"]);
    assert_eq!(labels("[class^=incr]"), vec!["+"]);
}

#[test]
fn test_node_handles_of_another_case_are_rejected() {
    let small = mount::create_from_function(&label("x"), Props::new()).unwrap();
    let big = mount::create_from_class(&ComponentType::class::<Menu>(), Props::new()).unwrap();
    let big_button = big.first("button").unwrap().unwrap();

    assert!(matches!(small.trigger_on("click", big_button), Err(Error::InvalidArgument(_))));
    assert!(matches!(small.find_in("p", big_button), Err(Error::InvalidArgument(_))));
    assert!(matches!(small.first_in("p", big.root()), Err(Error::InvalidArgument(_))));
    assert!(matches!(small.text(big_button), Err(Error::InvalidArgument(_))));
    assert!(matches!(small.node(big.root()), Err(Error::InvalidArgument(_))));

    // An unknown event is still reported as such.
    assert!(matches!(small.trigger_on("explode", big_button), Err(Error::UnsupportedEvent(_))));
    assert_eq!(big.trigger_on("click", big_button).unwrap(), 1);
}

#[test]
fn test_tree_is_static_until_rerendered() {
    let mut case = mount::create_from_class(&ComponentType::class::<Counter>(), Props::new()).unwrap();
    let button = case.first("button.increment").unwrap().unwrap();
    case.trigger_on("click", button).unwrap();

    let count = case.first(".count").unwrap().unwrap();
    assert_eq!(case.text(count).unwrap(), "0");
    assert_eq!(case.instance().downcast::<Counter>().unwrap().clicks.get(), 1);

    case.rerender();
    let count = case.first(".count").unwrap().unwrap();
    assert_eq!(case.text(count).unwrap(), "1");

    // Handles from before the re-render point into the old tree.
    assert!(matches!(case.trigger_on("click", button), Err(Error::InvalidArgument(_))));

    let button = case.first("button.increment").unwrap().unwrap();
    case.trigger_on("click", button).unwrap();
    case.rerender();
    let count = case.first(".count").unwrap().unwrap();
    assert_eq!(case.text(count).unwrap(), "2");
}

#[test]
fn test_nested_instances_survive_rerender() {
    let mut case = mount::create_from_class(&ComponentType::class::<Menu>(), Props::new()).unwrap();
    let button = case.first("button.increment").unwrap().unwrap();
    case.trigger_on("click", button).unwrap();
    case.trigger_with("keyDown", case.root(), EventData::Key(key("enter"))).unwrap();

    case.rerender();
    let count = case.first("div.counter .count").unwrap().unwrap();
    assert_eq!(case.text(count).unwrap(), "1");
    let menu = case.instance().downcast::<Menu>().unwrap();
    assert_eq!(*menu.keys.borrow(), vec![KeyCode::Enter]);
    assert_eq!(case.find_components(&ComponentType::class::<Counter>()).unwrap().len(), 1);
}

#[test]
fn test_key_down_carries_key_event() {
    let case = mount::create_from_class(&ComponentType::class::<Menu>(), Props::new()).unwrap();
    let item = case.first("ul.secondary li").unwrap().unwrap();
    case.trigger_with("keyDown", item, EventData::Key(key("enter"))).unwrap();
    case.trigger_with("keyDown", case.root(), EventData::Key(key("esc"))).unwrap();

    let menu = case.instance().downcast::<Menu>().unwrap();
    assert_eq!(*menu.keys.borrow(), vec![KeyCode::Enter, KeyCode::Esc]);
}

#[test]
fn test_nested_class_components_are_found() {
    let case = mount::create_from_class(&ComponentType::class::<Menu>(), Props::new()).unwrap();
    let counters = case.find_components(&ComponentType::class::<Counter>()).unwrap();
    assert_eq!(counters.len(), 1);
    assert!(case
        .first_component(&ComponentType::class::<Menu>())
        .unwrap()
        .is_some());

    let missing = mount::create_from_class(&ComponentType::class::<Counter>(), Props::new())
        .unwrap()
        .first_component(&ComponentType::class::<Menu>())
        .unwrap();
    assert!(missing.is_none());
}

#[test]
fn test_factory_rejects_wrong_kinds() {
    let stateless = label("x");
    let class = ComponentType::class::<Counter>();

    assert!(matches!(
        mount::create_from_class(&stateless, Props::new()),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        mount::create_from_function(&class, Props::new()),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        mount::create_from_element(Element::new(stateless.clone(), Props::new())),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        mount::create(Mountable::Element(Element::of::<Counter>(Props::new()))),
        Err(Error::InvalidArgument(_))
    ));
    let case = mount::create_from_class(&class, Props::new()).unwrap();
    assert!(matches!(case.find_components(&stateless), Err(Error::InvalidArgument(_))));
}

#[test]
fn test_create_picks_factory_from_variant() {
    let mut props = Props::new();
    props.insert("suffix".into(), json!("!"));

    let case = mount::create(Mountable::component(label("Hi"), props)).unwrap();
    assert_eq!(case.instance().ty().name(), "Label");
    assert_eq!(case.text(case.root()).unwrap(), "Hi!");

    let case = mount::create(Mountable::component(ComponentType::class::<Counter>(), Props::new())).unwrap();
    assert!(case.instance().downcast::<Counter>().is_some());
}

#[test]
fn test_wrapper_mounts_stateless_element() {
    let case = mount::create_from_element_with_wrapper(Element::new(label("wrapped"), Props::new())).unwrap();
    assert_eq!(case.instance().ty().name(), "Wrapper(Label)");
    assert_eq!(case.node(case.root()).unwrap().tag(), Some("span"));
}

#[test]
fn test_custom_event_table() {
    let events = EventTable::new().with(SimulatedEvent::direct("click"));
    let case = TestCaseFactory::new()
        .with_events(events)
        .create_from_class(&ComponentType::class::<Counter>(), Props::new())
        .unwrap();
    assert!(matches!(case.trigger("submit"), Err(Error::UnsupportedEvent(_))));
    // Direct click on the root reaches no handler.
    assert_eq!(case.trigger("click").unwrap(), 0);
}

#[test]
fn test_render_plain_shows_text() {
    let mut props = Props::new();
    props.insert("label".into(), json!("Clicks"));
    let case = mount::create_from_class(&ComponentType::class::<Counter>(), props).unwrap();

    let output = case.render_plain(20, 3);
    assert!(output.contains("Clicks"));
    assert!(output.contains("+"));
}
