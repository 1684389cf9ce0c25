//! Container harness - materializes a connected container against a state snapshot
//!
//! A container derives two maps from the store: state props (plain values)
//! and dispatch props (action creators bound to `dispatch`). The harness
//! feeds it a [`SnapshotStore`], forces both derivations with
//! [`ContainerTestCase::materialize`], then checks that the derived maps
//! hold exactly the names a test lists.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::mount::Props;
use crate::report::Report;

/// Props derived purely from state. `null` marks a present-but-undefined prop.
pub type StateProps = Map<String, Value>;

/// Store handed to a container: a fixed state plus a dispatch log.
///
/// No queue checking happens here; dispatched actions are only recorded.
pub struct SnapshotStore<S, A> {
    state: Rc<S>,
    dispatched: Rc<RefCell<Vec<A>>>,
}

impl<S, A> Clone for SnapshotStore<S, A> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            dispatched: Rc::clone(&self.dispatched),
        }
    }
}

impl<S, A> SnapshotStore<S, A> {
    pub fn new(state: S) -> Self {
        Self {
            state: Rc::new(state),
            dispatched: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn get_state(&self) -> &S {
        &self.state
    }

    pub fn dispatch(&self, action: A) {
        self.dispatched.borrow_mut().push(action);
    }

    /// Take everything dispatched so far.
    pub fn drain_dispatched(&self) -> Vec<A> {
        std::mem::take(&mut *self.dispatched.borrow_mut())
    }
}

/// One entry of a container's dispatch props.
#[derive(Clone)]
pub enum DispatchProp {
    /// Action creator bound to dispatch; takes its arguments as JSON
    Creator(Rc<dyn Fn(Value)>),
    /// Anything that is not callable
    Value(Value),
}

impl DispatchProp {
    pub fn is_callable(&self) -> bool {
        matches!(self, DispatchProp::Creator(_))
    }
}

impl fmt::Debug for DispatchProp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchProp::Creator(_) => f.write_str("Creator(..)"),
            DispatchProp::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

/// Props bound to dispatch, keyed by name.
#[derive(Clone, Debug, Default)]
pub struct DispatchProps {
    props: BTreeMap<String, DispatchProp>,
}

impl DispatchProps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an action creator bound to `store`: calling it dispatches `create(args)`.
    pub fn bind<S: 'static, A: 'static>(
        self,
        name: impl Into<String>,
        store: &SnapshotStore<S, A>,
        create: impl Fn(Value) -> A + 'static,
    ) -> Self {
        let store = store.clone();
        self.creator(name, move |args| store.dispatch(create(args)))
    }

    pub fn creator(mut self, name: impl Into<String>, call: impl Fn(Value) + 'static) -> Self {
        self.props.insert(name.into(), DispatchProp::Creator(Rc::new(call)));
        self
    }

    pub fn value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(name.into(), DispatchProp::Value(value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&DispatchProp> {
        self.props.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.props.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.props.keys().map(String::as_str)
    }

    /// Invoke the named action creator.
    pub fn call(&self, name: &str, args: Value) -> Result<()> {
        match self.props.get(name) {
            Some(DispatchProp::Creator(call)) => {
                call(args);
                Ok(())
            }
            Some(DispatchProp::Value(_)) => Err(Error::invalid(format!("dispatch prop `{name}` is not callable"))),
            None => Err(Error::invalid(format!("no dispatch prop named `{name}`"))),
        }
    }
}

/// A connected container: how it maps state and dispatch onto props.
pub trait Container {
    type State;
    type Action;

    fn map_state(&self, state: &Self::State, own_props: &Props) -> StateProps;

    fn map_dispatch(
        &self,
        store: &SnapshotStore<Self::State, Self::Action>,
        own_props: &Props,
    ) -> DispatchProps;
}

/// A container bound to a snapshot, not yet derived.
pub struct ContainerTestCase<C: Container> {
    container: C,
    store: SnapshotStore<C::State, C::Action>,
    own_props: Props,
}

impl<C: Container> ContainerTestCase<C> {
    pub fn new(container: C, state: C::State) -> Self {
        Self::with_own_props(container, state, Props::new())
    }

    pub fn with_own_props(container: C, state: C::State, own_props: Props) -> Self {
        Self {
            container,
            store: SnapshotStore::new(state),
            own_props,
        }
    }

    /// Run both derivations. Afterwards state and dispatch props are populated.
    pub fn materialize(self) -> MaterializedContainer<C> {
        let state_props = self
            .container
            .map_state(self.store.get_state(), &self.own_props);
        let dispatch_props = self.container.map_dispatch(&self.store, &self.own_props);
        tracing::debug!(
            state_props = state_props.len(),
            dispatch_props = dispatch_props.props.len(),
            "container materialized"
        );
        MaterializedContainer {
            container: self.container,
            store: self.store,
            state_props,
            dispatch_props,
        }
    }
}

/// A container whose derived props have been computed.
pub struct MaterializedContainer<C: Container> {
    container: C,
    store: SnapshotStore<C::State, C::Action>,
    state_props: StateProps,
    dispatch_props: DispatchProps,
}

impl<C: Container> MaterializedContainer<C> {
    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn store(&self) -> &SnapshotStore<C::State, C::Action> {
        &self.store
    }

    pub fn state_props(&self) -> &StateProps {
        &self.state_props
    }

    pub fn dispatch_props(&self) -> &DispatchProps {
        &self.dispatch_props
    }

    /// Check that `names` is exactly the set of state props.
    ///
    /// One check per name (key present, value may be `null`), then one check
    /// that no other key remains. Duplicate names are rejected.
    pub fn expect_props(&self, names: &[&str]) -> Result<Report> {
        let listed = unique_names(names)?;
        let mut report = Report::new();
        for name in names {
            let present = self.state_props.contains_key(*name);
            report.check(
                format!("has property {name}"),
                if present {
                    Ok(())
                } else {
                    Err(format!("state props have no `{name}`"))
                },
            );
        }
        let remaining: Vec<&str> = self
            .state_props
            .keys()
            .map(String::as_str)
            .filter(|key| !listed.contains(*key))
            .collect();
        report.check("has no unexpected state props", no_remaining("state props", &remaining));
        Ok(report)
    }

    /// Like [`expect_props`](Self::expect_props), but each listed dispatch
    /// prop must also be callable.
    pub fn expect_action_creators(&self, names: &[&str]) -> Result<Report> {
        let listed = unique_names(names)?;
        let mut report = Report::new();
        for name in names {
            let outcome = match self.dispatch_props.get(name) {
                Some(prop) if prop.is_callable() => Ok(()),
                Some(prop) => Err(format!("`{name}` is not a function: {prop:?}")),
                None => Err(format!("dispatch props have no `{name}`")),
            };
            report.check(format!("has action {name}"), outcome);
        }
        let remaining: Vec<&str> = self
            .dispatch_props
            .names()
            .filter(|key| !listed.contains(*key))
            .collect();
        report.check(
            "has no unexpected action creator props",
            no_remaining("action creator props", &remaining),
        );
        Ok(report)
    }
}

fn unique_names<'a>(names: &[&'a str]) -> Result<BTreeSet<&'a str>> {
    let mut seen = BTreeSet::new();
    for name in names {
        if !seen.insert(*name) {
            return Err(Error::invalid(format!("`{name}` is listed more than once")));
        }
    }
    Ok(seen)
}

fn no_remaining(what: &str, remaining: &[&str]) -> Result<(), String> {
    if remaining.is_empty() {
        Ok(())
    } else {
        Err(format!("unexpected {what} remain: [{}]", remaining.join(", ")))
    }
}
