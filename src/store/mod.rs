//! Mock store - checks every dispatch against an ordered queue of expected actions
//!
//! The store hands action creators the usual `dispatch` / `get_state` pair.
//! Plain actions are matched against the head of the queue; effects (thunks)
//! are invoked with a [`Dispatcher`] and a [`GetState`] handle so they can
//! dispatch now or from a deferred task later. Matching is strictly in queue
//! order either way.
//!
//! ```ignore
//! let store = MockStore::new(AppState::default(), vec![Action::Fetch, Action::DidLoad(data)])
//!     .on_last_action(move || done_tx.send(()).unwrap());
//! store.dispatch(fetch_weather());
//! ```

pub mod case;
pub mod middleware;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt::{self, Debug};
use std::rc::Rc;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::matcher::match_action;
use crate::report::{AssertionFailure, Report};

pub use case::StoreTestCase;
pub use middleware::{DispatchHook, RecordingHook, TracingHook};
use middleware::StackMiddleware;

/// Where `get_state` reads from: a fixed value or a producer called on each read.
pub enum StateAccessor<S> {
    Value(S),
    Producer(Box<dyn Fn() -> S>),
}

impl<S: Clone> StateAccessor<S> {
    pub fn get(&self) -> S {
        match self {
            StateAccessor::Value(state) => state.clone(),
            StateAccessor::Producer(produce) => produce(),
        }
    }
}

impl<S: Debug> Debug for StateAccessor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateAccessor::Value(state) => f.debug_tuple("Value").field(state).finish(),
            StateAccessor::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

/// A deferred action: invoked with the store's dispatch and state handles.
pub type Thunk<S, A> = Box<dyn FnOnce(Dispatcher<S, A>, GetState<S>)>;

/// What can be handed to [`MockStore::dispatch`].
pub enum Dispatch<S, A> {
    /// A plain action, matched against the queue head
    Plain(A),
    /// A thunk, run instead of matched
    Effect(Thunk<S, A>),
}

impl<S, A> Dispatch<S, A> {
    pub fn effect(thunk: impl FnOnce(Dispatcher<S, A>, GetState<S>) + 'static) -> Self {
        Dispatch::Effect(Box::new(thunk))
    }
}

impl<S, A> From<A> for Dispatch<S, A> {
    fn from(action: A) -> Self {
        Dispatch::Plain(action)
    }
}

impl<S, A: Debug> Debug for Dispatch<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatch::Plain(action) => f.debug_tuple("Plain").field(action).finish(),
            Dispatch::Effect(_) => f.write_str("Effect(..)"),
        }
    }
}

struct Inner<A> {
    expected: VecDeque<A>,
    dispatched: usize,
    on_last_action: Option<Box<dyn FnOnce()>>,
    hooks: Vec<Box<dyn DispatchHook<A>>>,
    report: Report,
}

/// Store double owned by one test case.
///
/// Cloning yields another handle onto the same queue; this is how thunks and
/// deferred tasks keep dispatching after the initiating call has returned.
pub struct MockStore<S, A> {
    state: Rc<StateAccessor<S>>,
    inner: Rc<RefCell<Inner<A>>>,
}

impl<S, A> Clone for MockStore<S, A> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S, A> MockStore<S, A>
where
    S: Clone + 'static,
    A: PartialEq + Debug + 'static,
{
    /// Store whose `get_state` always returns `state`.
    pub fn new(state: S, expected: impl IntoIterator<Item = A>) -> Self {
        Self::with_accessor(StateAccessor::Value(state), expected)
    }

    /// Store whose `get_state` calls `produce` on every read.
    pub fn with_state_fn(produce: impl Fn() -> S + 'static, expected: impl IntoIterator<Item = A>) -> Self {
        Self::with_accessor(StateAccessor::Producer(Box::new(produce)), expected)
    }

    pub fn with_accessor(state: StateAccessor<S>, expected: impl IntoIterator<Item = A>) -> Self {
        let expected: VecDeque<A> = expected.into_iter().collect();
        tracing::debug!(expected = expected.len(), "mock store created");
        Self {
            state: Rc::new(state),
            inner: Rc::new(RefCell::new(Inner {
                expected,
                dispatched: 0,
                on_last_action: None,
                hooks: Vec::new(),
                report: Report::new(),
            })),
        }
    }

    /// Register the callback fired once the expected queue drains.
    pub fn on_last_action(self, done: impl FnOnce() + 'static) -> Self {
        self.inner.borrow_mut().on_last_action = Some(Box::new(done));
        self
    }

    /// Append a hook; hooks run in the order they were added.
    pub fn with_hook(self, hook: impl DispatchHook<A> + 'static) -> Self {
        self.inner.borrow_mut().hooks.push(Box::new(hook));
        self
    }

    pub fn get_state(&self) -> S {
        self.state.get()
    }

    /// Dispatch a plain action or run an effect.
    ///
    /// Plain actions come back unmodified; effects return `None`.
    pub fn dispatch(&self, dispatch: impl Into<Dispatch<S, A>>) -> Option<A> {
        match dispatch.into() {
            Dispatch::Plain(action) => Some(self.dispatch_plain(action)),
            Dispatch::Effect(thunk) => {
                tracing::trace!("running dispatched effect");
                thunk(self.dispatcher(), self.state_handle());
                None
            }
        }
    }

    fn dispatch_plain(&self, action: A) -> A {
        // Hooks are detached while they run so they can use the store; a
        // dispatch from inside a hook finds none.
        let mut hooks = std::mem::take(&mut self.inner.borrow_mut().hooks);
        for hook in hooks.iter_mut() {
            hook.before(&action);
        }

        let (matched, done) = {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;
            let index = inner.dispatched;
            inner.dispatched += 1;

            let expected = inner.expected.pop_front();
            tracing::debug!(index, action = ?action, remaining = inner.expected.len(), "dispatch");
            let matched = match match_action(index, &action, expected.as_ref()) {
                Ok(()) => {
                    inner
                        .report
                        .pass(format!("dispatch #{} matches expected action", index + 1));
                    true
                }
                Err(failure) => {
                    inner.report.fail(failure);
                    false
                }
            };

            let done = if inner.expected.is_empty() {
                inner.on_last_action.take()
            } else {
                None
            };
            (matched, done)
        };

        for hook in hooks.iter_mut() {
            hook.after(&action, matched);
        }
        {
            let mut inner = self.inner.borrow_mut();
            // Hooks added while these ran go after them.
            hooks.append(&mut inner.hooks);
            inner.hooks = hooks;
        }

        // Run outside the borrow so the callback may touch the store.
        if let Some(done) = done {
            tracing::debug!("expected actions drained");
            done();
        }
        action
    }

    pub fn dispatcher(&self) -> Dispatcher<S, A> {
        Dispatcher { store: self.clone() }
    }

    pub fn state_handle(&self) -> GetState<S> {
        GetState {
            state: Rc::clone(&self.state),
        }
    }

    /// Number of plain actions dispatched so far
    pub fn dispatched_count(&self) -> usize {
        self.inner.borrow().dispatched
    }

    pub fn remaining_count(&self) -> usize {
        self.inner.borrow().expected.len()
    }

    pub fn is_drained(&self) -> bool {
        self.inner.borrow().expected.is_empty()
    }

    /// Checks recorded so far, without the drain check.
    pub fn report(&self) -> Report {
        self.inner.borrow().report.clone()
    }

    /// Checks recorded so far plus one check that the queue drained.
    pub fn finish(&self) -> Report {
        let inner = self.inner.borrow();
        let mut report = inner.report.clone();
        let check = "all expected actions were dispatched";
        if inner.expected.is_empty() {
            report.pass(check);
        } else {
            report.fail(AssertionFailure::new(
                check,
                format!("{} expected action(s) never dispatched: {:?}", inner.expected.len(), inner.expected),
            ));
        }
        report
    }

    #[track_caller]
    pub fn assert_passed(&self) {
        self.finish().assert_passed();
    }
}

impl<S, A> MockStore<S, A>
where
    S: Clone + 'static,
    A: tui_dispatch::Action + PartialEq,
{
    /// Attach a tui-dispatch middleware such as `LoggingMiddleware`.
    ///
    /// It runs with the hooks, in the order attached. `after` receives whether
    /// the action matched the queue head as its `state_changed` argument.
    pub fn with_middleware(self, middleware: impl tui_dispatch::Middleware<A> + 'static) -> Self {
        self.with_hook(StackMiddleware(middleware))
    }
}

impl<S> MockStore<S, Value>
where
    S: Clone + 'static,
{
    /// Build a store from a dynamically-shaped expected list.
    ///
    /// `expected` must be an array of objects, each with a string `type`.
    pub fn from_json(state: S, expected: Value) -> Result<Self> {
        let Value::Array(actions) = expected else {
            return Err(Error::invalid(
                "expected actions should be an array of expected actions",
            ));
        };
        for (index, action) in actions.iter().enumerate() {
            if !action.get("type").is_some_and(Value::is_string) {
                return Err(Error::invalid(format!(
                    "expected action #{} should be an object with a string `type`, got {}",
                    index + 1,
                    action
                )));
            }
        }
        Ok(Self::new(state, actions))
    }
}

/// `dispatch` handle given to thunks.
pub struct Dispatcher<S, A> {
    store: MockStore<S, A>,
}

impl<S, A> Clone for Dispatcher<S, A> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S, A> Dispatcher<S, A>
where
    S: Clone + 'static,
    A: PartialEq + Debug + 'static,
{
    pub fn dispatch(&self, dispatch: impl Into<Dispatch<S, A>>) -> Option<A> {
        self.store.dispatch(dispatch)
    }
}

/// `get_state` handle given to thunks.
pub struct GetState<S> {
    state: Rc<StateAccessor<S>>,
}

impl<S> Clone for GetState<S> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<S: Clone> GetState<S> {
    pub fn get(&self) -> S {
        self.state.get()
    }
}
