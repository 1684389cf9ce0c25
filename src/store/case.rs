//! Reusable action-creator test case bound to one state accessor

use std::fmt::Debug;
use std::rc::Rc;

use super::{Dispatch, MockStore, StateAccessor};

/// Runs action creators against a fresh [`MockStore`] per call.
///
/// The state given here is what `get_state` returns inside every thunk the
/// case runs; each `test` call gets its own queue.
pub struct StoreTestCase<S> {
    state: Rc<dyn Fn() -> S>,
}

impl<S> Clone for StoreTestCase<S> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<S: Clone + 'static> StoreTestCase<S> {
    pub fn new(state: S) -> Self {
        Self {
            state: Rc::new(move || state.clone()),
        }
    }

    pub fn with_state_fn(produce: impl Fn() -> S + 'static) -> Self {
        Self {
            state: Rc::new(produce),
        }
    }

    /// Dispatch `action_creator` into a new store expecting `expected`.
    ///
    /// `done` fires once the queue drains. The returned store carries the
    /// report; call `assert_passed` on it after any deferred work finished.
    pub fn test<A>(
        &self,
        action_creator: impl Into<Dispatch<S, A>>,
        expected: impl IntoIterator<Item = A>,
        done: Option<Box<dyn FnOnce()>>,
    ) -> MockStore<S, A>
    where
        A: PartialEq + Debug + 'static,
    {
        let state = Rc::clone(&self.state);
        let mut store =
            MockStore::with_accessor(StateAccessor::Producer(Box::new(move || state())), expected);
        if let Some(done) = done {
            store = store.on_last_action(done);
        }
        store.dispatch(action_creator);
        store
    }
}

impl<S: Clone + Default + 'static> Default for StoreTestCase<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}
