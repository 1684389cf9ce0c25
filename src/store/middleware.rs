//! Hooks observing plain actions as they pass through the mock store
//!
//! A store of `tui_dispatch::Action`s takes any `tui_dispatch::Middleware`
//! through [`MockStore::with_middleware`](super::MockStore::with_middleware),
//! so `LoggingMiddleware`, `ComposedMiddleware` and app middleware attach
//! unchanged. Action types outside that trait, JSON values included, take a
//! [`DispatchHook`] through `with_hook`.

use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;

use tui_dispatch::{Action, Middleware};

/// Runs around the queue match of every plain action.
///
/// Effects never reach hooks; the actions they dispatch do. Hooks run outside
/// the store's borrow, so they may read it or dispatch to it; an action a hook
/// dispatches itself does not go through the hooks again.
pub trait DispatchHook<A> {
    fn before(&mut self, _action: &A) {}

    /// `matched` is false when the action did not equal the queue head.
    fn after(&mut self, _action: &A, _matched: bool) {}
}

/// A tui-dispatch middleware seen as a hook.
///
/// There is no reducer behind a mock store, so the middleware's
/// `state_changed` argument carries whether the action matched.
pub(crate) struct StackMiddleware<M>(pub(crate) M);

impl<A, M> DispatchHook<A> for StackMiddleware<M>
where
    A: Action,
    M: Middleware<A>,
{
    fn before(&mut self, action: &A) {
        self.0.before(action);
    }

    fn after(&mut self, action: &A, matched: bool) {
        self.0.after(action, matched);
    }
}

/// Logs every dispatched action through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingHook;

impl<A: Debug> DispatchHook<A> for TracingHook {
    fn before(&mut self, action: &A) {
        tracing::info!(action = ?action, "dispatching");
    }

    fn after(&mut self, action: &A, matched: bool) {
        if matched {
            tracing::info!(action = ?action, "matched expected action");
        } else {
            tracing::warn!(action = ?action, "did not match expected action");
        }
    }
}

/// Records every dispatched action, matched or not.
///
/// The recorder is a handle; keep a clone to read the log after dispatching.
#[derive(Debug)]
pub struct RecordingHook<A> {
    log: Rc<RefCell<Vec<A>>>,
}

impl<A> Clone for RecordingHook<A> {
    fn clone(&self) -> Self {
        Self {
            log: Rc::clone(&self.log),
        }
    }
}

impl<A> Default for RecordingHook<A> {
    fn default() -> Self {
        Self {
            log: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<A: Clone> RecordingHook<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> Vec<A> {
        self.log.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }
}

impl<A: Clone> DispatchHook<A> for RecordingHook<A> {
    fn before(&mut self, action: &A) {
        self.log.borrow_mut().push(action.clone());
    }
}
