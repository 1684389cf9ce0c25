//! dispatch-testkit: test helpers for dispatch-driven UI code
//!
//! Action creators, connected containers and components are tested against
//! lightweight doubles instead of a running app:
//!
//! - [`MockStore`] checks every dispatched action against an ordered queue of
//!   expected actions and runs effects (thunks) with its own dispatch handle.
//! - [`ContainerTestCase`] materializes a container's state and dispatch props
//!   from a snapshot state and checks their exact names.
//! - [`route`] builds the history actions a router middleware expects.
//! - [`mount`] renders components into a node tree that can be queried with
//!   CSS selectors and poked with simulated events. The tree is static:
//!   handlers change component state, which tests read through the mounted
//!   instance or see after [`TestCase::rerender`].
//!
//! # Example
//! ```ignore
//! use dispatch_testkit::prelude::*;
//!
//! let store = MockStore::new(AppState::default(), vec![Action::Fetch, Action::Loaded(3)])
//!     .on_last_action(|| println!("done"));
//! store.dispatch(fetch_and_load());
//! store.assert_passed();
//! ```

pub mod container;
pub mod dom;
pub mod error;
pub mod fixture;
pub mod form;
pub mod matcher;
pub mod mount;
pub mod report;
pub mod route;
pub mod store;

pub use container::{Container, ContainerTestCase, DispatchProp, DispatchProps, MaterializedContainer, SnapshotStore};
pub use error::{Error, Result};
pub use fixture::StoreFixture;
pub use form::{mock_form_store, FormAction, FormState};
pub use mount::{Mountable, TestCase, TestCaseFactory};
pub use report::{AssertionFailure, Report};
pub use route::RouteAction;
pub use store::{Dispatch, Dispatcher, GetState, MockStore, StoreTestCase};

/// Prelude for convenient imports
pub mod prelude {
    // Store
    pub use crate::store::{
        Dispatch, DispatchHook, Dispatcher, GetState, MockStore, RecordingHook, StoreTestCase, TracingHook,
    };

    // Containers
    pub use crate::container::{Container, ContainerTestCase, DispatchProps, SnapshotStore, StateProps};

    // Routing
    pub use crate::route::{push_state, replace_state, RouteAction};

    // Mounting and queries
    pub use crate::dom::{EventData, NodeId, SyntheticEvent};
    pub use crate::mount::{el, text, Component, ComponentType, Element, Node, Props, TestCase};

    pub use crate::error::{Error, Result};
    pub use crate::report::Report;
}
