//! Route actions in the shape a history-API routing middleware expects
//!
//! Both factories are pure and accept any state / pathname value.

use schemars::schema::RootSchema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `type` carried by every route action.
pub const HISTORY_API: &str = "@@reduxReactRouter/historyAPI";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum HistoryMethod {
    #[serde(rename = "replaceState")]
    ReplaceState,
    #[serde(rename = "pushState")]
    PushState,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RoutePayload {
    pub method: HistoryMethod,
    /// `[state, pathname]` or `[state, pathname, query]`
    pub args: Vec<Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RouteAction {
    #[serde(rename = "type")]
    pub kind: String,
    pub payload: RoutePayload,
}

impl RouteAction {
    fn new(method: HistoryMethod, state: Value, pathname: Value, query: Option<Value>) -> Self {
        let mut args = vec![state, pathname];
        args.extend(query);
        Self {
            kind: HISTORY_API.to_string(),
            payload: RoutePayload { method, args },
        }
    }

    /// The action as a plain JSON object, for stores keyed on JSON actions.
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "type": self.kind,
            "payload": {
                "method": self.payload.method,
                "args": self.payload.args,
            },
        })
    }
}

pub fn replace_state(state: impl Into<Value>, pathname: impl Into<Value>, query: Option<Value>) -> RouteAction {
    RouteAction::new(HistoryMethod::ReplaceState, state.into(), pathname.into(), query)
}

pub fn push_state(state: impl Into<Value>, pathname: impl Into<Value>, query: Option<Value>) -> RouteAction {
    RouteAction::new(HistoryMethod::PushState, state.into(), pathname.into(), query)
}

/// JSON schema of [`RouteAction`], for checking recorded actions outside Rust.
pub fn action_schema() -> RootSchema {
    schemars::schema_for!(RouteAction)
}
