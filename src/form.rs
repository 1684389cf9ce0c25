//! Real store pre-wired with a form reducer
//!
//! Components that read and write form fields can be mounted against this
//! store without a hand-written reducer. Forms are keyed by name and created
//! on first use.

use std::collections::{BTreeMap, BTreeSet};

use schemars::schema::RootSchema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tui_dispatch::{DispatchResult, EffectStore};

/// One named form.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Form {
    pub values: BTreeMap<String, Value>,
    /// Fields the user has left at least once
    pub touched: BTreeSet<String>,
    /// Field that currently has focus
    pub active: Option<String>,
    pub submitting: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FormState {
    pub forms: BTreeMap<String, Form>,
}

impl FormState {
    pub fn form(&self, name: &str) -> Option<&Form> {
        self.forms.get(name)
    }

    pub fn value(&self, form: &str, field: &str) -> Option<&Value> {
        self.forms.get(form)?.values.get(field)
    }
}

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum FormAction {
    Change { form: String, field: String, value: Value },
    Focus { form: String, field: String },
    /// Leaving a field marks it touched; a value, when given, is stored too
    Blur { form: String, field: String, value: Option<Value> },
    Touch { form: String, fields: Vec<String> },
    Reset { form: String },
    Destroy { form: String },
    StartSubmit { form: String },
    StopSubmit { form: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum FormEffect {
    /// Emitted when a submit starts, with the values at that moment
    Submit { form: String, values: BTreeMap<String, Value> },
}

pub type FormStore = EffectStore<FormState, FormAction, FormEffect>;

pub fn form_reducer(state: &mut FormState, action: FormAction) -> DispatchResult<FormEffect> {
    match action {
        FormAction::Change { form, field, value } => {
            let form = state.forms.entry(form).or_default();
            if form.values.get(&field) == Some(&value) {
                return DispatchResult::unchanged();
            }
            form.values.insert(field, value);
            DispatchResult::changed()
        }

        FormAction::Focus { form, field } => {
            let form = state.forms.entry(form).or_default();
            if form.active.as_ref() == Some(&field) {
                return DispatchResult::unchanged();
            }
            form.active = Some(field);
            DispatchResult::changed()
        }

        FormAction::Blur { form, field, value } => {
            let form = state.forms.entry(form).or_default();
            if form.active.as_ref() == Some(&field) {
                form.active = None;
            }
            if let Some(value) = value {
                form.values.insert(field.clone(), value);
            }
            form.touched.insert(field);
            DispatchResult::changed()
        }

        FormAction::Touch { form, fields } => {
            let form = state.forms.entry(form).or_default();
            let before = form.touched.len();
            form.touched.extend(fields);
            if form.touched.len() == before {
                DispatchResult::unchanged()
            } else {
                DispatchResult::changed()
            }
        }

        FormAction::Reset { form } => match state.forms.get_mut(&form) {
            Some(form) => {
                *form = Form::default();
                DispatchResult::changed()
            }
            None => DispatchResult::unchanged(),
        },

        FormAction::Destroy { form } => {
            if state.forms.remove(&form).is_some() {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        FormAction::StartSubmit { form: name } => {
            let form = state.forms.entry(name.clone()).or_default();
            if form.submitting {
                return DispatchResult::unchanged();
            }
            form.submitting = true;
            DispatchResult::changed_with(FormEffect::Submit {
                form: name,
                values: form.values.clone(),
            })
        }

        FormAction::StopSubmit { form } => match state.forms.get_mut(&form) {
            Some(form) if form.submitting => {
                form.submitting = false;
                DispatchResult::changed()
            }
            _ => DispatchResult::unchanged(),
        },
    }
}

/// Store with empty form state and the form reducer.
pub fn mock_form_store() -> FormStore {
    EffectStore::new(FormState::default(), form_reducer)
}

/// JSON schema of [`FormState`].
pub fn state_schema() -> RootSchema {
    schemars::schema_for!(FormState)
}

/// JSON schema of [`FormAction`].
pub fn action_schema() -> RootSchema {
    schemars::schema_for!(FormAction)
}
