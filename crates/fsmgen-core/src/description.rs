//! Raw state machine descriptions
//!
//! These types mirror the on-disk description format one to one. Nothing
//! here is checked yet; [`crate::validate`] turns a [`Description`] into a
//! [`crate::model::Machine`].
//!
//! Keys also accept their capitalised spelling (`Name`, `Init`, `On`, ...)
//! and an empty string for an optional field means "not set".

use serde::{Deserialize, Deserializer, Serialize};

/// A complete state machine description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    /// Name of the generated machine type
    #[serde(alias = "Name")]
    pub name: String,

    /// Namespace for the generated code
    #[serde(
        default,
        alias = "Package",
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub package: Option<String>,

    /// The state the machine starts in
    #[serde(alias = "Init")]
    pub init: String,

    /// Collaborator interface the callbacks are resolved on
    #[serde(
        default,
        alias = "Iface",
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub iface: Option<String>,

    /// All states, in input order
    #[serde(default, alias = "States")]
    pub states: Vec<StateSpec>,
}

/// One state of a description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSpec {
    /// State name
    #[serde(alias = "Name")]
    pub name: String,

    /// Entry action, invoked whenever the machine transitions into this state
    #[serde(
        default,
        alias = "On",
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub on: Option<String>,

    /// Transitions leaving this state
    #[serde(default, alias = "Transitions")]
    pub transitions: Vec<TransitionSpec>,
}

/// One transition of a state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionSpec {
    /// Triggering event
    #[serde(alias = "Event")]
    pub event: String,

    /// Target state; absent means the event is handled without a state change
    #[serde(
        default,
        alias = "To",
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub to: Option<String>,

    /// Callback run in the source state before the transition commits
    #[serde(
        default,
        alias = "Action",
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub action: Option<String>,

    /// Guard evaluated before the action
    #[serde(
        default,
        alias = "Condition",
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub condition: Option<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

impl Description {
    /// Start a description with a name and an initial state
    pub fn new(name: impl Into<String>, init: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            init: init.into(),
            ..Default::default()
        }
    }

    /// Resolve callbacks on the given collaborator interface
    pub fn with_iface(mut self, iface: impl Into<String>) -> Self {
        self.iface = Some(iface.into());
        self
    }

    /// Wrap the generated code in the given package
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// Append a state
    pub fn with_state(mut self, state: StateSpec) -> Self {
        self.states.push(state);
        self
    }
}

impl StateSpec {
    /// A state without entry action or transitions
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the entry action
    pub fn on(mut self, callback: impl Into<String>) -> Self {
        self.on = Some(callback.into());
        self
    }

    /// Append a transition
    pub fn transition(mut self, transition: TransitionSpec) -> Self {
        self.transitions.push(transition);
        self
    }
}

impl TransitionSpec {
    /// A transition on `event` that does not change state
    pub fn on_event(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            ..Default::default()
        }
    }

    /// Set the target state
    pub fn to(mut self, target: impl Into<String>) -> Self {
        self.to = Some(target.into());
        self
    }

    /// Set the action
    pub fn action(mut self, callback: impl Into<String>) -> Self {
        self.action = Some(callback.into());
        self
    }

    /// Set the condition
    pub fn condition(mut self, callback: impl Into<String>) -> Self {
        self.condition = Some(callback.into());
        self
    }
}
