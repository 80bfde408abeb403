//! Validated state machine model
//!
//! A [`Machine`] is only ever produced by [`crate::validate::validate`], so
//! every reference it holds resolves and every derived constant is unique.

use std::collections::BTreeMap;

/// A validated state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine {
    /// Name of the generated machine type
    pub name: String,

    /// Namespace for the generated code
    pub package: Option<String>,

    /// Name of the initial state
    pub initial: String,

    /// Collaborator interface the callbacks are resolved on
    pub iface: Option<String>,

    /// States in input order
    pub states: Vec<StateDef>,

    /// Distinct events, sorted by name
    pub events: Vec<EventDef>,
}

/// A validated state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateDef {
    /// State name
    pub name: String,

    /// Derived `STATE_*` constant
    pub constant: String,

    /// Entry action
    pub entry: Option<String>,

    /// Outgoing transitions in input order, one per event
    pub transitions: Vec<TransitionDef>,
}

/// A validated transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionDef {
    /// Triggering event
    pub event: String,

    /// Target state, `None` to handle the event in place
    pub target: Option<String>,

    /// Action run in the source state
    pub action: Option<String>,

    /// Guard evaluated before the action
    pub condition: Option<String>,
}

/// A distinct event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDef {
    /// Event name
    pub name: String,

    /// Derived `EVENT_*` constant
    pub constant: String,
}

/// Signature class of a callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackKind {
    /// Actions and entry actions: `(event, state) -> Result<(), _>`
    Action,
    /// Conditions: `(event, state) -> Result<bool, _>`
    Condition,
}

/// A callback referenced somewhere in the machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Callback {
    /// Function or method name
    pub name: String,

    /// Signature class
    pub kind: CallbackKind,
}

impl Machine {
    /// Look up a state by name
    pub fn state(&self, name: &str) -> Option<&StateDef> {
        self.states.iter().find(|s| s.name == name)
    }

    /// The initial state; always present on a validated machine
    pub fn initial_state(&self) -> Option<&StateDef> {
        self.state(&self.initial)
    }

    /// Look up an event by name
    pub fn event(&self, name: &str) -> Option<&EventDef> {
        self.events.iter().find(|e| e.name == name)
    }

    /// Whether callbacks are resolved on a collaborator
    pub fn has_iface(&self) -> bool {
        self.iface.is_some()
    }

    /// Every distinct callback, sorted by name
    pub fn callbacks(&self) -> Vec<Callback> {
        let mut seen: BTreeMap<&str, CallbackKind> = BTreeMap::new();

        for state in &self.states {
            if let Some(entry) = &state.entry {
                seen.entry(entry.as_str()).or_insert(CallbackKind::Action);
            }
            for transition in &state.transitions {
                if let Some(condition) = &transition.condition {
                    seen.entry(condition.as_str()).or_insert(CallbackKind::Condition);
                }
                if let Some(action) = &transition.action {
                    seen.entry(action.as_str()).or_insert(CallbackKind::Action);
                }
            }
        }

        seen.into_iter()
            .map(|(name, kind)| Callback {
                name: name.to_string(),
                kind,
            })
            .collect()
    }

    /// Number of transitions across all states
    pub fn transition_count(&self) -> usize {
        self.states.iter().map(|s| s.transitions.len()).sum()
    }
}

impl StateDef {
    /// The transition taken on `event`, if any
    pub fn transition(&self, event: &str) -> Option<&TransitionDef> {
        self.transitions.iter().find(|t| t.event == event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> Machine {
        Machine {
            name: "Door".to_string(),
            package: None,
            initial: "closed".to_string(),
            iface: None,
            states: vec![
                StateDef {
                    name: "closed".to_string(),
                    constant: "STATE_CLOSED".to_string(),
                    entry: Some("onClosed".to_string()),
                    transitions: vec![TransitionDef {
                        event: "open".to_string(),
                        target: Some("opened".to_string()),
                        action: Some("unlock".to_string()),
                        condition: Some("hasKey".to_string()),
                    }],
                },
                StateDef {
                    name: "opened".to_string(),
                    constant: "STATE_OPENED".to_string(),
                    entry: None,
                    transitions: vec![TransitionDef {
                        event: "close".to_string(),
                        target: Some("closed".to_string()),
                        action: Some("onClosed".to_string()),
                        condition: None,
                    }],
                },
            ],
            events: vec![
                EventDef {
                    name: "close".to_string(),
                    constant: "EVENT_CLOSE".to_string(),
                },
                EventDef {
                    name: "open".to_string(),
                    constant: "EVENT_OPEN".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_lookup() {
        let machine = machine();
        assert_eq!(machine.initial_state().unwrap().name, "closed");
        assert!(machine.state("opened").is_some());
        assert!(machine.state("ajar").is_none());
        assert_eq!(machine.event("open").unwrap().constant, "EVENT_OPEN");
        assert_eq!(machine.transition_count(), 2);

        let closed = machine.state("closed").unwrap();
        assert_eq!(
            closed.transition("open").unwrap().target.as_deref(),
            Some("opened")
        );
        assert!(closed.transition("close").is_none());
    }

    #[test]
    fn test_callbacks_are_sorted_and_deduplicated() {
        let callbacks = machine().callbacks();
        let names: Vec<_> = callbacks.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["hasKey", "onClosed", "unlock"]);

        assert_eq!(callbacks[0].kind, CallbackKind::Condition);
        assert_eq!(callbacks[1].kind, CallbackKind::Action);
        assert_eq!(callbacks[2].kind, CallbackKind::Action);
    }
}
