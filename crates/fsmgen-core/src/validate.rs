//! Description validation
//!
//! [`validate`] checks a raw [`Description`] and produces the [`Machine`]
//! model the code generator works from. Validation is exhaustive: every
//! problem found is reported, not just the first one.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::description::Description;
use crate::error::{Diagnostic, Diagnostics, IdentRole};
use crate::ident::{ConstantKind, derive_constant_name, is_valid_identifier};
use crate::model::{CallbackKind, EventDef, Machine, StateDef, TransitionDef};

/// Validate a description.
///
/// # Errors
///
/// Returns every [`Diagnostic`] found when the description violates one of
/// the structural rules (duplicate states or events, unresolved references,
/// colliding constants, invalid identifiers).
pub fn validate(desc: &Description) -> Result<Machine, Diagnostics> {
    let mut diagnostics = Diagnostics::new();

    if !is_valid_identifier(&desc.name) {
        diagnostics.push(Diagnostic::InvalidIdentifier {
            role: IdentRole::MachineName,
            value: desc.name.clone(),
        });
    }
    if let Some(iface) = &desc.iface {
        if !is_valid_identifier(iface) {
            diagnostics.push(Diagnostic::InvalidIdentifier {
                role: IdentRole::Iface,
                value: iface.clone(),
            });
        }
    }
    if let Some(package) = &desc.package {
        if !is_valid_identifier(package) {
            diagnostics.push(Diagnostic::InvalidIdentifier {
                role: IdentRole::Package,
                value: package.clone(),
            });
        }
    }

    let (states, duplicates) = index_states(desc, &mut diagnostics);
    let known: HashSet<&str> = states.iter().map(|s| s.name.as_str()).collect();

    if !known.contains(desc.init.as_str()) {
        diagnostics.push(Diagnostic::UnknownInitialState {
            init: desc.init.clone(),
        });
    }

    for state in states.iter().chain(&duplicates) {
        for transition in &state.transitions {
            if let Some(target) = &transition.target {
                if !known.contains(target.as_str()) {
                    diagnostics.push(Diagnostic::UnknownTargetState {
                        state: state.name.clone(),
                        event: transition.event.clone(),
                        target: target.clone(),
                    });
                }
            }
        }
    }

    let events = derive_events(&states, &mut diagnostics);
    check_callbacks(&states, &mut diagnostics);
    check_name_clashes(desc, &states, &events, &mut diagnostics);

    if !diagnostics.is_empty() {
        return Err(diagnostics);
    }

    tracing::debug!(
        machine = %desc.name,
        states = states.len(),
        events = events.len(),
        "description validated"
    );

    Ok(Machine {
        name: desc.name.clone(),
        package: desc.package.clone(),
        initial: desc.init.clone(),
        iface: desc.iface.clone(),
        states,
        events,
    })
}

/// Index states by name and transitions by event, rejecting duplicates.
///
/// A repeated state is returned separately so its transitions are still
/// checked.
fn index_states(
    desc: &Description,
    diagnostics: &mut Diagnostics,
) -> (Vec<StateDef>, Vec<StateDef>) {
    let mut states: Vec<StateDef> = Vec::with_capacity(desc.states.len());
    let mut duplicates: Vec<StateDef> = Vec::new();
    let mut by_name: HashSet<&str> = HashSet::new();
    let mut constants: HashMap<String, &str> = HashMap::new();

    for (index, spec) in desc.states.iter().enumerate() {
        if spec.name.is_empty() {
            diagnostics.push(Diagnostic::EmptyStateName { index });
            continue;
        }

        let duplicate = !by_name.insert(spec.name.as_str());
        let constant = derive_constant_name(ConstantKind::State, &spec.name);
        if duplicate {
            diagnostics.push(Diagnostic::DuplicateState {
                state: spec.name.clone(),
            });
        } else {
            match constants.get(&constant) {
                Some(first) => diagnostics.push(Diagnostic::ConstantCollision {
                    constant: constant.clone(),
                    first: (*first).to_string(),
                    second: spec.name.clone(),
                }),
                None => {
                    constants.insert(constant.clone(), spec.name.as_str());
                }
            }
        }

        let mut seen_events: HashSet<&str> = HashSet::new();
        let mut transitions = Vec::with_capacity(spec.transitions.len());

        for transition in &spec.transitions {
            if transition.event.is_empty() {
                diagnostics.push(Diagnostic::EmptyEventName {
                    state: spec.name.clone(),
                });
                continue;
            }
            if !seen_events.insert(transition.event.as_str()) {
                diagnostics.push(Diagnostic::DuplicateEvent {
                    state: spec.name.clone(),
                    event: transition.event.clone(),
                });
                continue;
            }

            transitions.push(TransitionDef {
                event: transition.event.clone(),
                target: transition.to.clone(),
                action: transition.action.clone(),
                condition: transition.condition.clone(),
            });
        }

        let state = StateDef {
            name: spec.name.clone(),
            constant,
            entry: spec.on.clone(),
            transitions,
        };
        if duplicate {
            duplicates.push(state);
        } else {
            states.push(state);
        }
    }

    (states, duplicates)
}

/// Collect the distinct events, sorted by name, with their constants.
fn derive_events(states: &[StateDef], diagnostics: &mut Diagnostics) -> Vec<EventDef> {
    let names: BTreeSet<&str> = states
        .iter()
        .flat_map(|s| s.transitions.iter().map(|t| t.event.as_str()))
        .collect();

    let mut constants: HashMap<String, &str> = HashMap::new();
    let mut events = Vec::with_capacity(names.len());

    for name in names {
        let constant = derive_constant_name(ConstantKind::Event, name);
        match constants.get(&constant) {
            Some(first) => diagnostics.push(Diagnostic::ConstantCollision {
                constant: constant.clone(),
                first: (*first).to_string(),
                second: name.to_string(),
            }),
            None => {
                constants.insert(constant.clone(), name);
            }
        }
        events.push(EventDef {
            name: name.to_string(),
            constant,
        });
    }

    events
}

/// Callback names must be identifiers and keep a single signature class.
fn check_callbacks(states: &[StateDef], diagnostics: &mut Diagnostics) {
    let mut kinds: HashMap<&str, CallbackKind> = HashMap::new();
    let mut reported: HashSet<&str> = HashSet::new();

    let uses = states.iter().flat_map(|state| {
        let entry = state
            .entry
            .as_deref()
            .map(|name| (name, CallbackKind::Action));
        let transitions = state.transitions.iter().flat_map(|t| {
            let condition = t
                .condition
                .as_deref()
                .map(|name| (name, CallbackKind::Condition));
            let action = t.action.as_deref().map(|name| (name, CallbackKind::Action));
            condition.into_iter().chain(action)
        });
        entry.into_iter().chain(transitions)
    });

    for (name, kind) in uses {
        match kinds.get(name) {
            None => {
                if !is_valid_identifier(name) {
                    diagnostics.push(Diagnostic::InvalidIdentifier {
                        role: IdentRole::Callback,
                        value: name.to_string(),
                    });
                }
                kinds.insert(name, kind);
            }
            Some(existing) if *existing != kind && reported.insert(name) => {
                diagnostics.push(Diagnostic::CallbackKindConflict {
                    callback: name.to_string(),
                });
            }
            Some(_) => {}
        }
    }
}

/// Items every generated file defines next to the machine type
const GENERATED_ITEMS: &[&str] = &[
    "State",
    "Event",
    "NO_EVENT",
    "INITIAL_STATE",
    "STATES",
    "EVENTS",
];

/// Names generated code relies on where it calls free functions
const GENERATED_LOCALS: &[&str] = &[
    "event",
    "state",
    "inner",
    "guard",
    "invoke_entry_action",
    "Ok",
    "Err",
];

/// Names from the description must not redefine or shadow generated names.
fn check_name_clashes(
    desc: &Description,
    states: &[StateDef],
    events: &[EventDef],
    diagnostics: &mut Diagnostics,
) {
    let inner = format!("{}Inner", desc.name);
    let items: Vec<&str> = GENERATED_ITEMS
        .iter()
        .copied()
        .chain(states.iter().map(|s| s.constant.as_str()))
        .chain(events.iter().map(|e| e.constant.as_str()))
        .collect();

    let mut clash = |role: IdentRole, name: &str, generated: &str| {
        diagnostics.push(Diagnostic::NameClash {
            role,
            name: name.to_string(),
            generated: generated.to_string(),
        });
    };

    if let Some(item) = items.iter().find(|item| **item == desc.name) {
        clash(IdentRole::MachineName, &desc.name, item);
    }

    let Some(iface) = &desc.iface else {
        // Free functions share the module and the method scopes.
        let callbacks: BTreeSet<&str> = states
            .iter()
            .flat_map(|state| {
                let transitions = state
                    .transitions
                    .iter()
                    .flat_map(|t| t.condition.iter().chain(&t.action));
                state.entry.iter().chain(transitions)
            })
            .map(String::as_str)
            .collect();

        for callback in callbacks {
            let taken = GENERATED_LOCALS
                .iter()
                .chain(&items)
                .copied()
                .chain([desc.name.as_str(), inner.as_str()])
                .find(|name| *name == callback);
            if let Some(generated) = taken {
                clash(IdentRole::Callback, callback, generated);
            }
        }
        return;
    };

    let taken = items
        .iter()
        .copied()
        .chain([desc.name.as_str(), inner.as_str()])
        .find(|name| *name == iface.as_str());
    if let Some(generated) = taken {
        clash(IdentRole::Iface, iface, generated);
    }
}
