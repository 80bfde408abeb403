//! Error types for fsmgen-core

use std::fmt;

use thiserror::Error;

/// Result type alias for fsmgen-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in fsmgen-core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file could not be found
    #[error("configuration file not found: {path}")]
    ConfigNotFound {
        /// Path that was searched
        path: String,
    },

    /// Failed to parse YAML configuration
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// Invalid configuration value
    #[error("invalid configuration: {message}")]
    ConfigInvalid {
        /// Description of what's invalid
        message: String,
    },

    /// The description failed validation
    #[error("invalid state machine description: {0}")]
    InvalidDescription(#[from] Diagnostics),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which user-supplied name an identifier diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentRole {
    /// Generated machine type name
    MachineName,
    /// Collaborator interface name
    Iface,
    /// Condition, action or entry action name
    Callback,
    /// Module wrapping the generated code
    Package,
}

impl fmt::Display for IdentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentRole::MachineName => write!(f, "machine name"),
            IdentRole::Iface => write!(f, "interface name"),
            IdentRole::Callback => write!(f, "callback name"),
            IdentRole::Package => write!(f, "package name"),
        }
    }
}

/// A single problem found while validating a description.
///
/// Every variant is fatal: the description has to be fixed and recompiled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Two states share a name
    #[error("duplicate state: `{state}`")]
    DuplicateState {
        /// The repeated state name
        state: String,
    },

    /// Two transitions of one state respond to the same event
    #[error("state `{state}` has two transitions for event `{event}`")]
    DuplicateEvent {
        /// Source state
        state: String,
        /// The repeated event name
        event: String,
    },

    /// `init` does not name a state
    #[error("init state `{init}` does not exist")]
    UnknownInitialState {
        /// The unresolved initial state
        init: String,
    },

    /// A transition targets a state that does not exist
    #[error("target state in transition from `{state}` to `{target}` on event `{event}` does not exist")]
    UnknownTargetState {
        /// Source state
        state: String,
        /// Triggering event
        event: String,
        /// The unresolved target
        target: String,
    },

    /// Two distinct names derive the same constant identifier
    #[error("`{first}` and `{second}` both derive the constant `{constant}`")]
    ConstantCollision {
        /// The derived identifier
        constant: String,
        /// Name that claimed the identifier first
        first: String,
        /// Name that collided with it
        second: String,
    },

    /// A state without a name
    #[error("state at position {index} has an empty name")]
    EmptyStateName {
        /// Position of the state in the description
        index: usize,
    },

    /// A transition without an event name
    #[error("state `{state}` has a transition with an empty event name")]
    EmptyEventName {
        /// Source state
        state: String,
    },

    /// A name that ends up in generated source is not a Rust identifier
    #[error("{role} `{value}` is not a valid identifier")]
    InvalidIdentifier {
        /// What the name is used for
        role: IdentRole,
        /// The offending name
        value: String,
    },

    /// A user-supplied name would shadow or redefine a generated name
    #[error("{role} `{name}` clashes with the generated `{generated}`")]
    NameClash {
        /// What the name is used for
        role: IdentRole,
        /// The offending name
        name: String,
        /// The generated item or local it clashes with
        generated: String,
    },

    /// A callback is used both as a condition and as an action
    #[error("callback `{callback}` is used both as a condition and as an action")]
    CallbackKindConflict {
        /// The callback name
        callback: String,
    },
}

/// Every diagnostic produced by one validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    /// Create an empty collection
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Record a diagnostic
    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(%diagnostic, "validation diagnostic");
        self.0.push(diagnostic);
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of diagnostics
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the diagnostics in the order they were found
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    /// Consume the collection
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.0
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => write!(f, "no diagnostics"),
            [single] => write!(f, "{single}"),
            many => {
                write!(f, "{} problems", many.len())?;
                for diagnostic in many {
                    write!(f, "\n  - {diagnostic}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for Diagnostics {}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
