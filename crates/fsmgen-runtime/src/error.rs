//! Errors returned by generated state machines

use thiserror::Error;

/// Boxed error produced by a callback
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for state machine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error returned by a generated state machine
///
/// Callback errors are surfaced once and never retried. Only
/// [`Error::Entry`] can be returned after the state has changed: the
/// transition commits before the target state's entry action runs.
#[derive(Error, Debug)]
pub enum Error {
    /// No transition is registered for the event in the current state
    #[error("event `{event}` is not valid during state `{state}`")]
    InvalidEvent {
        /// The rejected event
        event: &'static str,
        /// State the machine was in
        state: &'static str,
    },

    /// A transition condition failed to evaluate; nothing ran
    #[error("condition failed: {0}")]
    Condition(#[source] BoxError),

    /// A transition action failed; the state did not change
    #[error("action failed: {0}")]
    Action(#[source] BoxError),

    /// An entry action failed; the state had already changed
    #[error("entry action failed: {0}")]
    Entry(#[source] BoxError),
}

impl Error {
    /// Rejected event for the current state
    pub fn invalid_event(event: &'static str, state: &'static str) -> Self {
        Self::InvalidEvent { event, state }
    }

    /// Wrap a condition error
    pub fn condition<E: Into<BoxError>>(err: E) -> Self {
        Self::Condition(err.into())
    }

    /// Wrap an action error
    pub fn action<E: Into<BoxError>>(err: E) -> Self {
        Self::Action(err.into())
    }

    /// Wrap an entry action error
    pub fn entry<E: Into<BoxError>>(err: E) -> Self {
        Self::Entry(err.into())
    }

    /// Whether the event was rejected without running any callback
    pub fn is_invalid_event(&self) -> bool {
        matches!(self, Self::InvalidEvent { .. })
    }

    /// The callback error, if this error came from a callback
    pub fn into_source(self) -> Option<BoxError> {
        match self {
            Self::InvalidEvent { .. } => None,
            Self::Condition(err) | Self::Action(err) | Self::Entry(err) => Some(err),
        }
    }
}
