//! Common interface of generated state machines

use crate::error::Result;

/// Operations every generated state machine provides.
///
/// Implementations guard their state with a reader/writer lock: [`state`]
/// takes the read lock, [`event`] and [`set_state`] hold the write lock for
/// their whole execution, callbacks included. A callback must therefore not
/// dispatch events to the machine that invoked it.
///
/// [`state`]: StateMachine::state
/// [`event`]: StateMachine::event
/// [`set_state`]: StateMachine::set_state
pub trait StateMachine {
    /// State identifier type
    type State: Copy + Eq;

    /// Event identifier type
    type Event: Copy + Eq;

    /// The current state
    fn state(&self) -> Self::State;

    /// Process an event
    fn event(&self, event: Self::Event) -> Result<()>;

    /// Force the state, optionally running its entry action with `event`
    fn set_state(&self, state: Self::State, event: Self::Event, invoke_entry_action: bool)
    -> Result<()>;
}
