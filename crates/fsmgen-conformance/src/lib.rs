//! Conformance fixtures for fsmgen generated code
//!
//! `build.rs` compiles every description in `machines/` into `OUT_DIR`.
//! This crate includes the generated files next to the free-function
//! callbacks they call, so the tests can drive real generated machines.
//!
//! | Machine     | Package      | Callbacks                  |
//! |-------------|--------------|----------------------------|
//! | `Runner`    | `runner`     | free functions (crate root) |
//! | `Turnstile` | `turnstile`  | `TurnstileHooks` trait      |
//! | `Door`      | none         | free functions (`door`)     |

use fsmgen_runtime::BoxError;

include!(concat!(env!("OUT_DIR"), "/runner.rs"));
include!(concat!(env!("OUT_DIR"), "/turnstile.rs"));

/// `Door`, generated without a package and included into this module
pub mod door {
    use crate::recorder;
    use fsmgen_runtime::BoxError;

    include!(concat!(env!("OUT_DIR"), "/door.rs"));

    #[allow(non_snake_case)]
    fn isUnlocked(event: Event, state: State) -> Result<bool, BoxError> {
        recorder::check("isUnlocked", event.as_str(), state.as_str())
    }

    #[allow(non_snake_case)]
    fn breakLock(event: Event, state: State) -> Result<(), BoxError> {
        recorder::call("breakLock", event.as_str(), state.as_str())
    }

    #[allow(non_snake_case)]
    fn onOpened(event: Event, state: State) -> Result<(), BoxError> {
        recorder::call("onOpened", event.as_str(), state.as_str())
    }
}

/// Entry action of [`runner::STATE_RUNNING`]
#[allow(non_snake_case)]
pub fn onRunning(event: runner::Event, state: runner::State) -> Result<(), BoxError> {
    recorder::call("onRunning", event.as_str(), state.as_str())
}

/// Per-thread log of free-function callbacks and their scripted outcomes
pub mod recorder {
    use fsmgen_runtime::BoxError;
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};

    thread_local! {
        static CALLS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
        static FAILING: RefCell<HashSet<&'static str>> = RefCell::new(HashSet::new());
        static ANSWERS: RefCell<HashMap<&'static str, bool>> = RefCell::new(HashMap::new());
    }

    /// Forget every call and scripted outcome on this thread
    pub fn reset() {
        CALLS.with_borrow_mut(Vec::clear);
        FAILING.with_borrow_mut(HashSet::clear);
        ANSWERS.with_borrow_mut(HashMap::clear);
    }

    /// Make `callback` return an error from now on
    pub fn fail(callback: &'static str) {
        FAILING.with_borrow_mut(|failing| failing.insert(callback));
    }

    /// Answer for condition `callback`; conditions default to `true`
    pub fn answer(callback: &'static str, value: bool) {
        ANSWERS.with_borrow_mut(|answers| answers.insert(callback, value));
    }

    /// Calls recorded so far, as `name(event, state)`
    pub fn calls() -> Vec<String> {
        CALLS.with_borrow(Clone::clone)
    }

    pub(crate) fn call(callback: &'static str, event: &str, state: &str) -> Result<(), BoxError> {
        CALLS.with_borrow_mut(|calls| calls.push(format!("{callback}({event}, {state})")));
        if FAILING.with_borrow(|failing| failing.contains(callback)) {
            return Err(format!("{callback} failed").into());
        }
        Ok(())
    }

    pub(crate) fn check(callback: &'static str, event: &str, state: &str) -> Result<bool, BoxError> {
        call(callback, event, state)?;
        Ok(ANSWERS.with_borrow(|answers| answers.get(callback).copied().unwrap_or(true)))
    }
}
