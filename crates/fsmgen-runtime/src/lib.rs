//! fsmgen Runtime
//!
//! Types shared by every state machine generated by fsmgen. Generated code
//! depends on this crate and on `std` only.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fsmgen_runtime::StateMachine;
//!
//! let machine = Runner::new();
//! machine.event(EVENT_START)?;
//! assert_eq!(machine.state(), STATE_RUNNING);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod machine;

pub use error::{BoxError, Error, Result};
pub use machine::StateMachine;
