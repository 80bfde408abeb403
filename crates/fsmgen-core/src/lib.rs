//! fsmgen Core Library
//!
//! This crate provides the compile-time model of fsmgen:
//! - Raw state machine descriptions (the on-disk shape)
//! - Validation into an immutable machine model
//! - Identifier derivation for generated constants
//! - Project configuration
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Description │────▶│  Validator  │────▶│   Machine   │
//! │   (serde)   │     │ (diagnose)  │     │   (model)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use fsmgen_core::{Description, StateSpec, TransitionSpec, validate};
//!
//! let desc = Description::new("Runner", "idle")
//!     .with_state(StateSpec::new("idle").transition(TransitionSpec::on_event("start").to("running")))
//!     .with_state(StateSpec::new("running").on("onRunning"));
//!
//! let machine = validate(&desc).unwrap();
//! assert_eq!(machine.states[1].constant, "STATE_RUNNING");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod description;
pub mod error;
pub mod ident;
pub mod model;
pub mod validate;

pub use config::{Config, ProjectConfig};
pub use description::{Description, StateSpec, TransitionSpec};
pub use error::{Diagnostic, Diagnostics, Error, IdentRole, Result};
pub use ident::{ConstantKind, derive_constant_name, is_valid_identifier};
pub use model::{Callback, CallbackKind, EventDef, Machine, StateDef, TransitionDef};
pub use validate::validate;
