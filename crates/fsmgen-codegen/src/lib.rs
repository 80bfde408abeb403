//! fsmgen Code Generation
//!
//! This crate handles the description → Rust compilation pipeline.
//!
//! # Pipeline Overview
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ JSON / YAML │────▶│ Description │────▶│   Machine   │────▶│ Rust source │
//! │    file     │     │  (Parser)   │     │ (Validator) │     │ (Generator) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use fsmgen_codegen::{CompileOptions, Compiler};
//!
//! let compiler = Compiler::new(CompileOptions::default());
//! let compiled = compiler.compile_all("machines").await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod compiler;
pub mod error;
pub mod generator;
pub mod parser;

pub use compiler::{CompileOptions, CompileStatus, CompiledMachine, Compiler};
pub use error::{Error, Result};
pub use generator::{GenerateOptions, Generator};
pub use parser::{Format, Parser};
