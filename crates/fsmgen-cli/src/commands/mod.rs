//! CLI command implementations

pub mod compile;
pub mod init;
pub mod validate;
