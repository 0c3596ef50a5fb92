//! Utility primitives shared by the core modules.
//!
//! - `command` - Command execution with error handling
//! - `shell` - Quoting for displayed command lines

pub mod command;
pub mod shell;
