// Public modules
pub mod artifacts;
pub mod clean;
pub mod config;
pub mod error;
pub mod output;
pub mod package;
pub mod pipeline;
pub mod publish;
pub mod upload;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Hint, Result};
