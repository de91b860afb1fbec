//! Stack Codegen - Common Types and Utilities
//! 
//! This crate contains the shared error type and small aliases used by
//! every other crate in the workspace.

pub mod error;
pub mod types;

pub use error::CompilerError;
pub use types::*;
