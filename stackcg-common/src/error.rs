//! Error handling for the stack code generator
//!
//! This module defines the top-level error type reported by tools built on
//! the backend. Phase-specific errors (such as the backend's
//! `CodegenError`) convert into it.

use thiserror::Error;

/// Main error type that encompasses every failure a tool can report
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompilerError {
    #[error("Code generation error: {message}")]
    Codegen { message: String },

    #[error("Invalid IR input: {message}")]
    Input { message: String },

    #[error("IO error: {message}")]
    IoError { message: String },
}

impl CompilerError {
    /// Create a codegen error
    pub fn codegen_error(message: impl Into<String>) -> Self {
        CompilerError::Codegen { message: message.into() }
    }

    /// Create an input error
    pub fn input_error(message: impl Into<String>) -> Self {
        CompilerError::Input { message: message.into() }
    }

    /// Whether the error was caused by the caller's input rather than the tool
    pub fn is_input_error(&self) -> bool {
        matches!(self, CompilerError::Codegen { .. } | CompilerError::Input { .. })
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for CompilerError {
    fn from(err: std::io::Error) -> Self {
        CompilerError::IoError {
            message: err.to_string(),
        }
    }
}

/// Convert from serde_json::Error (malformed IR documents)
impl From<serde_json::Error> for CompilerError {
    fn from(err: serde_json::Error) -> Self {
        CompilerError::Input {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CompilerError::codegen_error("node `iadd` expects 2 children, found 1");
        assert_eq!(
            err.to_string(),
            "Code generation error: node `iadd` expects 2 children, found 1"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let err: CompilerError = io.into();
        assert!(matches!(err, CompilerError::IoError { .. }));
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_json_conversion() {
        let parse = serde_json::from_str::<serde_json::Value>("{ not json").unwrap_err();
        let err: CompilerError = parse.into();
        assert!(matches!(err, CompilerError::Input { .. }));
        assert!(err.is_input_error());
    }
}
