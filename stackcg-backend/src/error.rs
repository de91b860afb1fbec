//! Code generation errors
//!
//! Malformed trees are reported as soon as the offending node is reached.
//! Nothing is emitted for a call that fails.

use stackcg_common::CompilerError;
use stackcg_ir::{Arity, OpType};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodegenError {
    #[error("`{op}` node expects {expected} children, found {found}")]
    ArityMismatch {
        op: OpType,
        expected: Arity,
        found: usize,
    },

    #[error("`{op}` node takes a `{operand}` operand, which leaves no value")]
    MissingValue { op: OpType, operand: OpType },

    #[error("`{op}` node has no target name")]
    MissingSymbol { op: OpType },

    #[error("`{op}` node has an empty address")]
    EmptyAddress { op: OpType },

    #[error("`{op}` node uses index scale {scale} (expected 1, 2, 4 or 8)")]
    InvalidScale { op: OpType, scale: u8 },
}

impl From<CodegenError> for CompilerError {
    fn from(err: CodegenError) -> Self {
        CompilerError::codegen_error(err.to_string())
    }
}
