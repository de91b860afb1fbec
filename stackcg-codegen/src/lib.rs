//! Stack Codegen - x86-64 Assembly Model
//! 
//! This crate holds the target-side vocabulary of the backend:
//! 
//! - Register and operand definitions
//! - The instruction and directive set, rendered in AT&T syntax
//! - Text emission of instruction sequences

pub mod asm;
pub mod emit;

pub use asm::{AsmInst, Cond, MemOperand, Operand, Reg};
pub use emit::Emitter;
