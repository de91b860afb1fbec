//! Tests for the x86-64 generator

mod control_flow_tests;

use super::X86_64;
use crate::Backend;
use stackcg_codegen::AsmInst;
use stackcg_ir::Node;

/// Lower a fragment on a fresh generator
fn lower(node: &Node) -> Vec<AsmInst> {
    let mut backend = X86_64::new();
    backend.gen(node).expect("fragment should lower");
    backend.instructions().to_vec()
}

/// Lowered fragment as assembly lines without indentation
fn lines(node: &Node) -> Vec<String> {
    lower(node).iter().map(|inst| inst.to_string()).collect()
}

/// Net bytes left on the machine stack by a sequence
fn net_stack(insts: &[AsmInst]) -> i64 {
    insts.iter().map(AsmInst::stack_delta).sum()
}
