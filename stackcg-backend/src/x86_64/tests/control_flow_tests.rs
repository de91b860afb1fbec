//! Calls, returns, jumps, labels and explicit stack nodes

use super::{lines, lower, net_stack};
use super::super::X86_64;
use crate::{Backend, CodegenError};
use pretty_assertions::assert_eq;
use stackcg_codegen::{AsmInst, Cond};
use stackcg_ir::{Node, OpType};

#[test]
fn test_call_pushes_arguments_last_first() {
    let call = Node::call("sum3", [Node::num(1), Node::num(2), Node::num(3)]);
    let insts = lower(&call);
    assert_eq!(
        insts.iter().map(|i| i.to_string()).collect::<Vec<_>>(),
        vec![
            "movq $3, %rax",
            "pushq %rax",
            "movq $2, %rax",
            "pushq %rax",
            "movq $1, %rax",
            "pushq %rax",
            "call sum3",
            "addq $24, %rsp",
            "pushq %rax",
        ]
    );
    assert_eq!(net_stack(&insts), 8);
}

#[test]
fn test_call_without_arguments() {
    assert_eq!(lines(&Node::call("tick", [])), vec!["call tick", "pushq %rax"]);
}

#[test]
fn test_call_target_falls_back_to_strval() {
    let call = Node::new(OpType::Call).with_str("puts").with_kid(Node::num(0));
    assert!(lines(&call).contains(&"call puts".to_string()));
}

#[test]
fn test_call_without_target_is_rejected() {
    let mut backend = X86_64::new();
    let err = backend.gen(&Node::new(OpType::Call)).unwrap_err();
    assert_eq!(err, CodegenError::MissingSymbol { op: OpType::Call });
}

#[test]
fn test_bare_ret() {
    assert_eq!(lines(&Node::ret(None)), vec!["ret"]);
}

#[test]
fn test_ret_with_value() {
    assert_eq!(
        lines(&Node::ret(Some(Node::num(5)))),
        vec!["movq $5, %rax", "pushq %rax", "popq %rax", "ret"]
    );
}

#[test]
fn test_ret_with_two_values_is_rejected() {
    let mut backend = X86_64::new();
    let ret = Node::new(OpType::Ret).with_kids([Node::num(1), Node::num(2)]);
    let err = backend.gen(&ret).unwrap_err();
    assert_eq!(err.to_string(), "`ret` node expects at most 1 children, found 2");
}

#[test]
fn test_ret_inside_function_tears_down_frame() {
    let func = Node::function("early", [Node::ret(Some(Node::num(1))), Node::num(2)]);
    let asm = X86_64::new().generate(&func).unwrap();
    let early_return = "    popq %rax\n    movq %rbp, %rsp\n    popq %rbp\n    ret\n";
    assert!(asm.contains(early_return), "missing teardown before ret:\n{asm}");
}

#[test]
fn test_conditional_jumps() {
    let cases = [
        (OpType::Je, "je"),
        (OpType::Jne, "jne"),
        (OpType::Jl, "jl"),
        (OpType::Jle, "jle"),
        (OpType::Jg, "jg"),
        (OpType::Jge, "jge"),
        (OpType::Ja, "ja"),
        (OpType::Jae, "jae"),
        (OpType::Jb, "jb"),
        (OpType::Jbe, "jbe"),
    ];
    for (op, mnemonic) in cases {
        assert_eq!(
            lines(&Node::jump(op, "target")),
            vec![format!("{mnemonic} target")],
            "wrong mnemonic for {op}"
        );
    }
}

#[test]
fn test_unconditional_jump() {
    assert_eq!(lower(&Node::jump(OpType::Jmp, ".Lend")), vec![AsmInst::Jmp(".Lend".to_string())]);
}

#[test]
fn test_jump_target_from_strval() {
    let jump = Node::new(OpType::Jle).with_str(".Lloop");
    assert_eq!(lower(&jump), vec![AsmInst::Jcc(Cond::Le, ".Lloop".to_string())]);
}

#[test]
fn test_jump_without_target_is_rejected() {
    for op in [OpType::Jmp, OpType::Je, OpType::Jbe] {
        let mut backend = X86_64::new();
        let err = backend.gen(&Node::new(op)).unwrap_err();
        assert_eq!(err, CodegenError::MissingSymbol { op });
    }
}

#[test]
fn test_jumps_leave_stack_alone() {
    let tree = Node::root([
        Node::binary(OpType::ICmp, Node::num(1), Node::num(2)),
        Node::jump(OpType::Jl, ".Lless"),
        Node::label(".Lless"),
    ]);
    assert_eq!(net_stack(&lower(&tree)), 0);
}

#[test]
fn test_label_is_unindented() {
    let mut backend = X86_64::new();
    backend.gen(&Node::label("loop_head")).unwrap();
    assert_eq!(backend.finish(), "loop_head:\n");
}

#[test]
fn test_label_without_name_is_rejected() {
    let mut backend = X86_64::new();
    let err = backend.gen(&Node::new(OpType::Label)).unwrap_err();
    assert_eq!(err, CodegenError::MissingSymbol { op: OpType::Label });
    assert_eq!(err.to_string(), "`label` node has no target name");
}

#[test]
fn test_label_with_children_is_rejected() {
    let mut backend = X86_64::new();
    let label = Node::label("x").with_kid(Node::num(1));
    assert!(matches!(
        backend.gen(&label),
        Err(CodegenError::ArityMismatch { op: OpType::Label, found: 1, .. })
    ));
}

#[test]
fn test_push_is_transparent() {
    assert_eq!(lines(&Node::push(Node::num(9))), vec!["movq $9, %rax", "pushq %rax"]);
}

#[test]
fn test_pop_discards_into_rax() {
    let tree = Node::root([Node::push(Node::num(9)), Node::pop()]);
    let insts = lower(&tree);
    assert_eq!(insts.last(), Some(&AsmInst::Popq(stackcg_codegen::Reg::Rax)));
    assert_eq!(net_stack(&insts), 0);
}

#[test]
fn test_unknown_kind_emits_nop_and_skips_children() {
    let node = Node::new(OpType::Unknown).with_kids([Node::num(1), Node::string("ignored")]);
    let mut backend = X86_64::new();
    backend.gen(&node).unwrap();
    assert_eq!(backend.instructions(), &[AsmInst::Nop]);
    assert!(backend.literals().is_empty());
}

#[test]
fn test_unknown_kind_from_json() {
    let tree = stackcg_ir::from_json(r#"{ "kind": "vector_shuffle" }"#).unwrap();
    assert_eq!(lines(&tree), vec!["nop"]);
}

#[test]
fn test_call_argument_must_leave_value() {
    let mut backend = X86_64::new();
    let call = Node::call("f", [Node::num(1), Node::store(Node::num(8), Node::num(2))]);
    let err = backend.gen(&call).unwrap_err();
    assert_eq!(err, CodegenError::MissingValue { op: OpType::Call, operand: OpType::Store });
    assert!(backend.instructions().is_empty());
}

#[test]
fn test_ret_operand_must_leave_value() {
    let mut backend = X86_64::new();
    let ret = Node::ret(Some(Node::binary(OpType::ICmp, Node::num(1), Node::num(2))));
    let err = backend.gen(&ret).unwrap_err();
    assert_eq!(err.to_string(), "`ret` node takes a `icmp` operand, which leaves no value");
}

#[test]
fn test_unknown_operand_is_rejected() {
    let tree = stackcg_ir::from_json(
        r#"{ "kind": "iadd", "kids": [ { "kind": "num", "value": 1 }, { "kind": "vshuffle" } ] }"#,
    )
    .unwrap();
    let mut backend = X86_64::new();
    assert_eq!(
        backend.gen(&tree),
        Err(CodegenError::MissingValue { op: OpType::IAdd, operand: OpType::Unknown })
    );
}

#[test]
fn test_root_statements_need_no_value() {
    let tree = Node::root([
        Node::store(Node::num(8), Node::num(1)),
        Node::binary(OpType::Test, Node::num(1), Node::num(1)),
        Node::pop(),
    ]);
    let mut backend = X86_64::new();
    assert!(backend.gen(&tree).is_ok());
}
