use crate::{Backend, X86_64};
use pretty_assertions::assert_eq;
use stackcg_ir::{Node, OpType};

fn generate(tree: &Node) -> String {
    X86_64::new().generate(tree).expect("tree should generate")
}

#[test]
fn test_add_then_subtract() {
    // (42 + 13) - 5
    let tree = Node::root([Node::binary(
        OpType::ISub,
        Node::binary(OpType::IAdd, Node::num(42), Node::num(13)),
        Node::num(5),
    )]);
    let expected = "    movq $42, %rax
    pushq %rax
    movq $13, %rax
    pushq %rax
    popq %rcx
    popq %rax
    addq %rcx, %rax
    pushq %rax
    movq $5, %rax
    pushq %rax
    popq %rcx
    popq %rax
    subq %rcx, %rax
    pushq %rax
";
    assert_eq!(generate(&tree), expected);
}

#[test]
fn test_masked_shift_then_not() {
    // ~((0x5A & 0x3F) << 2)
    let tree = Node::root([Node::unary(
        OpType::BNot,
        Node::binary(
            OpType::BShl,
            Node::binary(OpType::BAnd, Node::num(0x5A), Node::num(0x3F)),
            Node::num(2),
        ),
    )]);
    let expected = "    movq $90, %rax
    pushq %rax
    movq $63, %rax
    pushq %rax
    popq %rcx
    popq %rax
    andq %rcx, %rax
    pushq %rax
    movq $2, %rax
    pushq %rax
    popq %rcx
    popq %rax
    shlq %cl, %rax
    pushq %rax
    popq %rax
    notq %rax
    pushq %rax
";
    assert_eq!(generate(&tree), expected);
}

#[test]
fn test_store_then_load_recomputes_address() {
    let tree = Node::root([
        Node::store(Node::num(1000), Node::num(42)),
        Node::load(Node::num(1000)),
    ]);
    let expected = "    movq $1000, %rax
    pushq %rax
    movq $42, %rax
    pushq %rax
    popq %rcx
    popq %rax
    movq %rcx, (%rax)
    movq $1000, %rax
    pushq %rax
    popq %rax
    movq (%rax), %rax
    pushq %rax
";
    assert_eq!(generate(&tree), expected);
}

#[test]
fn test_two_strings_share_one_data_section() {
    let tree = Node::root([Node::string("Hello, world!"), Node::string("Test string")]);
    let expected = "    leaq .LC0(%rip), %rax
    pushq %rax
    leaq .LC1(%rip), %rax
    pushq %rax
.section .rodata
.align 8
.LC0:
.string \"Hello, world!\"
.LC1:
.string \"Test string\"
";
    assert_eq!(generate(&tree), expected);
}

#[test]
fn test_identical_strings_are_not_merged() {
    let tree = Node::root([Node::string("dup"), Node::string("dup"), Node::string("dup")]);
    let asm = generate(&tree);
    for label in [".LC0:", ".LC1:", ".LC2:"] {
        assert_eq!(asm.lines().filter(|l| *l == label).count(), 1, "{label}");
    }
    assert_eq!(asm.matches(".string \"dup\"").count(), 3);
}

#[test]
fn test_data_section_follows_all_code() {
    let tree = Node::function(
        "greet",
        [
            Node::call("puts", [Node::string("hi")]),
            Node::label(".Ldone"),
            Node::call("puts", [Node::string("bye")]),
            Node::ret(None),
        ],
    );
    let asm = generate(&tree);
    assert_eq!(asm.matches(".section .rodata").count(), 1);
    let data = asm.find(".section .rodata").unwrap();
    let last_ret = asm.rfind("    ret\n").unwrap();
    assert!(last_ret < data, "literal section must come after the code:\n{asm}");
}

#[test]
fn test_escaped_literal() {
    let asm = generate(&Node::root([Node::string("say \"hi\"\n")]));
    assert!(asm.contains(".string \"say \\\"hi\\\"\\n\"\n"), "{asm}");
}

#[test]
fn test_function_from_json() {
    let json = r#"{
        "kind": "root",
        "name": "main",
        "kids": [
            { "kind": "mov",
              "kids": [
                  { "kind": "lea", "addr": { "base": "%rbp", "offset": -8 } },
                  { "kind": "num", "value": 3 }
              ] },
            { "kind": "ret",
              "kids": [ { "kind": "load",
                          "kids": [ { "kind": "lea", "addr": { "base": "%rbp", "offset": -8 } } ] } ] }
        ]
    }"#;
    let tree = stackcg_ir::from_json(json).unwrap();
    let asm = generate(&tree);
    assert!(asm.starts_with(".section .text\n.align 16\n.globl main\n"));
    assert!(asm.contains("    movq %rax, -8(%rbp)\n"));
    assert!(asm.contains("    leaq -8(%rbp), %rax\n"));
    assert!(asm.ends_with("    movq %rbp, %rsp\n    popq %rbp\n    ret\n"));
}
